use super::field::FieldType;
use super::id::{ConditionId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses a child list in the document: the root, a section, or a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    Root,
    Section(NodeId),
    Condition(ConditionId),
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Root => write!(f, "root"),
            Container::Section(id) => write!(f, "section {}", id),
            Container::Condition(id) => write!(f, "condition {}", id),
        }
    }
}

/// The meter a meter-reading field records against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterRef {
    pub meter_id: String,
    /// Display unit looked up from the meter; not persisted by the backend.
    pub unit: Option<String>,
}

impl MeterRef {
    pub fn new(meter_id: impl Into<String>) -> Self {
        Self {
            meter_id: meter_id.into(),
            unit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
    pub options: Vec<String>,
    pub meter: Option<MeterRef>,
    /// Condition groups in display order. Empty unless the type is logic-enabled.
    pub conditions: Vec<ConditionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingNode {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionNode {
    pub label: String,
    pub description: Option<String>,
    /// Fields and headings only.
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Field(FieldNode),
    Heading(HeadingNode),
    Section(SectionNode),
}

/// A node stored in the procedure arena.
///
/// `parent` is a back-reference by id; ownership of child lists lives with the
/// container. A node's order is its position in that list and is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent: Container,
    pub kind: NodeKind,
}

impl Node {
    pub fn label(&self) -> &str {
        match &self.kind {
            NodeKind::Field(field) => &field.label,
            NodeKind::Heading(heading) => &heading.label,
            NodeKind::Section(section) => &section.label,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, NodeKind::Section(_))
    }

    pub fn as_field(&self) -> Option<&FieldNode> {
        match &self.kind {
            NodeKind::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&SectionNode> {
        match &self.kind {
            NodeKind::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Field(_) => "field",
            NodeKind::Heading(_) => "heading",
            NodeKind::Section(_) => "section",
        }
    }
}

/// A property patch for `Procedure::update`.
///
/// Properties that do not apply to the target node's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub required: Option<bool>,
    pub description: Option<Option<String>>,
    pub options: Option<Vec<String>>,
    pub meter: Option<Option<MeterRef>>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn meter(mut self, meter: Option<MeterRef>) -> Self {
        self.meter = Some(meter);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
