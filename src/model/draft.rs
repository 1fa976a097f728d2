use super::condition::Condition;
use super::field::FieldType;
use super::node::MeterRef;
use serde::{Deserialize, Serialize};

/// An id-free, nested description of a node and everything beneath it.
///
/// Drafts are what callers hand to `Procedure::insert`; the arena assigns
/// identities when it allocates them. `Procedure::to_drafts` produces the same
/// shape back, which makes two documents comparable regardless of their ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeDraft {
    Field(FieldDraft),
    Heading { label: String },
    Section(SectionDraft),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDraft {
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
    pub options: Vec<String>,
    pub meter: Option<MeterRef>,
    pub conditions: Vec<ConditionDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDraft {
    pub condition: Condition,
    pub children: Vec<NodeDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDraft {
    pub label: String,
    pub description: Option<String>,
    pub children: Vec<NodeDraft>,
}

impl NodeDraft {
    pub fn field(label: impl Into<String>, field_type: FieldType) -> Self {
        NodeDraft::Field(FieldDraft {
            label: label.into(),
            field_type,
            required: false,
            description: None,
            options: Vec::new(),
            meter: None,
            conditions: Vec::new(),
        })
    }

    pub fn heading(label: impl Into<String>) -> Self {
        NodeDraft::Heading {
            label: label.into(),
        }
    }

    pub fn section(label: impl Into<String>) -> Self {
        NodeDraft::Section(SectionDraft {
            label: label.into(),
            description: None,
            children: Vec::new(),
        })
    }

    pub fn required(mut self) -> Self {
        if let NodeDraft::Field(field) = &mut self {
            field.required = true;
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        match &mut self {
            NodeDraft::Field(field) => field.description = Some(description.into()),
            NodeDraft::Section(section) => section.description = Some(description.into()),
            NodeDraft::Heading { .. } => {}
        }
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let NodeDraft::Field(field) = &mut self {
            field.options = options.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn with_meter(mut self, meter: MeterRef) -> Self {
        if let NodeDraft::Field(field) = &mut self {
            field.meter = Some(meter);
        }
        self
    }

    /// Attaches a condition group. Ignored on headings and sections.
    pub fn with_condition(mut self, condition: Condition, children: Vec<NodeDraft>) -> Self {
        if let NodeDraft::Field(field) = &mut self {
            field.conditions.push(ConditionDraft {
                condition,
                children,
            });
        }
        self
    }

    /// Appends children to a section. Ignored on fields and headings.
    pub fn with_children(mut self, children: Vec<NodeDraft>) -> Self {
        if let NodeDraft::Section(section) = &mut self {
            section.children.extend(children);
        }
        self
    }

    pub fn label(&self) -> &str {
        match self {
            NodeDraft::Field(field) => &field.label,
            NodeDraft::Heading { label } => label,
            NodeDraft::Section(section) => &section.label,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, NodeDraft::Section(_))
    }

    /// Checks the containment and logic rules a draft must satisfy before it
    /// can be placed. `nested` is true when the draft lands outside the root.
    pub fn is_admissible(&self, nested: bool) -> bool {
        match self {
            NodeDraft::Heading { .. } => true,
            NodeDraft::Section(section) => {
                !nested && section.children.iter().all(|child| child.is_admissible(true))
            }
            NodeDraft::Field(field) => {
                if !field.conditions.is_empty() && !field.field_type.is_logic_enabled() {
                    return false;
                }
                field.conditions.iter().all(|group| {
                    field.field_type.supports(group.condition.operator)
                        && group.children.iter().all(|child| child.is_admissible(true))
                })
            }
        }
    }
}
