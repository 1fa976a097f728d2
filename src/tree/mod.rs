//! The arena-backed procedure document.
//!
//! Nodes and condition groups live in flat maps keyed by identity. Containers
//! (the root, sections and condition groups) own ordered child id lists, and
//! every node keeps a back-reference to its container. Recursive work goes
//! through the walker and fold in [`visit`].

use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::model::{
    ConditionGroup, ConditionId, Container, FieldNode, HeadingNode, IdGenerator, Node, NodeDraft,
    NodeId, NodeKind, ProcedureMeta, SectionNode,
};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

pub mod mutation;
pub mod outline;
pub mod reorder;
pub mod visit;

pub use mutation::{ConditionPatch, Deletion};
pub use reorder::DropTarget;
pub use visit::{TreeFold, Visit, Walk};

/// One procedure being edited: metadata plus the node tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub meta: ProcedureMeta,
    pub(crate) nodes: AHashMap<NodeId, Node>,
    pub(crate) conditions: AHashMap<ConditionId, ConditionGroup>,
    pub(crate) root: Vec<NodeId>,
    pub(crate) ids: IdGenerator,
}

impl Default for Procedure {
    fn default() -> Self {
        Self::new()
    }
}

impl Procedure {
    /// A document with no nodes at all.
    pub fn empty(ids: IdGenerator) -> Self {
        Self {
            meta: ProcedureMeta::default(),
            nodes: AHashMap::new(),
            conditions: AHashMap::new(),
            root: Vec::new(),
            ids,
        }
    }

    /// A new procedure holding one default field, using the default configuration.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// A new procedure holding one default field as configured.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut procedure = Self::empty(IdGenerator::new(config.id_strategy));
        procedure.meta.visibility = config.default_visibility;
        let draft = NodeDraft::field(
            config.default_field_label.clone(),
            config.default_field_type.clone(),
        );
        let id = procedure.allocate(draft, Container::Root);
        procedure.root.push(id);
        procedure
    }

    /// Top-level node ids in document order.
    pub fn root(&self) -> &[NodeId] {
        &self.root
    }

    /// Number of nodes anywhere in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn find_condition(&self, id: ConditionId) -> Option<&ConditionGroup> {
        self.conditions.get(&id)
    }

    /// The condition groups of a field, in display order.
    pub fn conditions_of(&self, field: NodeId) -> Vec<&ConditionGroup> {
        self.nodes
            .get(&field)
            .and_then(Node::as_field)
            .map(|field| {
                field
                    .conditions
                    .iter()
                    .filter_map(|id| self.conditions.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The child list of a container, if the container exists.
    pub fn children(&self, container: Container) -> Option<&[NodeId]> {
        match container {
            Container::Root => Some(&self.root),
            Container::Section(id) => self
                .nodes
                .get(&id)
                .and_then(Node::as_section)
                .map(|section| section.children.as_slice()),
            Container::Condition(id) => self
                .conditions
                .get(&id)
                .map(|group| group.children.as_slice()),
        }
    }

    pub(crate) fn children_mut(&mut self, container: Container) -> Option<&mut Vec<NodeId>> {
        match container {
            Container::Root => Some(&mut self.root),
            Container::Section(id) => match self.nodes.get_mut(&id) {
                Some(Node {
                    kind: NodeKind::Section(section),
                    ..
                }) => Some(&mut section.children),
                _ => None,
            },
            Container::Condition(id) => self
                .conditions
                .get_mut(&id)
                .map(|group| &mut group.children),
        }
    }

    pub fn container_of(&self, id: NodeId) -> Option<Container> {
        self.nodes.get(&id).map(|node| node.parent)
    }

    /// Zero-based position of a node among its siblings.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let container = self.container_of(id)?;
        self.children(container)?
            .iter()
            .position(|sibling| *sibling == id)
    }

    /// The node's `order`: its one-based position among its siblings.
    pub fn order_of(&self, id: NodeId) -> Option<usize> {
        self.index_of(id).map(|index| index + 1)
    }

    /// Root-level sections in document order.
    pub fn sections(&self) -> Vec<NodeId> {
        self.root
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(Node::is_section))
            .collect()
    }

    /// The node owning a container: the section itself, or the field a
    /// condition group belongs to. The root has no owner.
    pub fn owner_of(&self, container: Container) -> Option<NodeId> {
        match container {
            Container::Root => None,
            Container::Section(id) => Some(id),
            Container::Condition(id) => self.conditions.get(&id).map(|group| group.field),
        }
    }

    /// Whether `container` lies inside the subtree rooted at `ancestor`
    /// (including containers owned by `ancestor` itself).
    pub fn is_within(&self, container: Container, ancestor: NodeId) -> bool {
        let mut current = container;
        // Bounded by the node count so a corrupted parent chain cannot loop forever.
        for _ in 0..=self.nodes.len() {
            let Some(owner) = self.owner_of(current) else {
                return false;
            };
            if owner == ancestor {
                return true;
            }
            match self.nodes.get(&owner) {
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        false
    }

    /// Checks every structural invariant of the document.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen_nodes: AHashSet<NodeId> = AHashSet::new();
        let mut seen_conditions: AHashSet<ConditionId> = AHashSet::new();
        let mut failure = None;

        self.walk(|visit| {
            let problem = match visit {
                Visit::Node {
                    node, container, ..
                } => check_node(node, container, &mut seen_nodes),
                Visit::Condition { group, owner, .. } => {
                    check_condition(group, owner, &mut seen_conditions)
                }
            };
            match problem {
                Some(error) => {
                    failure = Some(error);
                    Walk::Stop
                }
                None => Walk::Continue,
            }
        });

        if let Some(error) = failure {
            return Err(error);
        }

        let unreachable = (self.nodes.len() - seen_nodes.len())
            + (self.conditions.len() - seen_conditions.len());
        if unreachable > 0 {
            return Err(ValidationError::Unreachable(unreachable));
        }
        Ok(())
    }

    pub(crate) fn fresh_node_id(&mut self) -> NodeId {
        loop {
            let id = self.ids.node_id();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    pub(crate) fn fresh_condition_id(&mut self) -> ConditionId {
        loop {
            let id = self.ids.condition_id();
            if !self.conditions.contains_key(&id) {
                return id;
            }
        }
    }

    /// Stores a draft and everything beneath it under fresh identities.
    /// The caller is responsible for listing the returned id in `parent`.
    pub(crate) fn allocate(&mut self, draft: NodeDraft, parent: Container) -> NodeId {
        let id = self.fresh_node_id();
        // Reserve the id before allocating descendants so they cannot reuse it.
        self.nodes.insert(
            id,
            Node {
                id,
                parent,
                kind: NodeKind::Heading(HeadingNode {
                    label: String::new(),
                }),
            },
        );

        let kind = match draft {
            NodeDraft::Heading { label } => NodeKind::Heading(HeadingNode { label }),
            NodeDraft::Section(section) => {
                let children = section
                    .children
                    .into_iter()
                    .map(|child| self.allocate(child, Container::Section(id)))
                    .collect();
                NodeKind::Section(SectionNode {
                    label: section.label,
                    description: non_empty(section.description),
                    children,
                })
            }
            NodeDraft::Field(field) => {
                let mut conditions = Vec::with_capacity(field.conditions.len());
                for group in field.conditions {
                    let condition_id = self.fresh_condition_id();
                    self.conditions.insert(
                        condition_id,
                        ConditionGroup {
                            id: condition_id,
                            field: id,
                            condition: group.condition,
                            children: Vec::new(),
                        },
                    );
                    let children: Vec<NodeId> = group
                        .children
                        .into_iter()
                        .map(|child| self.allocate(child, Container::Condition(condition_id)))
                        .collect();
                    if let Some(stored) = self.conditions.get_mut(&condition_id) {
                        stored.children = children;
                    }
                    conditions.push(condition_id);
                }
                NodeKind::Field(FieldNode {
                    label: field.label,
                    field_type: field.field_type,
                    required: field.required,
                    description: non_empty(field.description),
                    options: field.options,
                    meter: field.meter,
                    conditions,
                })
            }
        };

        if let Some(node) = self.nodes.get_mut(&id) {
            node.kind = kind;
        }
        id
    }
}

/// Blank descriptions are stored as absent.
pub(crate) fn non_empty(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.is_empty())
}

fn check_node(
    node: &Node,
    container: Container,
    seen: &mut AHashSet<NodeId>,
) -> Option<ValidationError> {
    if !seen.insert(node.id) {
        return Some(ValidationError::DuplicatePlacement(node.id));
    }
    if node.parent != container {
        return Some(ValidationError::ParentMismatch { child: node.id });
    }
    match &node.kind {
        NodeKind::Section(_) if container != Container::Root => {
            Some(ValidationError::NestedSection { section: node.id })
        }
        NodeKind::Field(field)
            if !field.conditions.is_empty() && !field.field_type.is_logic_enabled() =>
        {
            Some(ValidationError::ConditionsNotAllowed {
                field: node.id,
                field_type: field.field_type.label().to_string(),
            })
        }
        _ => None,
    }
}

fn check_condition(
    group: &ConditionGroup,
    owner: &Node,
    seen: &mut AHashSet<ConditionId>,
) -> Option<ValidationError> {
    if group.field != owner.id || !seen.insert(group.id) {
        return Some(ValidationError::OrphanCondition(group.id));
    }
    match owner.as_field() {
        Some(field) if !field.field_type.supports(group.condition.operator) => {
            Some(ValidationError::UnsupportedOperator {
                condition: group.id,
                field: owner.id,
                operator: group.condition.operator.label().to_string(),
            })
        }
        _ => None,
    }
}
