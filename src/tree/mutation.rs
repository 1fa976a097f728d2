use super::{Procedure, non_empty};
use super::visit::{Visit, Walk};
use crate::model::{
    Condition, ConditionGroup, ConditionId, Container, FieldType, Node, NodeDraft, NodeId,
    NodeKind, NodePatch, Operator,
};
use serde::{Deserialize, Serialize};

/// Everything a structural removal took out of the document.
///
/// This is the deletion event: UI-side resources keyed by any of these ids
/// (element refs, open editors, cached answers) should be released.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub nodes: Vec<NodeId>,
    pub conditions: Vec<ConditionId>,
}

impl Deletion {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.conditions.is_empty()
    }

    fn absorb(&mut self, other: Deletion) {
        self.nodes.extend(other.nodes);
        self.conditions.extend(other.conditions);
    }
}

/// A partial update of a condition group's rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionPatch {
    pub operator: Option<Operator>,
    pub value: Option<Option<String>>,
    pub value2: Option<Option<String>>,
}

impl Procedure {
    /// Appends a node built from `draft` to the end of `container`.
    ///
    /// Returns `None` and leaves the tree unchanged when the container does not
    /// exist, when a section would land outside the root, or when the draft
    /// carries conditions its field type does not support.
    pub fn insert(&mut self, container: Container, draft: NodeDraft) -> Option<NodeId> {
        if self.children(container).is_none() {
            log::debug!("insert: container {} not found", container);
            return None;
        }
        if !draft.is_admissible(container != Container::Root) {
            log::debug!(
                "insert: rejected '{}' into {} (containment or logic rule)",
                draft.label(),
                container
            );
            return None;
        }
        let id = self.allocate(draft, container);
        self.children_mut(container)?.push(id);
        Some(id)
    }

    /// Looks up any node in the tree.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Applies a property patch to one node. Returns `false` if `id` is unknown.
    pub fn update(&mut self, id: NodeId, patch: NodePatch) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::debug!("update: node {} not found", id);
            return false;
        };
        match &mut node.kind {
            NodeKind::Field(field) => {
                if let Some(label) = patch.label {
                    field.label = label;
                }
                if let Some(required) = patch.required {
                    field.required = required;
                }
                if let Some(description) = patch.description {
                    field.description = non_empty(description);
                }
                if let Some(options) = patch.options {
                    field.options = options;
                }
                if let Some(meter) = patch.meter {
                    field.meter = meter;
                }
            }
            NodeKind::Heading(heading) => {
                if let Some(label) = patch.label {
                    heading.label = label;
                }
            }
            NodeKind::Section(section) => {
                if let Some(label) = patch.label {
                    section.label = label;
                }
                if let Some(description) = patch.description {
                    section.description = non_empty(description);
                }
            }
        }
        true
    }

    /// Attaches a new, empty condition group to a logic-enabled field.
    pub fn add_condition(&mut self, field: NodeId, condition: Condition) -> Option<ConditionId> {
        let supported = self
            .nodes
            .get(&field)
            .and_then(Node::as_field)
            .is_some_and(|f| f.field_type.supports(condition.operator));
        if !supported {
            log::debug!(
                "add_condition: field {} missing or does not support '{}'",
                field,
                condition.operator
            );
            return None;
        }

        let id = self.fresh_condition_id();
        self.conditions.insert(
            id,
            ConditionGroup {
                id,
                field,
                condition,
                children: Vec::new(),
            },
        );
        if let Some(Node {
            kind: NodeKind::Field(f),
            ..
        }) = self.nodes.get_mut(&field)
        {
            f.conditions.push(id);
        }
        Some(id)
    }

    /// Patches a condition group's rule. An operator outside the owning field's
    /// vocabulary is rejected.
    pub fn update_condition(&mut self, id: ConditionId, patch: ConditionPatch) -> bool {
        let Some(field_id) = self.conditions.get(&id).map(|group| group.field) else {
            log::debug!("update_condition: condition {} not found", id);
            return false;
        };
        if let Some(operator) = patch.operator {
            let supported = self
                .nodes
                .get(&field_id)
                .and_then(Node::as_field)
                .is_some_and(|f| f.field_type.supports(operator));
            if !supported {
                return false;
            }
        }
        let Some(group) = self.conditions.get_mut(&id) else {
            return false;
        };
        if let Some(operator) = patch.operator {
            group.condition.operator = operator;
        }
        if let Some(value) = patch.value {
            group.condition.value = value;
        }
        if let Some(value2) = patch.value2 {
            group.condition.value2 = value2;
        }
        true
    }

    /// Removes a condition group and the sub-tree it gates.
    pub fn remove_condition(&mut self, id: ConditionId) -> Option<Deletion> {
        let field_id = self.conditions.get(&id)?.field;
        if let Some(Node {
            kind: NodeKind::Field(field),
            ..
        }) = self.nodes.get_mut(&field_id)
        {
            field.conditions.retain(|c| *c != id);
        }
        Some(self.purge_condition(id))
    }

    /// Removes a node and its whole subtree from whichever container holds it.
    pub fn delete(&mut self, id: NodeId) -> Option<Deletion> {
        let Some(container) = self.container_of(id) else {
            log::debug!("delete: node {} not found", id);
            return None;
        };
        if let Some(siblings) = self.children_mut(container) {
            siblings.retain(|sibling| *sibling != id);
        }
        Some(self.purge_subtree(id))
    }

    /// Deep-clones the subtree rooted at `id` under fresh identities and places
    /// the clone directly after the original. Returns the clone's id.
    pub fn duplicate(&mut self, id: NodeId) -> Option<NodeId> {
        let container = self.container_of(id)?;
        let index = self.index_of(id)?;
        let draft = self.draft_of(id)?;
        let clone = self.allocate(draft, container);
        self.children_mut(container)?.insert(index + 1, clone);
        Some(clone)
    }

    /// Switches a field to another type, resetting type-specific state and
    /// clearing all conditions together with the sub-trees they gate.
    pub fn change_field_type(&mut self, id: NodeId, field_type: FieldType) -> Option<Deletion> {
        let Some(Node {
            kind: NodeKind::Field(field),
            ..
        }) = self.nodes.get_mut(&id)
        else {
            log::debug!("change_field_type: field {} not found", id);
            return None;
        };
        field.field_type = field_type;
        field.options.clear();
        field.meter = None;
        field.description = None;
        let stale = std::mem::take(&mut field.conditions);

        let mut deletion = Deletion::default();
        for condition in stale {
            deletion.absorb(self.purge_condition(condition));
        }
        Some(deletion)
    }

    /// Drops a detached node and all of its descendants from the arena.
    fn purge_subtree(&mut self, id: NodeId) -> Deletion {
        let mut deletion = Deletion::default();
        self.walk_subtree(id, |visit| {
            match visit {
                Visit::Node { node, .. } => deletion.nodes.push(node.id),
                Visit::Condition { group, .. } => deletion.conditions.push(group.id),
            }
            Walk::Continue
        });
        for node in &deletion.nodes {
            self.nodes.remove(node);
        }
        for condition in &deletion.conditions {
            self.conditions.remove(condition);
        }
        deletion
    }

    /// Drops a detached condition group and its gated sub-tree from the arena.
    fn purge_condition(&mut self, id: ConditionId) -> Deletion {
        let mut deletion = Deletion::default();
        let Some(group) = self.conditions.remove(&id) else {
            return deletion;
        };
        deletion.conditions.push(id);
        for child in group.children {
            deletion.absorb(self.purge_subtree(child));
        }
        deletion
    }
}
