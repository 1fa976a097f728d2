use super::evaluate_traced;
use crate::model::{ConditionId, Container, NodeId};
use crate::trace::ConditionTrace;
use crate::tree::{Procedure, Visit, Walk};
use ahash::AHashMap;
use serde_json::Value;

/// Runtime answers keyed by the field they answer.
pub type Answers = AHashMap<NodeId, Value>;

/// What a person filling in the procedure currently sees.
#[derive(Debug, Clone, Default)]
pub struct VisibilityReport {
    /// Visible nodes in display order.
    pub visible: Vec<NodeId>,
    /// Every condition group whose field is visible, with its verdict.
    pub traces: Vec<(ConditionId, ConditionTrace)>,
}

impl VisibilityReport {
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.visible.contains(&id)
    }
}

/// Applies every condition group to `answers`. A gated sub-tree is shown only
/// when its group holds and the field owning the group is itself shown.
pub fn resolve_visibility(procedure: &Procedure, answers: &Answers) -> VisibilityReport {
    let mut report = VisibilityReport::default();
    procedure.walk(|visit| match visit {
        Visit::Node { node, .. } => {
            report.visible.push(node.id);
            Walk::Continue
        }
        Visit::Condition { group, owner, .. } => {
            let trace = evaluate_traced(&group.condition, answers.get(&owner.id));
            let shown = trace.outcome;
            report.traces.push((group.id, trace));
            if shown {
                Walk::Continue
            } else {
                Walk::SkipChildren
            }
        }
    });
    report
}

/// Visible nodes in display order.
pub fn visible_nodes(procedure: &Procedure, answers: &Answers) -> Vec<NodeId> {
    resolve_visibility(procedure, answers).visible
}

/// Whether one node is visible, following its chain of condition groups upward.
pub fn is_visible(procedure: &Procedure, id: NodeId, answers: &Answers) -> bool {
    let Some(mut container) = procedure.container_of(id) else {
        return false;
    };
    for _ in 0..=procedure.len() {
        match container {
            Container::Root => return true,
            Container::Section(section) => match procedure.container_of(section) {
                Some(parent) => container = parent,
                None => return false,
            },
            Container::Condition(condition) => {
                let Some(group) = procedure.find_condition(condition) else {
                    return false;
                };
                if !super::evaluate(&group.condition, answers.get(&group.field)) {
                    return false;
                }
                match procedure.container_of(group.field) {
                    Some(parent) => container = parent,
                    None => return false,
                }
            }
        }
    }
    false
}
