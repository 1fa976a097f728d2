use super::Procedure;
use super::visit::{TreeFold, Visit, Walk};
use crate::model::{
    ConditionDraft, ConditionGroup, FieldDraft, FieldNode, HeadingNode, Node, NodeDraft, NodeId,
    NodeKind, SectionDraft, SectionNode,
};
use std::fmt;

/// Rebuilds id-free drafts from stored nodes.
struct DraftFold;

impl TreeFold for DraftFold {
    type Output = NodeDraft;

    fn field(
        &mut self,
        _node: &Node,
        field: &FieldNode,
        branches: Vec<(&ConditionGroup, Vec<NodeDraft>)>,
    ) -> NodeDraft {
        NodeDraft::Field(FieldDraft {
            label: field.label.clone(),
            field_type: field.field_type.clone(),
            required: field.required,
            description: field.description.clone(),
            options: field.options.clone(),
            meter: field.meter.clone(),
            conditions: branches
                .into_iter()
                .map(|(group, children)| ConditionDraft {
                    condition: group.condition.clone(),
                    children,
                })
                .collect(),
        })
    }

    fn heading(&mut self, _node: &Node, heading: &HeadingNode) -> NodeDraft {
        NodeDraft::heading(heading.label.clone())
    }

    fn section(
        &mut self,
        _node: &Node,
        section: &SectionNode,
        children: Vec<NodeDraft>,
    ) -> NodeDraft {
        NodeDraft::Section(SectionDraft {
            label: section.label.clone(),
            description: section.description.clone(),
            children,
        })
    }
}

impl Procedure {
    /// The whole tree as id-free drafts. Two documents with equal drafts differ
    /// at most in their identities.
    pub fn to_drafts(&self) -> Vec<NodeDraft> {
        self.fold_root(&mut DraftFold)
    }

    /// The subtree rooted at `id` as a draft.
    pub fn draft_of(&self, id: NodeId) -> Option<NodeDraft> {
        self.fold(id, &mut DraftFold)
    }
}

/// Renders the document as an indented tree, one line per node or condition.
impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.meta.title.is_empty() {
            "(untitled procedure)"
        } else {
            &self.meta.title
        };
        writeln!(f, "{}", title)?;

        let mut result = Ok(());
        self.walk(|visit| {
            let line = match visit {
                Visit::Node { node, index, depth, .. } => {
                    let indent = "    ".repeat(depth);
                    match &node.kind {
                        NodeKind::Field(field) => format!(
                            "{}{}. [{}] {}{}",
                            indent,
                            index + 1,
                            field.field_type,
                            field.label,
                            if field.required { " *" } else { "" }
                        ),
                        NodeKind::Heading(heading) => {
                            format!("{}{}. # {}", indent, index + 1, heading.label)
                        }
                        NodeKind::Section(section) => {
                            format!("{}{}. Section: {}", indent, index + 1, section.label)
                        }
                    }
                }
                Visit::Condition { group, depth, .. } => {
                    format!("{}└── if {}", "    ".repeat(depth), group.condition)
                }
            };
            result = writeln!(f, "{}", line);
            if result.is_err() {
                Walk::Stop
            } else {
                Walk::Continue
            }
        });
        result
    }
}
