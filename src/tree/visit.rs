use super::Procedure;
use crate::model::{
    ConditionGroup, Container, FieldNode, HeadingNode, Node, NodeId, NodeKind, SectionNode,
};

/// One step of a depth-first, pre-order walk over the document.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Node {
        node: &'a Node,
        /// The container the walk found the node in.
        container: Container,
        index: usize,
        depth: usize,
    },
    Condition {
        group: &'a ConditionGroup,
        /// The field the group is listed on.
        owner: &'a Node,
        depth: usize,
    },
}

/// What the walker should do after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not descend into this node's sections or condition groups.
    SkipChildren,
    Stop,
}

/// A bottom-up transform over a subtree. Each callback receives the already
/// folded results of the node's children.
pub trait TreeFold {
    type Output;

    fn field(
        &mut self,
        node: &Node,
        field: &FieldNode,
        branches: Vec<(&ConditionGroup, Vec<Self::Output>)>,
    ) -> Self::Output;

    fn heading(&mut self, node: &Node, heading: &HeadingNode) -> Self::Output;

    fn section(
        &mut self,
        node: &Node,
        section: &SectionNode,
        children: Vec<Self::Output>,
    ) -> Self::Output;
}

impl Procedure {
    /// Walks the whole document in display order: a node, then its section
    /// children or its condition groups (each followed by the group's children).
    pub fn walk<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(Visit<'a>) -> Walk,
    {
        self.walk_list(Container::Root, &self.root, 0, &mut visitor);
    }

    /// Walks the subtree rooted at `id`, starting with the node itself.
    pub fn walk_subtree<'a, F>(&'a self, id: NodeId, mut visitor: F)
    where
        F: FnMut(Visit<'a>) -> Walk,
    {
        if let Some(node) = self.nodes.get(&id) {
            let index = self.index_of(id).unwrap_or(0);
            self.walk_node(node, node.parent, index, 0, &mut visitor);
        }
    }

    /// Returns `false` once the visitor asked to stop.
    fn walk_list<'a, F>(
        &'a self,
        container: Container,
        ids: &'a [NodeId],
        depth: usize,
        visitor: &mut F,
    ) -> bool
    where
        F: FnMut(Visit<'a>) -> Walk,
    {
        for (index, id) in ids.iter().enumerate() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !self.walk_node(node, container, index, depth, visitor) {
                return false;
            }
        }
        true
    }

    fn walk_node<'a, F>(
        &'a self,
        node: &'a Node,
        container: Container,
        index: usize,
        depth: usize,
        visitor: &mut F,
    ) -> bool
    where
        F: FnMut(Visit<'a>) -> Walk,
    {
        match visitor(Visit::Node {
            node,
            container,
            index,
            depth,
        }) {
            Walk::Stop => return false,
            Walk::SkipChildren => return true,
            Walk::Continue => {}
        }

        match &node.kind {
            NodeKind::Heading(_) => true,
            NodeKind::Section(section) => self.walk_list(
                Container::Section(node.id),
                &section.children,
                depth + 1,
                visitor,
            ),
            NodeKind::Field(field) => {
                for condition_id in &field.conditions {
                    let Some(group) = self.conditions.get(condition_id) else {
                        continue;
                    };
                    match visitor(Visit::Condition {
                        group,
                        owner: node,
                        depth: depth + 1,
                    }) {
                        Walk::Stop => return false,
                        Walk::SkipChildren => continue,
                        Walk::Continue => {}
                    }
                    if !self.walk_list(
                        Container::Condition(group.id),
                        &group.children,
                        depth + 2,
                        visitor,
                    ) {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Folds the subtree rooted at `id` bottom-up.
    pub fn fold<F: TreeFold>(&self, id: NodeId, folder: &mut F) -> Option<F::Output> {
        let node = self.nodes.get(&id)?;
        let output = match &node.kind {
            NodeKind::Heading(heading) => folder.heading(node, heading),
            NodeKind::Section(section) => {
                let mut children = Vec::with_capacity(section.children.len());
                for child in &section.children {
                    if let Some(folded) = self.fold(*child, folder) {
                        children.push(folded);
                    }
                }
                folder.section(node, section, children)
            }
            NodeKind::Field(field) => {
                let mut branches = Vec::with_capacity(field.conditions.len());
                for condition_id in &field.conditions {
                    let Some(group) = self.conditions.get(condition_id) else {
                        continue;
                    };
                    let mut children = Vec::with_capacity(group.children.len());
                    for child in &group.children {
                        if let Some(folded) = self.fold(*child, folder) {
                            children.push(folded);
                        }
                    }
                    branches.push((group, children));
                }
                folder.field(node, field, branches)
            }
        };
        Some(output)
    }

    /// Folds every root-level node, in document order.
    pub fn fold_root<F: TreeFold>(&self, folder: &mut F) -> Vec<F::Output> {
        self.root
            .iter()
            .filter_map(|id| self.fold(*id, folder))
            .collect()
    }
}
