use super::Procedure;
use crate::model::{Container, Node, NodeId};

/// Where a dragged node was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Onto a sibling: the dragged node takes that sibling's index.
    Node(NodeId),
    /// Onto a container itself: the dragged node goes to the end.
    Container(Container),
}

/// Moves the element at `from` so that it ends up at index `to`.
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

impl Procedure {
    /// Applies a drag-and-drop move.
    ///
    /// Returns `false` and leaves the tree untouched when either end cannot be
    /// resolved, when a section is dropped anywhere but the root, or when the
    /// destination lies inside the dragged node's own subtree.
    pub fn move_node(&mut self, dragged: NodeId, target: DropTarget) -> bool {
        let Some((source, source_index)) = self.locate(dragged) else {
            log::debug!("move: dragged node {} not found", dragged);
            return false;
        };

        let (destination, destination_index) = match target {
            DropTarget::Node(id) if id == dragged => return false,
            DropTarget::Node(id) => match self.locate(id) {
                Some(found) => found,
                None => return false,
            },
            DropTarget::Container(container) => match self.children(container) {
                Some(children) => (container, children.len()),
                None => return false,
            },
        };

        let is_section = self.nodes.get(&dragged).is_some_and(Node::is_section);
        if is_section && destination != Container::Root {
            log::debug!(
                "move: section {} cannot be dropped into {}",
                dragged,
                destination
            );
            return false;
        }
        if self.is_within(destination, dragged) {
            log::debug!("move: {} cannot be dropped inside itself", dragged);
            return false;
        }

        if source == destination {
            let Some(children) = self.children_mut(source) else {
                return false;
            };
            array_move(children, source_index, destination_index);
            return true;
        }

        if let Some(children) = self.children_mut(source) {
            children.remove(source_index);
        }
        if let Some(children) = self.children_mut(destination) {
            let index = destination_index.min(children.len());
            children.insert(index, dragged);
        }
        if let Some(node) = self.nodes.get_mut(&dragged) {
            node.parent = destination;
        }
        true
    }

    /// Reorders root-level sections only, as in the "reorder sections" dialog.
    ///
    /// `from` and `to` index the section subsequence of the root; fields and
    /// headings at the root keep their positions.
    pub fn reorder_sections(&mut self, from: usize, to: usize) -> bool {
        let slots: Vec<usize> = self
            .root
            .iter()
            .enumerate()
            .filter(|(_, id)| self.nodes.get(id).is_some_and(Node::is_section))
            .map(|(index, _)| index)
            .collect();
        if from >= slots.len() || to >= slots.len() {
            return false;
        }

        let mut sections: Vec<NodeId> = slots.iter().map(|slot| self.root[*slot]).collect();
        array_move(&mut sections, from, to);
        for (slot, section) in slots.into_iter().zip(sections) {
            self.root[slot] = section;
        }
        true
    }

    fn locate(&self, id: NodeId) -> Option<(Container, usize)> {
        let container = self.container_of(id)?;
        let index = self.index_of(id)?;
        Some((container, index))
    }
}
