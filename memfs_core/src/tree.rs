//! Arena-backed tree structure.
//!
//! The arena owns every node. A directory owns its children through handles
//! in its children map; a child refers back to its parent with a plain
//! [`NodeId`] that is never used for lifetime. The tree knows nothing about
//! the name index or the largest-file tracker.

use crate::node::{Node, NodeId};

/// Arena of nodes addressed by [`NodeId`].
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    len: usize,
}

impl Tree {
    /// Create an arena holding a single parentless node.
    pub fn with_root(mut node: Node) -> (Self, NodeId) {
        node.set_parent(None);
        let tree = Self {
            slots: vec![Some(node)],
            free: Vec::new(),
            len: 1,
        };
        (tree, NodeId(0))
    }

    /// Store `node` in a free slot. Returns `None` once every handle is taken.
    fn allocate(&mut self, node: Node) -> Option<NodeId> {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = slot_id(self.slots.len())?;
                self.slots.push(Some(node));
                id
            }
        };
        self.len += 1;
        Some(id)
    }

    /// Get a live node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Insert `node` as a child of `parent` and set its parent handle.
    ///
    /// Returns `None` without touching the arena if `parent` is not a live
    /// directory, already has a child of the same name, or the arena is out
    /// of handles.
    pub fn attach(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        let siblings = self.get(parent)?;
        if !siblings.is_dir() || siblings.child(node.name()).is_some() {
            return None;
        }

        let name = node.name().to_string();
        node.set_parent(Some(parent));
        let id = self.allocate(node)?;

        // Checked above: parent is a live directory.
        if let Some(children) = self.get_mut(parent).and_then(Node::children_mut) {
            children.insert(name, id);
        }
        Some(id)
    }

    /// Remove `id` from its parent's children and clear its parent handle.
    ///
    /// Returns the former parent, or `None` if the node was not attached.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        let parent = node.parent()?;
        let name = node.name().to_string();

        if let Some(children) = self.get_mut(parent).and_then(Node::children_mut) {
            children.remove(&name);
        }
        if let Some(node) = self.get_mut(id) {
            node.set_parent(None);
        }
        Some(parent)
    }

    /// Free a slot, handing back the node it held.
    pub fn release(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.len -= 1;
        self.free.push(id);
        Some(node)
    }

    /// Pre-order handles of `id` and everything below it.
    ///
    /// A node is always yielded before any of its descendants. Sibling order
    /// is unspecified.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.get(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants { tree: self, stack }
    }

    /// Lazy pre-order walk yielding `(depth, node)`, siblings sorted by name.
    ///
    /// The walk is `Clone`, so a fresh copy taken before iteration restarts it.
    pub fn walk(&self, id: NodeId) -> Walk<'_> {
        let stack = if self.get(id).is_some() {
            vec![(0, id)]
        } else {
            Vec::new()
        };
        Walk { tree: self, stack }
    }
}

/// Handle for the slot at `index`, if it fits in a [`NodeId`].
fn slot_id(index: usize) -> Option<NodeId> {
    u32::try_from(index).ok().map(NodeId)
}

/// Iterator returned by [`Tree::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.get(id) {
            self.stack.extend(node.children());
        }
        Some(id)
    }
}

/// Iterator returned by [`Tree::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, id) = self.stack.pop()?;
            let Some(node) = self.tree.get(id) else {
                continue;
            };

            let mut children: Vec<(&str, NodeId)> = node
                .children()
                .filter_map(|child| self.tree.get(child).map(|c| (c.name(), child)))
                .collect();
            // Reverse order so the smallest name is popped first
            children.sort_by(|a, b| b.0.cmp(a.0));
            self.stack
                .extend(children.into_iter().map(|(_, child)| (depth + 1, child)));

            return Some((depth, node));
        }
    }
}
