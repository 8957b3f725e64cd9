//! Flat name index spanning the whole tree.

use crate::error::{Error, Result};
use crate::node::NodeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Maps every live node's name to its handle, regardless of depth.
#[derive(Debug, Default)]
pub struct NameIndex {
    names: HashMap<String, NodeId>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name. Fails if the name is already taken anywhere.
    pub fn insert(&mut self, name: &str, id: NodeId) -> Result<()> {
        match self.names.entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::name_already_exists(name)),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Unregister a name, returning the handle it pointed to.
    pub fn remove(&mut self, name: &str) -> Option<NodeId> {
        self.names.remove(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All indexed names, in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut index = NameIndex::new();
        index.insert("root", NodeId(0)).unwrap();
        index.insert("Documents", NodeId(1)).unwrap();

        assert_eq!(index.get("Documents"), Some(NodeId(1)));
        assert_eq!(index.get("missing"), None);
        assert!(index.contains("root"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut index = NameIndex::new();
        index.insert("a", NodeId(1)).unwrap();

        let err = index.insert("a", NodeId(2)).unwrap_err();
        assert_eq!(err, Error::name_already_exists("a"));

        // Original mapping untouched
        assert_eq!(index.get("a"), Some(NodeId(1)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut index = NameIndex::new();
        index.insert("a", NodeId(1)).unwrap();

        assert_eq!(index.remove("a"), Some(NodeId(1)));
        assert_eq!(index.remove("a"), None);
        assert!(index.is_empty());

        // Name is free again
        index.insert("a", NodeId(3)).unwrap();
        assert_eq!(index.get("a"), Some(NodeId(3)));
    }

    #[test]
    fn test_names() {
        let mut index = NameIndex::new();
        index.insert("b", NodeId(1)).unwrap();
        index.insert("a", NodeId(2)).unwrap();

        let mut names: Vec<&str> = index.names().collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
