//! Node model: files and directories over a shared base record.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Maximum node name length, in characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Handle to a node slot in the tree arena.
///
/// Handles are non-owning: the arena owns every node, and a parent refers to
/// its children (and a child to its parent) only through handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A directory.
    Directory,
    /// A regular file.
    File,
}

impl NodeType {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Directory => "directory",
            NodeType::File => "file",
        }
    }
}

/// Variant payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory and its children, keyed by name.
    Directory { children: HashMap<String, NodeId> },
    /// A file and its size in bytes.
    File { size: u64 },
}

/// A file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    created: DateTime<Utc>,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    /// Create an empty directory.
    pub fn directory(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            name,
            created: Utc::now(),
            parent: None,
            kind: NodeKind::Directory {
                children: HashMap::new(),
            },
        })
    }

    /// Create a directory from a name known to be valid.
    pub(crate) fn root_directory(name: &str) -> Self {
        debug_assert!(validate_name(name).is_ok());
        Self {
            name: name.to_string(),
            created: Utc::now(),
            parent: None,
            kind: NodeKind::Directory {
                children: HashMap::new(),
            },
        }
    }

    /// Create a file.
    ///
    /// The size is taken signed so that negative input is representable and
    /// rejected with [`Error::InvalidSize`] rather than wrapping.
    pub fn file(name: impl Into<String>, size: i64) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        let size = validate_size(size)?;

        Ok(Self {
            name,
            created: Utc::now(),
            parent: None,
            kind: NodeKind::File { size },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Handle of the owning directory; `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Directory { .. } => NodeType::Directory,
            NodeKind::File { .. } => NodeType::File,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// File size, or `None` for a directory.
    pub fn size(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { size } => Some(size),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Child handles in unspecified order. Empty for files.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        let children = match &self.kind {
            NodeKind::Directory { children } => Some(children.values().copied()),
            NodeKind::File { .. } => None,
        };
        children.into_iter().flatten()
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Directory { children } => children.get(name).copied(),
            NodeKind::File { .. } => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut HashMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created = self.created.format("%Y-%m-%dT%H:%M:%S%.3fZ");
        match self.kind {
            NodeKind::Directory { .. } => write!(f, "{} [created={}]", self.name, created),
            NodeKind::File { size } => {
                write!(f, "{} [size={} bytes, created={}]", self.name, size, created)
            }
        }
    }
}

/// Check a node name: non-empty and at most [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "name cannot be empty"));
    }

    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(Error::invalid_name(
            name,
            format!("name too long: {} characters (max {})", len, MAX_NAME_LENGTH),
        ));
    }

    Ok(())
}

/// Check a file size and convert it to its stored form. Zero is rejected.
pub fn validate_size(size: i64) -> Result<u64> {
    if size <= 0 {
        return Err(Error::invalid_size(size));
    }
    Ok(size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_new() {
        let dir = Node::directory("Documents").unwrap();
        assert_eq!(dir.name(), "Documents");
        assert!(dir.is_dir());
        assert_eq!(dir.size(), None);
        assert_eq!(dir.parent(), None);
        assert_eq!(dir.children().count(), 0);
    }

    #[test]
    fn test_file_new() {
        let file = Node::file("resume.docx", 500).unwrap();
        assert!(file.is_file());
        assert_eq!(file.size(), Some(500));
        assert_eq!(file.node_type(), NodeType::File);
        assert_eq!(file.children().count(), 0);
        assert_eq!(file.child("anything"), None);
    }

    #[test]
    fn test_name_validation() {
        // Empty name
        assert!(matches!(
            Node::directory(""),
            Err(Error::InvalidName { .. })
        ));

        // Exactly at the limit
        assert!(Node::directory("a".repeat(32)).is_ok());

        // Name too long
        assert!(matches!(
            Node::file("a".repeat(33), 1),
            Err(Error::InvalidName { .. })
        ));

        // Limit is in characters, not bytes
        assert!(Node::directory("é".repeat(32)).is_ok());
    }

    #[test]
    fn test_size_validation() {
        assert_eq!(
            Node::file("neg", -123).unwrap_err(),
            Error::InvalidSize { size: -123 }
        );
        assert_eq!(
            Node::file("zero", 0).unwrap_err(),
            Error::InvalidSize { size: 0 }
        );
        assert_eq!(Node::file("one", 1).unwrap().size(), Some(1));
    }

    #[test]
    fn test_name_checked_before_size() {
        let err = Node::file("", -1).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_display() {
        let file = Node::file("a.txt", 42).unwrap();
        let text = file.to_string();
        assert!(text.starts_with("a.txt [size=42 bytes, created="));

        let dir = Node::directory("Docs").unwrap();
        assert!(dir.to_string().starts_with("Docs [created="));
    }

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Property 1: Names of 1-32 characters are accepted
        #[test]
        fn prop_valid_names_accepted(name in "[a-zA-Z0-9._-]{1,32}") {
            prop_assert!(Node::directory(name.clone()).is_ok());
            prop_assert!(Node::file(name, 1).is_ok());
        }

        /// Property 2: Names over 32 characters are rejected
        #[test]
        fn prop_long_names_rejected(name in "[a-zA-Z]{33,64}") {
            prop_assert!(Node::directory(name).is_err());
        }

        /// Property 3: Non-positive sizes are rejected
        #[test]
        fn prop_non_positive_size_rejected(size in i64::MIN..=0) {
            prop_assert_eq!(Node::file("f", size), Err(Error::InvalidSize { size }));
        }
    }
}
