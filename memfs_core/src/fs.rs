//! The file system manager.
//!
//! [`FileSystem`] owns the tree, the name index and the largest-file tracker
//! and keeps the three consistent. Every public mutation validates all of its
//! inputs before touching any structure, so a failed call leaves everything
//! exactly as it was.

use crate::error::{Error, Result};
use crate::index::NameIndex;
use crate::node::{Node, NodeId, NodeType};
use crate::tracker::LargestFileTracker;
use crate::tree::{Tree, Walk};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Name of the root directory.
pub const ROOT_NAME: &str = "root";

/// Spaces of indentation per tree level in [`FileSystem::show_filesystem`].
const INDENT: usize = 3;

/// An in-memory file system with O(1) name lookup and largest-file queries.
#[derive(Debug)]
pub struct FileSystem {
    tree: Tree,
    root: NodeId,
    index: NameIndex,
    tracker: LargestFileTracker,
}

/// Node counts for a file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    /// Directories, including root.
    pub directories: usize,
    pub files: usize,
    /// Sum of all file sizes. Wider than a single size so the sum is exact.
    pub total_bytes: u128,
}

/// One node in a pre-order listing, detached from the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub depth: usize,
    pub name: String,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    /// Create a file system holding only the root directory.
    pub fn new() -> Self {
        let (tree, root) = Tree::with_root(Node::root_directory(ROOT_NAME));

        let mut index = NameIndex::new();
        let inserted = index.insert(ROOT_NAME, root);
        debug_assert!(inserted.is_ok());

        Self {
            tree,
            root,
            index,
            tracker: LargestFileTracker::new(),
        }
    }

    /// Add an empty directory under `parent_name`.
    ///
    /// Checks, in order: the parent is a live directory, the name is free,
    /// the name is well formed.
    pub fn add_directory(&mut self, parent_name: &str, dir_name: &str) -> Result<()> {
        let parent = self.parent_directory(parent_name)?;
        self.check_name_free(dir_name)?;
        let dir = Node::directory(dir_name)?;

        let id = self.attach(parent, dir)?;
        debug!(parent = parent_name, name = dir_name, node = %id, "added directory");
        Ok(())
    }

    /// Add a file of `size` bytes under `parent_name`.
    ///
    /// Checks, in order: the parent is a live directory, the name is free,
    /// the name is well formed, the size is positive.
    pub fn add_file(&mut self, parent_name: &str, file_name: &str, size: i64) -> Result<()> {
        let parent = self.parent_directory(parent_name)?;
        self.check_name_free(file_name)?;
        let file = Node::file(file_name, size)?;
        let size = file.size().unwrap_or_default();

        let id = self.attach(parent, file)?;
        self.tracker.insert(id, size);
        debug!(parent = parent_name, name = file_name, size, node = %id, "added file");
        Ok(())
    }

    /// Name of the largest file.
    pub fn get_biggest_file(&self) -> Result<&str> {
        self.tracker
            .largest()
            .and_then(|id| self.tree.get(id))
            .map(Node::name)
            .ok_or(Error::EmptyFileSystem)
    }

    /// Size in bytes of the named file.
    pub fn get_file_size(&self, name: &str) -> Result<u64> {
        self.lookup(name)?
            .size()
            .ok_or_else(|| Error::not_a_file(name))
    }

    /// Delete a file, or a directory together with everything below it.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let id = self
            .index
            .get(name)
            .ok_or_else(|| Error::node_not_found(name))?;
        if id == self.root {
            return Err(Error::CannotDeleteRoot);
        }

        self.tree.detach(id);

        // Collected up front: releasing slots while walking would invalidate
        // the walk. Pre-order, so parents are visited before their children.
        let doomed: Vec<NodeId> = self.tree.descendants(id).collect();
        let mut files = 0usize;
        for &victim in &doomed {
            if self.tracker.remove(victim) {
                files += 1;
            }
            if let Some(node) = self.tree.release(victim) {
                self.index.remove(node.name());
            }
        }

        debug_assert_eq!(self.tree.len(), self.index.len());
        debug!(name, nodes = doomed.len(), files, "deleted");
        Ok(())
    }

    /// Lazy indented rendering of the tree, one line per node.
    ///
    /// The returned iterator is `Clone`; cloning it before consumption gives a
    /// fresh rendering from the root.
    pub fn show_filesystem(&self) -> Listing<'_> {
        Listing {
            walk: self.tree.walk(self.root),
        }
    }

    /// Look up a node by name.
    pub fn lookup(&self, name: &str) -> Result<&Node> {
        self.index
            .get(name)
            .and_then(|id| self.tree.get(id))
            .ok_or_else(|| Error::node_not_found(name))
    }

    /// Names from root down to the named node, inclusive.
    pub fn path_of(&self, name: &str) -> Result<Vec<String>> {
        let mut node = self.lookup(name)?;
        let mut path = vec![node.name().to_string()];

        while let Some(parent) = node.parent().and_then(|id| self.tree.get(id)) {
            path.push(parent.name().to_string());
            node = parent;
        }

        path.reverse();
        Ok(path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Live nodes, including root.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false: root is always present.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every live name, in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.names()
    }

    pub fn file_count(&self) -> usize {
        self.tracker.len()
    }

    /// Resolve a handle obtained from [`Node::parent`] or [`Node::children`].
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    /// Pre-order records of every node, siblings sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.tree.walk(self.root).map(|(depth, node)| Entry {
            depth,
            name: node.name().to_string(),
            node_type: node.node_type(),
            size: node.size(),
            created: node.created(),
            parent: node
                .parent()
                .and_then(|id| self.tree.get(id))
                .map(|p| p.name().to_string()),
        })
    }

    pub fn stats(&self) -> Stats {
        self.tree
            .walk(self.root)
            .fold(Stats::default(), |mut stats, (_, node)| {
                match node.size() {
                    Some(size) => {
                        stats.files += 1;
                        stats.total_bytes += u128::from(size);
                    }
                    None => stats.directories += 1,
                }
                stats
            })
    }

    fn parent_directory(&self, name: &str) -> Result<NodeId> {
        self.index
            .get(name)
            .filter(|&id| self.tree.get(id).is_some_and(Node::is_dir))
            .ok_or_else(|| Error::directory_not_found(name))
    }

    fn check_name_free(&self, name: &str) -> Result<()> {
        if self.index.contains(name) {
            return Err(Error::name_already_exists(name));
        }
        Ok(())
    }

    /// Wire a validated node into the tree and the index.
    fn attach(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        let name = node.name().to_string();
        // Parent and name were validated by the caller.
        let id = self
            .tree
            .attach(parent, node)
            .ok_or(Error::CapacityExceeded)?;

        if let Err(err) = self.index.insert(&name, id) {
            self.tree.detach(id);
            self.tree.release(id);
            return Err(err);
        }
        Ok(id)
    }
}

impl fmt::Display for FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.show_filesystem() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Iterator returned by [`FileSystem::show_filesystem`].
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    walk: Walk<'a>,
}

impl Iterator for Listing<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let (depth, node) = self.walk.next()?;
        Some(format!("{:indent$}{}", "", node, indent = depth * INDENT))
    }
}
