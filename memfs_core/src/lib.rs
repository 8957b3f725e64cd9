//! # memfs Core
//!
//! An in-memory hierarchical file system with name-based lookup and
//! largest-file queries that avoid full rescans.
//!
//! The [`FileSystem`] manager keeps three structures consistent on every
//! mutation: the tree of directories and files, a flat index from name to
//! node, and a tracker of the largest file.
//!
//! ## Features
//!
//! - Names are global identifiers: unique across the whole tree, 1-32 characters
//! - O(1) lookup by name, no path traversal
//! - O(1) largest-file query, O(log F) amortized maintenance
//! - Recursive directory deletion as a single operation
//! - Failed operations never leave partial state behind
//!
//! ## Example
//!
//! ```
//! use memfs_core::{Error, FileSystem};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut fs = FileSystem::new();
//!
//! fs.add_directory("root", "Pictures")?;
//! fs.add_file("Pictures", "vacation.jpg", 6400)?;
//! fs.add_file("Pictures", "profile_pic.jpg", 3000)?;
//! assert_eq!(fs.get_biggest_file()?, "vacation.jpg");
//!
//! fs.delete("Pictures")?;
//! assert_eq!(fs.get_biggest_file(), Err(Error::EmptyFileSystem));
//!
//! // Render the tree
//! print!("{}", fs);
//! # Ok(())
//! # }
//! ```

mod error;
mod fs;
mod index;
mod node;
mod tracker;
mod tree;

pub use error::{Error, Result};
pub use fs::{Entry, FileSystem, Listing, ROOT_NAME, Stats};
pub use node::{MAX_NAME_LENGTH, Node, NodeId, NodeKind, NodeType};
