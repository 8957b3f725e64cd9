//! Error types for memfs_core.

use thiserror::Error;

/// Result type alias using memfs_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during file system operations.
///
/// Every operation that returns one of these leaves the file system exactly as
/// it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Node name is empty or too long.
    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// File size is not strictly positive.
    #[error("Invalid file size: {size} (must be greater than zero)")]
    InvalidSize { size: i64 },

    /// A node with this name already exists somewhere in the tree.
    #[error("Name already exists: {name}")]
    NameAlreadyExists { name: String },

    /// Parent name does not resolve to a live directory.
    #[error("Parent directory not found: {name}")]
    DirectoryNotFound { name: String },

    /// No node with this name exists.
    #[error("Node not found: {name}")]
    NodeNotFound { name: String },

    /// The named node is a directory.
    #[error("Node is not a file: {name}")]
    NotAFile { name: String },

    /// Attempted to delete the root directory.
    #[error("Cannot delete root directory")]
    CannotDeleteRoot,

    /// Largest-file query with no files present.
    #[error("No files found in the file system")]
    EmptyFileSystem,

    /// Every node handle is in use.
    #[error("File system is full")]
    CapacityExceeded,
}

impl Error {
    /// Create an InvalidName error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidSize error.
    pub fn invalid_size(size: i64) -> Self {
        Error::InvalidSize { size }
    }

    /// Create a NameAlreadyExists error.
    pub fn name_already_exists(name: impl Into<String>) -> Self {
        Error::NameAlreadyExists { name: name.into() }
    }

    /// Create a DirectoryNotFound error.
    pub fn directory_not_found(name: impl Into<String>) -> Self {
        Error::DirectoryNotFound { name: name.into() }
    }

    /// Create a NodeNotFound error.
    pub fn node_not_found(name: impl Into<String>) -> Self {
        Error::NodeNotFound { name: name.into() }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(name: impl Into<String>) -> Self {
        Error::NotAFile { name: name.into() }
    }

    /// Stable snake_case label for the error kind, used in structured output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidName { .. } => "invalid_name",
            Error::InvalidSize { .. } => "invalid_size",
            Error::NameAlreadyExists { .. } => "name_already_exists",
            Error::DirectoryNotFound { .. } => "directory_not_found",
            Error::NodeNotFound { .. } => "node_not_found",
            Error::NotAFile { .. } => "not_a_file",
            Error::CannotDeleteRoot => "cannot_delete_root",
            Error::EmptyFileSystem => "empty_file_system",
            Error::CapacityExceeded => "capacity_exceeded",
        }
    }
}
