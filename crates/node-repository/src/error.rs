//! Error types for the node repository

use thiserror::Error;

/// Result type alias using RepositoryError
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors that can occur while building or querying the repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Two items in one ordering group share an identifier
    #[error("Duplicate identifier '{0}' in ordering group")]
    DuplicateId(String),

    /// A child that was expected in a container is not there
    #[error("Child not found: {0}")]
    ChildNotFound(String),

    /// A category path segment could not be resolved
    #[error("The segment '{segment}' in path '{path}' does not exist")]
    PathSegmentNotFound { segment: String, path: String },

    /// A path segment resolved to something that cannot hold children
    #[error("'{segment}' in path '{path}' is not a category")]
    NotACategory { segment: String, path: String },

    /// Child rejected by the container
    #[error("Invalid child: {0}")]
    InvalidChild(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepositoryError {
    /// Create a path-segment error
    pub fn missing_segment(segment: impl Into<String>, path: impl Into<String>) -> Self {
        Self::PathSegmentNotFound {
            segment: segment.into(),
            path: path.into(),
        }
    }

    /// Create an invalid-child error with a message
    pub fn invalid_child(msg: impl Into<String>) -> Self {
        Self::InvalidChild(msg.into())
    }
}
