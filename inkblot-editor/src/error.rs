//! Error types for the editor shell.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The trial has expired; the buffer is read-only.
    #[error("editing is locked until InkBlot is purchased")]
    Locked,

    /// The print engine failed.
    #[error("print error: {0}")]
    Print(String),

    /// A path could not be used.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A background task failed.
    #[error("task error: {0}")]
    Task(String),
}
