//! Error types for edit scripts.

use thiserror::Error;

/// Errors from applying an edit script.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    /// An edit points past the end of the lines it is applied to.
    #[error("edit offset {offset} out of range for {len} lines")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// A removal names a line whose content differs from the buffer.
    #[error("line {offset} does not match the removed element")]
    ElementMismatch { offset: usize },
}

/// Result type alias for edit operations.
pub type Result<T> = std::result::Result<T, EditError>;
