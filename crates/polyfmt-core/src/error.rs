//! Error types for polyfmt operations.
//!
//! This module defines every failure a format request can end in, from
//! formatter selection to reading back the formatted file. All errors use
//! `thiserror`; degradations the resolver swallows never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Error types for polyfmt operations.
///
/// Every variant is terminal for the request that produced it: callers get
/// no partial output and the core never retries.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PolyfmtError {
    // Selection errors
    /// No formatter both supports the content type and is usable.
    #[error("No formatter found for file type {0}.")]
    NoFormatterFound(String),

    /// The selected formatter has no executable path configured anywhere.
    #[error("{0} executable path not set.")]
    ExecutablePathNotSet(String),

    // External tool errors
    /// The external tool exited with a non-zero status.
    ///
    /// Carries the tool's combined output verbatim (surrounding whitespace
    /// trimmed) so callers can show it as-is.
    #[error("{0}")]
    ExternalToolFailure(String),

    /// The external tool could not be started at all.
    #[error("failed to launch {program}: {source}")]
    ToolLaunchFailed {
        /// Program that was being spawned.
        program: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    // File system errors
    /// Permission denied for the specified path.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Path not found in the file system.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not what the operation expected.
    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Error reading a file or directory.
    #[error("file read error: {0}")]
    FileReadError(String),

    /// Error writing a file.
    #[error("file write error: {0}")]
    FileWriteError(String),

    // Config errors
    /// Invalid configuration key or value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Error parsing the global settings file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    // IO and system errors
    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context from anyhow.
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    /// Unexpected error occurred.
    #[error("unexpected error: {0}")]
    Other(String),
}

/// Result type alias for polyfmt operations.
pub type Result<T> = std::result::Result<T, PolyfmtError>;
