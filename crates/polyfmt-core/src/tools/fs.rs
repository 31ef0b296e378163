//! File system adapter trait and operations.
//!
//! This module defines the `FsAdapter` trait used by the ancestry resolver,
//! the settings store and the dispatcher's temporary copies, allowing both
//! real file system access and in-memory implementations for testing.

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix of the temporary copy handed to an external tool.
pub const TEMP_FILE_PREFIX: &str = ".polyfmt_";

/// A temporary file that is removed when dropped.
///
/// Created by [`FsAdapter::create_temp_copy`]. The adapter that made it
/// decides how removal happens.
pub struct TempCopy {
    path: PathBuf,
    cleanup: Option<Box<dyn FnOnce() + Send>>,
}

impl TempCopy {
    /// Wraps `path`, running `cleanup` exactly once on drop.
    pub fn new(path: PathBuf, cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path,
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// Location of the temporary file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempCopy {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl fmt::Debug for TempCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempCopy").field("path", &self.path).finish()
    }
}

/// File system adapter trait.
///
/// Implementations can be real (using `std::fs`) or mocked.
pub trait FsAdapter: Send + Sync {
    /// Reads the contents of a file as a string.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::PathNotFound` if the file doesn't exist, or
    /// `PolyfmtError::FileReadError` if reading fails.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Writes a string to a file, creating it and missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::PermissionDenied` if lacking write permissions,
    /// or `PolyfmtError::FileWriteError` if writing fails.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Lists the names of the immediate entries of a directory, in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::FileReadError` if the directory cannot be
    /// listed.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::PermissionDenied` if lacking write permissions,
    /// or `PolyfmtError::FileWriteError` if creation fails.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Checks if a path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates a uniquely named file holding `content`, named
    /// `.polyfmt_<random><suffix>`.
    ///
    /// The file lives in `dir`, or in the system temporary directory when
    /// `dir` is `None`. It is removed when the returned [`TempCopy`] drops.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::FileWriteError` if the file cannot be created
    /// or written.
    fn create_temp_copy(&self, dir: Option<&Path>, suffix: &str, content: &str)
    -> Result<TempCopy>;
}
