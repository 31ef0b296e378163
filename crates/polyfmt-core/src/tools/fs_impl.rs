//! Standard file system adapter backed by `std::fs` and `tempfile`.

use crate::error::{PolyfmtError, Result};
use crate::tools::fs::{FsAdapter, TEMP_FILE_PREFIX, TempCopy};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// File system adapter for the real disk.
///
/// For tests, use [`MockFsAdapter`](crate::tools::fs_mock::MockFsAdapter).
#[derive(Debug, Default)]
pub struct StdFsAdapter;

impl StdFsAdapter {
    /// Creates a new standard file system adapter.
    pub fn new() -> Self {
        Self
    }
}

fn read_error(path: &Path, e: std::io::Error) -> PolyfmtError {
    match e.kind() {
        ErrorKind::NotFound => PolyfmtError::PathNotFound(path.to_path_buf()),
        _ => PolyfmtError::FileReadError(format!("{}: {}", path.display(), e)),
    }
}

fn write_error(path: &Path, e: std::io::Error) -> PolyfmtError {
    match e.kind() {
        ErrorKind::PermissionDenied => PolyfmtError::PermissionDenied(path.display().to_string()),
        _ => PolyfmtError::FileWriteError(format!("{}: {}", path.display(), e)),
    }
}

impl FsAdapter for StdFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| read_error(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| write_error(path, e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(path).map_err(|e| {
            PolyfmtError::FileReadError(format!("{}: {}", path.display(), e))
        })?;

        // An entry that fails mid-listing is dropped; its siblings still count.
        Ok(entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| write_error(path, e))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_temp_copy(
        &self,
        dir: Option<&Path>,
        suffix: &str,
        content: &str,
    ) -> Result<TempCopy> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(suffix);

        let location = dir.map_or_else(std::env::temp_dir, Path::to_path_buf);
        let mut file = builder.tempfile_in(&location).map_err(|e| {
            PolyfmtError::FileWriteError(format!("{}: {}", location.display(), e))
        })?;

        if let Err(e) = file.write_all(content.as_bytes()).and_then(|()| file.flush()) {
            return Err(PolyfmtError::FileWriteError(format!(
                "{}: {}",
                file.path().display(),
                e
            )));
        }

        let temp_path = file.into_temp_path();
        let path = temp_path.to_path_buf();
        Ok(TempCopy::new(path, move || {
            if let Err(e) = temp_path.close() {
                tracing::debug!(error = %e, "failed to remove temporary file");
            }
        }))
    }
}
