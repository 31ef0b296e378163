//! Mock file system adapter for testing.
//!
//! This module provides an in-memory implementation of the `FsAdapter` trait.
//! Besides files and directories it can mark directories as unreadable, which
//! lets tests drive the resolver's "listing failed" path deterministically.

use crate::error::{PolyfmtError, Result};
use crate::tools::fs::{FsAdapter, TEMP_FILE_PREFIX, TempCopy};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock file system adapter for testing.
///
/// Writing a file registers every ancestor directory, so a single
/// `write("/a/b/c.swift", ..)` is enough to make `/a` and `/a/b` walkable.
///
/// # Examples
///
/// ```
/// use polyfmt_core::tools::fs_mock::MockFsAdapter;
/// use polyfmt_core::tools::fs::FsAdapter;
/// use std::path::Path;
///
/// let fs = MockFsAdapter::new();
/// fs.write(Path::new("/repo/.clang-format"), "BasedOnStyle: LLVM").unwrap();
/// assert!(fs.is_dir(Path::new("/repo")));
/// assert_eq!(fs.list_dir(Path::new("/repo")).unwrap(), vec![".clang-format"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFsAdapter {
    /// In-memory file storage (path -> content)
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    /// In-memory directory storage
    dirs: Arc<Mutex<Vec<PathBuf>>>,
    /// Directories whose listing fails
    unreadable: Arc<Mutex<Vec<PathBuf>>>,
    /// Source of unique temp-copy names
    temp_counter: Arc<AtomicUsize>,
}

impl MockFsAdapter {
    /// Creates a new, empty mock file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `list_dir` fail for `path`.
    pub fn set_unreadable(&self, path: impl Into<PathBuf>) {
        self.unreadable.lock().unwrap().push(path.into());
    }

    fn register_ancestors(&self, path: &Path) {
        let mut dirs = self.dirs.lock().unwrap();
        for dir in path.ancestors().skip(1) {
            if dir.as_os_str().is_empty() {
                break;
            }
            if !dirs.iter().any(|d| d == dir) {
                dirs.push(dir.to_path_buf());
            }
        }
    }
}

impl FsAdapter for MockFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| PolyfmtError::PathNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.register_ancestors(path);
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let unreadable = self.unreadable.lock().unwrap().iter().any(|d| d == path);
        if unreadable || !self.is_dir(path) {
            return Err(PolyfmtError::FileReadError(format!(
                "{}: cannot list directory",
                path.display()
            )));
        }

        let files = self.files.lock().unwrap();
        let dirs = self.dirs.lock().unwrap();

        let mut entries = Vec::new();

        for file_path in files.keys() {
            if let Some(parent) = file_path.parent()
                && parent == path
                && let Some(name) = file_path.file_name()
            {
                entries.push(name.to_string_lossy().to_string());
            }
        }

        for dir_path in dirs.iter() {
            if let Some(parent) = dir_path.parent()
                && parent == path
                && dir_path != path
                && let Some(name) = dir_path.file_name()
            {
                let name_str = name.to_string_lossy().to_string();
                if !entries.contains(&name_str) {
                    entries.push(name_str);
                }
            }
        }

        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.dirs.lock().unwrap().iter().any(|d| d == path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.register_ancestors(path);
        let mut dirs = self.dirs.lock().unwrap();
        if !dirs.iter().any(|d| d == path) {
            dirs.push(path.to_path_buf());
        }
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().iter().any(|d| d == path)
    }

    fn create_temp_copy(
        &self,
        dir: Option<&Path>,
        suffix: &str,
        content: &str,
    ) -> Result<TempCopy> {
        let dir = match dir {
            Some(dir) if !self.is_dir(dir) => {
                return Err(PolyfmtError::FileWriteError(format!(
                    "{}: no such directory",
                    dir.display()
                )));
            }
            Some(dir) => dir.to_path_buf(),
            None => {
                let dir = std::env::temp_dir();
                self.create_dir_all(&dir)?;
                dir
            }
        };

        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("{TEMP_FILE_PREFIX}{n:06}{suffix}"));
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), content.to_string());

        let files = Arc::clone(&self.files);
        let removed = path.clone();
        Ok(TempCopy::new(path, move || {
            files.lock().unwrap().remove(&removed);
        }))
    }
}
