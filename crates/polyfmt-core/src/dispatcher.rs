//! Format request dispatcher.
//!
//! The [`Dispatcher`] is the entry point callers use to format one buffer.
//! Each call reloads the global settings, filters the formatters by content
//! type, resolves one of them against the source location, copies the
//! content into a temporary file and lets the tool rewrite it in place.
//! Nothing is cached between calls.

use crate::content_type;
use crate::error::{PolyfmtError, Result};
use crate::formatter::{FormatTarget, Formatter};
use crate::selection::{self, Resolution};
use crate::settings::SettingsStore;
use crate::tools::ToolRegistry;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Formats editor buffers with the best matching external tool.
///
/// # Examples
///
/// ```no_run
/// use polyfmt_core::{Dispatcher, TomlSettingsStore};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(TomlSettingsStore::new("/home/me/.config/polyfmt/settings.toml"));
/// let dispatcher = Dispatcher::standard(store);
///
/// let formatted = dispatcher.format_editing_file(
///     "int  main(){return 0;}",
///     "public.c-source",
///     Some(Path::new("/home/me/project/main.c")),
/// )?;
/// println!("{formatted}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    /// Filesystem and process adapters.
    pub tools: ToolRegistry,

    /// Store the global settings are read from on every request.
    pub settings: Arc<dyn SettingsStore>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given adapters and settings store.
    pub fn new(tools: ToolRegistry, settings: Arc<dyn SettingsStore>) -> Self {
        Self { tools, settings }
    }

    /// Creates a dispatcher that uses the real filesystem and spawns real
    /// processes.
    pub fn standard(settings: Arc<dyn SettingsStore>) -> Self {
        Self::new(ToolRegistry::standard(), settings)
    }

    /// Formatters that handle `content_type` or the source file's own
    /// extension, in precedence order.
    pub fn candidates(content_type: &str, source_extension: Option<&str>) -> Vec<Formatter> {
        let canonical = content_type::canonical_extension(content_type);

        Formatter::ALL
            .into_iter()
            .filter(|formatter| {
                source_extension.is_some_and(|ext| formatter.supports_extension(ext))
                    || canonical
                        .as_deref()
                        .is_some_and(|ext| formatter.supports_extension(ext))
            })
            .collect()
    }

    /// Resolves the formatter that would handle a request without running it.
    ///
    /// # Errors
    ///
    /// Returns an error if the global settings cannot be loaded.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resolve(&self, content_type: &str, source: Option<&Path>) -> Result<Resolution> {
        let settings = self.settings.load()?;
        let source = source.map(normalize);
        let extension = source.as_deref().and_then(|s| self.source_extension(s));
        let candidates = Self::candidates(content_type, extension.as_deref());

        Ok(selection::resolve(
            self.tools.fs.as_ref(),
            &settings,
            source.as_deref(),
            &candidates,
        ))
    }

    /// Formats `content` and returns the formatted text.
    ///
    /// `source` is where the buffer lives on disk, if known. It may be a file
    /// (saved or not) or a directory, and anchors the ancestry walk.
    ///
    /// # Errors
    ///
    /// - `PolyfmtError::NoFormatterFound` if no formatter supports the
    ///   content type and is usable
    /// - `PolyfmtError::ExecutablePathNotSet` if the selected formatter has
    ///   no executable
    /// - `PolyfmtError::ExternalToolFailure` if the tool exits non-zero
    /// - `PolyfmtError::FileWriteError` or `FileReadError` if the temporary
    ///   copy cannot be created or read back
    ///
    /// The temporary copy is handled by the registry's [`FsAdapter`] and is
    /// removed on every return path.
    ///
    /// [`FsAdapter`]: crate::tools::fs::FsAdapter
    #[tracing::instrument(level = "debug", skip(self, content))]
    pub fn format_editing_file(
        &self,
        content: &str,
        content_type: &str,
        source: Option<&Path>,
    ) -> Result<String> {
        let settings = self.settings.load()?;
        let source = source.map(normalize);
        let extension = source.as_deref().and_then(|s| self.source_extension(s));
        let candidates = Self::candidates(content_type, extension.as_deref());

        let resolution = selection::resolve(
            self.tools.fs.as_ref(),
            &settings,
            source.as_deref(),
            &candidates,
        );
        let Some(formatter) = resolution.formatter else {
            return Err(PolyfmtError::NoFormatterFound(content_type.to_string()));
        };

        let suffix = extension
            .filter(|ext| formatter.supports_extension(ext))
            .or_else(|| content_type::canonical_extension(content_type))
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let fs = self.tools.fs.as_ref();
        let temp = fs.create_temp_copy(resolution.search_root.as_deref(), &suffix, content)?;

        formatter.format(
            self.tools.runner.as_ref(),
            &FormatTarget {
                file: temp.path(),
                working_dir: resolution.search_root.as_deref(),
                config_file: resolution.config_file.as_deref(),
                project: resolution.project_config.as_ref(),
                settings: &settings,
            },
        )?;

        fs.read_to_string(temp.path())
    }

    /// Extension of `source`, or `None` for directories and extensionless
    /// names.
    fn source_extension(&self, source: &Path) -> Option<String> {
        if self.tools.fs.is_dir(source) {
            return None;
        }
        source
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

/// Absolute form of `path` with `.` and `..` removed lexically, so the
/// ancestry walk only ever moves upwards.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
