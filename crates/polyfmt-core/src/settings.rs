//! Global settings and the stores that persist them.
//!
//! Global settings hold the user's default executable paths, styles and
//! arguments per tool, plus the `PATH` handed to every spawned formatter.
//! They are read from a [`SettingsStore`] at the start of every request and
//! passed down explicitly, so edits take effect on the next format without
//! any invalidation.
//!
//! The file store uses TOML:
//!
//! ```toml
//! search_path = "/usr/local/bin:/usr/bin:/bin"
//!
//! [clang-format]
//! executable_path = "/usr/local/bin/clang-format"
//! style = "Google"
//!
//! [prettier]
//! executable_path = "/usr/local/bin/prettier"
//! arguments = "--single-quote"
//!
//! [npx]
//! executable_path = "/usr/local/bin/npx"
//! ```

use crate::error::{PolyfmtError, Result};
use crate::formatter::Formatter;
use crate::tools::fs::FsAdapter;
use crate::tools::fs_impl::StdFsAdapter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// `PATH` used for spawned formatters unless settings override it.
pub const DEFAULT_SEARCH_PATH: &str =
    "/opt/homebrew/bin:/opt/homebrew/sbin:/usr/local/bin:/usr/bin:/bin:/usr/sbin:/sbin";

/// Settings table name for the npx runner.
pub const NPX_SECTION: &str = "npx";

/// Per-tool defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    /// Default executable path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<String>,

    /// Default style name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Default extra arguments, whitespace separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ToolDefaults {
    fn is_empty(&self) -> bool {
        self.executable_path.is_none() && self.style.is_none() && self.arguments.is_none()
    }

    fn field_mut(&mut self, field: &str) -> Option<&mut Option<String>> {
        match field {
            "executable_path" => Some(&mut self.executable_path),
            "style" => Some(&mut self.style),
            "arguments" => Some(&mut self.arguments),
            _ => None,
        }
    }
}

/// Process-wide formatter defaults.
///
/// Empty strings are treated as unset by every accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// `PATH` for spawned formatters; [`DEFAULT_SEARCH_PATH`] when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,

    /// SwiftFormat defaults.
    #[serde(skip_serializing_if = "ToolDefaults::is_empty")]
    pub swiftformat: ToolDefaults,

    /// swift-format defaults.
    #[serde(rename = "swift-format", skip_serializing_if = "ToolDefaults::is_empty")]
    pub apple_swift_format: ToolDefaults,

    /// clang-format defaults.
    #[serde(rename = "clang-format", skip_serializing_if = "ToolDefaults::is_empty")]
    pub clang_format: ToolDefaults,

    /// Prettier defaults.
    #[serde(skip_serializing_if = "ToolDefaults::is_empty")]
    pub prettier: ToolDefaults,

    /// npx, used for Prettier's node-modules mode.
    #[serde(skip_serializing_if = "ToolDefaults::is_empty")]
    pub npx: ToolDefaults,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl GlobalSettings {
    fn tool(&self, formatter: Formatter) -> &ToolDefaults {
        match formatter {
            Formatter::SwiftFormat => &self.swiftformat,
            Formatter::AppleSwiftFormat => &self.apple_swift_format,
            Formatter::ClangFormat => &self.clang_format,
            Formatter::Prettier => &self.prettier,
        }
    }

    fn section_mut(&mut self, section: &str) -> Option<&mut ToolDefaults> {
        if section == NPX_SECTION {
            return Some(&mut self.npx);
        }
        let formatter = section.parse::<Formatter>().ok()?;
        Some(match formatter {
            Formatter::SwiftFormat => &mut self.swiftformat,
            Formatter::AppleSwiftFormat => &mut self.apple_swift_format,
            Formatter::ClangFormat => &mut self.clang_format,
            Formatter::Prettier => &mut self.prettier,
        })
    }

    /// Default executable path for `formatter`.
    pub fn executable_path(&self, formatter: Formatter) -> Option<&str> {
        non_empty(&self.tool(formatter).executable_path)
    }

    /// Default style for `formatter`.
    pub fn style(&self, formatter: Formatter) -> Option<&str> {
        non_empty(&self.tool(formatter).style)
    }

    /// Default extra arguments for `formatter`.
    pub fn arguments(&self, formatter: Formatter) -> Option<&str> {
        non_empty(&self.tool(formatter).arguments)
    }

    /// Path to npx.
    pub fn npx_executable_path(&self) -> Option<&str> {
        non_empty(&self.npx.executable_path)
    }

    /// `PATH` for spawned formatters.
    pub fn search_path(&self) -> &str {
        non_empty(&self.search_path).unwrap_or(DEFAULT_SEARCH_PATH)
    }

    /// Sets a dotted key such as `clang-format.style`. An empty value clears it.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::InvalidConfig` for an unknown key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = (!value.is_empty()).then(|| value.to_string());

        if key == "search_path" {
            self.search_path = value;
            return Ok(());
        }

        let slot = key
            .split_once('.')
            .and_then(|(section, field)| self.section_mut(section)?.field_mut(field))
            .ok_or_else(|| PolyfmtError::InvalidConfig(format!("unknown settings key: {key}")))?;
        *slot = value;
        Ok(())
    }
}

/// Persisted key/value store for [`GlobalSettings`].
pub trait SettingsStore: Send + Sync {
    /// Reads the current settings. Never cached between calls.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::ConfigParseError` if the stored settings are
    /// malformed, or a file system error if they cannot be read.
    fn load(&self) -> Result<GlobalSettings>;

    /// Sets `key` to `value` (empty clears) and persists the result.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::InvalidConfig` for an unknown key, or a write
    /// error if the settings cannot be persisted.
    fn update(&self, key: &str, value: &str) -> Result<()>;
}

/// Settings stored in a TOML file.
///
/// A missing file is an empty settings record.
pub struct TomlSettingsStore {
    path: PathBuf,
    fs: Arc<dyn FsAdapter>,
}

impl TomlSettingsStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(path, Arc::new(StdFsAdapter::new()))
    }

    /// Creates a store that reads and writes through `fs`.
    pub fn with_fs(path: impl Into<PathBuf>, fs: Arc<dyn FsAdapter>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for TomlSettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TomlSettingsStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<GlobalSettings> {
        if !self.fs.exists(&self.path) {
            tracing::debug!(path = %self.path.display(), "settings file missing, using defaults");
            return Ok(GlobalSettings::default());
        }

        let text = self.fs.read_to_string(&self.path)?;
        toml::from_str(&text).map_err(|e| {
            PolyfmtError::ConfigParseError(format!("{}: {}", self.path.display(), e))
        })
    }

    fn update(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.set(key, value)?;

        let text = toml::to_string_pretty(&settings)
            .map_err(|e| PolyfmtError::Other(format!("failed to serialize settings: {e}")))?;
        self.fs.write(&self.path, &text)
    }
}

/// Settings held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Arc<Mutex<GlobalSettings>>,
}

impl MemorySettingsStore {
    /// Creates a store holding `settings`.
    pub fn new(settings: GlobalSettings) -> Self {
        Self {
            settings: Arc::new(Mutex::new(settings)),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<GlobalSettings> {
        Ok(self.settings.lock().unwrap().clone())
    }

    fn update(&self, key: &str, value: &str) -> Result<()> {
        self.settings.lock().unwrap().set(key, value)
    }
}
