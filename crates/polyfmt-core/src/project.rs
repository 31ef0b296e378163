//! Project override configuration.
//!
//! A project can pin executable paths, styles and arguments for any
//! formatter by placing a `.polyfmt` JSON file in one of the directories
//! the ancestry walk visits. The file is optional and forgiving: unknown
//! keys are ignored, and a file that cannot be read or parsed counts as
//! absent.

use crate::error::{PolyfmtError, Result};
use crate::formatter::Formatter;
use crate::tools::fs::FsAdapter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the project override config.
pub const PROJECT_CONFIG_FILE_NAME: &str = ".polyfmt";

/// Per-project formatter overrides, loaded from `.polyfmt`.
///
/// Fields are namespaced by tool and all optional. Empty strings are
/// treated as unset by the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Path to SwiftFormat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_format_executable_path: Option<String>,

    /// Path to Apple's swift-format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_swift_format_executable_path: Option<String>,

    /// Path to clang-format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clang_format_executable_path: Option<String>,

    /// clang-format `-style` value, ignored when a `.clang-format` is found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clang_format_style: Option<String>,

    /// Run Prettier through npx from the project's node modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_prettier_from_node_modules: Option<bool>,

    /// Path to Prettier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prettier_executable_path: Option<String>,

    /// Extra Prettier arguments, whitespace separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prettier_arguments: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ProjectConfig {
    /// Parses a project config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::ConfigParseError` if the text is not a JSON
    /// object with correctly typed fields.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| PolyfmtError::ConfigParseError(e.to_string()))
    }

    /// Loads the project config at `path`, treating any failure as absent.
    pub fn load(fs: &dyn FsAdapter, path: &Path) -> Option<Self> {
        let parsed = fs.read_to_string(path).and_then(|text| Self::parse(&text));
        match parsed {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring project config");
                None
            }
        }
    }

    /// Executable path override for `formatter`.
    pub fn executable_path(&self, formatter: Formatter) -> Option<&str> {
        match formatter {
            Formatter::SwiftFormat => non_empty(&self.swift_format_executable_path),
            Formatter::AppleSwiftFormat => non_empty(&self.apple_swift_format_executable_path),
            Formatter::ClangFormat => non_empty(&self.clang_format_executable_path),
            Formatter::Prettier => non_empty(&self.prettier_executable_path),
        }
    }

    /// Style override for `formatter`. Only clang-format has one.
    pub fn style(&self, formatter: Formatter) -> Option<&str> {
        match formatter {
            Formatter::ClangFormat => non_empty(&self.clang_format_style),
            _ => None,
        }
    }

    /// Extra arguments override for `formatter`. Only Prettier has them.
    pub fn arguments(&self, formatter: Formatter) -> Option<&str> {
        match formatter {
            Formatter::Prettier => non_empty(&self.prettier_arguments),
            _ => None,
        }
    }

    /// Whether Prettier should come from the project's node modules.
    pub fn use_prettier_from_node_modules(&self) -> bool {
        self.use_prettier_from_node_modules.unwrap_or(false)
    }
}
