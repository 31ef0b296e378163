//! Polyfmt Core - formatter resolution and dispatch.
//!
//! This crate picks an external code formatter for an editor buffer and runs
//! it. Selection looks at the file's ancestry for tool configuration files
//! and a project override file, then falls back to a fixed precedence order
//! among the tools that have an executable configured.
//!
//! # Architecture
//!
//! - [`formatter`]: the closed set of supported tools and their command lines
//! - [`resolver`]: the directory-ancestry walk
//! - [`selection`]: the precedence policy built on the walk
//! - [`dispatcher`]: temp-file lifecycle and the public entry point
//! - [`project`]: the per-project `.polyfmt` override file
//! - [`settings`]: global settings and their persisted store
//! - [`content_type`]: content-type identifiers and file extensions
//! - [`tools`]: filesystem and process adapters
//! - [`error`]: error types and result type alias
//!
//! # Example
//!
//! ```rust,ignore
//! use polyfmt_core::{Dispatcher, GlobalSettings, MemorySettingsStore};
//! use std::sync::Arc;
//!
//! let mut settings = GlobalSettings::default();
//! settings.set("clang-format.executable_path", "/usr/local/bin/clang-format")?;
//!
//! let dispatcher = Dispatcher::standard(Arc::new(MemorySettingsStore::new(settings)));
//! let formatted = dispatcher.format_editing_file("int  x=1;", "public.c-source", None)?;
//! assert_eq!(formatted, "int x = 1;");
//! ```

pub mod content_type;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod project;
pub mod resolver;
pub mod selection;
pub mod settings;
pub mod tools;

// Re-export core types for convenience
pub use dispatcher::Dispatcher;
pub use error::{PolyfmtError, Result};
pub use formatter::Formatter;
pub use project::ProjectConfig;
pub use resolver::{AncestryScan, DiscoveredConfig};
pub use selection::Resolution;
pub use settings::{GlobalSettings, MemorySettingsStore, SettingsStore, TomlSettingsStore};
pub use tools::ToolRegistry;
