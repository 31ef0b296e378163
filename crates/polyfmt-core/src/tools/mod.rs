//! Tool adapters and registry.
//!
//! This module provides the registry that owns the adapters the dispatcher
//! talks to: the file system (for the ancestry walk and settings) and the
//! process runner (for external formatters). Each adapter trait has a
//! standard implementation and an in-memory mock.

pub mod fs;
pub mod fs_impl;
pub mod fs_mock;
pub mod process;
pub mod process_impl;
pub mod process_mock;

use std::sync::Arc;

/// Tool registry that manages all available adapters.
///
/// Adapters are shared trait objects so that the same mock can be handed to
/// a registry and inspected by a test afterwards.
#[derive(Clone)]
pub struct ToolRegistry {
    /// File system adapter for directory listings and config reads.
    pub fs: Arc<dyn fs::FsAdapter>,

    /// Process runner for external formatter invocations.
    pub runner: Arc<dyn process::ProcessRunner>,
}

impl ToolRegistry {
    /// Creates a new tool registry with the provided adapters.
    pub fn new(fs: Arc<dyn fs::FsAdapter>, runner: Arc<dyn process::ProcessRunner>) -> Self {
        Self { fs, runner }
    }

    /// Creates a registry backed by the real file system and real processes.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(fs_impl::StdFsAdapter::new()),
            Arc::new(process_impl::StdProcessRunner::new()),
        )
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("fs", &"Arc<dyn FsAdapter>")
            .field("runner", &"Arc<dyn ProcessRunner>")
            .finish()
    }
}
