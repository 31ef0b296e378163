//! Mock process runner for testing.
//!
//! This module provides a mock implementation of the `ProcessRunner` trait.
//! The mock returns pre-programmed outputs per program, records every
//! invocation, and can rewrite the target file to stand in for a tool that
//! formats in place.

use crate::error::{PolyfmtError, Result};
use crate::tools::fs::FsAdapter;
use crate::tools::fs_impl::StdFsAdapter;
use crate::tools::process::{CommandOutput, Invocation, ProcessRunner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Transformation applied to the target file's content.
type Rewrite = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Mock process runner for testing.
///
/// # Examples
///
/// ```
/// use polyfmt_core::tools::process_mock::MockProcessRunner;
/// use polyfmt_core::tools::process::{CommandOutput, Invocation, ProcessRunner};
/// use std::path::Path;
///
/// let runner = MockProcessRunner::new();
/// runner.set_output("/usr/bin/swiftformat", CommandOutput::failure(1, "syntax error"));
///
/// let invocation = Invocation::new("/usr/bin/swiftformat", Path::new("/tmp/a.swift"));
/// let output = runner.run(&invocation).unwrap();
/// assert_eq!(output.exit_code, 1);
/// assert_eq!(runner.invocation_count("/usr/bin/swiftformat"), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    /// Pre-programmed outputs (program -> output)
    outputs: Arc<Mutex<HashMap<String, CommandOutput>>>,
    /// In-place rewrites applied to the target file (program -> rewrite)
    rewrites: Arc<Mutex<HashMap<String, Rewrite>>>,
    /// History of invocations
    history: Arc<Mutex<Vec<Invocation>>>,
    /// Output for programs without a pre-programmed one
    default_output: Arc<Mutex<Option<CommandOutput>>>,
    /// File system rewrites go through; the real disk when unset
    fs: Option<Arc<dyn FsAdapter>>,
}

impl MockProcessRunner {
    /// Creates a new mock runner with no pre-programmed outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose rewrites read and write through `fs`.
    ///
    /// Pair it with the same adapter the dispatcher uses, so rewrites reach
    /// temp copies that only exist in a mock file system.
    pub fn with_fs(fs: Arc<dyn FsAdapter>) -> Self {
        Self {
            fs: Some(fs),
            ..Self::default()
        }
    }

    /// Creates a mock that succeeds for every program without touching files.
    pub fn with_success() -> Self {
        let runner = Self::new();
        runner.set_default_output(CommandOutput::ok());
        runner
    }

    /// Sets the output returned for a specific program.
    pub fn set_output(&self, program: &str, output: CommandOutput) {
        self.outputs
            .lock()
            .unwrap()
            .insert(program.to_string(), output);
    }

    /// Sets the output for programs without a specific one.
    pub fn set_default_output(&self, output: CommandOutput) {
        *self.default_output.lock().unwrap() = Some(output);
    }

    /// Rewrites the target file with `rewrite` whenever `program` runs.
    ///
    /// The rewrite happens before the output is returned, mirroring a tool
    /// that formats in place and then exits.
    pub fn set_rewrite<F>(&self, program: &str, rewrite: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rewrites
            .lock()
            .unwrap()
            .insert(program.to_string(), Arc::new(rewrite));
    }

    /// Returns every recorded invocation, oldest first.
    pub fn get_history(&self) -> Vec<Invocation> {
        self.history.lock().unwrap().clone()
    }

    /// Returns the most recent invocation, if any.
    pub fn last_invocation(&self) -> Option<Invocation> {
        self.history.lock().unwrap().last().cloned()
    }

    /// Returns the number of times `program` was run.
    pub fn invocation_count(&self, program: &str) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.program == program)
            .count()
    }

    /// Clears all outputs, rewrites and history.
    pub fn clear(&self) {
        self.outputs.lock().unwrap().clear();
        self.rewrites.lock().unwrap().clear();
        self.history.lock().unwrap().clear();
        *self.default_output.lock().unwrap() = None;
    }
}

impl std::fmt::Debug for MockProcessRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProcessRunner")
            .field("outputs", &self.outputs)
            .field("rewrites", &self.rewrites.lock().unwrap().keys().collect::<Vec<_>>())
            .field("history", &self.history)
            .finish()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.history.lock().unwrap().push(invocation.clone());

        let rewrite = self
            .rewrites
            .lock()
            .unwrap()
            .get(&invocation.program)
            .cloned();
        if let Some(rewrite) = rewrite {
            let fs: Arc<dyn FsAdapter> = self
                .fs
                .clone()
                .unwrap_or_else(|| Arc::new(StdFsAdapter::new()));
            let content = fs.read_to_string(&invocation.target)?;
            fs.write(&invocation.target, &rewrite(&content))?;
        }

        let outputs = self.outputs.lock().unwrap();
        if let Some(output) = outputs.get(&invocation.program) {
            Ok(output.clone())
        } else if let Some(default) = self.default_output.lock().unwrap().clone() {
            Ok(default)
        } else if self.rewrites.lock().unwrap().contains_key(&invocation.program) {
            Ok(CommandOutput::ok())
        } else {
            Err(PolyfmtError::ToolLaunchFailed {
                program: invocation.program.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no output configured for program",
                ),
            })
        }
    }
}
