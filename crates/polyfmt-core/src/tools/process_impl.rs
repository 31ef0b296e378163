//! Standard process runner implementation.
//!
//! This module provides a concrete implementation of the `ProcessRunner`
//! trait using `std::process::Command`.

use crate::error::{PolyfmtError, Result};
use crate::tools::process::{CommandOutput, Invocation, ProcessRunner};
use std::process::{Command, Stdio};

/// Standard process runner using `std::process::Command`.
///
/// The child gets a cleared environment with only `PATH` set, so tool
/// discovery does not depend on whoever launched polyfmt.
#[derive(Debug, Default)]
pub struct StdProcessRunner;

impl StdProcessRunner {
    /// Creates a new standard process runner.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for StdProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .env_clear()
            .env("PATH", &invocation.search_path)
            .stdin(Stdio::null());

        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        tracing::debug!(command = %invocation.display_command(), "spawning formatter");

        let output = command
            .output()
            .map_err(|source| PolyfmtError::ToolLaunchFailed {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
