//! Process runner trait and invocation types.
//!
//! This module defines the `ProcessRunner` trait for spawning external
//! formatting tools, allowing both real process execution and mock
//! implementations for testing.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// A fully built external tool command line.
///
/// Produced by a formatter descriptor and consumed by a [`ProcessRunner`].
/// The environment of the spawned process consists of `PATH` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute.
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Working directory, or `None` to inherit the caller's.
    pub current_dir: Option<PathBuf>,

    /// Value of `PATH` in the child's environment.
    pub search_path: String,

    /// The file the tool formats in place.
    pub target: PathBuf,
}

impl Invocation {
    /// Creates an invocation for `program` that formats `target`.
    pub fn new(program: impl Into<String>, target: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            search_path: String::new(),
            target: target.to_path_buf(),
        }
    }

    /// Appends a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends the target file path as an argument.
    pub fn target_arg(mut self) -> Self {
        self.args.push(self.target.to_string_lossy().to_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, dir: Option<&Path>) -> Self {
        self.current_dir = dir.map(Path::to_path_buf);
        self
    }

    /// Sets the `PATH` the child sees.
    pub fn search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    /// Renders the command line for logging.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// External process output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code from the process (0 indicates success).
    pub exit_code: i32,

    /// Standard output from the process.
    pub stdout: String,

    /// Standard error output from the process.
    pub stderr: String,
}

impl CommandOutput {
    /// Creates a successful output with no text.
    pub fn ok() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Creates a failed output whose diagnostics are on stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Checks if the process succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns all of stdout followed by all of stderr.
    ///
    /// The streams are captured separately, so lines the tool interleaved
    /// across them do not keep their emission order.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Process runner trait.
///
/// Implementations spawn the invocation, block until the child exits, and
/// report its exit code and captured output.
pub trait ProcessRunner: Send + Sync {
    /// Runs an invocation to completion.
    ///
    /// A non-zero exit code is not an error at this level; check
    /// [`CommandOutput::success`].
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::ToolLaunchFailed` if the process cannot be
    /// spawned or waited on.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}
