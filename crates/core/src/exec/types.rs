//! Types for the exec module.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Where a child's output stream goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Redirect {
    /// Share the parent's stream.
    #[default]
    Inherit,
    /// Discard the stream.
    Null,
    /// Create or truncate the file and write the stream to it.
    File(PathBuf),
}

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Positional arguments.
    pub args: Vec<String>,
    /// Working directory for the child. Inherited when `None`.
    pub current_dir: Option<PathBuf>,
    /// Standard output handling.
    pub stdout: Redirect,
    /// Standard error handling.
    pub stderr: Redirect,
}

impl CommandSpec {
    /// Creates a command with no arguments and inherited streams.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            stdout: Redirect::Inherit,
            stderr: Redirect::Inherit,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
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
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Redirects standard output to a file.
    pub fn stdout_to(mut self, path: impl AsRef<Path>) -> Self {
        self.stdout = Redirect::File(path.as_ref().to_path_buf());
        self
    }

    /// Redirects standard error to a file.
    pub fn stderr_to(mut self, path: impl AsRef<Path>) -> Self {
        self.stderr = Redirect::File(path.as_ref().to_path_buf());
        self
    }

    /// Renders the command line for logs.
    pub fn describe(&self) -> String {
        let mut line = quote(&self.program);
        for arg in &self.args {
            line.push(' ');
            line.push_str(&quote(arg));
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '\'') {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// How an external command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when the child was killed by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    /// An outcome with the given exit code.
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// An outcome for a child terminated by a signal.
    pub fn signalled() -> Self {
        Self { code: None }
    }

    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("terminated by signal"),
        }
    }
}
