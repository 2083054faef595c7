//! Error types for the exec module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent an external command from producing an exit code.
///
/// A command that runs and exits non-zero is not an error at this level; see
/// [`super::ExitOutcome`].
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be found.
    #[error("command not found: {program}")]
    NotFound { program: String },

    /// The program was found but could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An output redirect file could not be created.
    #[error("failed to open {path} for output: {source}")]
    Redirect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// Maps a spawn failure, distinguishing a missing binary.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        let program = program.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { program }
        } else {
            Self::Spawn { program, source }
        }
    }
}
