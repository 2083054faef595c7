//! Error types for the job module.

use std::path::PathBuf;
use thiserror::Error;

use crate::exec::ExecError;

/// Errors that can occur while running the work command.
#[derive(Debug, Error)]
pub enum JobExecutionError {
    /// No work command is configured.
    #[error("no work command configured")]
    EmptyCommand,

    /// A capture file could not be created.
    #[error("could not create capture file {}: {source}", .path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The work command could not be started.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The work command exited unsuccessfully.
    #[error("{program} returned {}", describe_exit(.exit_code))]
    Failed {
        program: String,
        exit_code: Option<i32>,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl JobExecutionError {
    /// Exit code of a command that ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}
