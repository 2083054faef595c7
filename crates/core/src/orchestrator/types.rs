//! Types for the job pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::status::JobStatus;
use crate::transfer::TransferError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    TransferIn,
    Execute,
    TransferOut,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::TransferIn => "transfer_in",
            Self::Execute => "execute",
            Self::TransferOut => "transfer_out",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that stop the pipeline before the job runs.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("could not create scratch directory {path}: {source}")]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// Final status sent to the status sink.
    pub status: JobStatus,
    /// Stages that failed, in the order they ran.
    pub failed_stages: Vec<Stage>,
    /// Stage whose failure stopped the run early.
    pub fatal_stage: Option<Stage>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineOutcome {
    /// Process exit code: 0 when the job completed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.status == JobStatus::Completed {
            0
        } else {
            1
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Completed
    }
}
