//! Error types for the transfer module.

use std::path::PathBuf;
use thiserror::Error;

use crate::exec::{ExecError, ExitOutcome};
use crate::manifest::ManifestError;

use super::types::{TransferDirection, TransferStep};

/// Errors that can occur while staging data in or out.
#[derive(Debug, Error)]
pub enum TransferError {
    /// A transfer tool exited unsuccessfully.
    #[error("could not {} {path} ({outcome})", .step.action())]
    Failed {
        step: TransferStep,
        path: String,
        outcome: ExitOutcome,
    },

    /// A transfer tool could not be run at all.
    #[error("could not {} {path}: {source}", .step.action())]
    Exec {
        step: TransferStep,
        path: String,
        #[source]
        source: ExecError,
    },

    /// Two inputs would land on the same local name.
    #[error("input name collision: {first} and {second} are both staged as {name}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// A remote path has no usable base name.
    #[error("remote path has no file name: {path:?}")]
    InvalidRemotePath { path: String },

    /// A local output path has no usable file name.
    #[error("local path has no file name: {}", .path.display())]
    InvalidLocalPath { path: PathBuf },

    /// The ticket list could not be read.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The remote environment file could not be written.
    #[error("could not write remote environment {}: {reason}", .path.display())]
    Environment { path: PathBuf, reason: String },
}

impl TransferError {
    /// The step that failed, for errors raised by a transfer tool.
    pub fn step(&self) -> Option<TransferStep> {
        match self {
            Self::Failed { step, .. } | Self::Exec { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Direction of the failed transfer, for errors raised by a transfer tool.
    pub fn direction(&self) -> Option<TransferDirection> {
        self.step().map(|step| step.direction())
    }
}
