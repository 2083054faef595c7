//! Remote transfer client.
//!
//! Moves data between the remote storage service and the local scratch
//! directory using capability tickets. All transfers shell out to the iRODS
//! command line tools through a [`crate::exec::CommandExecutor`]:
//!
//! - `iget -rt <ticket> <remote>` fetches an input into the scratch directory;
//! - `iput -rt <ticket> <local> <remote-dir>` pushes an output;
//! - `ichmod own <user> <path>` hands the pushed output to the job user;
//! - `ichmod null anonymous <path>` revokes the anonymous access the ticket
//!   upload left behind.
//!
//! Each step is judged only by its exit code. A failed step is never rolled
//! back, so a pushed but not yet re-owned output is a possible end state and
//! is always reported as a failure.

mod client;
mod environment;
mod error;
mod types;

pub use client::{TransferClient, ANONYMOUS_USER, CHMOD_PROGRAM, FETCH_PROGRAM, PUSH_PROGRAM};
pub use environment::{init_environment, RemoteEnvironment};
pub use error::TransferError;
pub use types::{StagedFile, StagedFileSet, TransferDirection, TransferStep};
