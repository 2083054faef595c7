//! Work command execution.
//!
//! The work command receives the staged inputs as positional arguments and
//! is judged only by its exit code. Its standard output and error are
//! captured to files that are staged out afterwards, whether or not the
//! command succeeded.

mod error;
mod runner;

pub use error::JobExecutionError;
pub use runner::JobRunner;
