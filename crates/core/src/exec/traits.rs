//! Trait definitions for the exec module.

use async_trait::async_trait;

use super::error::ExecError;
use super::types::{CommandSpec, ExitOutcome};

/// Runs external commands and reports how they exited.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Returns the name of this executor implementation.
    fn name(&self) -> &str;

    /// Runs the command to completion.
    ///
    /// Blocks (asynchronously) until the child exits. There is no timeout.
    async fn run(&self, spec: &CommandSpec) -> Result<ExitOutcome, ExecError>;
}
