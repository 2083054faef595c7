//! Executor backed by real child processes.

use async_trait::async_trait;
use std::fs::File;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::ExecError;
use super::traits::CommandExecutor;
use super::types::{CommandSpec, ExitOutcome, Redirect};

/// Runs commands with `tokio::process`.
///
/// Standard input is always closed. Redirect files are created (or
/// truncated) before the child starts.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn stdio(redirect: &Redirect) -> Result<Stdio, ExecError> {
        match redirect {
            Redirect::Inherit => Ok(Stdio::inherit()),
            Redirect::Null => Ok(Stdio::null()),
            Redirect::File(path) => File::create(path)
                .map(Stdio::from)
                .map_err(|source| ExecError::Redirect {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, spec: &CommandSpec) -> Result<ExitOutcome, ExecError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Self::stdio(&spec.stdout)?)
            .stderr(Self::stdio(&spec.stderr)?);

        if let Some(ref dir) = spec.current_dir {
            command.current_dir(dir);
        }

        debug!("Running {}", spec);
        let status = command
            .status()
            .await
            .map_err(|e| ExecError::spawn(&spec.program, e))?;

        let outcome = ExitOutcome::from(status);
        debug!("{} finished with {}", spec.program, outcome);
        Ok(outcome)
    }
}
