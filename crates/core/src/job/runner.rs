//! Work command runner.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::exec::{CommandExecutor, CommandSpec};

use super::error::JobExecutionError;

/// Runs the configured work command inside the scratch directory.
pub struct JobRunner {
    executor: Arc<dyn CommandExecutor>,
    command: Vec<String>,
    scratch_dir: PathBuf,
}

impl JobRunner {
    /// `command` is the program followed by any leading arguments.
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        command: Vec<String>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            command,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Runs the command with `files` appended as arguments.
    ///
    /// Relative capture paths are resolved against the scratch directory.
    /// Both capture files are created (or truncated) before the command
    /// starts, so they exist afterwards even when it cannot be started.
    pub async fn run(
        &self,
        files: &[String],
        stdout_path: &Path,
        stderr_path: &Path,
    ) -> Result<(), JobExecutionError> {
        let (program, leading_args) = self
            .command
            .split_first()
            .ok_or(JobExecutionError::EmptyCommand)?;

        let stdout_path = self.scratch_dir.join(stdout_path);
        let stderr_path = self.scratch_dir.join(stderr_path);
        for path in [&stdout_path, &stderr_path] {
            tokio::fs::File::create(path)
                .await
                .map_err(|source| JobExecutionError::Capture {
                    path: path.clone(),
                    source,
                })?;
        }

        let spec = CommandSpec::new(program.as_str())
            .args(leading_args.iter().cloned())
            .args(files.iter().cloned())
            .current_dir(&self.scratch_dir)
            .stdout_to(&stdout_path)
            .stderr_to(&stderr_path);

        info!("Running job: {}", spec);
        let outcome = self.executor.run(&spec).await?;

        if !outcome.success() {
            warn!("Job {} finished with {}", program, outcome);
            return Err(JobExecutionError::Failed {
                program: program.clone(),
                exit_code: outcome.code,
            });
        }

        info!("Job {} finished successfully", program);
        Ok(())
    }
}
