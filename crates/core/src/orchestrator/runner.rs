//! Pipeline implementation.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::exec::CommandExecutor;
use crate::job::JobRunner;
use crate::manifest::ManifestReader;
use crate::status::{JobStatus, StatusReporter};
use crate::transfer::{init_environment, StagedFileSet, TransferClient, TransferError};

use super::types::{PipelineOutcome, Stage, StageError};

/// Runs one job from remote inputs to remote outputs.
///
/// Every stage is awaited in turn; nothing runs concurrently.
pub struct Pipeline {
    config: Config,
    reporter: StatusReporter,
    transfer: TransferClient,
    job: JobRunner,
}

impl Pipeline {
    pub fn new(
        config: Config,
        executor: Arc<dyn CommandExecutor>,
        reporter: StatusReporter,
    ) -> Self {
        let transfer = TransferClient::new(Arc::clone(&executor), config.scratch_dir.clone());
        let job = JobRunner::new(
            executor,
            config.job_command.clone(),
            config.scratch_dir.clone(),
        );

        Self {
            config,
            reporter,
            transfer,
            job,
        }
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    /// Runs every stage and reports the final status.
    pub async fn run(&self) -> PipelineOutcome {
        let started_at = Utc::now();
        let mut failed_stages = Vec::new();

        self.reporter
            .running("configuration successfully loaded")
            .await;

        debug!("Entering stage {}", Stage::Init);
        self.reporter
            .running("initializing the iRODS connection")
            .await;
        if let Err(e) = self.init().await {
            self.reporter
                .failed(format!("unable to initialize the iRODS connection: {}", e))
                .await;
            return self.fatal(Stage::Init, started_at);
        }

        debug!("Entering stage {}", Stage::TransferIn);
        self.reporter.running("downloading the input files").await;
        let staged = match self.transfer_in().await {
            Ok(staged) => staged,
            Err(e) => {
                self.reporter
                    .failed(format!("unable to download input files: {}", e))
                    .await;
                return self.fatal(Stage::TransferIn, started_at);
            }
        };

        debug!("Entering stage {}", Stage::Execute);
        self.reporter.running("processing the input files").await;
        if let Err(e) = self
            .job
            .run(&staged.names(), &self.config.stdout, &self.config.stderr)
            .await
        {
            self.reporter
                .running(format!("job encountered an error: {}", e))
                .await;
            failed_stages.push(Stage::Execute);
        }

        debug!("Entering stage {}", Stage::TransferOut);
        self.reporter.running("uploading the output files").await;
        if let Err(e) = self.transfer_out().await {
            self.reporter
                .running(format!("unable to upload output file: {}", e))
                .await;
            failed_stages.push(Stage::TransferOut);
        }

        debug!("Entering stage {}", Stage::Done);
        let status = if failed_stages.is_empty() {
            self.reporter.completed("job completed successfully").await;
            JobStatus::Completed
        } else {
            self.reporter
                .failed("job failed; see prior status update messages for details")
                .await;
            JobStatus::Failed
        };

        PipelineOutcome {
            status,
            failed_stages,
            fatal_stage: None,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn init(&self) -> Result<PathBuf, StageError> {
        let env_file = init_environment(&self.config).await?;

        let scratch = &self.config.scratch_dir;
        tokio::fs::create_dir_all(scratch)
            .await
            .map_err(|source| StageError::ScratchDir {
                path: scratch.clone(),
                source,
            })?;
        info!("Using scratch directory {}", scratch.display());

        Ok(env_file)
    }

    async fn transfer_in(&self) -> Result<StagedFileSet, TransferError> {
        let manifest = ManifestReader::open(&self.config.input_ticket_list)?;
        self.transfer.download_all(manifest).await
    }

    async fn transfer_out(&self) -> Result<usize, TransferError> {
        let manifest = ManifestReader::open(&self.config.output_ticket_list)?;
        self.transfer
            .upload_all(
                manifest,
                &self.config.irods_job_user,
                &self.config.output_files(),
            )
            .await
    }

    fn fatal(&self, stage: Stage, started_at: chrono::DateTime<Utc>) -> PipelineOutcome {
        error!("Stage {} failed; stopping", stage);
        PipelineOutcome {
            status: JobStatus::Failed,
            failed_stages: vec![stage],
            fatal_stage: Some(stage),
            started_at,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{config_in, write_manifest};
    use crate::testing::{MockExecutor, MockStatusSink};
    use tempfile::TempDir;

    struct Harness {
        dir: TempDir,
        config: Config,
        executor: MockExecutor,
        sink: MockStatusSink,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = config_in(dir.path());
            write_manifest(&config.input_ticket_list, &[("capA", "/zone/in/fileA")]);
            write_manifest(&config.output_ticket_list, &[("capOut", "/zone/out")]);
            Self {
                dir,
                config,
                executor: MockExecutor::new(),
                sink: MockStatusSink::new(),
            }
        }

        fn pipeline(&self) -> Pipeline {
            Pipeline::new(
                self.config.clone(),
                Arc::new(self.executor.clone()),
                StatusReporter::new(Arc::new(self.sink.clone()), "worker-1"),
            )
        }
    }

    #[tokio::test]
    async fn test_init_writes_environment_and_scratch() {
        let harness = Harness::new();
        harness.pipeline().run().await;

        let env_file = harness.config.environment_file().unwrap();
        let env: serde_json::Value =
            serde_json::from_slice(&std::fs::read(env_file).unwrap()).unwrap();
        assert_eq!(env["irods_user_name"], "anonymous");
        assert_eq!(env["irods_host"], "data.example.org");
        assert_eq!(env["irods_port"], 1247);
        assert!(harness.config.scratch_dir.is_dir());
    }

    #[tokio::test]
    async fn test_success_messages_in_order() {
        let harness = Harness::new();
        let outcome = harness.pipeline().run().await;

        assert!(outcome.is_success());
        assert!(outcome.failed_stages.is_empty());
        assert!(outcome.finished_at >= outcome.started_at);
        assert_eq!(
            harness.sink.messages().await,
            vec![
                "configuration successfully loaded",
                "initializing the iRODS connection",
                "downloading the input files",
                "processing the input files",
                "uploading the output files",
                "job completed successfully",
            ]
        );
    }

    #[tokio::test]
    async fn test_job_receives_staged_names() {
        let harness = Harness::new();
        harness.pipeline().run().await;

        let jobs = harness.executor.commands_for("wc").await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].args, vec!["fileA"]);
        assert_eq!(
            jobs[0].current_dir.as_deref(),
            Some(harness.config.scratch_dir.as_path())
        );
    }

    #[tokio::test]
    async fn test_missing_input_manifest_is_fatal() {
        let harness = Harness::new();
        std::fs::remove_file(&harness.config.input_ticket_list).unwrap();

        let outcome = harness.pipeline().run().await;

        assert_eq!(outcome.fatal_stage, Some(Stage::TransferIn));
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(harness.executor.command_count().await, 0);

        let updates = harness.sink.updates().await;
        let last = updates.last().unwrap();
        assert_eq!(last.status, JobStatus::Failed);
        assert!(last.message.starts_with("unable to download input files: "));
    }

    #[tokio::test]
    async fn test_init_failure_is_fatal() {
        let mut harness = Harness::new();
        // A regular file where the environment directory should be.
        let blocker = harness.dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        harness.config.irods_environment_file = Some(blocker.join("irods_environment.json"));

        let outcome = harness.pipeline().run().await;

        assert_eq!(outcome.fatal_stage, Some(Stage::Init));
        assert_eq!(harness.executor.command_count().await, 0);
        let messages = harness.sink.messages().await;
        assert_eq!(messages.len(), 3);
        assert!(messages[2].starts_with("unable to initialize the iRODS connection: "));
    }

    #[tokio::test]
    async fn test_execute_failure_still_uploads() {
        let harness = Harness::new();
        harness.executor.set_exit_code("wc", 1).await;

        let outcome = harness.pipeline().run().await;

        assert_eq!(outcome.failed_stages, vec![Stage::Execute]);
        assert_eq!(outcome.fatal_stage, None);
        assert_eq!(harness.executor.commands_for("iput").await.len(), 2);

        let updates = harness.sink.updates().await;
        let job_error = updates
            .iter()
            .find(|u| u.message.starts_with("job encountered an error: "))
            .unwrap();
        assert_eq!(job_error.status, JobStatus::Running);
        assert_eq!(
            updates.last().unwrap().message,
            "job failed; see prior status update messages for details"
        );
    }

    #[tokio::test]
    async fn test_both_late_stages_fail() {
        let harness = Harness::new();
        harness.executor.set_exit_code("wc", 2).await;
        harness.executor.set_exit_code("iput", 1).await;

        let outcome = harness.pipeline().run().await;

        assert_eq!(
            outcome.failed_stages,
            vec![Stage::Execute, Stage::TransferOut]
        );
        assert_eq!(outcome.status, JobStatus::Failed);
        // One failed status only: the final one.
        let failed = harness
            .sink
            .statuses()
            .await
            .into_iter()
            .filter(|s| *s == JobStatus::Failed)
            .count();
        assert_eq!(failed, 1);
    }
}
