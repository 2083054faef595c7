pub mod config;
pub mod exec;
pub mod job;
pub mod manifest;
pub mod orchestrator;
pub mod status;
pub mod testing;
pub mod transfer;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ENV_PREFIX,
};
pub use exec::{CommandExecutor, CommandSpec, ExecError, ExitOutcome, ProcessExecutor, Redirect};
pub use job::{JobExecutionError, JobRunner};
pub use manifest::{read_manifest, ManifestError, ManifestReader, TicketEntry};
pub use orchestrator::{Pipeline, PipelineOutcome, Stage, StageError};
pub use status::{
    local_hostname, HttpStatusSink, JobStatus, StatusReportError, StatusReporter, StatusSink,
    StatusUpdate,
};
pub use transfer::{
    init_environment, RemoteEnvironment, StagedFile, StagedFileSet, TransferClient,
    TransferDirection, TransferError, TransferStep,
};
