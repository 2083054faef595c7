use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::lossy;

/// Standard iRODS port.
pub const DEFAULT_IRODS_PORT: u16 = 1247;

/// Root configuration.
///
/// Built once at startup and passed by reference to every stage. Keys that
/// have no `serde(default)` are required. Text settings also accept
/// numbers and booleans, which environment overrides produce.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Remote storage host.
    #[serde(deserialize_with = "lossy::string")]
    pub irods_host: String,
    #[serde(default = "default_irods_port")]
    pub irods_port: u16,
    /// Zone written into the remote environment file.
    #[serde(default, deserialize_with = "lossy::string")]
    pub irods_zone: String,
    /// User that takes ownership of uploaded outputs.
    #[serde(deserialize_with = "lossy::string")]
    pub irods_job_user: String,
    /// Where the remote environment file is written. Resolved from `$HOME`
    /// when absent, see [`Config::environment_file`].
    #[serde(default, deserialize_with = "lossy::option_path")]
    pub irods_environment_file: Option<PathBuf>,

    #[serde(default = "default_input_ticket_list", deserialize_with = "lossy::path")]
    pub input_ticket_list: PathBuf,
    #[serde(default = "default_output_ticket_list", deserialize_with = "lossy::path")]
    pub output_ticket_list: PathBuf,

    /// Endpoint that receives job status updates.
    pub status_update_url: String,
    /// HTTP timeout for a single status update.
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,
    /// Reporting host identity. Detected from the system when absent.
    #[serde(default, deserialize_with = "lossy::option_string")]
    pub hostname: Option<String>,

    /// Captured standard output of the job, relative to `scratch_dir`.
    #[serde(default = "default_stdout", deserialize_with = "lossy::path")]
    pub stdout: PathBuf,
    /// Captured standard error of the job, relative to `scratch_dir`.
    #[serde(default = "default_stderr", deserialize_with = "lossy::path")]
    pub stderr: PathBuf,

    /// Local working directory for staged inputs and job outputs.
    #[serde(default = "default_scratch_dir", deserialize_with = "lossy::path")]
    pub scratch_dir: PathBuf,
    /// Work command and its leading arguments. Staged inputs are appended.
    #[serde(default = "default_job_command", deserialize_with = "lossy::string_list")]
    pub job_command: Vec<String>,
}

fn default_irods_port() -> u16 {
    DEFAULT_IRODS_PORT
}

fn default_input_ticket_list() -> PathBuf {
    PathBuf::from("input_ticket.list")
}

fn default_output_ticket_list() -> PathBuf {
    PathBuf::from("output_ticket.list")
}

fn default_status_timeout() -> u64 {
    30
}

fn default_stdout() -> PathBuf {
    PathBuf::from("out.txt")
}

fn default_stderr() -> PathBuf {
    PathBuf::from("err.txt")
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_job_command() -> Vec<String> {
    vec!["wc".to_string()]
}

impl Config {
    /// Path of the remote environment file.
    ///
    /// Falls back to `$HOME/.irods/irods_environment.json`. Returns `None`
    /// only when neither the setting nor `$HOME` is available.
    pub fn environment_file(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.irods_environment_file {
            return Some(path.clone());
        }
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".irods")
                .join("irods_environment.json")
        })
    }

    /// Captured stdout/stderr files as uploaded during output staging.
    pub fn output_files(&self) -> Vec<PathBuf> {
        vec![self.stdout.clone(), self.stderr.clone()]
    }
}
