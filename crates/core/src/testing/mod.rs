//! Testing utilities and mock implementations.
//!
//! These mocks stand in for the external collaborators so the whole
//! pipeline can run without iRODS tools, a work command or a status server.
//!
//! # Example
//!
//! ```rust,ignore
//! use stager_core::testing::{MockExecutor, MockStatusSink};
//!
//! let executor = MockExecutor::new();
//! let sink = MockStatusSink::new();
//!
//! // Script exit codes
//! executor.set_exit_code("wc", 2).await;
//! executor.set_exit_code_matching("ichmod", &["own"], 1).await;
//!
//! // ... run the pipeline ...
//!
//! assert_eq!(executor.commands_for("iput").await.len(), 2);
//! assert_eq!(sink.last_status().await, Some(JobStatus::Failed));
//! ```

mod mock_executor;
mod mock_status_sink;

pub use mock_executor::MockExecutor;
pub use mock_status_sink::MockStatusSink;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::{load_config_from_str, Config};
    use std::path::Path;

    /// A complete config rooted at `dir`.
    ///
    /// Manifests, scratch files and the remote environment file all live
    /// under `dir`.
    pub fn config_in(dir: &Path) -> Config {
        let mut config = load_config_from_str(
            r#"{
                "irods_host": "data.example.org",
                "irods_job_user": "alice",
                "status_update_url": "http://status.example.org/jobs/42"
            }"#,
        )
        .expect("fixture config is valid");

        config.scratch_dir = dir.join("scratch");
        config.input_ticket_list = dir.join("input_ticket.list");
        config.output_ticket_list = dir.join("output_ticket.list");
        config.irods_environment_file = Some(dir.join(".irods").join("irods_environment.json"));
        config
    }

    /// Writes a manifest file from `(ticket, path)` pairs.
    pub fn write_manifest(path: &Path, entries: &[(&str, &str)]) {
        let mut contents = String::from("# ticket,path\n");
        for (ticket, remote) in entries {
            contents.push_str(&format!("{},{}\n", ticket, remote));
        }
        std::fs::write(path, contents).expect("manifest is writable");
    }
}
