//! Remote connection context.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::Config;

use super::error::TransferError;

/// Contents of the iRODS client environment file.
///
/// Ticket transfers run as the anonymous user; the ticket carries the
/// authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEnvironment {
    pub irods_user_name: String,
    pub irods_host: String,
    pub irods_port: u16,
    pub irods_zone_name: String,
}

impl RemoteEnvironment {
    /// Anonymous environment for the configured host.
    pub fn anonymous(config: &Config) -> Self {
        Self {
            irods_user_name: super::ANONYMOUS_USER.to_string(),
            irods_host: config.irods_host.clone(),
            irods_port: config.irods_port,
            irods_zone_name: config.irods_zone.clone(),
        }
    }

    /// Writes the environment as JSON, creating the parent directory
    /// (mode 0755) if needed.
    pub async fn write_to(&self, path: &Path) -> Result<(), TransferError> {
        let env_error = |reason: String| TransferError::Environment {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                let mut builder = fs::DirBuilder::new();
                builder.recursive(true);
                #[cfg(unix)]
                builder.mode(0o755);
                builder
                    .create(parent)
                    .await
                    .map_err(|e| env_error(e.to_string()))?;
            }
        }

        let body = serde_json::to_vec_pretty(self).map_err(|e| env_error(e.to_string()))?;
        fs::write(path, body)
            .await
            .map_err(|e| env_error(e.to_string()))
    }
}

/// Prepares the remote connection context for the configured host.
///
/// Returns the path of the environment file that was written.
pub async fn init_environment(config: &Config) -> Result<PathBuf, TransferError> {
    let path = config
        .environment_file()
        .ok_or_else(|| TransferError::Environment {
            path: PathBuf::from("~/.irods/irods_environment.json"),
            reason: "no environment file configured and $HOME is not set".to_string(),
        })?;

    RemoteEnvironment::anonymous(config).write_to(&path).await?;
    info!(
        "Wrote remote environment for {}:{} to {}",
        config.irods_host,
        config.irods_port,
        path.display()
    );
    Ok(path)
}
