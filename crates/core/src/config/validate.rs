use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Required settings are present (enforced by serde)
/// - Host, job user and work command are not empty
/// - Port is not 0
/// - Status update URL is an http(s) URL
/// - Captured stdout and stderr go to different files
/// - The remote environment file location can be resolved
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.irods_host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "irods_host cannot be empty".to_string(),
        ));
    }

    if config.irods_port == 0 {
        return Err(ConfigError::ValidationError(
            "irods_port cannot be 0".to_string(),
        ));
    }

    if config.irods_job_user.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "irods_job_user cannot be empty".to_string(),
        ));
    }

    match Url::parse(&config.status_update_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ConfigError::ValidationError(format!(
                "status_update_url must be http or https, got {}",
                url.scheme()
            )));
        }
        Err(e) => {
            return Err(ConfigError::ValidationError(format!(
                "status_update_url is not a valid URL: {}",
                e
            )));
        }
    }

    if config.job_command.is_empty() || config.job_command[0].trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "job_command cannot be empty".to_string(),
        ));
    }

    if config.stdout == config.stderr {
        return Err(ConfigError::ValidationError(format!(
            "stdout and stderr must be different files, both are {}",
            config.stdout.display()
        )));
    }

    if config.environment_file().is_none() {
        return Err(ConfigError::ValidationError(
            "irods_environment_file not set and $HOME is unavailable".to_string(),
        ));
    }

    Ok(())
}
