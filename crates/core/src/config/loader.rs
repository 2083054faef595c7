use figment::{
    error::Kind,
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides (`STAGER_IRODS_HOST`, ...).
pub const ENV_PREFIX: &str = "STAGER_";

/// Load configuration from file with environment variable overrides.
///
/// The file is read as TOML when it has a `.toml` extension and as JSON
/// otherwise.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let figment = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Figment::new().merge(Toml::file(path)),
        _ => Figment::new().merge(Json::file(path)),
    };

    figment
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config", "log_format"]))
        .extract()
        .map_err(extract_error)
}

/// Load configuration from a JSON string (useful for testing).
pub fn load_config_from_str(json: &str) -> Result<Config, ConfigError> {
    Figment::from(Json::string(json))
        .extract()
        .map_err(extract_error)
}

fn extract_error(e: figment::Error) -> ConfigError {
    match &e.kind {
        Kind::MissingField(field) => ConfigError::MissingSetting(field.to_string()),
        _ => ConfigError::ParseError(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_load_config_from_str_valid() {
        let json = r#"{
            "irods_host": "data.example.org",
            "irods_port": 1250,
            "irods_job_user": "alice",
            "status_update_url": "http://status.example.org/jobs/42"
        }"#;
        let config = load_config_from_str(json).unwrap();
        assert_eq!(config.irods_port, 1250);
        assert_eq!(config.stderr, PathBuf::from("err.txt"));
    }

    #[test]
    fn test_load_config_from_str_missing_required() {
        let json = r#"{
            "irods_host": "data.example.org",
            "status_update_url": "http://status.example.org/jobs/42"
        }"#;
        let err = load_config_from_str(json).unwrap_err();
        match err {
            ConfigError::MissingSetting(key) => assert_eq!(key, "irods_job_user"),
            other => panic!("expected MissingSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_str_malformed() {
        let err = load_config_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let json = r#"{
            "irods_host": "data.example.org",
            "irods_port": "not-a-port",
            "irods_job_user": "alice",
            "status_update_url": "http://status.example.org/jobs/42"
        }"#;
        let err = load_config_from_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_json_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{
                "irods_host": "data.example.org",
                "irods_job_user": "alice",
                "status_update_url": "http://status.example.org/jobs/42",
                "stdout": "result.txt"
            }}"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.irods_host, "data.example.org");
        assert_eq!(config.stdout, PathBuf::from("result.txt"));
        assert_eq!(config.irods_port, 1247);
    }

    #[test]
    fn test_load_config_from_toml_file() {
        let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            temp_file,
            r#"
irods_host = "data.example.org"
irods_job_user = "alice"
status_update_url = "http://status.example.org/jobs/42"
job_command = ["wc", "-w"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.job_command, vec!["wc".to_string(), "-w".to_string()]);
    }

    #[test]
    fn test_env_override_keeps_numeric_text() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.json",
                r#"{
                    "irods_host": "data.example.org",
                    "irods_job_user": "alice",
                    "status_update_url": "http://status.example.org/jobs/42"
                }"#,
            )?;
            jail.set_env("STAGER_IRODS_JOB_USER", 1001);
            jail.set_env("STAGER_IRODS_ZONE", 7);

            let config = load_config(&jail.directory().join("config.json"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.irods_job_user, "1001");
            assert_eq!(config.irods_zone, "7");
            Ok(())
        });
    }

    #[test]
    fn test_load_config_file_missing_required() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{ "irods_job_user": "alice" }}"#).unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting(_)));
    }
}
