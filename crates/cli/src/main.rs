use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stager_core::{
    load_config, local_hostname, validate_config, CommandExecutor, Config, HttpStatusSink,
    Pipeline, ProcessExecutor, StatusReporter, StatusSink,
};

/// Config file used when `STAGER_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    init_tracing();

    let config_path = std::env::var("STAGER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match load_settings(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    match run(config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("STAGER_LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Loads and validates the configuration file.
fn load_settings(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    let config = load_config(path)
        .with_context(|| format!("Failed to load config from {:?}", path))?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Hostname reported with every status update.
async fn reporting_hostname(config: &Config) -> String {
    match config.hostname.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => local_hostname().await,
    }
}

/// Runs the job and returns the process exit code.
async fn run(config: Config) -> Result<i32> {
    let hostname = reporting_hostname(&config).await;
    info!("Reporting as {}", hostname);

    let sink: Arc<dyn StatusSink> = Arc::new(
        HttpStatusSink::from_config(&config).context("Failed to create status client")?,
    );
    info!("Sending status updates to {}", config.status_update_url);

    let executor: Arc<dyn CommandExecutor> = Arc::new(ProcessExecutor::new());
    let reporter = StatusReporter::new(sink, hostname);

    let pipeline = Pipeline::new(config, executor, reporter);
    let outcome = pipeline.run().await;

    let elapsed = outcome.finished_at - outcome.started_at;
    info!(
        "Job finished as {} in {}s",
        outcome.status,
        elapsed.num_seconds()
    );
    if pipeline.reporter().delivery_failures() > 0 {
        info!(
            "{} status update(s) were not delivered",
            pipeline.reporter().delivery_failures()
        );
    }

    Ok(outcome.exit_code())
}
