//! Reporting host identity.

use tokio::process::Command;
use tracing::debug;

/// Best-effort name of the machine running the job.
///
/// Tries `$HOSTNAME`, then `/proc/sys/kernel/hostname`, then the `hostname`
/// command. Falls back to `"unknown"`.
pub async fn local_hostname() -> String {
    if let Some(name) = std::env::var("HOSTNAME").ok().and_then(non_empty) {
        return name;
    }

    if let Some(name) = tokio::fs::read_to_string("/proc/sys/kernel/hostname")
        .await
        .ok()
        .and_then(non_empty)
    {
        return name;
    }

    match Command::new("hostname").output().await {
        Ok(output) if output.status.success() => {
            if let Some(name) = non_empty(String::from_utf8_lossy(&output.stdout).into_owned()) {
                return name;
            }
        }
        Ok(output) => debug!("hostname exited with {}", output.status),
        Err(e) => debug!("hostname could not be run: {}", e),
    }

    "unknown".to_string()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn test_local_hostname_is_never_empty() {
        let name = local_hostname().await;
        assert!(!name.is_empty());
        assert_eq!(name, name.trim());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  worker-7\n".to_string()), Some("worker-7".to_string()));
        assert_eq!(non_empty(" \n".to_string()), None);
    }
}
