//! Best-effort status reporter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::traits::StatusSink;
use super::types::{JobStatus, StatusUpdate};

/// Sends lifecycle updates for one job.
///
/// Every update is first written to the local log, then delivered to the
/// sink. Delivery failures are logged and counted but never returned.
pub struct StatusReporter {
    sink: Arc<dyn StatusSink>,
    hostname: String,
    delivery_failures: AtomicUsize,
}

impl StatusReporter {
    pub fn new(sink: Arc<dyn StatusSink>, hostname: impl Into<String>) -> Self {
        Self {
            sink,
            hostname: hostname.into(),
            delivery_failures: AtomicUsize::new(0),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Number of updates the sink did not accept.
    pub fn delivery_failures(&self) -> usize {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    /// Logs and delivers one update.
    pub async fn send(&self, status: JobStatus, message: impl Into<String>) {
        let update = StatusUpdate {
            status,
            message: message.into(),
            hostname: self.hostname.clone(),
        };

        info!("{}: {}", update.status, update.message);

        if let Err(e) = self.sink.deliver(&update).await {
            self.delivery_failures.fetch_add(1, Ordering::Relaxed);
            warn!(
                "unable to send job status update: {} {}: {}",
                update.status, update.message, e
            );
        }
    }

    pub async fn running(&self, message: impl Into<String>) {
        self.send(JobStatus::Running, message).await;
    }

    pub async fn failed(&self, message: impl Into<String>) {
        self.send(JobStatus::Failed, message).await;
    }

    pub async fn completed(&self, message: impl Into<String>) {
        self.send(JobStatus::Completed, message).await;
    }
}
