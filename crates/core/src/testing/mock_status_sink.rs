//! Mock status sink for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::status::{JobStatus, StatusReportError, StatusSink, StatusUpdate};

/// Mock implementation of the StatusSink trait.
///
/// Records every delivery attempt. Can be told to reject updates with an
/// HTTP status or to behave as if the sink were unreachable.
#[derive(Debug, Clone, Default)]
pub struct MockStatusSink {
    /// Every update handed to the sink, accepted or not.
    updates: Arc<RwLock<Vec<StatusUpdate>>>,
    /// If set, deliveries fail with this HTTP status.
    reject_status: Arc<RwLock<Option<u16>>>,
    /// If true, deliveries fail as a connection error.
    unreachable: Arc<RwLock<bool>>,
}

impl MockStatusSink {
    /// Create a new mock sink that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded updates.
    pub async fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.read().await.clone()
    }

    /// Get the statuses of all recorded updates.
    pub async fn statuses(&self) -> Vec<JobStatus> {
        self.updates
            .read()
            .await
            .iter()
            .map(|update| update.status)
            .collect()
    }

    /// Get the messages of all recorded updates.
    pub async fn messages(&self) -> Vec<String> {
        self.updates
            .read()
            .await
            .iter()
            .map(|update| update.message.clone())
            .collect()
    }

    /// Get the status of the last recorded update.
    pub async fn last_status(&self) -> Option<JobStatus> {
        self.updates.read().await.last().map(|update| update.status)
    }

    /// Reject deliveries with the given HTTP status, or accept with `None`.
    pub async fn set_reject_status(&self, status: Option<u16>) {
        *self.reject_status.write().await = status;
    }

    /// Fail deliveries as if the sink could not be reached.
    pub async fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.write().await = unreachable;
    }
}

#[async_trait]
impl StatusSink for MockStatusSink {
    fn name(&self) -> &str {
        "mock"
    }

    async fn deliver(&self, update: &StatusUpdate) -> Result<(), StatusReportError> {
        self.updates.write().await.push(update.clone());

        if *self.unreachable.read().await {
            return Err(StatusReportError::ConnectionFailed(
                "connection refused".to_string(),
            ));
        }
        if let Some(status) = *self.reject_status.read().await {
            return Err(StatusReportError::Rejected { status });
        }
        Ok(())
    }
}
