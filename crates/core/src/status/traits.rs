//! Trait definitions for the status module.

use async_trait::async_trait;

use super::error::StatusReportError;
use super::types::StatusUpdate;

/// One-way destination for status updates.
///
/// Implementations report delivery failures, but callers go through
/// [`super::StatusReporter`], which never lets them reach the pipeline.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Returns the name of this sink implementation.
    fn name(&self) -> &str;

    /// Delivers one update.
    async fn deliver(&self, update: &StatusUpdate) -> Result<(), StatusReportError>;
}
