//! Error types for the status module.

use thiserror::Error;

/// Errors delivering a status update. These never fail the pipeline.
#[derive(Debug, Error)]
pub enum StatusReportError {
    /// The HTTP client could not be built.
    #[error("status client setup failed: {0}")]
    ClientSetup(String),

    /// The sink could not be reached.
    #[error("status sink unreachable: {0}")]
    ConnectionFailed(String),

    /// The request timed out.
    #[error("status update timed out")]
    Timeout,

    /// The request failed for another reason.
    #[error("status request failed: {0}")]
    Request(String),

    /// The sink answered with a non-2xx status.
    #[error("status sink responded with HTTP {status}")]
    Rejected { status: u16 },
}
