//! Job status reporting.
//!
//! Status updates are best-effort telemetry. [`StatusReporter::send`] logs the
//! update locally, hands it to a [`StatusSink`], and swallows any delivery
//! failure after logging it. Nothing in the pipeline depends on an update
//! arriving.

mod error;
mod hostname;
mod http;
mod reporter;
mod traits;
mod types;

pub use error::StatusReportError;
pub use hostname::local_hostname;
pub use http::HttpStatusSink;
pub use reporter::StatusReporter;
pub use traits::StatusSink;
pub use types::{JobStatus, StatusUpdate};
