//! Ticket list (manifest) reading.
//!
//! A manifest is a comma-delimited text file with one `ticket,path` record
//! per line. Lines starting with `#` are comments. They are dropped before
//! any decoding or parsing, so a malformed comment never produces an error.
//!
//! ```text
//! # input tickets for job 42
//! 8f2c1a,/zone/home/alice/data/fileA
//! 91bd07,/zone/home/alice/data/fileB
//! ```

mod reader;
mod types;

pub use reader::{parse_record, read_manifest, ManifestReader, COMMENT_MARKER, DELIMITER};
pub use types::{base_name, TicketEntry};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be opened.
    #[error("could not open ticket list {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a line failed after the file was opened.
    #[error("could not read ticket list {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A non-comment record could not be parsed.
    #[error("malformed ticket list record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}
