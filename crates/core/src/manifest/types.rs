use serde::{Deserialize, Serialize};

/// A single manifest record: a capability ticket and the remote path it
/// authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEntry {
    /// Opaque capability token.
    pub ticket: String,
    /// Remote path (data object or collection).
    pub path: String,
}

impl TicketEntry {
    pub fn new(ticket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            ticket: ticket.into(),
            path: path.into(),
        }
    }

    /// Last component of the remote path, ignoring trailing slashes.
    ///
    /// This is the name the remote resource gets once fetched into the
    /// scratch directory. Returns `None` for paths like `/` or `""`.
    pub fn base_name(&self) -> Option<&str> {
        base_name(&self.path)
    }
}

/// Last component of a slash-separated remote path, ignoring trailing
/// slashes.
pub fn base_name(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}
