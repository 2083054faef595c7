//! Types for the transfer module.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::TransferError;

/// Which way data moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    /// Remote to scratch.
    In,
    /// Scratch to remote.
    Out,
}

/// One externally judged step of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStep {
    /// `iget` of an input.
    Fetch,
    /// `iput` of an output.
    Push,
    /// `ichmod own` on a pushed output.
    ChangeOwner,
    /// `ichmod null anonymous` on a pushed output.
    RevokeAnonymous,
}

impl TransferStep {
    pub fn direction(&self) -> TransferDirection {
        match self {
            Self::Fetch => TransferDirection::In,
            Self::Push | Self::ChangeOwner | Self::RevokeAnonymous => TransferDirection::Out,
        }
    }

    /// Verb phrase used in error messages.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Fetch => "download",
            Self::Push => "upload",
            Self::ChangeOwner => "change the owner of",
            Self::RevokeAnonymous => "remove anonymous permissions on",
        }
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Push => "push",
            Self::ChangeOwner => "change_owner",
            Self::RevokeAnonymous => "revoke_anonymous",
        };
        f.write_str(name)
    }
}

/// An input fetched into the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Base name, unique within a [`StagedFileSet`].
    pub name: String,
    /// Location inside the scratch directory.
    pub local_path: PathBuf,
    /// Remote path it was fetched from.
    pub remote_path: String,
}

/// Staged inputs keyed by base name, in download order.
#[derive(Debug, Clone, Default)]
pub struct StagedFileSet {
    files: Vec<StagedFile>,
    index: HashMap<String, usize>,
}

impl StagedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with [`TransferError::NameCollision`] if a file with the same
    /// base name was already staged.
    pub fn check_available(&self, name: &str, remote_path: &str) -> Result<(), TransferError> {
        match self.index.get(name) {
            Some(&i) => Err(TransferError::NameCollision {
                name: name.to_string(),
                first: self.files[i].remote_path.clone(),
                second: remote_path.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Adds a staged file, rejecting duplicate base names.
    pub fn insert(&mut self, file: StagedFile) -> Result<(), TransferError> {
        self.check_available(&file.name, &file.remote_path)?;
        self.index.insert(file.name.clone(), self.files.len());
        self.files.push(file);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StagedFile> {
        self.index.get(name).map(|&i| &self.files[i])
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedFile> {
        self.files.iter()
    }

    /// Base names in download order. These are what the work command gets.
    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    /// Local paths in download order.
    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.local_path.as_path()).collect()
    }
}

impl<'a> IntoIterator for &'a StagedFileSet {
    type Item = &'a StagedFile;
    type IntoIter = std::slice::Iter<'a, StagedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
