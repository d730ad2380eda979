//! Error types for directory resolution

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Account '{account}' not found")]
    AccountNotFound { account: String },

    #[error("No JSON metadata found for account '{account}'")]
    MetadataMissing { account: String },

    #[error("Failed to parse JSON metadata for account '{account}': {message}")]
    MetadataMalformed { account: String, message: String },

    #[error("No nodes array found in metadata for account '{account}'")]
    NodesFieldInvalid { account: String },

    #[error("Account store unavailable while fetching '{account}': {message}")]
    StoreUnavailable { account: String, message: String },
}

/// Discriminant of a [`DirectoryError`], for callers that branch on the
/// failure class without caring about the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryErrorKind {
    AccountNotFound,
    MetadataMissing,
    MetadataMalformed,
    NodesFieldInvalid,
    StoreUnavailable,
}

impl DirectoryError {
    pub fn kind(&self) -> DirectoryErrorKind {
        match self {
            DirectoryError::AccountNotFound { .. } => DirectoryErrorKind::AccountNotFound,
            DirectoryError::MetadataMissing { .. } => DirectoryErrorKind::MetadataMissing,
            DirectoryError::MetadataMalformed { .. } => DirectoryErrorKind::MetadataMalformed,
            DirectoryError::NodesFieldInvalid { .. } => DirectoryErrorKind::NodesFieldInvalid,
            DirectoryError::StoreUnavailable { .. } => DirectoryErrorKind::StoreUnavailable,
        }
    }

    /// Account the failed resolution was for.
    pub fn account(&self) -> &str {
        match self {
            DirectoryError::AccountNotFound { account }
            | DirectoryError::MetadataMissing { account }
            | DirectoryError::MetadataMalformed { account, .. }
            | DirectoryError::NodesFieldInvalid { account }
            | DirectoryError::StoreUnavailable { account, .. } => account,
        }
    }
}

impl DirectoryErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryErrorKind::AccountNotFound => "account_not_found",
            DirectoryErrorKind::MetadataMissing => "metadata_missing",
            DirectoryErrorKind::MetadataMalformed => "metadata_malformed",
            DirectoryErrorKind::NodesFieldInvalid => "nodes_field_invalid",
            DirectoryErrorKind::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for DirectoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
