//! Error type shared by the index builder, layout readers and argument resolver.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::DetectorId;

pub type Result<T> = std::result::Result<T, FieldIndexError>;

#[derive(Debug, Error)]
pub enum FieldIndexError {
    /// Unknown field, or a detector id with no entry for the field.
    #[error("not found: {reason}")]
    NotFound { reason: String },

    #[error("file {} does not exist", .path.display())]
    FileNotFound { path: PathBuf },

    /// File unreadable or not a valid container layout.
    #[error("invalid container {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    /// The same field/detector pair was found at two different locations.
    #[error(
        "{field} (detector {detector}) found at {found} in {} but indexed at {expected}",
        .path.display()
    )]
    Conflict {
        field: String,
        detector: DetectorId,
        expected: String,
        found: String,
        path: PathBuf,
    },

    #[error("invalid detector id {value}: {reason}")]
    InvalidDetector { value: String, reason: String },

    #[error("{field}: no detector given and none stored in session")]
    MissingDetector { field: String },

    /// Arguments do not fit the call shape of the field.
    #[error("{field}: {reason}")]
    ArgumentShape { field: String, reason: String },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("failed to encode layout catalog: {reason}")]
    Encode { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FieldIndexError {
    /// True for the errors a scan raises on inconsistent file layouts.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
