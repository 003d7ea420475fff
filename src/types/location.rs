//! Detector ids, field classification and location records.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::GENERAL_DETECTOR_ID;

/// Integer identifier of a physical sub-device, or [`DetectorId::GENERAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectorId(u32);

impl DetectorId {
    /// Reserved id for detector-independent quantities.
    pub const GENERAL: Self = Self(GENERAL_DETECTOR_ID);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_general(self) -> bool {
        self.0 == GENERAL_DETECTOR_ID
    }
}

impl From<u32> for DetectorId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespace a field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Data,
    Filter,
}

impl FieldKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Filter => "filter",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generality {
    General,
    DetectorSpecific,
}

/// The four call behaviours a field can have, fixed when the field is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Takes no arguments.
    GeneralFilter,
    /// Takes an optional detector id.
    DetectorFilter,
    /// Takes an optional filter.
    GeneralData,
    /// Takes an optional detector id and an optional filter.
    DetectorData,
}

impl FieldClass {
    #[must_use]
    pub fn from_parts(generality: Generality, kind: FieldKind) -> Self {
        match (generality, kind) {
            (Generality::General, FieldKind::Filter) => Self::GeneralFilter,
            (Generality::DetectorSpecific, FieldKind::Filter) => Self::DetectorFilter,
            (Generality::General, FieldKind::Data) => Self::GeneralData,
            (Generality::DetectorSpecific, FieldKind::Data) => Self::DetectorData,
        }
    }

    #[must_use]
    pub fn generality(self) -> Generality {
        match self {
            Self::GeneralFilter | Self::GeneralData => Generality::General,
            Self::DetectorFilter | Self::DetectorData => Generality::DetectorSpecific,
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::GeneralFilter | Self::DetectorFilter => FieldKind::Filter,
            Self::GeneralData | Self::DetectorData => FieldKind::Data,
        }
    }

    /// Number of positional arguments the class accepts before truncation.
    #[must_use]
    pub fn max_args(self) -> usize {
        match self {
            Self::GeneralFilter => 0,
            Self::DetectorFilter | Self::GeneralData => 1,
            Self::DetectorData => 2,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::GeneralFilter => "general filter",
            Self::DetectorFilter => "detector filter",
            Self::GeneralData => "general data",
            Self::DetectorData => "detector data",
        }
    }
}

/// Files plus the sub-collection/record pair holding one field for one detector.
///
/// `collection` and `record` are fixed when the entry is created; every file
/// appended afterwards must carry the field at the same location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    files: Vec<PathBuf>,
    collection: String,
    record: String,
}

impl LocationRecord {
    pub(crate) fn new(collection: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            collection: collection.into(),
            record: record.into(),
        }
    }

    /// Files contributing values, in scan order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    #[must_use]
    pub fn matches(&self, collection: &str, record: &str) -> bool {
        self.collection == collection && self.record == record
    }

    /// `collection/record`, as reported in conflict errors.
    #[must_use]
    pub fn locator(&self) -> String {
        format!("{}/{}", self.collection, self.record)
    }

    #[must_use]
    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.iter().any(|file| file == path)
    }

    /// Append `path` unless it is already the last file. Returns whether it was appended.
    ///
    /// A file contributes each (field, detector) pair at most once per scan and is
    /// never scanned twice per kind, so only the tail can repeat.
    pub(crate) fn push_file(&mut self, path: &Path) -> bool {
        if self.files.last().is_some_and(|last| last == path) {
            return false;
        }
        self.files.push(path.to_path_buf());
        true
    }
}
