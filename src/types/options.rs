//! Static configuration a session is built with.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::location::{DetectorId, FieldKind};
use crate::constants::{
    DEFAULT_CANONICAL_MARKER, DEFAULT_DATA_SKIP_COLLECTIONS, DEFAULT_DETECTOR_BASE,
    DEFAULT_DETECTOR_TOKEN, DEFAULT_DOUBLE_FIELDS, DEFAULT_FILTER_SKIP_COLLECTIONS,
    DEFAULT_FIRST_DETECTOR, DEFAULT_LAST_DETECTOR, MAX_LAYOUT_BYTES,
};
use crate::error::{FieldIndexError, Result};

fn default_valid_detectors() -> BTreeSet<DetectorId> {
    (DEFAULT_FIRST_DETECTOR..=DEFAULT_LAST_DETECTOR)
        .map(DetectorId::new)
        .collect()
}

fn string_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Detector set, skip-lists and double-field rules used while scanning and resolving.
/// Every field has a default matching the standard file layout, so a JSON config
/// only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Detector ids accepted by the resolver. Must not contain the general id.
    pub valid_detectors: BTreeSet<DetectorId>,
    /// Added to the numeric suffix of per-detector record names.
    pub detector_base: u32,
    /// Case-insensitive token preceding the numeric suffix.
    pub detector_token: String,
    pub data_skip_collections: BTreeSet<String>,
    pub filter_skip_collections: BTreeSet<String>,
    /// Fields duplicated across sub-collections; only the canonical copy is indexed.
    pub double_fields: BTreeSet<String>,
    /// Substring identifying the canonical copy of a double field, matched
    /// against the sub-collection name and the record name.
    pub canonical_marker: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            valid_detectors: default_valid_detectors(),
            detector_base: DEFAULT_DETECTOR_BASE,
            detector_token: DEFAULT_DETECTOR_TOKEN.to_string(),
            data_skip_collections: string_set(DEFAULT_DATA_SKIP_COLLECTIONS),
            filter_skip_collections: string_set(DEFAULT_FILTER_SKIP_COLLECTIONS),
            double_fields: string_set(DEFAULT_DOUBLE_FIELDS),
            canonical_marker: DEFAULT_CANONICAL_MARKER.to_string(),
        }
    }
}

impl IndexConfig {
    /// Start a fluent builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|err| FieldIndexError::Config {
            reason: format!("failed to parse config: {err}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FieldIndexError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let len = std::fs::metadata(path)?.len();
        if len > MAX_LAYOUT_BYTES {
            return Err(FieldIndexError::Config {
                reason: format!("config file {} is {len} bytes", path.display()),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn skip_collections(&self, kind: FieldKind) -> &BTreeSet<String> {
        match kind {
            FieldKind::Data => &self.data_skip_collections,
            FieldKind::Filter => &self.filter_skip_collections,
        }
    }

    #[must_use]
    pub fn is_valid_detector(&self, detector: DetectorId) -> bool {
        self.valid_detectors.contains(&detector)
    }

    #[must_use]
    pub fn is_double_field(&self, field: &str) -> bool {
        self.double_fields.contains(field)
    }

    pub fn validate(&self) -> Result<()> {
        if self.valid_detectors.contains(&DetectorId::GENERAL) {
            return Err(FieldIndexError::Config {
                reason: format!(
                    "valid detector set must not contain the general id {}",
                    DetectorId::GENERAL
                ),
            });
        }
        if self.detector_token.trim().is_empty() {
            return Err(FieldIndexError::Config {
                reason: "detector token must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexConfigBuilder {
    inner: IndexConfig,
}

impl IndexConfigBuilder {
    /// Replace the valid detector set.
    pub fn valid_detectors<I>(mut self, detectors: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.inner.valid_detectors = detectors.into_iter().map(DetectorId::new).collect();
        self
    }

    #[must_use]
    pub fn detector_base(mut self, base: u32) -> Self {
        self.inner.detector_base = base;
        self
    }

    pub fn detector_token<S: Into<String>>(mut self, token: S) -> Self {
        self.inner.detector_token = token.into();
        self
    }

    pub fn skip_collection<S: Into<String>>(mut self, kind: FieldKind, name: S) -> Self {
        match kind {
            FieldKind::Data => self.inner.data_skip_collections.insert(name.into()),
            FieldKind::Filter => self.inner.filter_skip_collections.insert(name.into()),
        };
        self
    }

    pub fn double_field<S: Into<String>>(mut self, field: S) -> Self {
        self.inner.double_fields.insert(field.into());
        self
    }

    pub fn canonical_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.inner.canonical_marker = marker.into();
        self
    }

    pub fn build(self) -> Result<IndexConfig> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
