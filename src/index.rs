//! Field name → detector id → [`LocationRecord`] mapping, one per [`FieldKind`].

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::{DetectorId, FieldKind, Generality, LocationRecord};
use crate::{FieldIndexError, Result};

type DetectorMap = BTreeMap<DetectorId, LocationRecord>;
type FieldMap = BTreeMap<String, DetectorMap>;

/// Location index for every field seen in the scanned data and filter files.
///
/// Entries are only ever added; `collection`/`record` of an existing entry never
/// change, which keeps every reachable record consistent across files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileIndex {
    data: FieldMap,
    filter: FieldMap,
    data_files: Vec<PathBuf>,
    filter_files: Vec<PathBuf>,
    #[serde(skip)]
    data_seen: HashSet<PathBuf>,
    #[serde(skip)]
    filter_seen: HashSet<PathBuf>,
}

impl FileIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fields(&self, kind: FieldKind) -> &FieldMap {
        match kind {
            FieldKind::Data => &self.data,
            FieldKind::Filter => &self.filter,
        }
    }

    fn fields_mut(&mut self, kind: FieldKind) -> &mut FieldMap {
        match kind {
            FieldKind::Data => &mut self.data,
            FieldKind::Filter => &mut self.filter,
        }
    }

    /// Location of `field` for `detector` within one namespace.
    pub fn lookup(
        &self,
        kind: FieldKind,
        field: &str,
        detector: DetectorId,
    ) -> Result<&LocationRecord> {
        let detectors = self
            .fields(kind)
            .get(field)
            .ok_or_else(|| FieldIndexError::NotFound {
                reason: format!("{field} is not a {kind} field in the scanned files"),
            })?;
        detectors
            .get(&detector)
            .ok_or_else(|| FieldIndexError::NotFound {
                reason: format!("detector {detector} has no data for {field}"),
            })
    }

    /// Like [`lookup`](Self::lookup) but searches data fields first, then filters.
    pub fn locate(&self, field: &str, detector: DetectorId) -> Result<(FieldKind, &LocationRecord)> {
        let kind = self.kind_of(field).ok_or_else(|| FieldIndexError::NotFound {
            reason: format!("{field} is not in data or filter files"),
        })?;
        self.lookup(kind, field, detector).map(|record| (kind, record))
    }

    pub(crate) fn entry(
        &self,
        kind: FieldKind,
        field: &str,
        detector: DetectorId,
    ) -> Option<&LocationRecord> {
        self.fields(kind).get(field)?.get(&detector)
    }

    /// Generality of `field` in the namespace it resolves to (data first).
    pub fn classify(&self, field: &str) -> Result<Generality> {
        let kind = self.kind_of(field).ok_or_else(|| FieldIndexError::NotFound {
            reason: format!("{field} is not in data or filter files"),
        })?;
        self.classify_in(kind, field)
    }

    /// A field is general iff its only detector key is the general id.
    pub fn classify_in(&self, kind: FieldKind, field: &str) -> Result<Generality> {
        let detectors = self
            .fields(kind)
            .get(field)
            .ok_or_else(|| FieldIndexError::NotFound {
                reason: format!("{field} is not a {kind} field in the scanned files"),
            })?;
        let general = detectors.len() == 1 && detectors.contains_key(&DetectorId::GENERAL);
        Ok(if general {
            Generality::General
        } else {
            Generality::DetectorSpecific
        })
    }

    /// Field names of one namespace, sorted.
    pub fn names_of(&self, kind: FieldKind) -> impl Iterator<Item = &str> + '_ {
        self.fields(kind).keys().map(String::as_str)
    }

    /// Namespace of `field`; data wins when a name exists in both.
    #[must_use]
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        if self.data.contains_key(field) {
            Some(FieldKind::Data)
        } else if self.filter.contains_key(field) {
            Some(FieldKind::Filter)
        } else {
            None
        }
    }

    pub fn detectors_of(&self, kind: FieldKind, field: &str) -> Result<Vec<DetectorId>> {
        self.fields(kind)
            .get(field)
            .map(|detectors| detectors.keys().copied().collect())
            .ok_or_else(|| FieldIndexError::NotFound {
                reason: format!("{field} is not a {kind} field in the scanned files"),
            })
    }

    /// Every detector-specific id present anywhere in the index.
    #[must_use]
    pub fn detector_ids(&self) -> BTreeSet<DetectorId> {
        self.data
            .values()
            .chain(self.filter.values())
            .flat_map(BTreeMap::keys)
            .copied()
            .filter(|detector| !detector.is_general())
            .collect()
    }

    #[must_use]
    pub fn scanned_files(&self, kind: FieldKind) -> &[PathBuf] {
        match kind {
            FieldKind::Data => &self.data_files,
            FieldKind::Filter => &self.filter_files,
        }
    }

    #[must_use]
    pub fn is_scanned(&self, kind: FieldKind, path: &Path) -> bool {
        match kind {
            FieldKind::Data => self.data_seen.contains(path),
            FieldKind::Filter => self.filter_seen.contains(path),
        }
    }

    pub(crate) fn mark_scanned(&mut self, kind: FieldKind, path: &Path) {
        let (files, seen) = match kind {
            FieldKind::Data => (&mut self.data_files, &mut self.data_seen),
            FieldKind::Filter => (&mut self.filter_files, &mut self.filter_seen),
        };
        if seen.insert(path.to_path_buf()) {
            files.push(path.to_path_buf());
        }
    }

    /// Record that `file` carries `field` for `detector` at `collection`/`record`.
    ///
    /// Returns whether a new entry was created. A location mismatch with an
    /// existing entry is rejected before anything is mutated.
    pub(crate) fn insert(
        &mut self,
        kind: FieldKind,
        field: &str,
        detector: DetectorId,
        collection: &str,
        record: &str,
        file: &Path,
    ) -> Result<bool> {
        if let Some(existing) = self.entry(kind, field, detector) {
            if !existing.matches(collection, record) {
                return Err(FieldIndexError::Conflict {
                    field: field.to_string(),
                    detector,
                    expected: existing.locator(),
                    found: format!("{collection}/{record}"),
                    path: file.to_path_buf(),
                });
            }
        }
        let detectors = self.fields_mut(kind).entry(field.to_string()).or_default();
        let mut created = false;
        let location = detectors.entry(detector).or_insert_with(|| {
            created = true;
            LocationRecord::new(collection, record)
        });
        location.push_file(file);
        Ok(created)
    }

    /// Number of distinct field names in one namespace.
    #[must_use]
    pub fn len(&self, kind: FieldKind) -> usize {
        self.fields(kind).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.filter.is_empty()
    }
}
