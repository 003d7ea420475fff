//! File scanner: walks one container layout and merges it into a [`FileIndex`].
//!
//! A scan is staged: every placement of the file is checked against the index
//! (and against the file's own earlier placements) before anything is inserted,
//! so a conflicting file leaves the index exactly as it found it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::instrument;

use crate::index::FileIndex;
use crate::reader::{ContainerLayout, ReaderRegistry};
use crate::types::{DetectorId, FieldKind, IndexConfig};
use crate::{FieldIndexError, Result};

/// Maps record names to detector ids (`zip3` → base + 3, anything else → general).
#[derive(Debug, Clone)]
pub struct DetectorClassifier {
    pattern: Regex,
    base: u32,
}

impl DetectorClassifier {
    pub fn new(token: &str, base: u32) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?i){}(\d+)$", regex::escape(token))).map_err(
            |err| FieldIndexError::Config {
                reason: format!("invalid detector token {token:?}: {err}"),
            },
        )?;
        Ok(Self { pattern, base })
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        Self::new(&config.detector_token, config.detector_base)
    }

    #[must_use]
    pub fn classify(&self, record: &str) -> DetectorId {
        let Some(captures) = self.pattern.captures(record) else {
            return DetectorId::GENERAL;
        };
        let suffix = captures[1]
            .parse::<u32>()
            .ok()
            .and_then(|n| self.base.checked_add(n));
        match suffix {
            Some(raw) => DetectorId::new(raw),
            None => {
                tracing::warn!(
                    target: "fieldindex::scan",
                    record,
                    "detector suffix out of range; treating record as general"
                );
                DetectorId::GENERAL
            }
        }
    }
}

/// Outcome of one [`FileScanner::scan`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub path: PathBuf,
    pub kind: FieldKind,
    /// The file was already in the scanned list; nothing was read.
    pub already_scanned: bool,
    pub collections_skipped: usize,
    pub records: usize,
    pub fields_indexed: usize,
    pub double_fields_skipped: usize,
    pub entries_created: usize,
}

impl ScanReport {
    fn empty(path: &Path, kind: FieldKind) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            already_scanned: false,
            collections_skipped: 0,
            records: 0,
            fields_indexed: 0,
            double_fields_skipped: 0,
            entries_created: 0,
        }
    }
}

struct Placement<'l> {
    field: &'l str,
    detector: DetectorId,
    collection: &'l str,
    record: &'l str,
}

/// Borrowed view of everything a scan needs besides the index itself.
pub struct FileScanner<'a> {
    config: &'a IndexConfig,
    classifier: &'a DetectorClassifier,
    registry: &'a ReaderRegistry,
}

impl<'a> FileScanner<'a> {
    #[must_use]
    pub fn new(
        config: &'a IndexConfig,
        classifier: &'a DetectorClassifier,
        registry: &'a ReaderRegistry,
    ) -> Self {
        Self {
            config,
            classifier,
            registry,
        }
    }

    /// Read `path` through the registry and merge its layout into `index`.
    #[instrument(target = "fieldindex::scan", skip_all, fields(path = %path.display(), kind = %kind))]
    pub fn scan(&self, index: &mut FileIndex, path: &Path, kind: FieldKind) -> Result<ScanReport> {
        if index.is_scanned(kind, path) {
            tracing::debug!(target: "fieldindex::scan", "file already scanned; skipping");
            return Ok(ScanReport {
                already_scanned: true,
                ..ScanReport::empty(path, kind)
            });
        }
        let layout = self.registry.read_layout(path)?;
        self.scan_layout(index, path, kind, &layout)
    }

    /// Merge an already-loaded layout for `path` into `index`.
    pub fn scan_layout(
        &self,
        index: &mut FileIndex,
        path: &Path,
        kind: FieldKind,
        layout: &ContainerLayout,
    ) -> Result<ScanReport> {
        let mut report = ScanReport::empty(path, kind);
        if index.is_scanned(kind, path) {
            report.already_scanned = true;
            return Ok(report);
        }

        let staged = self.stage(index, path, kind, layout, &mut report)?;
        for placement in &staged {
            let created = index.insert(
                kind,
                placement.field,
                placement.detector,
                placement.collection,
                placement.record,
                path,
            )?;
            if created {
                report.entries_created += 1;
            }
        }
        report.fields_indexed = staged.len();
        index.mark_scanned(kind, path);

        tracing::info!(
            target: "fieldindex::scan",
            path = %path.display(),
            kind = kind.label(),
            records = report.records,
            fields = report.fields_indexed,
            created = report.entries_created,
            "indexed file"
        );
        Ok(report)
    }

    fn stage<'l>(
        &self,
        index: &FileIndex,
        path: &Path,
        kind: FieldKind,
        layout: &'l ContainerLayout,
        report: &mut ScanReport,
    ) -> Result<Vec<Placement<'l>>> {
        let skip = self.config.skip_collections(kind);
        let mut staged: Vec<Placement<'l>> = Vec::new();
        let mut seen: HashMap<(&'l str, DetectorId), usize> = HashMap::new();

        for collection in &layout.collections {
            if skip.contains(&collection.name) {
                report.collections_skipped += 1;
                tracing::debug!(
                    target: "fieldindex::scan",
                    collection = %collection.name,
                    "skipping collection"
                );
                continue;
            }
            let marker = self.config.canonical_marker.as_str();
            let canonical_collection = collection.name.contains(marker);

            for record in &collection.records {
                report.records += 1;
                let detector = self.classifier.classify(&record.name);
                let canonical = canonical_collection || record.name.contains(marker);

                for field in &record.fields {
                    if self.config.is_double_field(field) && !canonical {
                        report.double_fields_skipped += 1;
                        continue;
                    }
                    let placement = Placement {
                        field: field.as_str(),
                        detector,
                        collection: collection.name.as_str(),
                        record: record.name.as_str(),
                    };

                    if let Some(&slot) = seen.get(&(placement.field, detector)) {
                        let first = &staged[slot];
                        if first.collection != placement.collection || first.record != placement.record {
                            return Err(conflict(&placement, first.collection, first.record, path));
                        }
                        continue;
                    }
                    if let Some(existing) = index.entry(kind, placement.field, detector) {
                        if !existing.matches(placement.collection, placement.record) {
                            return Err(conflict(
                                &placement,
                                existing.collection(),
                                existing.record(),
                                path,
                            ));
                        }
                    }
                    seen.insert((placement.field, detector), staged.len());
                    staged.push(placement);
                }
            }
        }
        Ok(staged)
    }
}

fn conflict(placement: &Placement<'_>, collection: &str, record: &str, path: &Path) -> FieldIndexError {
    tracing::error!(
        target: "fieldindex::scan",
        field = placement.field,
        detector = %placement.detector,
        path = %path.display(),
        "inconsistent field location"
    );
    FieldIndexError::Conflict {
        field: placement.field.to_string(),
        detector: placement.detector,
        expected: format!("{collection}/{record}"),
        found: format!("{}/{}", placement.collection, placement.record),
        path: path.to_path_buf(),
    }
}
