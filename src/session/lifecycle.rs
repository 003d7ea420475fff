//! Session construction and file ingestion.
//!
//! A `Session` owns the location index and the last-used state. It replaces
//! process-wide globals: every scan and every resolution goes through `&mut self`.

use std::path::Path;

use super::resolve::{ResolvedAccess, Resolver};
use super::state::SessionState;
use crate::index::FileIndex;
use crate::reader::{ContainerLayout, ReaderRegistry};
use crate::scan::{DetectorClassifier, FileScanner, ScanReport};
use crate::types::{CallArg, FieldKind, IndexConfig};
use crate::Result;

pub struct Session {
    config: IndexConfig,
    registry: ReaderRegistry,
    classifier: DetectorClassifier,
    index: FileIndex,
    state: SessionState,
}

impl Session {
    /// Create an empty session using the default layout readers.
    pub fn new(config: IndexConfig) -> Result<Self> {
        Self::with_registry(config, ReaderRegistry::default())
    }

    pub fn with_registry(config: IndexConfig, registry: ReaderRegistry) -> Result<Self> {
        config.validate()?;
        let classifier = DetectorClassifier::from_config(&config)?;
        let state = SessionState::new(config.valid_detectors.clone());
        tracing::debug!(
            target: "fieldindex::session",
            detectors = config.valid_detectors.len(),
            readers = registry.readers().len(),
            "session started"
        );
        Ok(Self {
            config,
            registry,
            classifier,
            index: FileIndex::new(),
            state,
        })
    }

    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[must_use]
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn add_data_files<I, P>(&mut self, paths: I) -> Result<Vec<ScanReport>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.add_files(FieldKind::Data, paths)
    }

    pub fn add_filter_files<I, P>(&mut self, paths: I) -> Result<Vec<ScanReport>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.add_files(FieldKind::Filter, paths)
    }

    /// Scan each path in order, stopping at the first failure.
    ///
    /// Files scanned before the failure stay indexed.
    pub fn add_files<I, P>(&mut self, kind: FieldKind, paths: I) -> Result<Vec<ScanReport>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(|path| self.scan(path.as_ref(), kind))
            .collect()
    }

    pub fn scan(&mut self, path: &Path, kind: FieldKind) -> Result<ScanReport> {
        FileScanner::new(&self.config, &self.classifier, &self.registry).scan(&mut self.index, path, kind)
    }

    /// Index a layout obtained outside the registry (e.g. from an external reader).
    pub fn scan_layout(
        &mut self,
        path: &Path,
        kind: FieldKind,
        layout: &ContainerLayout,
    ) -> Result<ScanReport> {
        FileScanner::new(&self.config, &self.classifier, &self.registry)
            .scan_layout(&mut self.index, path, kind, layout)
    }

    pub fn resolver(&mut self) -> Resolver<'_> {
        Resolver::new(&mut self.state)
    }

    /// Classify `field` from the index and resolve `args` for it.
    pub fn resolve(&mut self, field: &str, args: Vec<CallArg>) -> Result<ResolvedAccess> {
        let class = self.field(field)?.class();
        self.resolver().resolve(field, class, args)
    }
}
