//! Container layout readers and the registry that routes files to them.
//!
//! Reading field values is owned by an external record-file library; the index
//! only needs the skeleton of each file (sub-collections, records, field names),
//! which readers expose as a [`ContainerLayout`].

mod catalog;
mod json;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use catalog::{CatalogReader, decode_catalog, encode_catalog, write_catalog};
pub use json::JsonLayoutReader;

use crate::constants::{MAGIC_PROBE_BYTES, MAX_LAYOUT_BYTES};
use crate::{FieldIndexError, Result};

/// Named record inside a sub-collection, listing its field names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordLayout {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl RecordLayout {
    #[must_use]
    pub fn new<N, I, F>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionLayout {
    pub name: String,
    #[serde(default)]
    pub records: Vec<RecordLayout>,
}

impl CollectionLayout {
    #[must_use]
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_record(mut self, record: RecordLayout) -> Self {
        self.records.push(record);
        self
    }
}

/// Skeleton of one container file, in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerLayout {
    #[serde(default)]
    pub collections: Vec<CollectionLayout>,
}

impl ContainerLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_collection(mut self, collection: CollectionLayout) -> Self {
        self.collections.push(collection);
        self
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.collections
            .iter()
            .flat_map(|collection| &collection.records)
            .map(|record| record.fields.len())
            .sum()
    }
}

/// Information handed to readers before they are asked to load a file.
#[derive(Debug, Clone)]
pub struct ReaderHint<'a> {
    pub path: &'a Path,
    pub magic_bytes: Option<&'a [u8]>,
}

impl<'a> ReaderHint<'a> {
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            magic_bytes: None,
        }
    }

    #[must_use]
    pub fn with_magic(mut self, magic: Option<&'a [u8]>) -> Self {
        self.magic_bytes = magic;
        self
    }

    /// Lower-cased file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Trait implemented by readers that can turn a file into a [`ContainerLayout`].
pub trait ContainerReader: Send + Sync {
    /// Human-readable name used for diagnostics.
    fn name(&self) -> &'static str;

    /// Return true if this reader can handle the file described by `hint`.
    fn supports(&self, hint: &ReaderHint<'_>) -> bool;

    /// Load the layout of the file at `path`.
    fn read_layout(&self, path: &Path) -> Result<ContainerLayout>;
}

/// Registry of layout readers, probed in registration order.
pub struct ReaderRegistry {
    readers: Vec<Box<dyn ContainerReader>>,
}

impl ReaderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    pub fn register<R>(&mut self, reader: R)
    where
        R: ContainerReader + 'static,
    {
        self.readers.push(Box::new(reader));
    }

    #[must_use]
    pub fn readers(&self) -> &[Box<dyn ContainerReader>] {
        &self.readers
    }

    pub fn find_reader<'a>(&'a self, hint: &ReaderHint<'_>) -> Option<&'a dyn ContainerReader> {
        self.readers
            .iter()
            .map(std::convert::AsRef::as_ref)
            .find(|reader| reader.supports(hint))
    }

    /// Check that `path` exists, pick a reader for it and load its layout.
    pub fn read_layout(&self, path: &Path) -> Result<ContainerLayout> {
        if !path.is_file() {
            return Err(FieldIndexError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let magic = probe_magic(path)?;
        let hint = ReaderHint::new(path).with_magic(Some(&magic));
        let Some(reader) = self.find_reader(&hint) else {
            return Err(FieldIndexError::Format {
                path: path.to_path_buf(),
                reason: "no registered reader recognises this file".to_string(),
            });
        };
        tracing::debug!(
            target: "fieldindex::scan",
            reader = reader.name(),
            path = %path.display(),
            "reading container layout"
        );
        reader.read_layout(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(CatalogReader);
        registry.register(JsonLayoutReader);
        registry
    }
}

fn probe_magic(path: &Path) -> Result<Vec<u8>> {
    let mut magic = Vec::with_capacity(MAGIC_PROBE_BYTES);
    let limit = u64::try_from(MAGIC_PROBE_BYTES).unwrap_or(u64::MAX);
    File::open(path)?
        .take(limit)
        .read_to_end(&mut magic)?;
    Ok(magic)
}

/// Read a whole layout file, refusing anything larger than [`MAX_LAYOUT_BYTES`].
pub(crate) fn read_bounded(path: &Path) -> Result<Vec<u8>> {
    let len = std::fs::metadata(path)?.len();
    if len > MAX_LAYOUT_BYTES {
        return Err(FieldIndexError::Format {
            path: path.to_path_buf(),
            reason: format!("layout is {len} bytes, limit is {MAX_LAYOUT_BYTES}"),
        });
    }
    Ok(std::fs::read(path)?)
}
