//! Binary layout catalog: `[magic: 4][version: u16 LE][bincode payload]`.

use std::path::Path;

use bincode::config::{self, Config};
use bincode::serde::{decode_from_slice, encode_to_vec};

use super::{ContainerLayout, ContainerReader, ReaderHint, read_bounded};
use crate::constants::{CATALOG_MAGIC, CATALOG_VERSION};
use crate::{FieldIndexError, Result};

const HEADER_SIZE: usize = CATALOG_MAGIC.len() + 2;

fn catalog_config() -> impl Config {
    config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

pub fn encode_catalog(layout: &ContainerLayout) -> Result<Vec<u8>> {
    let payload =
        encode_to_vec(layout, catalog_config()).map_err(|err| FieldIndexError::Encode {
            reason: err.to_string(),
        })?;
    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&CATALOG_MAGIC);
    bytes.extend_from_slice(&CATALOG_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode catalog bytes; `path` is only used for error context.
pub fn decode_catalog(bytes: &[u8], path: &Path) -> Result<ContainerLayout> {
    let format_err = |reason: String| FieldIndexError::Format {
        path: path.to_path_buf(),
        reason,
    };
    if bytes.len() < HEADER_SIZE || bytes[..CATALOG_MAGIC.len()] != CATALOG_MAGIC {
        return Err(format_err("missing catalog magic".to_string()));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != CATALOG_VERSION {
        return Err(format_err(format!(
            "unsupported catalog version {version} (expected {CATALOG_VERSION})"
        )));
    }
    let payload = &bytes[HEADER_SIZE..];
    let (layout, consumed) = decode_from_slice::<ContainerLayout, _>(payload, catalog_config())
        .map_err(|err| format_err(format!("corrupt catalog payload: {err}")))?;
    if consumed != payload.len() {
        return Err(format_err(format!(
            "{} trailing bytes after catalog payload",
            payload.len() - consumed
        )));
    }
    Ok(layout)
}

pub fn write_catalog(path: impl AsRef<Path>, layout: &ContainerLayout) -> Result<()> {
    let bytes = encode_catalog(layout)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub struct CatalogReader;

impl ContainerReader for CatalogReader {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn supports(&self, hint: &ReaderHint<'_>) -> bool {
        hint.magic_bytes
            .is_some_and(|magic| magic.starts_with(&CATALOG_MAGIC))
    }

    fn read_layout(&self, path: &Path) -> Result<ContainerLayout> {
        let bytes = read_bounded(path)?;
        decode_catalog(&bytes, path)
    }
}
