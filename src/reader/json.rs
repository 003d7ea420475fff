use std::path::Path;

use super::{ContainerLayout, ContainerReader, ReaderHint, read_bounded};
use crate::{FieldIndexError, Result};

/// Reads layout manifests written as JSON
/// (`{"collections": [{"name": .., "records": [{"name": .., "fields": [..]}]}]}`).
pub struct JsonLayoutReader;

impl JsonLayoutReader {
    pub fn parse(bytes: &[u8], path: &Path) -> Result<ContainerLayout> {
        serde_json::from_slice(bytes).map_err(|err| FieldIndexError::Format {
            path: path.to_path_buf(),
            reason: format!("invalid json layout: {err}"),
        })
    }
}

impl ContainerReader for JsonLayoutReader {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supports(&self, hint: &ReaderHint<'_>) -> bool {
        hint.extension().as_deref() == Some("json")
            || hint.magic_bytes.is_some_and(|magic| {
                magic
                    .iter()
                    .find(|byte| !byte.is_ascii_whitespace())
                    .is_some_and(|byte| *byte == b'{')
            })
    }

    fn read_layout(&self, path: &Path) -> Result<ContainerLayout> {
        let bytes = read_bounded(path)?;
        Self::parse(&bytes, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_manifest_with_missing_optional_lists() {
        let raw = br#"{"collections": [{"name": "eventDir", "records": [{"name": "event"}]}]}"#;
        let layout = JsonLayoutReader::parse(raw, Path::new("a.json")).unwrap();
        assert_eq!(layout.collections[0].records[0].name, "event");
        assert!(layout.collections[0].records[0].fields.is_empty());
    }

    #[test]
    fn truncated_manifest_is_a_format_error() {
        let err = JsonLayoutReader::parse(br#"{"collections": ["#, Path::new("a.json")).unwrap_err();
        match err {
            FieldIndexError::Format { path, .. } => assert_eq!(path, PathBuf::from("a.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn supports_extension_or_brace_prefix() {
        let reader = JsonLayoutReader;
        assert!(reader.supports(&ReaderHint::new(Path::new("run.JSON"))));
        assert!(reader.supports(&ReaderHint::new(Path::new("run.lay")).with_magic(Some(b"  {\"c"))));
        assert!(!reader.supports(&ReaderHint::new(Path::new("run.lay")).with_magic(Some(b"FXC1"))));
    }
}
