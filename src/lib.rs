#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::cast_possible_truncation
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public APIs still carry docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Builders take owned values and return Self; must_use on every setter is noise.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::len_without_is_empty)]

//! Location index for multi-collection record files, plus last-used argument
//! resolution for interactive field access.
//!
//! Files are scanned into a [`FileIndex`] that maps every field name to the
//! detectors it exists for and, per detector, the files and the
//! sub-collection/record that hold it. A [`Session`] owns that index together
//! with the last detector id and filter a caller used, so repeated calls can
//! leave out arguments that did not change.

/// The fieldindex-core crate version (matches `Cargo.toml`).
pub const FIELDINDEX_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod error;
pub mod index;
pub mod reader;
pub mod scan;
pub mod session;
pub mod types;

pub use constants::*;
pub use error::{FieldIndexError, Result};
pub use index::FileIndex;
pub use reader::{
    CatalogReader, CollectionLayout, ContainerLayout, ContainerReader, JsonLayoutReader,
    ReaderHint, ReaderRegistry, RecordLayout, decode_catalog, encode_catalog, write_catalog,
};
pub use scan::{DetectorClassifier, FileScanner, ScanReport};
pub use session::{
    CallShape, Diagnostic, DiagnosticKind, FieldAccess, FieldHandle, RecordReader, ResolvedAccess,
    Resolver, Session, SessionState,
};
pub use types::{
    CallArg, DetectorId, FieldClass, FieldKind, Filter, Generality, IndexConfig,
    IndexConfigBuilder, LocationRecord,
};
