//! Public types exposed by the `fieldindex-core` crate.

pub mod location;
pub mod options;
pub mod value;

pub use location::{DetectorId, FieldClass, FieldKind, Generality, LocationRecord};
pub use options::{IndexConfig, IndexConfigBuilder};
pub use value::{CallArg, Filter};
