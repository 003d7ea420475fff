//! Core `Session` type: owns the location index and last-used state.

mod access;
pub mod lifecycle;
pub mod resolve;
mod state;

pub use access::{FieldAccess, FieldHandle, RecordReader};
pub use lifecycle::Session;
pub use resolve::{CallShape, Diagnostic, DiagnosticKind, ResolvedAccess, Resolver};
pub use state::SessionState;
