//! Field handles bound by a front-end and the hand-off to the record reader.

use serde::Serialize;
use serde_json::Value;

use super::lifecycle::Session;
use super::resolve::{Diagnostic, Resolver};
use crate::types::{CallArg, DetectorId, FieldClass, FieldKind, Filter, LocationRecord};
use crate::{FieldIndexError, Result};

/// A field name bound to its call behaviour.
///
/// The class is captured when the handle is created; files scanned afterwards
/// do not change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldHandle {
    name: String,
    class: FieldClass,
}

impl FieldHandle {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn class(&self) -> FieldClass {
        self.class
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.class.kind()
    }
}

/// Everything a record reader needs to fetch one field's values.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    pub field: String,
    pub kind: FieldKind,
    pub detector: DetectorId,
    pub location: LocationRecord,
    pub filter: Option<Filter>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decodes field values from the files of a [`FieldAccess`]. Implemented by the
/// external record-file library.
pub trait RecordReader {
    fn read(&self, access: &FieldAccess) -> Result<Vec<Value>>;
}

impl Session {
    /// Bind `name` (data namespace first, then filters).
    pub fn field(&self, name: &str) -> Result<FieldHandle> {
        let kind = self
            .index()
            .kind_of(name)
            .ok_or_else(|| FieldIndexError::NotFound {
                reason: format!("{name} is not loaded into the current session"),
            })?;
        self.field_in(kind, name)
    }

    /// Bind `name` within one namespace.
    pub fn field_in(&self, kind: FieldKind, name: &str) -> Result<FieldHandle> {
        let generality = self.index().classify_in(kind, name)?;
        Ok(FieldHandle {
            name: name.to_string(),
            class: FieldClass::from_parts(generality, kind),
        })
    }

    /// One handle per indexed name, data fields first.
    pub fn fields(&self) -> Result<Vec<FieldHandle>> {
        let mut handles = Vec::with_capacity(
            self.index().len(FieldKind::Data) + self.index().len(FieldKind::Filter),
        );
        for kind in [FieldKind::Data, FieldKind::Filter] {
            for name in self.index().names_of(kind) {
                handles.push(self.field_in(kind, name)?);
            }
        }
        Ok(handles)
    }

    /// Resolve `args` for `handle` and look up the matching location.
    pub fn access(&mut self, handle: &FieldHandle, args: Vec<CallArg>) -> Result<FieldAccess> {
        let resolved = Resolver::new(self.state_mut()).resolve(handle.name(), handle.class(), args)?;
        let detector = resolved.detector.unwrap_or(DetectorId::GENERAL);
        let location = self
            .index()
            .lookup(handle.kind(), handle.name(), detector)?
            .clone();
        Ok(FieldAccess {
            field: resolved.field,
            kind: handle.kind(),
            detector,
            location,
            filter: resolved.filter,
            diagnostics: resolved.diagnostics,
        })
    }

    /// [`access`](Self::access) followed by a read through `reader`.
    pub fn read<R>(&mut self, handle: &FieldHandle, args: Vec<CallArg>, reader: &R) -> Result<Vec<Value>>
    where
        R: RecordReader + ?Sized,
    {
        let access = self.access(handle, args)?;
        reader.read(&access)
    }
}
