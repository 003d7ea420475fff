//! Argument resolution against last-used session state.
//!
//! Positional arguments are first normalized into a [`CallShape`] matching the
//! field's [`FieldClass`]; surplus arguments are dropped with a diagnostic. The
//! shape is then resolved against [`SessionState`], which it may update.

use serde::Serialize;

use super::state::SessionState;
use crate::types::{CallArg, DetectorId, FieldClass, Filter};
use crate::{FieldIndexError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// More arguments than the field accepts; the surplus was dropped.
    IgnoredArguments,
    /// The given detector id was invalid; the last-used detector was used instead.
    InvalidDetectorFallback,
    /// A single argument was not a valid detector id and was taken as a filter.
    AmbiguousArgument,
}

impl DiagnosticKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::IgnoredArguments => "ignored_arguments",
            Self::InvalidDetectorFallback => "invalid_detector_fallback",
            Self::AmbiguousArgument => "ambiguous_argument",
        }
    }
}

/// Non-fatal observation made while resolving a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub field: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Typed arguments of one call, one variant per [`FieldClass`].
#[derive(Debug, Clone, PartialEq)]
pub enum CallShape {
    GeneralFilter,
    DetectorFilter { detector: Option<CallArg> },
    GeneralData { filter: Option<Filter> },
    DetectorData {
        detector: Option<CallArg>,
        filter: Option<Filter>,
    },
}

impl CallShape {
    #[must_use]
    pub fn class(&self) -> FieldClass {
        match self {
            Self::GeneralFilter => FieldClass::GeneralFilter,
            Self::DetectorFilter { .. } => FieldClass::DetectorFilter,
            Self::GeneralData { .. } => FieldClass::GeneralData,
            Self::DetectorData { .. } => FieldClass::DetectorData,
        }
    }
}

/// Effective detector id and filter for one field access.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAccess {
    pub field: String,
    pub class: FieldClass,
    /// `None` for general fields.
    pub detector: Option<DetectorId>,
    /// `None` means no selection is applied.
    pub filter: Option<Filter>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves calls for one session, reading and updating its [`SessionState`].
pub struct Resolver<'s> {
    state: &'s mut SessionState,
}

impl<'s> Resolver<'s> {
    #[must_use]
    pub fn new(state: &'s mut SessionState) -> Self {
        Self { state }
    }

    /// Resolve a variadic call on `field`.
    pub fn resolve(
        &mut self,
        field: &str,
        class: FieldClass,
        args: Vec<CallArg>,
    ) -> Result<ResolvedAccess> {
        let mut diagnostics = Vec::new();
        let shape = self.normalize(field, class, args, &mut diagnostics);
        self.resolve_inner(field, class, shape, diagnostics)
    }

    /// Resolve an already-typed call. The shape must match `class`.
    pub fn resolve_shape(
        &mut self,
        field: &str,
        class: FieldClass,
        shape: CallShape,
    ) -> Result<ResolvedAccess> {
        if shape.class() != class {
            return Err(FieldIndexError::ArgumentShape {
                field: field.to_string(),
                reason: format!(
                    "{} arguments given to a {} field",
                    shape.class().label(),
                    class.label()
                ),
            });
        }
        self.resolve_inner(field, class, shape, Vec::new())
    }

    /// Map positional arguments onto the shape of `class`.
    pub fn normalize(
        &self,
        field: &str,
        class: FieldClass,
        args: Vec<CallArg>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> CallShape {
        let max = class.max_args();
        if args.len() > max {
            let message = match class {
                FieldClass::GeneralFilter => {
                    format!("{field} takes no arguments; ignoring {}", args.len())
                }
                FieldClass::DetectorFilter => format!(
                    "{field} takes at most one argument (detector id); ignoring {} more",
                    args.len() - max
                ),
                FieldClass::GeneralData => format!(
                    "{field} takes at most one argument (filter); ignoring {} more",
                    args.len() - max
                ),
                FieldClass::DetectorData => format!(
                    "{field} takes at most two arguments (detector id, filter); ignoring {} more",
                    args.len() - max
                ),
            };
            diagnose(diagnostics, field, DiagnosticKind::IgnoredArguments, message);
        }
        let mut args = args.into_iter().take(max);

        match class {
            FieldClass::GeneralFilter => CallShape::GeneralFilter,
            FieldClass::DetectorFilter => CallShape::DetectorFilter {
                detector: args.next(),
            },
            FieldClass::GeneralData => CallShape::GeneralData {
                filter: args.next().map(CallArg::into_filter),
            },
            FieldClass::DetectorData => match (args.next(), args.next()) {
                (Some(detector), Some(filter)) => CallShape::DetectorData {
                    detector: Some(detector),
                    filter: Some(filter.into_filter()),
                },
                (Some(single), None) if self.state.is_valid_detector(&single) => {
                    CallShape::DetectorData {
                        detector: Some(single),
                        filter: None,
                    }
                }
                (Some(single), None) => {
                    diagnose(
                        diagnostics,
                        field,
                        DiagnosticKind::AmbiguousArgument,
                        format!("{field}: {single} is not a valid detector id; using it as a filter"),
                    );
                    CallShape::DetectorData {
                        detector: None,
                        filter: Some(single.into_filter()),
                    }
                }
                _ => CallShape::DetectorData {
                    detector: None,
                    filter: None,
                },
            },
        }
    }

    fn resolve_inner(
        &mut self,
        field: &str,
        class: FieldClass,
        shape: CallShape,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<ResolvedAccess> {
        let (detector, filter) = match shape {
            CallShape::GeneralFilter => (None, None),
            CallShape::DetectorFilter { detector } => {
                let given = match detector {
                    Some(arg) => match self.state.set_last_detector(arg.clone()) {
                        Ok(detector) => Some(detector),
                        Err(err) => {
                            diagnose(
                                &mut diagnostics,
                                field,
                                DiagnosticKind::InvalidDetectorFallback,
                                format!("{field}: {err}; using last detector"),
                            );
                            None
                        }
                    },
                    None => None,
                };
                let detector = given.or(self.state.last_detector());
                (Some(require_detector(field, detector)?), None)
            }
            CallShape::GeneralData { filter } => {
                if let Some(filter) = filter {
                    self.state.set_last_filter(filter);
                }
                (None, self.state.last_filter().cloned())
            }
            CallShape::DetectorData { detector, filter } => {
                let given = detector
                    .map(|arg| self.state.validate_detector(&arg))
                    .transpose()?;
                if let Some(detector) = given {
                    self.state.set_last_detector(detector.get())?;
                }
                if let Some(filter) = filter {
                    self.state.set_last_filter(filter);
                }
                let detector = require_detector(field, self.state.last_detector())?;
                (Some(detector), self.state.last_filter().cloned())
            }
        };

        Ok(ResolvedAccess {
            field: field.to_string(),
            class,
            detector,
            filter,
            diagnostics,
        })
    }
}

fn require_detector(field: &str, detector: Option<DetectorId>) -> Result<DetectorId> {
    detector.ok_or_else(|| FieldIndexError::MissingDetector {
        field: field.to_string(),
    })
}

fn diagnose(diagnostics: &mut Vec<Diagnostic>, field: &str, kind: DiagnosticKind, message: String) {
    tracing::warn!(target: "fieldindex::resolve", field, kind = kind.label(), "{message}");
    diagnostics.push(Diagnostic {
        field: field.to_string(),
        kind,
        message,
    });
}
