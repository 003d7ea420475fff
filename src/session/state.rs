use std::collections::BTreeSet;

use crate::types::{CallArg, DetectorId, Filter};
use crate::{FieldIndexError, Result};

/// Last-used detector id and filter, the implicit defaults for omitted arguments.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    valid_detectors: BTreeSet<DetectorId>,
    last_detector: Option<DetectorId>,
    last_filter: Option<Filter>,
}

impl SessionState {
    #[must_use]
    pub fn new(valid_detectors: BTreeSet<DetectorId>) -> Self {
        Self {
            valid_detectors,
            last_detector: None,
            last_filter: None,
        }
    }

    #[must_use]
    pub fn valid_detectors(&self) -> &BTreeSet<DetectorId> {
        &self.valid_detectors
    }

    /// Interpret `arg` as a detector id of the configured set.
    pub fn validate_detector(&self, arg: &CallArg) -> Result<DetectorId> {
        let Some(raw) = arg.as_integer() else {
            return Err(FieldIndexError::InvalidDetector {
                value: arg.to_string(),
                reason: "detector id must be an integer".to_string(),
            });
        };
        let detector = u32::try_from(raw)
            .ok()
            .map(DetectorId::new)
            .filter(|detector| self.valid_detectors.contains(detector));
        detector.ok_or_else(|| FieldIndexError::InvalidDetector {
            value: raw.to_string(),
            reason: "not in the configured detector set".to_string(),
        })
    }

    #[must_use]
    pub fn is_valid_detector(&self, arg: &CallArg) -> bool {
        self.validate_detector(arg).is_ok()
    }

    pub fn set_last_detector(&mut self, arg: impl Into<CallArg>) -> Result<DetectorId> {
        let detector = self.validate_detector(&arg.into())?;
        self.last_detector = Some(detector);
        tracing::trace!(target: "fieldindex::session", %detector, "last detector updated");
        Ok(detector)
    }

    #[must_use]
    pub fn last_detector(&self) -> Option<DetectorId> {
        self.last_detector
    }

    /// Filters are stored as given; validating them is up to the record reader.
    pub fn set_last_filter(&mut self, filter: impl Into<Filter>) {
        let filter = filter.into();
        tracing::trace!(target: "fieldindex::session", %filter, "last filter updated");
        self.last_filter = Some(filter);
    }

    #[must_use]
    pub fn last_filter(&self) -> Option<&Filter> {
        self.last_filter.as_ref()
    }

    pub fn reset(&mut self) {
        self.last_detector = None;
        self.last_filter = None;
    }
}
