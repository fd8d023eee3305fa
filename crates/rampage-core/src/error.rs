//! Errors surfaced by configuration loading.
//!
//! The simulation itself never fails: missing collaborators and stale entities
//! degrade to a skipped step. Only tuning input from outside can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning field `{field}` {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TuningError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
