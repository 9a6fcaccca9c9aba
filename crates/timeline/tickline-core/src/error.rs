//! Error types for the loading surface.
//!
//! The tick engine itself never fails: malformed frames resolve to defaults and inapplicable
//! playback calls are no-ops. Errors only come from parsing external descriptors.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimelineError {
    /// Descriptor could not be deserialized
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// A named value (direction, repeat mode, ...) was not recognized
    #[error("Invalid {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl TimelineError {
    pub fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "serialization",
            Self::InvalidValue { .. } => "validation",
        }
    }
}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            TimelineError::invalid("direction", "sideways").category(),
            "validation"
        );
        let parse: TimelineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(parse.category(), "serialization");
    }

    #[test]
    fn display_includes_field_and_value() {
        let err = TimelineError::invalid("direction", "sideways");
        assert_eq!(err.to_string(), "Invalid direction: sideways");
    }

    #[test]
    fn serializes() {
        let error = TimelineError::invalid("direction", "sideways");
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: TimelineError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
