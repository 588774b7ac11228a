use crate::core::types::ScalarKind;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetrikitError {
    #[error("invalid bucket configuration: {0}")]
    InvalidBucketConfig(String),

    #[error("metric value is not a {expected}")]
    TypeMismatch { expected: ScalarKind },

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("invalid metric definition: {0}")]
    InvalidDefinition(String),

    #[error("invalid metric value: {0}")]
    InvalidValue(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("record failed: {0}")]
    RecordFailure(String),

    #[error("recorded {recorded} of {total} values; {} failed", .failures.len())]
    PartialRecord {
        recorded: usize,
        total: usize,
        failures: Vec<ValueFailure>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for metrikit operations
pub type Result<T> = std::result::Result<T, MetrikitError>;

/// Per-value failure detail carried by [`MetrikitError::PartialRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFailure {
    /// Position of the failed value within the recorded batch.
    pub index: usize,
    /// Name of the metric the value referenced.
    pub metric: String,
    /// Why the value could not be recorded.
    pub reason: String,
}

impl fmt::Display for ValueFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.index, self.metric, self.reason)
    }
}

impl MetrikitError {
    /// Creates a new bucket configuration error
    pub fn bucket_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidBucketConfig(msg.into())
    }

    /// Creates a new definition error
    pub fn definition<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDefinition(msg.into())
    }

    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new record error
    pub fn record<S: Into<String>>(msg: S) -> Self {
        Self::RecordFailure(msg.into())
    }

    /// Creates a new unknown-metric error
    pub fn unknown_metric<S: Into<String>>(name: S) -> Self {
        Self::UnknownMetric(name.into())
    }

    /// Returns true if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::RecordFailure(_) | Self::PartialRecord { .. }
        )
    }

    /// Returns the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidBucketConfig(_) | Self::InvalidDefinition(_) | Self::InvalidValue(_) => {
                "validation"
            },
            Self::TypeMismatch { .. } => "type",
            Self::UnknownMetric(_) => "schema",
            Self::Config(_) => "config",
            Self::RecordFailure(_) | Self::PartialRecord { .. } => "record",
            Self::Io(_) => "io",
            Self::Yaml(_) | Self::Json(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MetrikitError::bucket_config("count must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid bucket configuration: count must be greater than 0"
        );
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = MetrikitError::TypeMismatch {
            expected: ScalarKind::Int64,
        };
        assert_eq!(err.to_string(), "metric value is not a int64");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_recoverability() {
        assert!(MetrikitError::record("backend unavailable").is_recoverable());
        assert!(!MetrikitError::config("bad schema file").is_recoverable());
        assert!(!MetrikitError::unknown_metric("request_count").is_recoverable());
    }

    #[test]
    fn test_partial_record_display() {
        let err = MetrikitError::PartialRecord {
            recorded: 2,
            total: 3,
            failures: vec![ValueFailure {
                index: 1,
                metric: "request_size".into(),
                reason: "unknown metric".into(),
            }],
        };
        assert_eq!(err.to_string(), "recorded 2 of 3 values; 1 failed");
        assert_eq!(err.category(), "record");
    }
}
