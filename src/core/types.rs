use crate::core::error::{MetrikitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical metric name identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricName(String);

impl MetricName {
    /// Creates a new MetricName after validation
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            return Err(MetrikitError::definition("metric name cannot be empty"));
        }
        if name.len() > 255 {
            return Err(MetrikitError::definition(format!(
                "metric name cannot exceed 255 characters, got {}",
                name.len()
            )));
        }
        Ok(MetricName(name))
    }

    /// Returns the string representation of the metric name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the inner string value
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for MetricName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The closed set of dynamic scalar types a metric value or label value
/// may carry. Anything outside this set is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int64,
    /// 64-bit IEEE float
    Float64,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "boolean",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float64 => "float64",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_name_validation() {
        assert!(MetricName::new("request_count".to_string()).is_ok());
        assert!(MetricName::new("".to_string()).is_err());
        assert!(MetricName::new("a".repeat(256)).is_err());
    }

    #[test]
    fn test_metric_name_accessors() {
        let name = MetricName::new("request_count".to_string()).unwrap();
        assert_eq!(name.as_str(), "request_count");
        assert_eq!(name.to_string(), "request_count");
        assert_eq!(name.into_inner(), "request_count");
    }

    #[test]
    fn test_scalar_kind_display() {
        assert_eq!(ScalarKind::String.to_string(), "string");
        assert_eq!(ScalarKind::Bool.to_string(), "boolean");
        assert_eq!(ScalarKind::Int64.to_string(), "int64");
        assert_eq!(ScalarKind::Float64.to_string(), "float64");
    }
}
