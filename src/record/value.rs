//! The per-observation value model.
//!
//! A [`Value`] is synthesized by the policy engine from a metric
//! definition plus runtime attributes, handed to an adapter once via
//! [`MetricsAspect::record`](crate::record::MetricsAspect::record), and
//! not persisted by this layer.

use crate::core::error::{MetrikitError, Result};
use crate::core::types::ScalarKind;
use crate::schema::MetricDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Dynamically-typed scalar payload of a metric value or label value.
///
/// The set is closed: exactly these four types are recoverable, so a
/// value that every accessor rejects cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// UTF-8 string
    String(String),
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit IEEE float
    Float64(f64),
}

impl ScalarValue {
    /// The dynamic type of this scalar
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::String(_) => ScalarKind::String,
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::Int64(_) => ScalarKind::Int64,
            ScalarValue::Float64(_) => ScalarKind::Float64,
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

/// A single metric value generated per observation.
#[derive(Debug, Clone)]
pub struct Value {
    /// The definition describing this metric. Shared with the schema;
    /// many values reference one definition concurrently.
    pub definition: Arc<MetricDefinition>,
    /// Metadata about the metric value, generated from the runtime
    /// attributes of the report
    pub labels: HashMap<String, ScalarValue>,
    /// Beginning of the period for which the value is reported. For
    /// instantaneous metrics this records the relevant instant.
    pub start_time: SystemTime,
    /// End of the period for which the value is reported. Equal to
    /// `start_time` for instantaneous metrics.
    pub end_time: SystemTime,
    /// The value of this metric; access type-safely via
    /// [`as_str`](Self::as_str), [`as_bool`](Self::as_bool),
    /// [`as_int64`](Self::as_int64), [`as_float64`](Self::as_float64)
    pub metric_value: ScalarValue,
}

impl Value {
    /// Creates a new value builder
    pub fn builder() -> ValueBuilder {
        ValueBuilder::default()
    }

    /// Name of the metric this value belongs to
    pub fn metric_name(&self) -> &str {
        self.definition.name.as_str()
    }

    /// Returns the string payload, failing on any other dynamic type.
    /// No coercion is performed.
    pub fn as_str(&self) -> Result<&str> {
        match &self.metric_value {
            ScalarValue::String(value) => Ok(value),
            _ => Err(MetrikitError::TypeMismatch {
                expected: ScalarKind::String,
            }),
        }
    }

    /// Returns the boolean payload, failing on any other dynamic type
    pub fn as_bool(&self) -> Result<bool> {
        match self.metric_value {
            ScalarValue::Bool(value) => Ok(value),
            _ => Err(MetrikitError::TypeMismatch {
                expected: ScalarKind::Bool,
            }),
        }
    }

    /// Returns the int64 payload, failing on any other dynamic type.
    /// Floats are not narrowed.
    pub fn as_int64(&self) -> Result<i64> {
        match self.metric_value {
            ScalarValue::Int64(value) => Ok(value),
            _ => Err(MetrikitError::TypeMismatch {
                expected: ScalarKind::Int64,
            }),
        }
    }

    /// Returns the float64 payload, failing on any other dynamic type.
    /// Integers are not widened.
    pub fn as_float64(&self) -> Result<f64> {
        match self.metric_value {
            ScalarValue::Float64(value) => Ok(value),
            _ => Err(MetrikitError::TypeMismatch {
                expected: ScalarKind::Float64,
            }),
        }
    }

    /// Gets a label value by name
    pub fn label(&self, name: &str) -> Option<&ScalarValue> {
        self.labels.get(name)
    }

    /// Returns true if this value reports an instant rather than a period
    pub fn is_instantaneous(&self) -> bool {
        self.start_time == self.end_time
    }
}

/// Builder for creating [`Value`] instances
#[derive(Default)]
pub struct ValueBuilder {
    definition: Option<Arc<MetricDefinition>>,
    labels: HashMap<String, ScalarValue>,
    start_time: Option<SystemTime>,
    end_time: Option<SystemTime>,
    metric_value: Option<ScalarValue>,
}

impl ValueBuilder {
    pub fn definition(mut self, definition: Arc<MetricDefinition>) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn label<K: Into<String>, V: Into<ScalarValue>>(mut self, name: K, value: V) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    pub fn start_time(mut self, start_time: SystemTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: SystemTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn metric_value<V: Into<ScalarValue>>(mut self, value: V) -> Self {
        self.metric_value = Some(value.into());
        self
    }

    /// Builds the value. `start_time` defaults to now and `end_time` to
    /// `start_time`, making the value instantaneous by default.
    pub fn build(self) -> Result<Value> {
        let start_time = self.start_time.unwrap_or_else(SystemTime::now);
        let end_time = self.end_time.unwrap_or(start_time);
        if end_time < start_time {
            return Err(MetrikitError::InvalidValue(
                "end_time must not precede start_time".to_string(),
            ));
        }
        Ok(Value {
            definition: self
                .definition
                .ok_or_else(|| MetrikitError::InvalidValue("definition is required".to_string()))?,
            labels: self.labels,
            start_time,
            end_time,
            metric_value: self.metric_value.ok_or_else(|| {
                MetrikitError::InvalidValue("metric_value is required".to_string())
            })?,
        })
    }
}
