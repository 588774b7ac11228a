//! The recording contract backend adapters implement.
//!
//! The host composes adapters at startup: it constructs an aspect through
//! a [`MetricsBuilder`] with the complete metric schema the instance will
//! ever record, then hands batches of values to
//! [`MetricsAspect::record`].

use crate::core::error::Result;
use crate::record::value::Value;
use crate::schema::MetricSchema;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Runtime environment handed to adapter builders.
///
/// Owned by the adapter-lifecycle collaborator and opaque to this core;
/// it carries the adapter instance name used to scope log output.
#[derive(Debug, Clone)]
pub struct AspectEnv {
    adapter: String,
}

impl AspectEnv {
    /// Creates an environment for the named adapter instance
    pub fn new<S: Into<String>>(adapter: S) -> Self {
        Self {
            adapter: adapter.into(),
        }
    }

    /// Name of the adapter instance
    pub fn adapter(&self) -> &str {
        &self.adapter
    }
}

/// Opaque adapter-specific configuration.
///
/// The control plane carries adapter settings as an uninterpreted
/// document; each adapter extracts its own typed view via
/// [`parse`](Self::parse).
#[derive(Debug, Clone)]
pub struct AdapterConfig(serde_yaml::Value);

impl Default for AdapterConfig {
    fn default() -> Self {
        Self(serde_yaml::Value::Null)
    }
}

impl AdapterConfig {
    /// Wraps an already-parsed configuration document
    pub fn new(value: serde_yaml::Value) -> Self {
        Self(value)
    }

    /// An empty configuration, for adapters that need none
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a configuration document from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(Self(serde_yaml::from_str(contents)?))
    }

    /// Extracts the adapter's typed view of the configuration
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_yaml::from_value(self.0.clone())?)
    }

    /// Returns true if no configuration was supplied
    pub fn is_empty(&self) -> bool {
        matches!(self.0, serde_yaml::Value::Null)
    }
}

/// Handles metric reporting towards one backend.
#[async_trait::async_trait]
pub trait MetricsAspect: Send + Sync {
    /// Records the given values with the backend.
    ///
    /// Each value's definition determines how it is encoded and routed;
    /// distribution values are classified through the definition's bucket
    /// layout. Recording a value whose definition name is absent from the
    /// configured schema is a usage error
    /// ([`UnknownMetric`](crate::MetrikitError::UnknownMetric)), never
    /// silently ignored.
    ///
    /// The contract does not mandate atomicity across the batch;
    /// implementations choose and document their partial-success policy.
    /// `record` may be called concurrently and must not corrupt
    /// adapter-internal state. Retried batches may double-count unless
    /// the backend deduplicates.
    async fn record(&self, values: &[Value]) -> Result<()>;

    /// Releases any resources held by the aspect. The default does
    /// nothing.
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting for concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Builds instances of the metrics aspect.
pub trait MetricsBuilder: Send + Sync {
    /// Returns a ready-to-use aspect for the given environment,
    /// adapter-specific configuration, and metric schema.
    ///
    /// `metrics` is the complete, closed set of definitions the instance
    /// will ever be asked to record.
    fn new_metrics_aspect(
        &self,
        env: &AspectEnv,
        config: &AdapterConfig,
        metrics: MetricSchema,
    ) -> Result<Arc<dyn MetricsAspect>>;
}
