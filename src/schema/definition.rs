//! Static metric schema shared by the reporting path and backend adapters.

use crate::core::error::{MetrikitError, Result};
use crate::core::types::{MetricName, ScalarKind};
use crate::schema::buckets::BucketLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The set of known metric kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Instantaneous (non-cumulative) measurements
    Gauge,
    /// Monotonically increasing cumulative values
    Counter,
    /// Individual samples, aggregated into buckets by a consumer; raw
    /// values are still reported un-aggregated by this layer
    Distribution,
}

impl MetricKind {
    /// Returns true for distribution metrics
    pub fn is_distribution(&self) -> bool {
        matches!(self, MetricKind::Distribution)
    }

    /// Returns true for kinds whose values accumulate over time
    pub fn is_cumulative(&self) -> bool {
        matches!(self, MetricKind::Counter)
    }
}

/// Basic description of a metric schema for which adapters will be sent
/// values at runtime.
///
/// Definitions are created at configuration-load time, immutable
/// afterwards, and referenced (not owned) by every value of the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Canonical name of the metric
    pub name: MetricName,
    /// Optional user-friendly name of the metric
    #[serde(default)]
    pub display_name: String,
    /// Optional user-friendly description of this metric
    #[serde(default)]
    pub description: String,
    /// Type information about the metric
    pub kind: MetricKind,
    /// Names and types of the dimensional data generated at runtime and
    /// passed along with metric values
    #[serde(default)]
    pub labels: HashMap<String, ScalarKind>,
    /// Bucket layout, present exactly when `kind` is
    /// [`MetricKind::Distribution`]
    #[serde(default)]
    pub buckets: Option<BucketLayout>,
}

impl MetricDefinition {
    /// Creates a new definition builder
    pub fn builder() -> DefinitionBuilder {
        DefinitionBuilder::default()
    }

    /// Checks the definition invariants.
    ///
    /// Deserialized definitions bypass the builder, so schema loading
    /// calls this before a definition is ever used.
    pub fn validate(&self) -> Result<()> {
        MetricName::new(self.name.as_str().to_string())?;
        match (&self.kind, &self.buckets) {
            (MetricKind::Distribution, Some(buckets)) => buckets.validate(),
            (MetricKind::Distribution, None) => Err(MetrikitError::definition(format!(
                "distribution metric '{}' requires a bucket layout",
                self.name
            ))),
            (_, Some(_)) => Err(MetrikitError::definition(format!(
                "metric '{}' is not a distribution and must not carry a bucket layout",
                self.name
            ))),
            (_, None) => Ok(()),
        }
    }

    /// Returns the declared type of a label, if the label exists
    pub fn label_kind(&self, label: &str) -> Option<ScalarKind> {
        self.labels.get(label).copied()
    }
}

/// Builder for creating [`MetricDefinition`] instances
#[derive(Default)]
pub struct DefinitionBuilder {
    name: Option<MetricName>,
    display_name: Option<String>,
    description: Option<String>,
    kind: Option<MetricKind>,
    labels: HashMap<String, ScalarKind>,
    buckets: Option<BucketLayout>,
}

impl DefinitionBuilder {
    pub fn name(mut self, name: MetricName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn display_name<S: Into<String>>(mut self, display_name: S) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(mut self, kind: MetricKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn label<K: Into<String>>(mut self, name: K, kind: ScalarKind) -> Self {
        self.labels.insert(name.into(), kind);
        self
    }

    pub fn buckets(mut self, buckets: BucketLayout) -> Self {
        self.buckets = Some(buckets);
        self
    }

    pub fn build(self) -> Result<MetricDefinition> {
        let definition = MetricDefinition {
            name: self
                .name
                .ok_or_else(|| MetrikitError::definition("name is required"))?,
            display_name: self.display_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            kind: self
                .kind
                .ok_or_else(|| MetrikitError::definition("kind is required"))?,
            labels: self.labels,
            buckets: self.buckets,
        };
        definition.validate()?;
        Ok(definition)
    }
}
