//! Configuration loading for metric schemas.
//!
//! Definitions are created at configuration-load time and immutable
//! afterwards. This module reads them from YAML or JSON files, validates
//! them, and produces the closed [`MetricSchema`] handed to adapter
//! builders.

use crate::core::error::Result;
use crate::schema::{MetricDefinition, MetricSchema};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk description of a metric schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// The metric definitions the control plane will deliver values for
    #[serde(default)]
    pub metrics: Vec<MetricDefinition>,
}

impl SchemaConfig {
    /// Loads a schema configuration from a YAML or JSON file.
    ///
    /// The format is chosen by file extension; anything that is not
    /// `.json` is parsed as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: SchemaConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            _ => serde_yaml::from_str(&contents)?,
        };
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            metrics = config.metrics.len(),
            "loaded metric schema configuration"
        );
        Ok(config)
    }

    /// Validates every definition in the configuration
    pub fn validate(&self) -> Result<()> {
        for definition in &self.metrics {
            definition.validate()?;
        }
        Ok(())
    }

    /// Converts the configuration into the closed schema used at
    /// aspect-construction time. Duplicate metric names are rejected.
    pub fn into_schema(self) -> Result<MetricSchema> {
        MetricSchema::from_definitions(self.metrics)
    }
}
