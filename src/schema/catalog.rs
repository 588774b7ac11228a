//! The closed set of metric definitions an aspect instance supports.

use crate::core::error::{MetrikitError, Result};
use crate::core::types::MetricName;
use crate::schema::definition::MetricDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// Complete mapping from metric name to definition.
///
/// This is the schema handed to
/// [`MetricsBuilder::new_metrics_aspect`](crate::record::MetricsBuilder):
/// the full set of metrics the aspect will ever be asked to record.
/// Definitions are stored behind [`Arc`] so that many values can
/// reference one definition without owning it.
#[derive(Debug, Clone, Default)]
pub struct MetricSchema {
    metrics: HashMap<MetricName, Arc<MetricDefinition>>,
}

impl MetricSchema {
    /// Creates an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from a list of definitions.
    ///
    /// Every definition is validated; duplicate names are rejected.
    pub fn from_definitions(definitions: Vec<MetricDefinition>) -> Result<Self> {
        let mut schema = Self::new();
        for definition in definitions {
            schema.insert(definition)?;
        }
        Ok(schema)
    }

    /// Adds a definition, returning the shared handle.
    pub fn insert(&mut self, definition: MetricDefinition) -> Result<Arc<MetricDefinition>> {
        definition.validate()?;
        if self.metrics.contains_key(definition.name.as_str()) {
            return Err(MetrikitError::config(format!(
                "duplicate metric definition: {}",
                definition.name
            )));
        }
        let shared = Arc::new(definition);
        self.metrics.insert(shared.name.clone(), Arc::clone(&shared));
        Ok(shared)
    }

    /// Looks up a definition by name
    pub fn get(&self, name: &str) -> Option<Arc<MetricDefinition>> {
        self.metrics.get(name).cloned()
    }

    /// Returns true if a definition with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Number of definitions in the schema
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns true if the schema holds no definitions
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Iterates over the definitions
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MetricDefinition>> {
        self.metrics.values()
    }
}
