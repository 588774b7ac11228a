//! Metrikit - backend-agnostic metric delivery contracts.
//!
//! Metrikit defines the data model and contracts a policy/telemetry
//! control plane uses to deliver metric observations to pluggable
//! backend adapters, including the deterministic histogram bucket
//! layouts that map a continuous value space onto a finite ordered set
//! of buckets.
//!
//! # Features
//!
//! - **Closed value model**: one observation is a definition reference,
//!   dimensional labels, a time window, and a tagged scalar payload with
//!   type-safe extraction
//! - **Deterministic bucketing**: linear, exponential, and explicit
//!   layouts with inclusive-lower, exclusive-upper boundaries
//! - **Pluggable adapters**: a small async recording contract the host
//!   composes at startup, with an in-memory reference implementation
//! - **Configuration-time validation**: schemas load from YAML or JSON
//!   and every invariant is checked before a value is ever recorded
//!
//! # Architecture
//!
//! - `core`: errors, validated identifiers, configuration loading
//! - `schema`: metric definitions, kinds, and bucket layouts
//! - `record`: the value model and the adapter contract
//!
//! # Example
//!
//! ```no_run
//! use metrikit::core::MetricName;
//! use metrikit::record::{AdapterConfig, AspectEnv, InMemoryBuilder, MetricsBuilder, Value};
//! use metrikit::schema::{MetricDefinition, MetricKind, MetricSchema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut schema = MetricSchema::new();
//!     let request_count = schema.insert(
//!         MetricDefinition::builder()
//!             .name(MetricName::new("request_count".to_string())?)
//!             .kind(MetricKind::Counter)
//!             .build()?,
//!     )?;
//!
//!     let aspect = InMemoryBuilder.new_metrics_aspect(
//!         &AspectEnv::new("memory"),
//!         &AdapterConfig::empty(),
//!         schema,
//!     )?;
//!
//!     let value = Value::builder()
//!         .definition(request_count)
//!         .metric_value(1i64)
//!         .build()?;
//!     aspect.record(&[value]).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod core;
pub mod record;
pub mod schema;

// Re-export core types for convenience
pub use crate::core::{MetrikitError, Result};
