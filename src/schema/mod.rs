//! Static metric schema: definitions, kinds, and bucket layouts.
//!
//! Everything in this module is immutable after construction and safe to
//! share read-only across concurrent callers.

pub mod buckets;
pub mod catalog;
pub mod definition;

// Re-export commonly used types
pub use buckets::{BucketBounds, BucketLayout};
pub use catalog::MetricSchema;
pub use definition::{DefinitionBuilder, MetricDefinition, MetricKind};
