//! The reporting path: per-observation values and the adapter contract.

pub mod aspect;
pub mod memory;
pub mod value;

// Re-export commonly used types
pub use aspect::{AdapterConfig, AspectEnv, MetricsAspect, MetricsBuilder};
pub use memory::{DistributionSnapshot, InMemoryAspect, InMemoryBuilder, MemorySettings};
pub use value::{ScalarValue, Value, ValueBuilder};
