//! In-memory reference adapter.
//!
//! Accumulates recorded values per metric name: counters into running
//! sums, gauges into the last observed scalar, and distributions into
//! bucket counts classified through the definition's layout. Useful as a
//! test double and as the reference for the recording contract's
//! semantics.

use crate::core::error::{MetrikitError, Result, ValueFailure};
use crate::core::types::MetricName;
use crate::record::aspect::{AdapterConfig, AspectEnv, MetricsAspect, MetricsBuilder};
use crate::record::value::{ScalarValue, Value};
use crate::schema::{BucketBounds, MetricDefinition, MetricKind, MetricSchema};
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;

/// Settings for the in-memory adapter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// When true, a batch containing a value for an unknown metric is
    /// rejected as a whole before anything is applied. When false
    /// (default), unknown values are skipped and reported per value.
    pub strict: bool,
}

/// Builder for [`InMemoryAspect`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryBuilder;

impl MetricsBuilder for InMemoryBuilder {
    fn new_metrics_aspect(
        &self,
        env: &AspectEnv,
        config: &AdapterConfig,
        metrics: MetricSchema,
    ) -> Result<Arc<dyn MetricsAspect>> {
        let settings: MemorySettings = if config.is_empty() {
            MemorySettings::default()
        } else {
            config.parse()?
        };
        tracing::debug!(
            adapter = env.adapter(),
            metrics = metrics.len(),
            strict = settings.strict,
            "constructed in-memory metrics aspect"
        );
        Ok(Arc::new(InMemoryAspect {
            adapter: env.adapter().to_string(),
            settings,
            schema: metrics,
            state: DashMap::new(),
        }))
    }
}

/// Snapshot of the accumulated state of one distribution metric
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSnapshot {
    /// Number of samples recorded
    pub count: u64,
    /// Sum of all samples
    pub sum: f64,
    /// Per-bucket sample counts, underflow first and overflow last
    pub bucket_counts: Vec<u64>,
}

#[derive(Debug)]
enum Accumulation {
    Counter {
        int_sum: i64,
        float_sum: f64,
    },
    Gauge {
        last: Option<ScalarValue>,
    },
    Distribution {
        count: u64,
        sum: f64,
        bucket_counts: Vec<u64>,
        bounds: BucketBounds,
    },
}

impl Accumulation {
    fn for_definition(definition: &MetricDefinition) -> Result<Self> {
        match definition.kind {
            MetricKind::Counter => Ok(Accumulation::Counter {
                int_sum: 0,
                float_sum: 0.0,
            }),
            MetricKind::Gauge => Ok(Accumulation::Gauge { last: None }),
            MetricKind::Distribution => {
                let layout = definition.buckets.as_ref().ok_or_else(|| {
                    MetrikitError::definition(format!(
                        "distribution metric '{}' requires a bucket layout",
                        definition.name
                    ))
                })?;
                let bounds = layout.boundaries();
                Ok(Accumulation::Distribution {
                    count: 0,
                    sum: 0.0,
                    bucket_counts: vec![0; bounds.bucket_count()],
                    bounds,
                })
            },
        }
    }

    fn apply(&mut self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Accumulation::Counter { int_sum, float_sum } => match &value.metric_value {
                ScalarValue::Int64(v) => {
                    *int_sum += v;
                    Ok(())
                },
                ScalarValue::Float64(v) => {
                    *float_sum += v;
                    Ok(())
                },
                other => Err(format!(
                    "counter cannot accumulate a {} value",
                    other.kind()
                )),
            },
            Accumulation::Gauge { last } => {
                *last = Some(value.metric_value.clone());
                Ok(())
            },
            Accumulation::Distribution {
                count,
                sum,
                bucket_counts,
                bounds,
            } => {
                let sample = match &value.metric_value {
                    ScalarValue::Int64(v) => *v as f64,
                    ScalarValue::Float64(v) => *v,
                    other => {
                        return Err(format!(
                            "distribution cannot classify a {} value",
                            other.kind()
                        ))
                    },
                };
                *count += 1;
                *sum += sample;
                bucket_counts[bounds.bucket_index(sample)] += 1;
                Ok(())
            },
        }
    }
}

/// Metrics aspect that accumulates values in process memory.
///
/// Partial-success policy: by default every value in a batch is
/// attempted; values that cannot be recorded are skipped and reported
/// through [`MetrikitError::PartialRecord`] with per-value detail after
/// the rest have been applied. With [`MemorySettings::strict`], a batch
/// referencing an unknown metric is rejected whole before any value is
/// applied. `record` is safe for concurrent invocation.
pub struct InMemoryAspect {
    adapter: String,
    settings: MemorySettings,
    schema: MetricSchema,
    state: DashMap<MetricName, Accumulation>,
}

impl InMemoryAspect {
    /// Running integer sum of a counter metric
    pub fn counter_sum(&self, name: &str) -> Option<i64> {
        match self.state.get(name)?.value() {
            Accumulation::Counter { int_sum, .. } => Some(*int_sum),
            _ => None,
        }
    }

    /// Running float sum of a counter metric
    pub fn counter_float_sum(&self, name: &str) -> Option<f64> {
        match self.state.get(name)?.value() {
            Accumulation::Counter { float_sum, .. } => Some(*float_sum),
            _ => None,
        }
    }

    /// Last observed value of a gauge metric
    pub fn gauge(&self, name: &str) -> Option<ScalarValue> {
        match self.state.get(name)?.value() {
            Accumulation::Gauge { last } => last.clone(),
            _ => None,
        }
    }

    /// Snapshot of a distribution metric
    pub fn distribution(&self, name: &str) -> Option<DistributionSnapshot> {
        match self.state.get(name)?.value() {
            Accumulation::Distribution {
                count,
                sum,
                bucket_counts,
                ..
            } => Some(DistributionSnapshot {
                count: *count,
                sum: *sum,
                bucket_counts: bucket_counts.clone(),
            }),
            _ => None,
        }
    }

    fn record_one(&self, value: &Value) -> std::result::Result<(), String> {
        let name = value.metric_name();
        if !self.schema.contains(name) {
            return Err("unknown metric".to_string());
        }
        let definition = &value.definition;
        let mut entry = self
            .state
            .entry(definition.name.clone())
            .or_try_insert_with(|| {
                Accumulation::for_definition(definition).map_err(|e| e.to_string())
            })?;
        entry.value_mut().apply(value)
    }
}

#[async_trait::async_trait]
impl MetricsAspect for InMemoryAspect {
    async fn record(&self, values: &[Value]) -> Result<()> {
        if self.settings.strict {
            for value in values {
                let name = value.metric_name();
                if !self.schema.contains(name) {
                    tracing::warn!(
                        adapter = %self.adapter,
                        metric = name,
                        "rejecting batch for unknown metric"
                    );
                    return Err(MetrikitError::unknown_metric(name));
                }
            }
        }

        let mut failures = Vec::new();
        for (index, value) in values.iter().enumerate() {
            if let Err(reason) = self.record_one(value) {
                failures.push(ValueFailure {
                    index,
                    metric: value.metric_name().to_string(),
                    reason,
                });
            }
        }

        let total = values.len();
        let recorded = total - failures.len();
        tracing::debug!(
            adapter = %self.adapter,
            recorded,
            failed = failures.len(),
            "recorded metric batch"
        );
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MetrikitError::PartialRecord {
                recorded,
                total,
                failures,
            })
        }
    }

    async fn close(&self) -> Result<()> {
        tracing::debug!(adapter = %self.adapter, "closing in-memory metrics aspect");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BucketLayout;

    fn name(s: &str) -> MetricName {
        MetricName::new(s.to_string()).unwrap()
    }

    fn test_schema() -> MetricSchema {
        MetricSchema::from_definitions(vec![
            MetricDefinition::builder()
                .name(name("request_count"))
                .kind(MetricKind::Counter)
                .build()
                .unwrap(),
            MetricDefinition::builder()
                .name(name("queue_depth"))
                .kind(MetricKind::Gauge)
                .build()
                .unwrap(),
            MetricDefinition::builder()
                .name(name("request_latency"))
                .kind(MetricKind::Distribution)
                .buckets(BucketLayout::explicit(vec![10.0]).unwrap())
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    fn aspect(schema: &MetricSchema, config: AdapterConfig) -> Arc<dyn MetricsAspect> {
        InMemoryBuilder
            .new_metrics_aspect(&AspectEnv::new("memory"), &config, schema.clone())
            .unwrap()
    }

    fn counter_value(schema: &MetricSchema, amount: i64) -> Value {
        Value::builder()
            .definition(schema.get("request_count").unwrap())
            .metric_value(amount)
            .build()
            .unwrap()
    }

    fn downcast(aspect: &Arc<dyn MetricsAspect>) -> &InMemoryAspect {
        aspect
            .as_any()
            .downcast_ref::<InMemoryAspect>()
            .expect("builder returns an InMemoryAspect")
    }

    #[tokio::test]
    async fn test_counter_accumulation() {
        let schema = test_schema();
        let builder = InMemoryBuilder;
        let aspect = builder
            .new_metrics_aspect(&AspectEnv::new("memory"), &AdapterConfig::empty(), schema.clone())
            .unwrap();

        for _ in 0..3 {
            aspect.record(&[counter_value(&schema, 1)]).await.unwrap();
        }
        assert_eq!(downcast(&aspect).counter_sum("request_count"), Some(3));
    }

    #[tokio::test]
    async fn test_gauge_keeps_last_value() {
        let schema = test_schema();
        let aspect = aspect(&schema, AdapterConfig::empty());
        let definition = schema.get("queue_depth").unwrap();

        for depth in [4i64, 9, 2] {
            let value = Value::builder()
                .definition(Arc::clone(&definition))
                .metric_value(depth)
                .build()
                .unwrap();
            aspect.record(&[value]).await.unwrap();
        }
        assert_eq!(downcast(&aspect).gauge("queue_depth"), Some(ScalarValue::Int64(2)));
    }

    #[tokio::test]
    async fn test_distribution_classification() {
        let schema = test_schema();
        let aspect = aspect(&schema, AdapterConfig::empty());
        let definition = schema.get("request_latency").unwrap();

        for sample in [5.0f64, 15.0, 10.0] {
            let value = Value::builder()
                .definition(Arc::clone(&definition))
                .metric_value(sample)
                .build()
                .unwrap();
            aspect.record(&[value]).await.unwrap();
        }

        let snapshot = downcast(&aspect).distribution("request_latency").unwrap();
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.sum, 30.0);
        // 5.0 underflows; 15.0 overflows; 10.0 is inclusive-lower and
        // lands in the overflow bucket too.
        assert_eq!(snapshot.bucket_counts, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unknown_metric_partial_policy() {
        let schema = test_schema();
        let aspect = aspect(&schema, AdapterConfig::empty());

        let stray = Value::builder()
            .definition(Arc::new(
                MetricDefinition::builder()
                    .name(name("not_in_schema"))
                    .kind(MetricKind::Counter)
                    .build()
                    .unwrap(),
            ))
            .metric_value(1i64)
            .build()
            .unwrap();

        let batch = vec![counter_value(&schema, 1), stray, counter_value(&schema, 1)];
        let err = aspect.record(&batch).await.unwrap_err();
        match err {
            MetrikitError::PartialRecord {
                recorded,
                total,
                failures,
            } => {
                assert_eq!(recorded, 2);
                assert_eq!(total, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
                assert_eq!(failures[0].metric, "not_in_schema");
            },
            other => panic!("expected PartialRecord, got {other:?}"),
        }
        // The known values were still applied.
        assert_eq!(downcast(&aspect).counter_sum("request_count"), Some(2));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_whole_batch() {
        let schema = test_schema();
        let config = AdapterConfig::from_yaml_str("strict: true\n").unwrap();
        let aspect = aspect(&schema, config);

        let stray = Value::builder()
            .definition(Arc::new(
                MetricDefinition::builder()
                    .name(name("not_in_schema"))
                    .kind(MetricKind::Counter)
                    .build()
                    .unwrap(),
            ))
            .metric_value(1i64)
            .build()
            .unwrap();

        let batch = vec![counter_value(&schema, 1), stray];
        let err = aspect.record(&batch).await.unwrap_err();
        assert!(matches!(err, MetrikitError::UnknownMetric(_)));
        // Nothing was applied.
        assert_eq!(downcast(&aspect).counter_sum("request_count"), None);
    }

    #[tokio::test]
    async fn test_counter_rejects_string_payload() {
        let schema = test_schema();
        let aspect = aspect(&schema, AdapterConfig::empty());

        let bad = Value::builder()
            .definition(schema.get("request_count").unwrap())
            .metric_value("not a number")
            .build()
            .unwrap();

        let err = aspect.record(&[bad]).await.unwrap_err();
        match err {
            MetrikitError::PartialRecord { failures, .. } => {
                assert!(failures[0].reason.contains("counter cannot accumulate"));
            },
            other => panic!("expected PartialRecord, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let schema = test_schema();
        let aspect = aspect(&schema, AdapterConfig::empty());
        aspect.record(&[]).await.unwrap();
        aspect.close().await.unwrap();
    }
}
