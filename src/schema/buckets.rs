//! Histogram bucket layouts for distribution metrics.
//!
//! A layout deterministically maps the real line onto a finite ordered set
//! of buckets. Bucket 0 is always the underflow bucket (unbounded below)
//! and the last bucket is always the overflow bucket (unbounded above).
//! Boundaries are inclusive-lower, exclusive-upper: a value equal to a
//! finite boundary belongs to the bucket whose lower bound it is.

use crate::core::error::{MetrikitError, Result};
use serde::{Deserialize, Serialize};

/// Bucket layout for a distribution-kind metric.
///
/// Layouts are immutable after construction and safe to share across
/// concurrent callers. Parameter violations are rejected at construction
/// (or [`validate`](Self::validate) for deserialized layouts), never at
/// classification time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketLayout {
    /// A sequence of `count` equally sized buckets, plus underflow and
    /// overflow. Bucket `i` has upper bound `offset + width * i` for
    /// `0 <= i < count + 1`.
    Linear {
        /// Number of finite-width buckets. Must be greater than 0.
        count: u32,
        /// Size of each finite bucket. Must be finite and greater than 0.
        width: f64,
        /// Lower bound of the first finite bucket.
        offset: f64,
    },
    /// A sequence of `count` buckets whose width grows with the lower
    /// bound, plus underflow and overflow. Bucket `i` has upper bound
    /// `scale * growth_factor^i` for `0 <= i < count + 1`.
    Exponential {
        /// Number of finite-width buckets. Must be greater than 0.
        count: u32,
        /// Rate of increase in bucket size. Must be greater than 1.
        growth_factor: f64,
        /// Relative size of the buckets. Must be greater than 0.
        scale: f64,
    },
    /// Buckets with arbitrary widths. With `n` bounds there are `n + 1`
    /// buckets; a single bound yields only underflow and overflow sharing
    /// that boundary.
    Explicit {
        /// Finite, strictly increasing bucket boundaries. Must hold at
        /// least one element.
        bounds: Vec<f64>,
    },
}

impl BucketLayout {
    /// Creates a validated linear layout.
    pub fn linear(count: u32, width: f64, offset: f64) -> Result<Self> {
        let layout = BucketLayout::Linear {
            count,
            width,
            offset,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Creates a validated exponential layout.
    pub fn exponential(count: u32, growth_factor: f64, scale: f64) -> Result<Self> {
        let layout = BucketLayout::Exponential {
            count,
            growth_factor,
            scale,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Creates a validated explicit layout.
    pub fn explicit(bounds: Vec<f64>) -> Result<Self> {
        let layout = BucketLayout::Explicit { bounds };
        layout.validate()?;
        Ok(layout)
    }

    /// Checks the layout parameters against their constraints.
    ///
    /// Deserialized layouts bypass the checked constructors, so schema
    /// loading calls this before a layout is ever used.
    pub fn validate(&self) -> Result<()> {
        match self {
            BucketLayout::Linear {
                count,
                width,
                offset,
            } => {
                if *count == 0 {
                    return Err(MetrikitError::bucket_config(
                        "linear bucket count must be greater than 0",
                    ));
                }
                if !width.is_finite() || *width <= 0.0 {
                    return Err(MetrikitError::bucket_config(format!(
                        "linear bucket width must be finite and greater than 0, got {}",
                        width
                    )));
                }
                if !offset.is_finite() {
                    return Err(MetrikitError::bucket_config(format!(
                        "linear bucket offset must be finite, got {}",
                        offset
                    )));
                }
            },
            BucketLayout::Exponential {
                count,
                growth_factor,
                scale,
            } => {
                if *count == 0 {
                    return Err(MetrikitError::bucket_config(
                        "exponential bucket count must be greater than 0",
                    ));
                }
                if !growth_factor.is_finite() || *growth_factor <= 1.0 {
                    return Err(MetrikitError::bucket_config(format!(
                        "exponential growth factor must be finite and greater than 1, got {}",
                        growth_factor
                    )));
                }
                if !scale.is_finite() || *scale <= 0.0 {
                    return Err(MetrikitError::bucket_config(format!(
                        "exponential scale must be finite and greater than 0, got {}",
                        scale
                    )));
                }
            },
            BucketLayout::Explicit { bounds } => {
                if bounds.is_empty() {
                    return Err(MetrikitError::bucket_config(
                        "explicit buckets require at least one bound",
                    ));
                }
                for (i, bound) in bounds.iter().enumerate() {
                    if !bound.is_finite() {
                        return Err(MetrikitError::bucket_config(format!(
                            "explicit bucket bound at index {} must be finite, got {}",
                            i, bound
                        )));
                    }
                    if i > 0 && *bound <= bounds[i - 1] {
                        return Err(MetrikitError::bucket_config(format!(
                            "explicit bucket bounds must be strictly increasing, \
                             bound {} at index {} does not exceed {}",
                            bound,
                            i,
                            bounds[i - 1]
                        )));
                    }
                }
            },
        }
        Ok(())
    }

    /// Derives the ordered sequence of finite boundaries.
    pub fn finite_bounds(&self) -> Vec<f64> {
        match self {
            BucketLayout::Linear {
                count,
                width,
                offset,
            } => (0..=*count).map(|i| offset + width * f64::from(i)).collect(),
            BucketLayout::Exponential {
                count,
                growth_factor,
                scale,
            } => {
                // powi keeps the sequence exactly reproducible for a given
                // (growth_factor, scale) pair.
                (0..=*count)
                    .map(|i| scale * growth_factor.powi(i as i32))
                    .collect()
            },
            BucketLayout::Explicit { bounds } => bounds.clone(),
        }
    }

    /// Derives the reusable boundary object for this layout.
    pub fn boundaries(&self) -> BucketBounds {
        BucketBounds {
            bounds: self.finite_bounds(),
        }
    }

    /// Total number of buckets, underflow and overflow included.
    pub fn bucket_count(&self) -> usize {
        match self {
            BucketLayout::Linear { count, .. } | BucketLayout::Exponential { count, .. } => {
                *count as usize + 2
            },
            BucketLayout::Explicit { bounds } => bounds.len() + 1,
        }
    }

    /// Classifies a value into its bucket index.
    ///
    /// Callers classifying many values should derive
    /// [`boundaries`](Self::boundaries) once and reuse it.
    pub fn bucket_index(&self, value: f64) -> usize {
        self.boundaries().bucket_index(value)
    }
}

/// The ordered boundary sequence derived from a [`BucketLayout`].
///
/// With `n` finite boundaries there are `n + 1` buckets: bucket `i` spans
/// `[bounds[i-1], bounds[i])`, with bucket 0 unbounded below and bucket
/// `n` unbounded above.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketBounds {
    bounds: Vec<f64>,
}

impl BucketBounds {
    /// Total number of buckets, underflow and overflow included.
    pub fn bucket_count(&self) -> usize {
        self.bounds.len() + 1
    }

    /// The finite boundaries in ascending order.
    pub fn as_slice(&self) -> &[f64] {
        &self.bounds
    }

    /// Upper bound of `bucket`. The last bucket is unbounded above and
    /// reports `f64::INFINITY`.
    pub fn upper_bound(&self, bucket: usize) -> f64 {
        if bucket < self.bounds.len() {
            self.bounds[bucket]
        } else {
            f64::INFINITY
        }
    }

    /// Lower bound of `bucket`. Bucket 0 is unbounded below and reports
    /// `f64::NEG_INFINITY`.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= bucket_count()`.
    pub fn lower_bound(&self, bucket: usize) -> f64 {
        if bucket == 0 {
            f64::NEG_INFINITY
        } else {
            assert!(bucket < self.bucket_count(), "bucket index out of range");
            self.bounds[bucket - 1]
        }
    }

    /// Returns the smallest bucket index `i` such that
    /// `value < upper_bound(i)`.
    ///
    /// Boundaries are inclusive-lower: a value exactly equal to
    /// `bounds[k]` lands in bucket `k + 1`. `NaN` compares below every
    /// boundary and classifies into the underflow bucket.
    pub fn bucket_index(&self, value: f64) -> usize {
        self.bounds.partition_point(|bound| *bound <= value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linear_bounds() {
        let layout = BucketLayout::linear(3, 10.0, 5.0).unwrap();
        assert_eq!(layout.bucket_count(), 5);
        assert_eq!(layout.finite_bounds(), vec![5.0, 15.0, 25.0, 35.0]);

        let bounds = layout.boundaries();
        assert_eq!(bounds.upper_bound(0), 5.0);
        assert_eq!(bounds.upper_bound(3), 35.0);
        assert_eq!(bounds.upper_bound(4), f64::INFINITY);
        assert_eq!(bounds.lower_bound(0), f64::NEG_INFINITY);
        assert_eq!(bounds.lower_bound(1), 5.0);
        assert_eq!(bounds.lower_bound(4), 35.0);
    }

    #[test]
    fn test_linear_bounds_non_decreasing() {
        let layout = BucketLayout::linear(16, 0.25, -2.0).unwrap();
        let bounds = layout.finite_bounds();
        assert_eq!(bounds.len(), 17);
        for pair in bounds.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(bounds[0], -2.0);
        assert_eq!(bounds[16], -2.0 + 0.25 * 16.0);
    }

    #[test]
    fn test_exponential_bounds() {
        let layout = BucketLayout::exponential(4, 2.0, 3.0).unwrap();
        assert_eq!(layout.bucket_count(), 6);
        assert_eq!(layout.finite_bounds(), vec![3.0, 6.0, 12.0, 24.0, 48.0]);

        // GrowthFactor > 1 makes the sequence strictly increasing.
        let bounds = layout.finite_bounds();
        for pair in bounds.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_exponential_classification() {
        let layout = BucketLayout::exponential(3, 10.0, 1.0).unwrap();
        // Bounds: 1, 10, 100, 1000.
        assert_eq!(layout.bucket_index(0.5), 0);
        assert_eq!(layout.bucket_index(1.0), 1);
        assert_eq!(layout.bucket_index(99.9), 2);
        assert_eq!(layout.bucket_index(100.0), 3);
        assert_eq!(layout.bucket_index(5000.0), 4);
    }

    #[test]
    fn test_explicit_classification_inclusive_lower() {
        let layout = BucketLayout::explicit(vec![1.0, 2.5, 7.0]).unwrap();
        assert_eq!(layout.bucket_count(), 4);

        let bounds = layout.boundaries();
        // A value exactly on bounds[k] belongs to bucket k + 1.
        assert_eq!(bounds.bucket_index(1.0), 1);
        assert_eq!(bounds.bucket_index(2.5), 2);
        assert_eq!(bounds.bucket_index(7.0), 3);
        assert_eq!(bounds.bucket_index(0.0), 0);
        assert_eq!(bounds.bucket_index(3.0), 2);
    }

    #[test]
    fn test_explicit_single_bound() {
        let layout = BucketLayout::explicit(vec![10.0]).unwrap();
        // Only underflow and overflow, split at the single bound.
        assert_eq!(layout.bucket_count(), 2);
        assert_eq!(layout.bucket_index(5.0), 0);
        assert_eq!(layout.bucket_index(15.0), 1);
        assert_eq!(layout.bucket_index(10.0), 1);
    }

    #[test]
    fn test_nan_classifies_into_underflow() {
        let layout = BucketLayout::explicit(vec![0.0, 1.0]).unwrap();
        assert_eq!(layout.bucket_index(f64::NAN), 0);
    }

    #[test]
    fn test_invalid_linear() {
        assert!(BucketLayout::linear(0, 1.0, 0.0).is_err());
        assert!(BucketLayout::linear(5, 0.0, 0.0).is_err());
        assert!(BucketLayout::linear(5, -1.0, 0.0).is_err());
        assert!(BucketLayout::linear(5, f64::NAN, 0.0).is_err());
        assert!(BucketLayout::linear(5, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_invalid_exponential() {
        assert!(BucketLayout::exponential(0, 2.0, 1.0).is_err());
        assert!(BucketLayout::exponential(5, 1.0, 1.0).is_err());
        assert!(BucketLayout::exponential(5, 0.5, 1.0).is_err());
        assert!(BucketLayout::exponential(5, 2.0, 0.0).is_err());
        assert!(BucketLayout::exponential(5, 2.0, -3.0).is_err());
    }

    #[test]
    fn test_invalid_explicit() {
        assert!(BucketLayout::explicit(vec![]).is_err());
        assert!(BucketLayout::explicit(vec![1.0, 1.0]).is_err());
        assert!(BucketLayout::explicit(vec![2.0, 1.0]).is_err());
        assert!(BucketLayout::explicit(vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_layout_deserialization() {
        let yaml = "type: linear\ncount: 10\nwidth: 5.0\noffset: 0.0\n";
        let layout: BucketLayout = serde_yaml::from_str(yaml).unwrap();
        layout.validate().unwrap();
        assert_eq!(layout.bucket_count(), 12);

        // Deserialization itself does not validate; loading must.
        let bad = "type: explicit\nbounds: []\n";
        let layout: BucketLayout = serde_yaml::from_str(bad).unwrap();
        assert!(layout.validate().is_err());
    }
}
