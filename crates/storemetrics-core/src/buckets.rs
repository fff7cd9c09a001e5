//! Histogram bucket bounds.
//!
//! Bounds are finite and strictly increasing. The `+Inf` bucket is implicit:
//! its cumulative count is always the histogram's total count.

use std::sync::Arc;

use crate::error::{MetricsError, Result};

/// Conventional client-library default bounds (seconds).
const DEFAULT_BOUNDS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Validated set of histogram upper bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets {
    bounds: Arc<[f64]>,
}

impl Buckets {
    /// Build from explicit bounds.
    pub fn new(bounds: Vec<f64>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(MetricsError::Configuration("buckets must not be empty".into()));
        }
        if let Some(b) = bounds.iter().find(|b| !b.is_finite()) {
            return Err(MetricsError::Configuration(format!(
                "bucket bound {b} is not finite (+Inf is implicit)"
            )));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MetricsError::Configuration(
                "bucket bounds must be strictly increasing".into(),
            ));
        }
        Ok(Self { bounds: bounds.into() })
    }

    /// `count` bounds starting at `start`, each `factor` times the previous.
    pub fn exponential(start: f64, factor: f64, count: usize) -> Result<Self> {
        if !start.is_finite() || start <= 0.0 || !factor.is_finite() || factor <= 1.0 || count == 0 {
            return Err(MetricsError::Configuration(format!(
                "exponential buckets need start > 0, factor > 1, count >= 1 (got {start}, {factor}, {count})"
            )));
        }
        let mut bounds = Vec::with_capacity(count);
        let mut next = start;
        for _ in 0..count {
            bounds.push(next);
            next *= factor;
        }
        Self::new(bounds)
    }

    /// `count` bounds starting at `start`, spaced `width` apart.
    pub fn linear(start: f64, width: f64, count: usize) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 || count == 0 {
            return Err(MetricsError::Configuration(format!(
                "linear buckets need width > 0, count >= 1 (got {width}, {count})"
            )));
        }
        Self::new((0..count).map(|i| start + width * i as f64).collect())
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl Default for Buckets {
    fn default() -> Self {
        Self { bounds: Arc::from(&DEFAULT_BOUNDS[..]) }
    }
}
