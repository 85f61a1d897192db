//! Rolling indicators over a price series.
//!
//! Indicators return one value per input point. Points without enough history
//! yield `None` rather than a NaN sentinel.

pub mod sma;

pub use sma::Sma;

use crate::domain::PriceSeries;

/// A single-series indicator computed over closing prices.
pub trait Indicator: Send + Sync {
    /// Stable identifier, e.g. `sma_50`.
    fn name(&self) -> &str;

    /// Number of leading points that cannot produce a value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for every point of `series`.
    fn compute(&self, series: &PriceSeries) -> Vec<Option<f64>>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
