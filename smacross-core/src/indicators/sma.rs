//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! Lookback: period - 1 (first value at index period-1).

use super::Indicator;
use crate::domain::PriceSeries;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &PriceSeries) -> Vec<Option<f64>> {
        rolling_mean(&series.closes(), self.period)
    }
}

/// Trailing mean over `period` values using a running sum.
///
/// A window containing a non-finite value yields `None`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    let mut void_in_window = false;
    for &v in values.iter().take(period) {
        if !v.is_finite() {
            void_in_window = true;
        }
        sum += v;
    }

    if !void_in_window {
        result[period - 1] = Some(sum / period as f64);
    }

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];

        if void_in_window || !leaving.is_finite() || !entering.is_finite() {
            // Rescan: a non-finite value poisons the running sum.
            void_in_window = false;
            sum = 0.0;
            for &v in &values[(i + 1 - period)..=i] {
                if !v.is_finite() {
                    void_in_window = true;
                }
                sum += v;
            }
            if void_in_window {
                continue;
            }
        } else {
            sum = sum - leaving + entering;
        }

        result[i] = Some(sum / period as f64);
    }

    result
}
