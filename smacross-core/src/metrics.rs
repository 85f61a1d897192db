//! Performance metrics: pure functions over returns and growth curves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Annualization factor for daily returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Standard deviations below this are treated as zero variance.
pub const MIN_STD_DEV: f64 = 1e-15;

/// Why a Sharpe ratio could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedMetric {
    #[error("fewer than two return samples ({samples})")]
    TooFewSamples { samples: usize },

    #[error("zero variance in strategy returns")]
    ZeroVariance,
}

/// Annualized Sharpe ratio, or the reason it does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpeRatio {
    Defined(f64),
    Undefined(UndefinedMetric),
}

impl SharpeRatio {
    pub fn value(&self) -> Option<f64> {
        match self {
            SharpeRatio::Defined(v) => Some(*v),
            SharpeRatio::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, SharpeRatio::Defined(_))
    }
}

/// Summary statistics for one backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Final strategy growth minus one.
    pub total_return: f64,
    /// Final buy-and-hold growth minus one.
    pub buy_and_hold_return: f64,
    pub sharpe_ratio: SharpeRatio,
    /// Most negative peak-to-trough fraction of the strategy growth curve.
    pub max_drawdown: f64,
    /// Number of defined strategy returns.
    pub return_observations: usize,
}

impl Metrics {
    pub fn compute(
        strategy_returns: &[Option<f64>],
        strategy_growth: &[f64],
        market_growth: &[f64],
    ) -> Self {
        let returns: Vec<f64> = strategy_returns.iter().flatten().copied().collect();
        Self {
            total_return: total_return(strategy_growth),
            buy_and_hold_return: total_return(market_growth),
            sharpe_ratio: sharpe_ratio(&returns),
            max_drawdown: max_drawdown(strategy_growth),
            return_observations: returns.len(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Final value of a growth-of-$1 curve minus one. 0.0 for an empty curve.
pub fn total_return(growth: &[f64]) -> f64 {
    growth.last().map_or(0.0, |g| g - 1.0)
}

/// Sharpe = mean(returns) / std(returns) * sqrt(252), sample standard deviation.
pub fn sharpe_ratio(returns: &[f64]) -> SharpeRatio {
    if returns.len() < 2 {
        return SharpeRatio::Undefined(UndefinedMetric::TooFewSamples {
            samples: returns.len(),
        });
    }
    let std = std_dev(returns);
    if std < MIN_STD_DEV {
        return SharpeRatio::Undefined(UndefinedMetric::ZeroVariance);
    }
    SharpeRatio::Defined(mean_f64(returns) / std * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Maximum drawdown as a negative fraction (e.g. -0.15 = 15% drawdown).
pub fn max_drawdown(growth: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for &g in growth {
        if g > peak {
            peak = g;
        }
        if peak > 0.0 {
            max_dd = max_dd.min((g - peak) / peak);
        }
    }
    max_dd
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
