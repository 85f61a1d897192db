//! One row of backtest output per input price point.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Direction;

/// A price point annotated with averages, signal, position and returns.
///
/// `None` means "not yet available" (insufficient history, or no prior close
/// for a return). It is never a stand-in for zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub signal: Direction,
    /// Previous step's signal.
    pub position: Direction,
    pub market_return: Option<f64>,
    pub strategy_return: Option<f64>,
    /// Growth of $1 following the strategy, 1.0 at the first point.
    pub strategy_growth: f64,
    /// Growth of $1 buying and holding, 1.0 at the first point.
    pub market_growth: f64,
}
