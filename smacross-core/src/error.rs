//! Engine error taxonomy.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures that stop a backtest before any output is produced.
///
/// An undefined Sharpe ratio is not here: it travels inside
/// [`crate::metrics::SharpeRatio`] because the rest of the output stays valid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient data: the price series is empty")]
    InsufficientData,

    #[error("invalid price data at index {index} ({date}): close = {close}")]
    InvalidPriceData {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("invalid windows (short = {short_window}, long = {long_window}): {reason}")]
    InvalidWindow {
        short_window: usize,
        long_window: usize,
        reason: &'static str,
    },
}
