//! smacross core: price series, moving averages, crossover signals, returns and metrics.
//!
//! This crate contains the backtest computation and its input boundary:
//! - Domain types (price points, directions, enriched points, signal events)
//! - Simple moving average with explicit "not yet available" values
//! - Crossover signal, one-step position lag, buy/sell event detection
//! - Pure backtest engine producing the enriched series and metrics
//! - Price providers (Yahoo Finance, CSV files, synthetic) and canonicalization

pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod signals;

pub use engine::{
    run_backtest, run_backtest_with_config, BacktestOutput, EngineConfig, StrategyParams,
    WindowPolicy,
};
pub use error::EngineError;
pub use metrics::{Metrics, SharpeRatio, UndefinedMetric};
