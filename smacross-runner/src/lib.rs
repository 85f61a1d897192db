//! smacross runner: backtest orchestration on top of `smacross-core`.
//!
//! This crate provides:
//! - TOML configuration with defaults and recommended-range warnings
//! - Price loading with canonicalization, dataset hashing and synthetic fallback
//! - Single-backtest runner with content-addressed result caching
//! - Parallel parameter sweeps over window grids
//! - Text summaries, JSON results and CSV chart datasets

pub mod cache;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod report;
pub mod runner;
pub mod sweep;

pub use cache::ResultCache;
pub use config::{BacktestConfig, ConfigError, SourceKind};
pub use data_loader::{load_series, make_provider, LoadError, LoadOptions, LoadedSeries};
pub use export::{save_artifacts, ChartSelection};
pub use report::{describe_error, render_summary};
pub use runner::{
    run_backtest_from_series, run_single_backtest, BacktestResult, RunError, RunId, Runner,
    SCHEMA_VERSION,
};
pub use sweep::{ParamGrid, ParamSweep, SweepResults};
