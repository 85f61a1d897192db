//! Backtest runner: wires together config, data loading, the engine and the cache.
//!
//! Two entry points:
//! - `run_single_backtest()`: validates config, loads data, then runs. Used by the CLI.
//! - `run_backtest_from_series()`: takes an already-loaded series. No I/O. Used by sweeps.
//!
//! `Runner` wraps the second with an optional on-disk `ResultCache`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use smacross_core::data::{DataSource, PriceProvider};
use smacross_core::{
    run_backtest_with_config, BacktestOutput, EngineConfig, EngineError, StrategyParams,
    WindowPolicy,
};

use crate::cache::ResultCache;
use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_series, LoadError, LoadOptions, LoadedSeries};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("backtest error: {0}")]
    Engine(#[from] EngineError),
}

/// Current schema version for persisted results.
pub const SCHEMA_VERSION: u32 = 1;

/// Content hash identifying a run: same inputs, same id.
pub type RunId = String;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub symbol: String,
    /// Requested range; the series may start later or end earlier.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: StrategyParams,
    #[serde(default)]
    pub window_policy: WindowPolicy,
    pub data_source: DataSource,
    pub dataset_hash: String,
    pub output: BacktestOutput,
}

impl BacktestResult {
    pub fn is_synthetic(&self) -> bool {
        self.data_source == DataSource::Synthetic
    }

    pub fn point_count(&self) -> usize {
        self.output.points.len()
    }
}

/// Default schema version for results written before the field existed.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Deterministic id over everything that affects the output.
pub fn compute_run_id(
    loaded: &LoadedSeries,
    params: &StrategyParams,
    policy: WindowPolicy,
) -> RunId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(loaded.symbol.as_bytes());
    hasher.update(loaded.start.to_string().as_bytes());
    hasher.update(loaded.end.to_string().as_bytes());
    hasher.update(&(params.short_window as u64).to_le_bytes());
    hasher.update(&(params.long_window as u64).to_le_bytes());
    hasher.update(&[policy as u8]);
    hasher.update(loaded.dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Run a single backtest from a `BacktestConfig` (loads data from `provider`).
pub fn run_single_backtest(
    config: &BacktestConfig,
    provider: &dyn PriceProvider,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    config.log_warnings();

    let opts = LoadOptions {
        start: config.backtest.start_date,
        end: config.backtest.end_date,
        synthetic_fallback: config.data.synthetic_fallback,
    };
    let loaded = load_series(&config.backtest.symbol, provider, &opts)?;

    let runner = Runner::from_cache_dir(config.data.cache_dir.as_deref());
    runner.run(&loaded, &config.params(), &config.engine_config())
}

/// Run a backtest on pre-loaded data. No I/O.
pub fn run_backtest_from_series(
    loaded: &LoadedSeries,
    params: &StrategyParams,
    engine_config: &EngineConfig,
) -> Result<BacktestResult, RunError> {
    let output = run_backtest_with_config(&loaded.series, params, engine_config)?;

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: compute_run_id(loaded, params, engine_config.window_policy),
        symbol: loaded.symbol.clone(),
        start_date: loaded.start,
        end_date: loaded.end,
        params: *params,
        window_policy: engine_config.window_policy,
        data_source: loaded.source,
        dataset_hash: loaded.dataset_hash.clone(),
        output,
    })
}

/// Runs backtests, reusing cached results when a cache is attached.
///
/// Cache failures never fail a run; they are logged and the run recomputes.
#[derive(Clone, Default)]
pub struct Runner {
    cache: Option<ResultCache>,
}

impl Runner {
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn with_cache(cache: ResultCache) -> Self {
        Self { cache: Some(cache) }
    }

    /// Attach a cache at `dir` when given. A cache that cannot be opened is
    /// logged and the runner continues without one.
    pub fn from_cache_dir(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::new();
        };
        match ResultCache::new(dir) {
            Ok(cache) => Self::with_cache(cache),
            Err(e) => {
                warn!(dir = %dir.display(), error = %format!("{e:#}"), "result cache disabled");
                Self::new()
            }
        }
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    pub fn run(
        &self,
        loaded: &LoadedSeries,
        params: &StrategyParams,
        engine_config: &EngineConfig,
    ) -> Result<BacktestResult, RunError> {
        let Some(cache) = &self.cache else {
            return self.compute(loaded, params, engine_config);
        };

        let run_id = compute_run_id(loaded, params, engine_config.window_policy);
        match cache.get(&run_id) {
            Ok(Some(hit)) => {
                debug!(%run_id, "result cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => warn!(%run_id, error = %format!("{e:#}"), "unreadable cache entry"),
        }

        let result = self.compute(loaded, params, engine_config)?;
        if let Err(e) = cache.put(&result) {
            warn!(%run_id, error = %format!("{e:#}"), "failed to cache result");
        }
        Ok(result)
    }

    fn compute(
        &self,
        loaded: &LoadedSeries,
        params: &StrategyParams,
        engine_config: &EngineConfig,
    ) -> Result<BacktestResult, RunError> {
        let result = run_backtest_from_series(loaded, params, engine_config)?;
        info!(
            symbol = %result.symbol,
            short = params.short_window,
            long = params.long_window,
            total_return = result.output.metrics.total_return,
            "backtest complete"
        );
        Ok(result)
    }
}
