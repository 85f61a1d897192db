//! TOML-driven backtest configuration.
//!
//! ```toml
//! [backtest]
//! symbol = "SPY"
//! start_date = "2018-01-02"
//! end_date = "2023-12-29"
//! short_window = 50
//! long_window = 200
//! window_policy = "permissive"
//!
//! [data]
//! source = "csv"
//! csv_dir = "data"
//! synthetic_fallback = false
//!
//! [output]
//! dir = "output"
//! returns_chart = true
//! price_chart = true
//! ```
//!
//! Only `[backtest]` with symbol and dates is required. Dates must be quoted
//! strings in `YYYY-MM-DD` form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use smacross_core::{EngineConfig, StrategyParams, WindowPolicy};

use crate::export::ChartSelection;

/// Recommended short-window range. Values outside it run with a warning.
pub const SHORT_WINDOW_RECOMMENDED: (usize, usize) = (1, 100);
/// Recommended long-window range.
pub const LONG_WINDOW_RECOMMENDED: (usize, usize) = (10, 300);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    #[serde(default)]
    pub window_policy: WindowPolicy,
}

/// Where prices come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default)]
    pub source: SourceKind,
    /// Directory of `{SYMBOL}.csv` files for the CSV source.
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
    /// Generate synthetic prices when the provider fails.
    #[serde(default)]
    pub synthetic_fallback: bool,
    /// Result cache directory. No caching when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            csv_dir: default_csv_dir(),
            synthetic_fallback: false,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub returns_chart: bool,
    #[serde(default = "default_true")]
    pub price_chart: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            returns_chart: true,
            price_chart: true,
        }
    }
}

fn default_short_window() -> usize {
    50
}

fn default_long_window() -> usize {
    200
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_true() -> bool {
    true
}

impl BacktestConfig {
    /// Config with default windows, data and output settings.
    pub fn new(symbol: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            backtest: BacktestSection {
                symbol: symbol.into(),
                start_date,
                end_date,
                short_window: default_short_window(),
                long_window: default_long_window(),
                window_policy: WindowPolicy::default(),
            },
            data: DataSection::default(),
            output: OutputSection::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Hard checks. Window ordering is left to the engine's window policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        if b.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if b.start_date > b.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is after end_date {}",
                b.start_date, b.end_date
            )));
        }
        if b.short_window == 0 || b.long_window == 0 {
            return Err(ConfigError::Invalid(
                "short_window and long_window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Soft checks: values accepted but outside the recommended ranges.
    pub fn warnings(&self) -> Vec<String> {
        let b = &self.backtest;
        let mut out = Vec::new();
        let (lo, hi) = SHORT_WINDOW_RECOMMENDED;
        if !(lo..=hi).contains(&b.short_window) {
            out.push(format!(
                "short_window {} is outside the recommended range {lo}-{hi}",
                b.short_window
            ));
        }
        let (lo, hi) = LONG_WINDOW_RECOMMENDED;
        if !(lo..=hi).contains(&b.long_window) {
            out.push(format!(
                "long_window {} is outside the recommended range {lo}-{hi}",
                b.long_window
            ));
        }
        if b.short_window >= b.long_window {
            out.push(format!(
                "short_window {} is not below long_window {}; the crossover degenerates",
                b.short_window, b.long_window
            ));
        }
        out
    }

    /// Emit [`Self::warnings`] through `tracing`.
    pub fn log_warnings(&self) {
        for message in self.warnings() {
            warn!(symbol = %self.backtest.symbol, "{message}");
        }
    }

    pub fn params(&self) -> StrategyParams {
        StrategyParams::new(self.backtest.short_window, self.backtest.long_window)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_policy: self.backtest.window_policy,
        }
    }

    pub fn chart_selection(&self) -> ChartSelection {
        ChartSelection {
            returns_chart: self.output.returns_chart,
            price_chart: self.output.price_chart,
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
