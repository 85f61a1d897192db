//! Export: JSON results and CSV chart data.
//!
//! Two chart datasets, each selectable on its own:
//! - **growth.csv**: growth of $1, strategy vs. buy-and-hold
//! - **price_signals.csv**: closes, both moving averages, held position and
//!   buy/sell markers
//!
//! `result.json` carries a `schema_version`. Unknown versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use smacross_core::domain::SignalKind;
use smacross_core::BacktestOutput;

use crate::runner::{BacktestResult, SCHEMA_VERSION};

pub const RESULT_FILE: &str = "result.json";
pub const GROWTH_FILE: &str = "growth.csv";
pub const PRICE_SIGNALS_FILE: &str = "price_signals.csv";

/// Which chart datasets to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSelection {
    pub returns_chart: bool,
    pub price_chart: bool,
}

impl Default for ChartSelection {
    fn default() -> Self {
        Self {
            returns_chart: true,
            price_chart: true,
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult`, rejecting schema versions newer than this build.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: date, strategy, buy_and_hold.
pub fn export_growth_csv(output: &BacktestOutput) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "strategy", "buy_and_hold"])?;
    for p in &output.points {
        wtr.write_record([
            &p.date.to_string(),
            &format!("{:.6}", p.strategy_growth),
            &format!("{:.6}", p.market_growth),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: date, close, sma_short, sma_long, position, marker.
///
/// Unavailable averages are empty cells. `marker` is `buy`, `sell` or empty.
pub fn export_price_signals_csv(output: &BacktestOutput) -> Result<String> {
    let mut markers = vec![""; output.points.len()];
    for event in output.buy_signals.iter().chain(&output.sell_signals) {
        if let Some(slot) = markers.get_mut(event.index) {
            *slot = match event.kind {
                SignalKind::Buy => "buy",
                SignalKind::Sell => "sell",
            };
        }
    }

    let opt = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_default();

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "close", "sma_short", "sma_long", "position", "marker"])?;
    for (p, marker) in output.points.iter().zip(markers) {
        let (date, close) = (p.date.to_string(), format!("{:.6}", p.close));
        let (short, long) = (opt(p.sma_short), opt(p.sma_long));
        let position = p.position.as_i8().to_string();
        wtr.write_record([
            date.as_str(),
            close.as_str(),
            short.as_str(),
            long.as_str(),
            position.as_str(),
            marker,
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Directory name for a run: `{symbol}_{short}_{long}_{run id prefix}`.
pub fn artifact_dir_name(result: &BacktestResult) -> String {
    let prefix: String = result.run_id.chars().take(12).collect();
    format!(
        "{}_{}_{}_{prefix}",
        result.symbol, result.params.short_window, result.params.long_window
    )
}

/// Write `result.json` plus the selected chart datasets under `output_dir`.
///
/// Returns the run directory. Re-running the same inputs overwrites it.
pub fn save_artifacts(
    result: &BacktestResult,
    output_dir: &Path,
    charts: ChartSelection,
) -> Result<PathBuf> {
    let run_dir = output_dir.join(artifact_dir_name(result));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write_file(&run_dir.join(RESULT_FILE), &export_json(result)?)?;
    if charts.returns_chart {
        write_file(&run_dir.join(GROWTH_FILE), &export_growth_csv(&result.output)?)?;
    }
    if charts.price_chart {
        write_file(
            &run_dir.join(PRICE_SIGNALS_FILE),
            &export_price_signals_csv(&result.output)?,
        )?;
    }

    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let path = dir.join(RESULT_FILE);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
