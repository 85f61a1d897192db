//! smacross CLI: run, sweep and fetch commands.
//!
//! Commands:
//! - `run`: backtest one window pair from a TOML config file or flags
//! - `sweep`: backtest a grid of window pairs and rank them
//! - `fetch`: download closes from Yahoo Finance into CSV files

mod logging;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};

use smacross_core::data::{canonicalize, write_csv, CsvProvider, PriceProvider, YahooProvider};
use smacross_core::WindowPolicy;
use smacross_runner::report::render_sweep_table;
use smacross_runner::{
    describe_error, load_series, make_provider, render_summary, save_artifacts, BacktestConfig,
    LoadOptions, ParamGrid, ParamSweep, RunError, Runner, SourceKind,
};

#[derive(Parser)]
#[command(name = "smacross", about = "SMA crossover backtester", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one short/long window pair.
    Run(RunArgs),
    /// Backtest a grid of window pairs and print the best.
    Sweep(SweepArgs),
    /// Download daily closes from Yahoo Finance into `{dir}/{SYMBOL}.csv`.
    Fetch {
        /// Symbols to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 10 years ago.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Output directory.
        #[arg(long, default_value = "data")]
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Source {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<Source> for SourceKind {
    fn from(source: Source) -> Self {
        match source {
            Source::Yahoo => SourceKind::Yahoo,
            Source::Csv => SourceKind::Csv,
            Source::Synthetic => SourceKind::Synthetic,
        }
    }
}

/// Flags shared by `run` and `sweep`. Each one overrides the config file.
#[derive(Args, Debug)]
struct DataArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol. Defaults to SPY without a config file.
    #[arg(long)]
    symbol: Option<String>,

    /// Start date (YYYY-MM-DD). Defaults to 5 years ago without a config file.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD). Defaults to today without a config file.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Price source.
    #[arg(long, value_enum)]
    source: Option<Source>,

    /// Directory of `{SYMBOL}.csv` files for `--source csv`.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Generate synthetic prices when the source fails.
    #[arg(long, default_value_t = false)]
    synthetic_fallback: bool,

    /// Cache results as JSON under this directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Reject short >= long windows.
    #[arg(long, default_value_t = false)]
    strict_windows: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Short moving-average window.
    #[arg(long)]
    short: Option<usize>,

    /// Long moving-average window.
    #[arg(long)]
    long: Option<usize>,

    /// Skip the growth-of-$1 chart data.
    #[arg(long, default_value_t = false)]
    no_returns_chart: bool,

    /// Skip the price/averages/markers chart data.
    #[arg(long, default_value_t = false)]
    no_price_chart: bool,

    /// Output directory for result.json and chart CSVs.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Short windows, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [10usize, 20, 50])]
    short: Vec<usize>,

    /// Long windows, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [100usize, 150, 200])]
    long: Vec<usize>,

    /// Also run pairs with short >= long.
    #[arg(long, default_value_t = false)]
    include_degenerate: bool,

    /// Run pairs one after another instead of in parallel.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// How many ranked results to print.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json_logs);

    match cli.command {
        Commands::Run(args) => run_cmd(args),
        Commands::Sweep(args) => sweep_cmd(args),
        Commands::Fetch {
            symbols,
            start,
            end,
            dir,
        } => fetch_cmd(symbols, start, end, dir),
    }
}

/// Resolve a config: file (if any) first, then flags on top.
fn build_config(data: &DataArgs) -> Result<BacktestConfig> {
    let today = chrono::Local::now().date_naive();
    let mut config = match &data.config {
        Some(path) => BacktestConfig::from_file(path)?,
        None => BacktestConfig::new(
            "SPY",
            today - chrono::Duration::days(365 * 5),
            today,
        ),
    };

    let b = &mut config.backtest;
    if let Some(symbol) = &data.symbol {
        b.symbol = symbol.clone();
    }
    if let Some(start) = data.start {
        b.start_date = start;
    }
    if let Some(end) = data.end {
        b.end_date = end;
    }
    if data.strict_windows {
        b.window_policy = WindowPolicy::Strict;
    }

    let d = &mut config.data;
    if let Some(source) = data.source {
        d.source = source.into();
    }
    if let Some(dir) = &data.csv_dir {
        d.csv_dir = dir.clone();
    }
    if data.synthetic_fallback {
        d.synthetic_fallback = true;
    }
    if let Some(dir) = &data.cache_dir {
        d.cache_dir = Some(dir.clone());
    }

    Ok(config)
}

fn build_run_config(args: &RunArgs) -> Result<BacktestConfig> {
    let mut config = build_config(&args.data)?;
    if let Some(short) = args.short {
        config.backtest.short_window = short;
    }
    if let Some(long) = args.long {
        config.backtest.long_window = long;
    }
    if args.no_returns_chart {
        config.output.returns_chart = false;
    }
    if args.no_price_chart {
        config.output.price_chart = false;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Swap a runner error for the message a user should see.
fn user_facing(err: RunError) -> anyhow::Error {
    error!(%err, "backtest failed");
    anyhow!(describe_error(&err))
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let config = build_run_config(&args)?;
    let provider = make_provider(&config.data).map_err(|e| user_facing(e.into()))?;

    let result =
        smacross_runner::run_single_backtest(&config, provider.as_ref()).map_err(user_facing)?;

    print!("{}", render_summary(&result));

    let run_dir = save_artifacts(&result, &config.output.dir, config.chart_selection())?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn sweep_cmd(args: SweepArgs) -> Result<()> {
    let config = build_config(&args.data)?;
    config.validate()?;

    let grid = ParamGrid::new(args.short.clone(), args.long.clone())
        .with_degenerate(args.include_degenerate);
    if grid.size() == 0 {
        return Err(anyhow!(
            "no window pairs to run: every short window is >= every long window"
        ));
    }

    let provider = make_provider(&config.data).map_err(|e| user_facing(e.into()))?;
    let opts = LoadOptions {
        start: config.backtest.start_date,
        end: config.backtest.end_date,
        synthetic_fallback: config.data.synthetic_fallback,
    };
    let loaded = load_series(&config.backtest.symbol, provider.as_ref(), &opts)
        .map_err(|e| user_facing(e.into()))?;

    let runner = Runner::from_cache_dir(config.data.cache_dir.as_deref());

    info!(symbol = %loaded.symbol, pairs = grid.size(), "starting sweep");
    let results = ParamSweep::new(runner)
        .with_parallelism(!args.sequential)
        .with_engine_config(config.engine_config())
        .sweep(&grid, &loaded)
        .map_err(user_facing)?;

    println!(
        "{} {} to {}: {} pairs",
        loaded.symbol,
        config.backtest.start_date,
        config.backtest.end_date,
        results.len()
    );
    if loaded.is_synthetic() {
        println!("WARNING: synthetic data, not real market prices");
    }
    print!("{}", render_sweep_table(&results, args.top));
    Ok(())
}

fn fetch_cmd(
    symbols: Vec<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    dir: PathBuf,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let start = start.unwrap_or(today - chrono::Duration::days(365 * 10));
    let end = end.unwrap_or(today);

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let provider = YahooProvider::new()?;
    let files = CsvProvider::new(&dir);

    let mut failed = Vec::new();
    for symbol in &symbols {
        match provider.fetch(symbol, start, end) {
            Ok(fetched) => {
                let canonical = canonicalize(fetched.series);
                let path = files.path_for(symbol);
                write_csv(&path, &canonical.series)?;
                info!(
                    symbol = %symbol,
                    points = canonical.series.len(),
                    path = %path.display(),
                    "saved"
                );
                println!("{symbol}: {} closes -> {}", canonical.series.len(), path.display());
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "fetch failed");
                failed.push(format!("{symbol}: {e}"));
            }
        }
    }

    if !failed.is_empty() {
        return Err(anyhow!(
            "{} of {} downloads failed:\n{}",
            failed.len(),
            symbols.len(),
            failed.join("\n")
        ));
    }
    Ok(())
}
