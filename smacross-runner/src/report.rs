//! Plain-text summaries and user-facing error messages.

use smacross_core::data::DataError;
use smacross_core::{EngineError, SharpeRatio};

use crate::runner::{BacktestResult, RunError};
use crate::sweep::SweepResults;

/// `0.1234` → `12.34%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Two decimals, or `N/A` when undefined.
pub fn format_sharpe(sharpe: &SharpeRatio) -> String {
    match sharpe.value() {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// The metrics block shown after a run.
pub fn render_summary(result: &BacktestResult) -> String {
    let m = &result.output.metrics;
    let mut lines = vec![format!(
        "{} {} to {} (SMA {}/{})",
        result.symbol,
        result.start_date,
        result.end_date,
        result.params.short_window,
        result.params.long_window
    )];
    if result.is_synthetic() {
        lines.push("WARNING: synthetic data, not real market prices".to_string());
    }
    lines.extend([
        format!("Total Return: {}", format_percent(m.total_return)),
        format!("Buy & Hold Return: {}", format_percent(m.buy_and_hold_return)),
        format!("Sharpe Ratio: {}", format_sharpe(&m.sharpe_ratio)),
        format!("Max Drawdown: {}", format_percent(m.max_drawdown)),
        format!("Buy Signals: {}", result.output.buy_signals.len()),
        format!("Sell Signals: {}", result.output.sell_signals.len()),
    ]);
    to_block(lines)
}

/// One line per result, best first.
pub fn render_sweep_table(results: &SweepResults, top: usize) -> String {
    let header = format!(
        "{:>5} {:>6} {:>6} {:>12} {:>8} {:>12}",
        "rank", "short", "long", "return", "sharpe", "max dd"
    );
    let rows = results.top_n(top).into_iter().enumerate().map(|(rank, r)| {
        let m = &r.output.metrics;
        format!(
            "{:>5} {:>6} {:>6} {:>12} {:>8} {:>12}",
            rank + 1,
            r.params.short_window,
            r.params.long_window,
            format_percent(m.total_return),
            format_sharpe(&m.sharpe_ratio),
            format_percent(m.max_drawdown)
        )
    });
    to_block(std::iter::once(header).chain(rows).collect())
}

/// Newline-terminated lines.
fn to_block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// A message for the person who ran the backtest, in place of partial output.
pub fn describe_error(err: &RunError) -> String {
    match err {
        RunError::Engine(EngineError::InsufficientData) => {
            "No price data for this symbol and date range. Check the symbol or widen the dates."
                .to_string()
        }
        RunError::Engine(EngineError::InvalidPriceData { date, close, .. }) => format!(
            "The price data has an invalid close ({close}) on {date}. \
             Closes must be positive numbers; fix or remove that row."
        ),
        RunError::Engine(EngineError::InvalidWindow {
            short_window,
            long_window,
            reason,
        }) => format!("Windows {short_window}/{long_window} cannot be used: {reason}."),
        RunError::Data(load) => match load.data_error() {
            DataError::SymbolNotFound { symbol } => {
                format!("Symbol '{symbol}' was not found by the data provider.")
            }
            DataError::NetworkUnreachable(_) | DataError::RateLimited { .. } => format!(
                "Could not reach the data provider ({}). Try again later or use --source csv.",
                load.data_error()
            ),
            _ => load.to_string(),
        },
        RunError::Config(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::{LoadError, LoadedSeries};
    use crate::runner::run_backtest_from_series;
    use chrono::NaiveDate;
    use smacross_core::data::DataSource;
    use smacross_core::domain::PriceSeries;
    use smacross_core::{EngineConfig, StrategyParams, UndefinedMetric};

    fn result_for(closes: &[f64], source: DataSource) -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let loaded = LoadedSeries::from_series(
            "SPY",
            start,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            PriceSeries::from_closes(start, closes),
            source,
        );
        run_backtest_from_series(&loaded, &StrategyParams::new(1, 2), &EngineConfig::default())
            .unwrap()
    }

    #[test]
    fn percent_and_sharpe_formatting() {
        assert_eq!(format_percent(0.1234), "12.34%");
        assert_eq!(format_percent(-0.05), "-5.00%");
        assert_eq!(format_sharpe(&SharpeRatio::Defined(1.234)), "1.23");
        assert_eq!(
            format_sharpe(&SharpeRatio::Undefined(UndefinedMetric::ZeroVariance)),
            "N/A"
        );
    }

    #[test]
    fn summary_lists_metrics_and_counts() {
        let text = render_summary(&result_for(&[100.0, 110.0, 99.0, 108.9], DataSource::CsvFile));
        assert!(text.contains("Total Return: -19.00%"));
        assert!(text.contains("Buy Signals: 1"));
        assert!(text.contains("Sell Signals: 1"));
        assert!(text.contains("SPY 2024-01-02 to 2024-01-31 (SMA 1/2)"));
        assert!(!text.contains("synthetic"));
        assert_eq!(text.lines().count(), 7);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn flat_market_shows_na_sharpe() {
        let text = render_summary(&result_for(&[100.0; 10], DataSource::Synthetic));
        assert!(text.contains("Sharpe Ratio: N/A"));
        assert!(text.contains("Total Return: 0.00%"));
        assert!(text.contains("synthetic data"));
    }

    #[test]
    fn sweep_table_lists_ranked_rows() {
        use crate::runner::Runner;
        use crate::sweep::{ParamGrid, ParamSweep};

        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let loaded = LoadedSeries::from_series(
            "SPY",
            start,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            PriceSeries::from_closes(start, &closes),
            DataSource::CsvFile,
        );
        let results = ParamSweep::new(Runner::new())
            .sweep(&ParamGrid::new(vec![2, 3], vec![5, 10]), &loaded)
            .unwrap();

        let table = render_sweep_table(&results, 2);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("rank"));
        assert!(lines[1].trim_start().starts_with('1'));
        assert!(lines[2].trim_start().starts_with('2'));
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn engine_errors_get_readable_messages() {
        let msg = describe_error(&RunError::Engine(EngineError::InsufficientData));
        assert!(msg.starts_with("No price data"));

        let msg = describe_error(&RunError::Engine(EngineError::InvalidPriceData {
            index: 3,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            close: -1.0,
        }));
        assert!(msg.contains("(-1)"));
        assert!(msg.contains("2024-01-05"));
    }

    #[test]
    fn unknown_symbol_message() {
        let err = RunError::Data(LoadError::Fetch {
            symbol: "NOPE".into(),
            provider: "yahoo_finance".into(),
            source: DataError::SymbolNotFound {
                symbol: "NOPE".into(),
            },
        });
        assert_eq!(
            describe_error(&err),
            "Symbol 'NOPE' was not found by the data provider."
        );
    }
}
