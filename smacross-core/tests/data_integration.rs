//! Providers feeding the engine: CSV files, canonicalization, synthetic data.

use chrono::NaiveDate;
use smacross_core::data::{canonicalize, write_csv, CsvProvider, PriceProvider, SyntheticProvider};
use smacross_core::domain::PriceSeries;
use smacross_core::{run_backtest, EngineError, StrategyParams};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn unsorted_csv_is_canonicalized_before_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("SPY.csv"),
        "date,close\n2024-01-04,103\n2024-01-02,101\n2024-01-03,102\n2024-01-03,102.5\n",
    )
    .unwrap();

    let fetched = CsvProvider::new(dir.path())
        .fetch("SPY", d(2024, 1, 1), d(2024, 1, 31))
        .unwrap();
    assert!(!fetched.series.is_chronological());

    let canonical = canonicalize(fetched.series);
    assert_eq!(canonical.duplicates_removed, 1);
    assert_eq!(canonical.series.closes(), vec![101.0, 102.5, 103.0]);

    let out = run_backtest(&canonical.series, &StrategyParams::new(1, 2)).unwrap();
    assert_eq!(out.points.len(), 3);
}

#[test]
fn unparsable_close_surfaces_as_invalid_price_data() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("BAD.csv"),
        "date,close\n2024-01-02,100\n2024-01-03,101\n2024-01-04,oops\n",
    )
    .unwrap();

    let fetched = CsvProvider::new(dir.path())
        .fetch("BAD", d(2024, 1, 1), d(2024, 1, 31))
        .unwrap();
    let err = run_backtest(&fetched.series, &StrategyParams::new(1, 2)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidPriceData { index: 2, .. }));
}

#[test]
fn empty_range_reaches_the_engine_as_insufficient_data() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CsvProvider::new(dir.path());
    write_csv(
        &provider.path_for("SPY"),
        &PriceSeries::from_closes(d(2024, 1, 2), &[100.0, 101.0]),
    )
    .unwrap();

    let fetched = provider.fetch("SPY", d(2023, 1, 1), d(2023, 12, 31)).unwrap();
    assert!(fetched.series.is_empty());
    assert_eq!(
        run_backtest(&fetched.series, &StrategyParams::default()),
        Err(EngineError::InsufficientData)
    );
}

#[test]
fn synthetic_year_runs_end_to_end() {
    let fetched = SyntheticProvider::default()
        .fetch("SPY", d(2020, 1, 1), d(2021, 12, 31))
        .unwrap();
    let out = run_backtest(&fetched.series, &StrategyParams::new(20, 100)).unwrap();
    assert_eq!(out.points.len(), fetched.series.len());
    assert!(out.metrics.return_observations > 0);
}
