//! Parameter sweeps: determinism across execution modes, caching and ranking.

use chrono::NaiveDate;

use smacross_core::data::DataSource;
use smacross_core::domain::PriceSeries;
use smacross_core::{EngineConfig, WindowPolicy};
use smacross_runner::{LoadedSeries, ParamGrid, ParamSweep, ResultCache, RunError, Runner};

fn wavy_series() -> LoadedSeries {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let closes: Vec<f64> = (0..600)
        .map(|i| {
            let t = i as f64;
            100.0 + t * 0.05 + (t / 25.0).sin() * 8.0 + (t / 7.0).cos() * 2.0
        })
        .collect();
    LoadedSeries::from_series(
        "SPY",
        start,
        NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
        PriceSeries::from_closes(start, &closes),
        DataSource::Synthetic,
    )
}

fn grid() -> ParamGrid {
    ParamGrid::new(vec![5, 10, 20, 50], vec![30, 60, 120])
}

#[test]
fn serial_and_parallel_sweeps_agree() {
    let data = wavy_series();
    let serial = ParamSweep::new(Runner::new())
        .with_parallelism(false)
        .sweep(&grid(), &data)
        .unwrap();
    let parallel = ParamSweep::new(Runner::new())
        .with_parallelism(true)
        .sweep(&grid(), &data)
        .unwrap();

    assert_eq!(serial.len(), grid().size());
    assert_eq!(serial.all(), parallel.all());

    let serial_ranked: Vec<_> = serial.ranked().iter().map(|r| r.params).collect();
    let parallel_ranked: Vec<_> = parallel.ranked().iter().map(|r| r.params).collect();
    assert_eq!(serial_ranked, parallel_ranked);
}

#[test]
fn ranking_puts_defined_sharpe_first_in_descending_order() {
    let data = wavy_series();
    let results = ParamSweep::new(Runner::new()).sweep(&grid(), &data).unwrap();
    let ranked = results.ranked();

    let sharpes: Vec<Option<f64>> = ranked
        .iter()
        .map(|r| r.output.metrics.sharpe_ratio.value())
        .collect();
    let first_undefined = sharpes.iter().position(Option::is_none).unwrap_or(sharpes.len());
    assert!(sharpes[first_undefined..].iter().all(Option::is_none));
    let defined: Vec<f64> = sharpes[..first_undefined].iter().flatten().copied().collect();
    assert!(defined.windows(2).all(|w| w[0] >= w[1]));

    assert_eq!(results.best().map(|r| r.run_id.clone()), ranked.first().map(|r| r.run_id.clone()));
    assert_eq!(results.top_n(3).len(), 3);
}

#[test]
fn sweep_uses_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ResultCache::new(dir.path()).unwrap();
    let sweep = ParamSweep::new(Runner::with_cache(cache.clone()));
    let data = wavy_series();

    let first = sweep.sweep(&grid(), &data).unwrap();
    assert_eq!(cache.len().unwrap(), grid().size());

    let second = sweep.sweep(&grid(), &data).unwrap();
    assert_eq!(cache.len().unwrap(), grid().size());
    assert_eq!(first.all(), second.all());
}

#[test]
fn degenerate_pairs_under_strict_policy_fail_the_sweep() {
    let data = wavy_series();
    let grid = ParamGrid::new(vec![10, 60], vec![30]).with_degenerate(true);
    let strict = EngineConfig {
        window_policy: WindowPolicy::Strict,
    };
    let err = ParamSweep::new(Runner::new())
        .with_engine_config(strict)
        .sweep(&grid, &data)
        .unwrap_err();
    assert!(matches!(err, RunError::Engine(_)));

    let permissive = ParamSweep::new(Runner::new()).sweep(&grid, &data).unwrap();
    assert_eq!(permissive.len(), 2);
}

#[test]
fn progress_sees_every_pair() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let seen = AtomicUsize::new(0);
    let expected = grid().size();
    let data = wavy_series();
    let results = ParamSweep::new(Runner::new())
        .sweep_with_progress(&grid(), &data, |_, total, _| {
            assert_eq!(total, expected);
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), results.len());
}
