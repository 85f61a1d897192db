//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Position lag: position[0] is flat, position[i] == signal[i-1]
//! 2. Short history: fewer points than the long window means no exposure
//! 3. Idempotence: identical inputs give identical outputs
//! 4. Growth round-trip: re-compounding strategy returns reproduces the curve
//! 5. Events: buys and sells never collide and always mark a position change

use chrono::NaiveDate;
use proptest::prelude::*;
use smacross_core::domain::{Direction, PriceSeries};
use smacross_core::{run_backtest, StrategyParams};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_series(max_len: usize) -> impl Strategy<Value = PriceSeries> {
    (
        10.0..500.0_f64,
        prop::collection::vec(-0.05..0.05_f64, 1..max_len),
    )
        .prop_map(|(start, moves)| {
            let mut price = start;
            let closes: Vec<f64> = moves
                .iter()
                .map(|m| {
                    price *= 1.0 + m;
                    price
                })
                .collect();
            PriceSeries::from_closes(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), &closes)
        })
}

fn arb_params() -> impl Strategy<Value = StrategyParams> {
    (1usize..40, 1usize..120).prop_map(|(s, l)| StrategyParams::new(s, l))
}

proptest! {
    #[test]
    fn position_is_lagged_signal(series in arb_series(300), params in arb_params()) {
        let out = run_backtest(&series, &params).unwrap();
        prop_assert_eq!(out.points[0].position, Direction::Flat);
        for i in 1..out.points.len() {
            prop_assert_eq!(out.points[i].position, out.points[i - 1].signal);
        }
    }

    #[test]
    fn short_history_has_no_exposure(series in arb_series(60), extra in 0usize..50) {
        let params = StrategyParams::new(5, series.len() + 1 + extra);
        let out = run_backtest(&series, &params).unwrap();
        prop_assert_eq!(out.metrics.total_return, 0.0);
        prop_assert!(out.points.iter().all(|p| p.position == Direction::Flat));
        prop_assert!(!out.metrics.sharpe_ratio.is_defined());
    }

    #[test]
    fn runs_are_idempotent(series in arb_series(250), params in arb_params()) {
        let a = run_backtest(&series, &params).unwrap();
        let b = run_backtest(&series, &params).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn growth_round_trips(series in arb_series(300), params in arb_params()) {
        let out = run_backtest(&series, &params).unwrap();
        let mut level = 1.0;
        for p in &out.points {
            if let Some(r) = p.strategy_return {
                level *= 1.0 + r;
            }
            prop_assert!((level - p.strategy_growth).abs() <= 1e-9 * level.abs().max(1.0));
        }
        prop_assert!((out.metrics.total_return - (level - 1.0)).abs() <= 1e-9 * level.max(1.0));
    }

    #[test]
    fn events_mark_position_changes(series in arb_series(300), params in arb_params()) {
        let out = run_backtest(&series, &params).unwrap();
        for buy in &out.buy_signals {
            prop_assert!(out.sell_signals.iter().all(|s| s.index != buy.index));
        }
        for e in out.buy_signals.iter().chain(&out.sell_signals) {
            prop_assert!(e.index >= 1);
            prop_assert_ne!(out.points[e.index].position, out.points[e.index - 1].position);
        }
        prop_assert!(out.buy_signals.windows(2).all(|w| w[0].index < w[1].index));
        prop_assert!(out.sell_signals.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn output_length_matches_input(series in arb_series(200), params in arb_params()) {
        let out = run_backtest(&series, &params).unwrap();
        prop_assert_eq!(out.points.len(), series.len());
    }
}
