//! Backtest engine: one pure pass from a price series to enriched output.
//!
//! Pipeline: validate → averages → signal → lagged position → returns →
//! growth curves → metrics → buy/sell events. The engine holds no state
//! between calls and performs no I/O.

pub mod returns;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedPoint, PriceSeries, SignalEvent};
use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::signals::{detect_events, lag_positions, MaCrossover};

pub use returns::{growth_curve, simple_returns, strategy_returns};
pub use validate::{validate_series, validate_windows};

/// Short and long moving-average windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl StrategyParams {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }

    /// True when the short window is not shorter than the long one.
    pub fn is_degenerate(&self) -> bool {
        self.short_window >= self.long_window
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self::new(50, 200)
    }
}

/// How window pairs are checked before a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Only zero windows are rejected; `short >= long` runs and degenerates.
    #[default]
    Permissive,
    /// Additionally rejects `short >= long`.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub window_policy: WindowPolicy,
}

/// Everything one backtest produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutput {
    /// One entry per input point, same order.
    pub points: Vec<EnrichedPoint>,
    pub metrics: Metrics,
    pub buy_signals: Vec<SignalEvent>,
    pub sell_signals: Vec<SignalEvent>,
}

/// Run with the default (permissive) configuration.
pub fn run_backtest(
    series: &PriceSeries,
    params: &StrategyParams,
) -> Result<BacktestOutput, EngineError> {
    run_backtest_with_config(series, params, &EngineConfig::default())
}

pub fn run_backtest_with_config(
    series: &PriceSeries,
    params: &StrategyParams,
    config: &EngineConfig,
) -> Result<BacktestOutput, EngineError> {
    validate_windows(params, config.window_policy)?;
    validate_series(series)?;

    let crossover = MaCrossover::new(params.short_window, params.long_window);
    let averages = crossover.evaluate(series);
    let positions = lag_positions(&averages.signals);

    let closes = series.closes();
    let market = simple_returns(&closes);
    let strategy = strategy_returns(&positions, &market);
    let market_growth = growth_curve(&market);
    let strategy_growth = growth_curve(&strategy);

    let metrics = Metrics::compute(&strategy, &strategy_growth, &market_growth);

    let points: Vec<EnrichedPoint> = series
        .iter()
        .enumerate()
        .map(|(i, p)| EnrichedPoint {
            date: p.date,
            close: p.close,
            sma_short: averages.sma_short[i],
            sma_long: averages.sma_long[i],
            signal: averages.signals[i],
            position: positions[i],
            market_return: market[i],
            strategy_return: strategy[i],
            strategy_growth: strategy_growth[i],
            market_growth: market_growth[i],
        })
        .collect();

    let events = detect_events(&points);

    Ok(BacktestOutput {
        points,
        metrics,
        buy_signals: events.buy_signals,
        sell_signals: events.sell_signals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::metrics::{SharpeRatio, UndefinedMetric};
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), closes)
    }

    #[test]
    fn one_output_point_per_input() {
        let s = series(&[100.0, 101.0, 102.0, 101.0, 100.0]);
        let out = run_backtest(&s, &StrategyParams::new(1, 2)).unwrap();
        assert_eq!(out.points.len(), 5);
        for (p, e) in s.iter().zip(&out.points) {
            assert_eq!(p.date, e.date);
            assert_eq!(p.close, e.close);
        }
    }

    #[test]
    fn hand_computed_small_series() {
        // windows 1/2: sma_short = close, sma_long = mean of last two
        let out = run_backtest(&series(&[100.0, 110.0, 99.0, 108.9]), &StrategyParams::new(1, 2))
            .unwrap();
        let signals: Vec<Direction> = out.points.iter().map(|p| p.signal).collect();
        let positions: Vec<Direction> = out.points.iter().map(|p| p.position).collect();
        assert_eq!(
            signals,
            vec![Direction::Flat, Direction::Long, Direction::Short, Direction::Long]
        );
        assert_eq!(
            positions,
            vec![Direction::Flat, Direction::Flat, Direction::Long, Direction::Short]
        );

        // day 2: long into a -10% move; day 3: short into a +10% move
        let r2 = out.points[2].strategy_return.unwrap();
        let r3 = out.points[3].strategy_return.unwrap();
        assert!((r2 - (-0.1)).abs() < 1e-12);
        assert!((r3 - (-0.1)).abs() < 1e-12);
        assert!((out.metrics.total_return - (0.9 * 0.9 - 1.0)).abs() < 1e-12);

        assert_eq!(out.buy_signals.len(), 1);
        assert_eq!(out.buy_signals[0].index, 2);
        assert_eq!(out.sell_signals.len(), 1);
        assert_eq!(out.sell_signals[0].index, 3);
    }

    #[test]
    fn single_point_series() {
        let out = run_backtest(&series(&[100.0]), &StrategyParams::new(1, 1)).unwrap();
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.points[0].market_return, None);
        assert_eq!(out.metrics.total_return, 0.0);
        assert_eq!(
            out.metrics.sharpe_ratio,
            SharpeRatio::Undefined(UndefinedMetric::TooFewSamples { samples: 0 })
        );
    }

    #[test]
    fn strict_policy_rejects_inverted_windows() {
        let s = series(&[100.0, 101.0]);
        let strict = EngineConfig {
            window_policy: WindowPolicy::Strict,
        };
        assert!(matches!(
            run_backtest_with_config(&s, &StrategyParams::new(10, 5), &strict),
            Err(EngineError::InvalidWindow { .. })
        ));
        assert!(run_backtest(&s, &StrategyParams::new(10, 5)).is_ok());
    }

    #[test]
    fn degenerate_params_detected() {
        assert!(StrategyParams::new(5, 5).is_degenerate());
        assert!(!StrategyParams::default().is_degenerate());
    }
}
