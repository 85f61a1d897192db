//! Moving average crossover: short SMA vs. long SMA.
//!
//! The signal at a point is Long while the short average is above the long
//! one, Short while it is below, and Flat when they are equal or either is
//! not yet available.

use crate::domain::{Direction, PriceSeries};
use crate::indicators::{Indicator, Sma};

/// Averages and raw signal for every point of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverSeries {
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub signals: Vec<Direction>,
}

/// Moving average crossover signal generator.
///
/// Does not require `short_window < long_window`. With equal windows the two
/// averages coincide and the signal is always Flat; with an inverted pair the
/// signal is simply mirrored.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    short: Sma,
    long: Sma,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short: Sma::new(short_window),
            long: Sma::new(long_window),
        }
    }

    pub fn default_params() -> Self {
        Self::new(50, 200)
    }

    pub fn short_window(&self) -> usize {
        self.short.period()
    }

    pub fn long_window(&self) -> usize {
        self.long.period()
    }

    /// Points before the first index where both averages exist.
    pub fn warmup_points(&self) -> usize {
        self.short.lookback().max(self.long.lookback())
    }

    pub fn evaluate(&self, series: &PriceSeries) -> CrossoverSeries {
        let sma_short = self.short.compute(series);
        let sma_long = self.long.compute(series);
        let signals = sma_short
            .iter()
            .zip(&sma_long)
            .map(|(&s, &l)| Direction::from_averages(s, l))
            .collect();

        CrossoverSeries {
            sma_short,
            sma_long,
            signals,
        }
    }
}

/// Shift signals forward one step: the position at `i` is the signal at `i-1`.
///
/// A crossover seen on day i's close can only be traded from day i+1.
pub fn lag_positions(signals: &[Direction]) -> Vec<Direction> {
    if signals.is_empty() {
        return Vec::new();
    }
    std::iter::once(Direction::Flat)
        .chain(signals[..signals.len() - 1].iter().copied())
        .collect()
}
