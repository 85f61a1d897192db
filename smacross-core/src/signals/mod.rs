//! Crossover signal generation, position lagging and event detection.

pub mod crossover;
pub mod events;

pub use crossover::{lag_positions, CrossoverSeries, MaCrossover};
pub use events::{detect_events, SignalEvents};
