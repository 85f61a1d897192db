//! Domain types for the crossover backtester

pub mod direction;
pub mod enriched;
pub mod event;
pub mod price;

pub use direction::Direction;
pub use enriched::EnrichedPoint;
pub use event::{SignalEvent, SignalKind};
pub use price::{PricePoint, PriceSeries};
