//! Buy/sell markers derived from position transitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

/// A point where the held position turned long (buy) or short (sell).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub close: f64,
    pub kind: SignalKind,
}
