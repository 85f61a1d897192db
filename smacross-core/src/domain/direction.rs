//! Directional state: the crossover signal and the position actually held.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Long (+1), flat (0) or short (-1).
///
/// Serialized as the integer so exported series read `1`, `0`, `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Short,
    #[default]
    Flat,
    Long,
}

impl Direction {
    /// Three-way comparison of the short and long averages.
    ///
    /// An unavailable operand makes the comparison false, so the result is `Flat`.
    pub fn from_averages(sma_short: Option<f64>, sma_long: Option<f64>) -> Self {
        match (sma_short, sma_long) {
            (Some(s), Some(l)) if s > l => Direction::Long,
            (Some(s), Some(l)) if s < l => Direction::Short,
            _ => Direction::Flat,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Short => -1,
            Direction::Flat => 0,
            Direction::Long => 1,
        }
    }

    /// Exposure multiplier applied to the market return.
    pub fn exposure(self) -> f64 {
        f64::from(self.as_i8())
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> i8 {
        d.as_i8()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Short),
            0 => Ok(Direction::Flat),
            1 => Ok(Direction::Long),
            other => Err(format!("direction must be -1, 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}
