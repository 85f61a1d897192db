//! Deterministic synthetic prices for development and demos.
//!
//! Produces a random walk from 100.0, seeded from the symbol name, on weekdays
//! only. Results built on synthetic data are tagged by `DataSource::Synthetic`.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{check_range, DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::{PricePoint, PriceSeries};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        Self {
            start_price,
            max_daily_move,
        }
    }

    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut points = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current <= end {
            let weekday = current.weekday();
            if weekday != chrono::Weekday::Sat && weekday != chrono::Weekday::Sun {
                let daily_return: f64 = rng.gen_range(-self.max_daily_move..self.max_daily_move);
                price *= 1.0 + daily_return;
                points.push(PricePoint::new(current, price));
            }
            current += chrono::Duration::days(1);
        }

        PriceSeries::new(points)
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(100.0, 0.03)
    }
}

impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            series: self.generate(symbol, start, end),
            source: DataSource::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn deterministic_per_symbol() {
        let provider = SyntheticProvider::default();
        let a = provider.generate("SPY", jan(1), jan(31));
        let b = provider.generate("SPY", jan(1), jan(31));
        let c = provider.generate("QQQ", jan(1), jan(31));
        assert_eq!(a, b);
        assert_eq!(a.len(), c.len());
        assert_ne!(a.points()[0].close, c.points()[0].close);
    }

    #[test]
    fn weekdays_only_and_positive() {
        let series = SyntheticProvider::default().generate("SPY", jan(1), jan(31));
        // January 2024 has 23 weekdays
        assert_eq!(series.len(), 23);
        assert!(series.iter().all(|p| p.is_sane()));
        assert!(series
            .iter()
            .all(|p| !matches!(p.date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)));
    }
}
