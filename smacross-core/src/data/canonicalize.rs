//! Sort a fetched series ascending and drop duplicate dates.

use crate::domain::{PricePoint, PriceSeries};

/// A canonical series plus what had to change to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSeries {
    pub series: PriceSeries,
    pub duplicates_removed: usize,
    pub was_reordered: bool,
}

/// Stable-sort by date and keep the last point seen for each date.
pub fn canonicalize(series: PriceSeries) -> CanonicalSeries {
    let was_reordered = !series.is_chronological();
    let mut points = series.into_points();
    points.sort_by_key(|p| p.date);

    let before = points.len();
    let mut deduped: Vec<PricePoint> = Vec::with_capacity(before);
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => deduped.push(point),
        }
    }

    CanonicalSeries {
        duplicates_removed: before - deduped.len(),
        series: PriceSeries::new(deduped),
        was_reordered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn p(d: u32, close: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), close)
    }

    #[test]
    fn already_canonical_is_unchanged() {
        let input = PriceSeries::new(vec![p(2, 1.0), p(3, 2.0)]);
        let out = canonicalize(input.clone());
        assert_eq!(out.series, input);
        assert_eq!(out.duplicates_removed, 0);
        assert!(!out.was_reordered);
    }

    #[test]
    fn sorts_and_keeps_last_duplicate() {
        let out = canonicalize(PriceSeries::new(vec![p(4, 4.0), p(2, 1.0), p(2, 1.5), p(3, 3.0)]));
        assert_eq!(out.series.closes(), vec![1.5, 3.0, 4.0]);
        assert_eq!(out.duplicates_removed, 1);
        assert!(out.was_reordered);
    }

    #[test]
    fn empty_stays_empty() {
        let out = canonicalize(PriceSeries::default());
        assert!(out.series.is_empty());
        assert_eq!(out.duplicates_removed, 0);
    }
}
