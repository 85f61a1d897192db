//! Input checks run before any computation.

use super::{StrategyParams, WindowPolicy};
use crate::domain::PriceSeries;
use crate::error::EngineError;

pub fn validate_windows(params: &StrategyParams, policy: WindowPolicy) -> Result<(), EngineError> {
    let invalid = |reason| EngineError::InvalidWindow {
        short_window: params.short_window,
        long_window: params.long_window,
        reason,
    };

    if params.short_window == 0 || params.long_window == 0 {
        return Err(invalid("windows must be at least 1"));
    }
    if policy == WindowPolicy::Strict && params.is_degenerate() {
        return Err(invalid("short window must be smaller than long window"));
    }
    Ok(())
}

/// Reject empty series and any close that is missing, non-finite or non-positive.
pub fn validate_series(series: &PriceSeries) -> Result<(), EngineError> {
    if series.is_empty() {
        return Err(EngineError::InsufficientData);
    }
    match series.iter().position(|p| !p.is_sane()) {
        Some(index) => {
            let p = series.points()[index];
            Err(EngineError::InvalidPriceData {
                index,
                date: p.date,
                close: p.close,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), closes)
    }

    #[test]
    fn zero_window_rejected_in_any_policy() {
        for policy in [WindowPolicy::Permissive, WindowPolicy::Strict] {
            assert!(validate_windows(&StrategyParams::new(0, 5), policy).is_err());
            assert!(validate_windows(&StrategyParams::new(5, 0), policy).is_err());
        }
    }

    #[test]
    fn permissive_accepts_equal_windows() {
        assert!(validate_windows(&StrategyParams::new(20, 20), WindowPolicy::Permissive).is_ok());
        assert!(validate_windows(&StrategyParams::new(20, 20), WindowPolicy::Strict).is_err());
    }

    #[test]
    fn first_bad_close_is_reported() {
        let err = validate_series(&series(&[100.0, 101.0, f64::NAN, -1.0])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPriceData { index: 2, .. }));
    }

    #[test]
    fn empty_is_insufficient() {
        assert_eq!(
            validate_series(&PriceSeries::default()),
            Err(EngineError::InsufficientData)
        );
    }
}
