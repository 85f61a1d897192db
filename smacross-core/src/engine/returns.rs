//! Market returns, strategy returns and growth-of-$1 curves.

use crate::domain::Direction;

/// Simple returns `(close[i] - close[i-1]) / close[i-1]`; `None` at index 0.
pub fn simple_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| Some((w[1] - w[0]) / w[0])));
    out
}

/// Position-weighted market returns. Unavailable wherever the market return is.
pub fn strategy_returns(positions: &[Direction], market: &[Option<f64>]) -> Vec<Option<f64>> {
    positions
        .iter()
        .zip(market)
        .map(|(pos, r)| r.map(|r| pos.exposure() * r))
        .collect()
}

/// Cumulative product of `(1 + r)`, seeded at 1.0. Unavailable returns hold the level.
pub fn growth_curve(returns: &[Option<f64>]) -> Vec<f64> {
    let mut level = 1.0;
    returns
        .iter()
        .map(|r| {
            if let Some(r) = r {
                level *= 1.0 + r;
            }
            level
        })
        .collect()
}
