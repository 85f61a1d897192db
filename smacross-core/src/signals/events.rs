//! Buy/sell event detection from the position sequence.

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, EnrichedPoint, SignalEvent, SignalKind};

/// Buy and sell markers, each ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalEvents {
    pub buy_signals: Vec<SignalEvent>,
    pub sell_signals: Vec<SignalEvent>,
}

/// Scan positions once and emit an event wherever the position enters Long
/// (buy) or enters Short (sell). The first point never emits.
pub fn detect_events(points: &[EnrichedPoint]) -> SignalEvents {
    let mut events = SignalEvents::default();

    for (i, pair) in points.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let kind = match (prev.position, cur.position) {
            (p, Direction::Long) if p != Direction::Long => SignalKind::Buy,
            (p, Direction::Short) if p != Direction::Short => SignalKind::Sell,
            _ => continue,
        };
        let event = SignalEvent {
            index: i + 1,
            date: cur.date,
            close: cur.close,
            kind,
        };
        match kind {
            SignalKind::Buy => events.buy_signals.push(event),
            SignalKind::Sell => events.sell_signals.push(event),
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn points(positions: &[Direction]) -> Vec<EnrichedPoint> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        positions
            .iter()
            .enumerate()
            .map(|(i, &position)| EnrichedPoint {
                date: base + chrono::Duration::days(i as i64),
                close: 100.0 + i as f64,
                sma_short: None,
                sma_long: None,
                signal: Direction::Flat,
                position,
                market_return: None,
                strategy_return: None,
                strategy_growth: 1.0,
                market_growth: 1.0,
            })
            .collect()
    }

    #[test]
    fn transitions_emit_events() {
        use Direction::*;
        let events = detect_events(&points(&[Flat, Long, Long, Short, Flat, Short, Long]));

        let buys: Vec<usize> = events.buy_signals.iter().map(|e| e.index).collect();
        let sells: Vec<usize> = events.sell_signals.iter().map(|e| e.index).collect();
        assert_eq!(buys, vec![1, 6]);
        assert_eq!(sells, vec![3, 5]);
        assert_eq!(events.buy_signals[0].close, 101.0);
    }

    #[test]
    fn first_point_never_emits() {
        let events = detect_events(&points(&[Direction::Long, Direction::Long]));
        assert!(events.buy_signals.is_empty());
        assert!(events.sell_signals.is_empty());
    }

    #[test]
    fn empty_and_single_point() {
        assert_eq!(detect_events(&[]), SignalEvents::default());
        assert_eq!(detect_events(&points(&[Direction::Short])), SignalEvents::default());
    }
}
