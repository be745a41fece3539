use common::{Candle, Direction};
use proptest::prelude::*;
use strategy::{PatternDetector, SweepRejectDetector, WickRejectionDetector};

/// A candle that respects `low <= min(open, close) <= max(open, close) <= high`.
fn valid_candle() -> impl Strategy<Value = Candle> {
    (
        0.0001f64..100_000.0,
        0.0001f64..100_000.0,
        0.0f64..5_000.0,
        0.0f64..5_000.0,
    )
        .prop_map(|(open, close, up, down)| {
            let high = open.max(close) + up;
            let low = (open.min(close) - down).max(0.0);
            Candle::new(open, high, low, close)
        })
}

fn series(min: usize, max: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(valid_candle(), min..max)
}

proptest! {
    /// Detectors must never panic on well-formed candles of any length.
    #[test]
    fn detectors_never_panic(candles in series(0, 30)) {
        let _ = SweepRejectDetector::default().detect(&candles);
        let _ = WickRejectionDetector::default().detect(&candles);
    }

    #[test]
    fn detection_is_deterministic(candles in series(3, 20)) {
        let sweep = SweepRejectDetector::default();
        let wick = WickRejectionDetector::default();
        prop_assert_eq!(sweep.detect(&candles), sweep.detect(&candles));
        prop_assert_eq!(wick.detect(&candles), wick.detect(&candles));
    }

    /// A sweep result always agrees with the colour of the two candles, so the
    /// bearish and bullish setups can never both hold.
    #[test]
    fn sweep_direction_matches_candle_colours(candles in series(3, 10)) {
        let n = candles.len();
        let (prev, signal) = (candles[n - 3], candles[n - 2]);
        match SweepRejectDetector::default().detect(&candles) {
            Some(d) if d.direction == Direction::Bearish => {
                prop_assert!(prev.close > prev.open && signal.close < signal.open);
                prop_assert!(signal.high > prev.high && signal.close < prev.high);
                prop_assert!(d.wick.unwrap() >= 0.0);
            }
            Some(d) => {
                prop_assert!(prev.close < prev.open && signal.close > signal.open);
                prop_assert!(signal.low < prev.low && signal.close > prev.low);
                prop_assert!(d.wick.unwrap() >= 0.0);
            }
            None => {}
        }
    }

    #[test]
    fn zero_range_signal_never_fires(
        mut candles in series(12, 20),
        price in 0.0001f64..100_000.0,
    ) {
        let n = candles.len();
        candles[n - 2] = Candle::new(price, price, price, price);
        prop_assert_eq!(WickRejectionDetector::default().detect(&candles), None);
    }

    #[test]
    fn short_series_never_fires(candles in series(0, 12)) {
        let sweep = SweepRejectDetector::default();
        let wick = WickRejectionDetector::default();
        if candles.len() < sweep.min_candles() {
            prop_assert_eq!(sweep.detect(&candles), None);
        }
        prop_assert!(candles.len() < wick.min_candles());
        prop_assert_eq!(wick.detect(&candles), None);
    }
}
