//! Single-candle wick rejection at a lookback extreme.
//!
//! Shooting star: long upper wick, small body, close near the low, and the
//! high at or above every high in the lookback window. Hammer is the mirror
//! image on the lows.

use common::{Candle, Direction};

use crate::config::WickParams;
use crate::{Detection, PatternDetector};

#[derive(Debug, Clone)]
pub struct WickRejectionDetector {
    pub wick_body_multiple: f64,
    pub max_body_ratio: f64,
    pub max_close_ratio: f64,
    pub lookback: usize,
}

impl WickRejectionDetector {
    pub fn from_params(params: &WickParams) -> Self {
        Self {
            wick_body_multiple: params.wick_body_multiple,
            max_body_ratio: params.max_body_ratio,
            max_close_ratio: params.max_close_ratio,
            lookback: params.lookback,
        }
    }

    fn is_shooting_star(&self, c: &Candle, range: f64, recent_high: f64) -> bool {
        c.upper_wick() >= self.wick_body_multiple * c.body()
            && c.body() <= self.max_body_ratio * range
            && (c.close - c.low) <= self.max_close_ratio * range
            && c.high >= recent_high
    }

    fn is_hammer(&self, c: &Candle, range: f64, recent_low: f64) -> bool {
        c.lower_wick() >= self.wick_body_multiple * c.body()
            && c.body() <= self.max_body_ratio * range
            && (c.high - c.close) <= self.max_close_ratio * range
            && c.low <= recent_low
    }
}

impl Default for WickRejectionDetector {
    fn default() -> Self {
        Self::from_params(&WickParams::default())
    }
}

impl PatternDetector for WickRejectionDetector {
    fn name(&self) -> &str {
        "wick_rejection"
    }

    fn min_candles(&self) -> usize {
        self.lookback + 2
    }

    fn detect(&self, candles: &[Candle]) -> Option<Detection> {
        if candles.len() < self.min_candles() {
            return None;
        }
        let signal_idx = candles.len() - 2;
        let signal = &candles[signal_idx];
        let window = &candles[signal_idx - self.lookback..signal_idx];

        // Zero range: nothing to measure wicks against.
        let range = signal.range();
        if !(range > 0.0) {
            return None;
        }

        let recent_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let recent_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

        // Bearish is checked first and wins when both shapes qualify.
        if self.is_shooting_star(signal, range, recent_high) {
            return Some(Detection {
                direction: Direction::Bearish,
                pattern: "shooting_star",
                wick: None,
            });
        }
        if self.is_hammer(signal, range, recent_low) {
            return Some(Detection {
                direction: Direction::Bullish,
                pattern: "hammer",
                wick: None,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(open, high, low, close)
    }

    /// Ten quiet candles ranging 97..103, then `signal`, then a forming candle.
    fn series_with(signal: Candle) -> Vec<Candle> {
        let mut series: Vec<Candle> = (0..10)
            .map(|i| {
                let open = 100.0 + (i % 3) as f64 * 0.5;
                c(open, 103.0, 97.0, open + 0.5)
            })
            .collect();
        series.push(signal);
        series.push(c(100.0, 100.0, 100.0, 100.0));
        series
    }

    #[test]
    fn hammer_at_new_low_is_bullish() {
        let detector = WickRejectionDetector::default();
        let series = series_with(c(100.0, 101.2, 95.0, 101.0));
        let detection = detector.detect(&series).expect("expected a hammer");
        assert_eq!(detection.direction, Direction::Bullish);
        assert_eq!(detection.pattern, "hammer");
        assert_eq!(detection.wick, None);
    }

    #[test]
    fn shooting_star_at_new_high_is_bearish() {
        let detector = WickRejectionDetector::default();
        let series = series_with(c(100.0, 106.0, 99.8, 100.6));
        let detection = detector.detect(&series).expect("expected a shooting star");
        assert_eq!(detection.direction, Direction::Bearish);
        assert_eq!(detection.pattern, "shooting_star");
    }

    #[test]
    fn hammer_above_recent_low_does_not_fire() {
        let detector = WickRejectionDetector::default();
        // Same shape as the hammer but the low stays inside the window.
        let series = series_with(c(102.0, 102.2, 98.0, 102.1));
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn zero_range_candle_returns_none() {
        let detector = WickRejectionDetector::default();
        let series = series_with(c(90.0, 90.0, 90.0, 90.0));
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn doji_spanning_both_extremes_prefers_bearish() {
        let detector = WickRejectionDetector {
            max_close_ratio: 1.0,
            ..WickRejectionDetector::default()
        };
        // Body 0, new high and new low: both shapes qualify.
        let series = series_with(c(100.0, 110.0, 90.0, 100.0));
        let detection = detector.detect(&series).unwrap();
        assert_eq!(detection.direction, Direction::Bearish);
    }

    #[test]
    fn large_body_does_not_fire() {
        let detector = WickRejectionDetector::default();
        let series = series_with(c(96.0, 104.0, 95.0, 103.5));
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn needs_lookback_plus_two_candles() {
        let detector = WickRejectionDetector::default();
        let series = series_with(c(100.0, 101.2, 95.0, 101.0));
        assert_eq!(detector.min_candles(), 12);
        assert_eq!(detector.detect(&series[1..]), None);
    }

    #[test]
    fn older_candles_outside_the_window_are_ignored() {
        let detector = WickRejectionDetector::default();
        let mut series = vec![c(50.0, 60.0, 40.0, 55.0)];
        series.extend(series_with(c(100.0, 101.2, 95.0, 101.0)));
        assert_eq!(
            detector.detect(&series).map(|d| d.direction),
            Some(Direction::Bullish)
        );
    }
}
