//! Two-candle liquidity sweep-and-reject.
//!
//! The signal candle (second-to-last) pushes through the previous candle's
//! extreme and closes back inside it, in the opposite colour. The sweep only
//! counts when the previous candle's body or its own wick on the swept side
//! is small next to the new sweep wick, i.e. the prior extreme was a thin
//! pocket of liquidity.

use common::{Candle, Direction};

use crate::{Detection, PatternDetector};

#[derive(Debug, Clone)]
pub struct SweepRejectDetector {
    pub ratio_threshold: f64,
}

impl SweepRejectDetector {
    pub const MIN_CANDLES: usize = 3;

    pub fn new(ratio_threshold: f64) -> Self {
        Self { ratio_threshold }
    }

    /// Green → red candle that swept the previous high and closed below it.
    /// Returns the sweep wick when the setup qualifies.
    fn bearish_sweep(&self, prev: &Candle, signal: &Candle) -> Option<f64> {
        if !(prev.is_bullish() && signal.is_bearish()) {
            return None;
        }
        if !(signal.high > prev.high && signal.close < prev.high) {
            return None;
        }
        let sweep_wick = signal.high - signal.open.max(signal.close);
        let prev_wick = prev.high - prev.close;
        self.thin_prior(prev.body(), prev_wick, sweep_wick)
            .then_some(sweep_wick)
    }

    /// Red → green candle that swept the previous low and closed above it.
    fn bullish_sweep(&self, prev: &Candle, signal: &Candle) -> Option<f64> {
        if !(prev.is_bearish() && signal.is_bullish()) {
            return None;
        }
        if !(signal.low < prev.low && signal.close > prev.low) {
            return None;
        }
        let sweep_wick = signal.open.min(signal.close) - signal.low;
        let prev_wick = prev.close - prev.low;
        self.thin_prior(prev.body(), prev_wick, sweep_wick)
            .then_some(sweep_wick)
    }

    // Strict comparison: equality with the limit does not qualify.
    fn thin_prior(&self, prev_body: f64, prev_wick: f64, sweep_wick: f64) -> bool {
        let limit = sweep_wick * self.ratio_threshold;
        prev_body < limit || prev_wick < limit
    }
}

impl Default for SweepRejectDetector {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl PatternDetector for SweepRejectDetector {
    fn name(&self) -> &str {
        "sweep_reject"
    }

    fn min_candles(&self) -> usize {
        Self::MIN_CANDLES
    }

    fn detect(&self, candles: &[Candle]) -> Option<Detection> {
        let n = candles.len();
        if n < Self::MIN_CANDLES {
            return None;
        }
        let prev = &candles[n - 3];
        let signal = &candles[n - 2];

        // The colour checks make the two branches mutually exclusive.
        if let Some(wick) = self.bearish_sweep(prev, signal) {
            return Some(Detection {
                direction: Direction::Bearish,
                pattern: "sweep",
                wick: Some(wick),
            });
        }
        self.bullish_sweep(prev, signal).map(|wick| Detection {
            direction: Direction::Bullish,
            pattern: "sweep",
            wick: Some(wick),
        })
    }
}
