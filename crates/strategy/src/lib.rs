pub mod config;
pub mod patterns;

pub use config::{PatternFileConfig, PatternMode, SweepParams, WickParams};
pub use patterns::{SweepRejectDetector, WickRejectionDetector};

use common::{Candle, Direction};
use tracing::info;

/// Outcome of a successful pattern check on the signal candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub direction: Direction,
    /// Short pattern name, e.g. `"sweep"`, `"shooting_star"`, `"hammer"`.
    pub pattern: &'static str,
    /// Sweep wick magnitude, if the detector measures one.
    pub wick: Option<f64>,
}

/// All pattern detectors must satisfy this trait.
///
/// Detectors are pure: the same candle window always yields the same result,
/// and nothing outside `candles` is read.
pub trait PatternDetector: Send + Sync {
    /// Human-readable name of this detector.
    fn name(&self) -> &str;

    /// Minimum series length, including the still-forming last candle.
    fn min_candles(&self) -> usize;

    /// Evaluate the second-to-last candle of `candles` (oldest first).
    ///
    /// The last candle is treated as still forming and is ignored.
    /// Returns `None` when there is no signal or the series is too short.
    fn detect(&self, candles: &[Candle]) -> Option<Detection>;
}

/// Build the detector selected by `cfg.mode`.
pub fn build_detector(cfg: &PatternFileConfig) -> Box<dyn PatternDetector> {
    let detector: Box<dyn PatternDetector> = match cfg.mode {
        PatternMode::Sweep => Box::new(SweepRejectDetector::new(cfg.sweep.ratio_threshold)),
        PatternMode::Wick => Box::new(WickRejectionDetector::from_params(&cfg.wick)),
    };
    info!(
        detector = %detector.name(),
        min_candles = detector.min_candles(),
        "Pattern detector selected"
    );
    detector
}
