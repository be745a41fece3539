use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Pattern settings file (TOML). Every field is optional.
///
/// Example `config/patterns.toml`:
/// ```toml
/// mode = "sweep"
///
/// [sweep]
/// ratio_threshold = 0.6
///
/// [wick]
/// wick_body_multiple = 2.5
/// max_body_ratio = 0.3
/// max_close_ratio = 0.3
/// lookback = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternFileConfig {
    pub mode: PatternMode,
    pub sweep: SweepParams,
    pub wick: WickParams,
}

/// Which detector the scanner runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// Two-candle sweep-and-reject.
    #[default]
    Sweep,
    /// Single-candle wick dominance at a lookback extreme.
    Wick,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepParams {
    /// Prior body or wick must be smaller than `sweep_wick * ratio_threshold`.
    pub ratio_threshold: f64,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self { ratio_threshold: 0.6 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WickParams {
    /// Rejection wick must be at least this multiple of the body.
    pub wick_body_multiple: f64,
    /// Body must be at most this fraction of the candle range.
    pub max_body_ratio: f64,
    /// Close must sit within this fraction of the range from the far end.
    pub max_close_ratio: f64,
    /// Number of candles before the signal candle used for the extreme.
    pub lookback: usize,
}

impl Default for WickParams {
    fn default() -> Self {
        Self {
            wick_body_multiple: 2.5,
            max_body_ratio: 0.3,
            max_close_ratio: 0.3,
            lookback: 10,
        }
    }
}

impl PatternFileConfig {
    /// Load from a TOML file and validate it.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("pattern config at '{path}': {e}")))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("sweep.ratio_threshold", self.sweep.ratio_threshold),
            ("wick.wick_body_multiple", self.wick.wick_body_multiple),
            ("wick.max_body_ratio", self.wick.max_body_ratio),
            ("wick.max_close_ratio", self.wick.max_close_ratio),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{key} must be a positive number, got {value}")));
            }
        }
        if self.wick.lookback == 0 {
            return Err(Error::Config("wick.lookback must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = PatternFileConfig::parse("").unwrap();
        assert_eq!(cfg.mode, PatternMode::Sweep);
        assert_eq!(cfg.sweep.ratio_threshold, 0.6);
        assert_eq!(cfg.wick.lookback, 10);
        assert_eq!(cfg.wick.wick_body_multiple, 2.5);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let cfg = PatternFileConfig::parse(
            r#"
            mode = "wick"

            [wick]
            lookback = 20
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mode, PatternMode::Wick);
        assert_eq!(cfg.wick.lookback, 20);
        assert_eq!(cfg.wick.max_body_ratio, 0.3);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = PatternFileConfig::parse(r#"mode = "engulfing""#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let err = PatternFileConfig::parse("[sweep]\nratio_threshold = 0.0").unwrap_err();
        assert!(err.to_string().contains("ratio_threshold"));
    }

    #[test]
    fn zero_lookback_is_rejected() {
        assert!(PatternFileConfig::parse("[wick]\nlookback = 0").is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PatternFileConfig::load("/nonexistent/patterns.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
