use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result, Timeframe};

pub const DEFAULT_BASE_URL: &str = "https://api.mexc.com";
/// Discord caps message content at 2000 characters.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 2000;

/// All configuration loaded from environment variables at startup.
/// Every setting has a default; malformed values are reported as
/// `Error::Config` so the binary can refuse to start.
#[derive(Debug, Clone)]
pub struct Config {
    // Delivery
    pub webhook_url: Option<String>,
    pub max_message_len: usize,

    // Exchange
    pub exchange_base_url: String,
    pub fetch_timeout: Duration,

    // Universe
    pub quote_asset: String,
    pub excluded_suffixes: Vec<String>,
    pub min_quote_volume: f64,
    pub top_n_pairs: usize,
    pub max_symbols_per_cycle: Option<usize>,

    // Scheduling
    pub timeframes: Vec<Timeframe>,
    pub scan_interval: Duration,
    pub request_delay: Duration,
    pub scan_concurrency: usize,
    pub scan_once: bool,

    // Pattern thresholds file (TOML)
    pub pattern_config_path: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeframes = get("SCAN_TIMEFRAMES")
            .unwrap_or_else(|| "1h,4h".to_string())
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Timeframe::from_str)
            .collect::<Result<Vec<_>>>()?;
        if timeframes.is_empty() {
            return Err(Error::Config("SCAN_TIMEFRAMES must list at least one timeframe".into()));
        }

        let excluded_suffixes = get("EXCLUDED_SUFFIXES")
            .unwrap_or_else(|| "3L,3S,5L,5S".to_string())
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        let scan_concurrency = parse_or(&get, "SCAN_CONCURRENCY", 1usize)?;
        if scan_concurrency == 0 {
            return Err(Error::Config("SCAN_CONCURRENCY must be at least 1".into()));
        }

        let scan_interval_secs = parse_or(&get, "SCAN_INTERVAL_SECS", 3600u64)?;
        if scan_interval_secs == 0 {
            return Err(Error::Config("SCAN_INTERVAL_SECS must be positive".into()));
        }

        let fetch_timeout_secs = parse_or(&get, "FETCH_TIMEOUT_SECS", 10u64)?;
        if fetch_timeout_secs == 0 {
            return Err(Error::Config("FETCH_TIMEOUT_SECS must be positive".into()));
        }

        let max_message_len = parse_or(&get, "MAX_MESSAGE_LEN", DEFAULT_MAX_MESSAGE_LEN)?;
        if max_message_len == 0 {
            return Err(Error::Config("MAX_MESSAGE_LEN must be at least 1".into()));
        }

        Ok(Config {
            webhook_url: get("WEBHOOK_URL"),
            max_message_len,
            exchange_base_url: get("EXCHANGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            quote_asset: get("QUOTE_ASSET")
                .map(|q| q.trim().to_uppercase())
                .unwrap_or_else(|| "USDT".to_string()),
            excluded_suffixes,
            min_quote_volume: parse_or(&get, "MIN_QUOTE_VOLUME", 0.0f64)?,
            top_n_pairs: parse_or(&get, "TOP_N_PAIRS", 50usize)?,
            max_symbols_per_cycle: parse_opt(&get, "MAX_SYMBOLS_PER_CYCLE")?,
            timeframes,
            scan_interval: Duration::from_secs(scan_interval_secs),
            request_delay: Duration::from_millis(parse_or(&get, "REQUEST_DELAY_MS", 100u64)?),
            scan_concurrency,
            scan_once: parse_or(&get, "SCAN_ONCE", false)?,
            pattern_config_path: get("PATTERN_CONFIG_PATH"),
        })
    }
}

fn parse_opt<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| Error::Config(format!("{key} has an invalid value: '{raw}'")))
        })
        .transpose()
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(get, key)?.unwrap_or(default))
}
