use std::cmp::Ordering;

use common::{Config, Ticker};

/// Filters for picking which symbols get scanned.
#[derive(Debug, Clone)]
pub struct UniverseConfig {
    /// Only symbols quoted in this asset, e.g. `"USDT"`.
    pub quote_asset: String,
    /// Leveraged-token suffixes on the base asset, e.g. `BTC3L`.
    pub excluded_suffixes: Vec<String>,
    pub min_quote_volume: f64,
    pub top_n: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            quote_asset: "USDT".to_string(),
            excluded_suffixes: ["3L", "3S", "5L", "5S"].map(String::from).to_vec(),
            min_quote_volume: 0.0,
            top_n: 50,
        }
    }
}

impl From<&Config> for UniverseConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            quote_asset: cfg.quote_asset.clone(),
            excluded_suffixes: cfg.excluded_suffixes.clone(),
            min_quote_volume: cfg.min_quote_volume,
            top_n: cfg.top_n_pairs,
        }
    }
}

/// Rank tickers by 24h quote volume and return the top symbols that pass
/// the quote-asset, leveraged-token and minimum-volume filters.
pub fn select_universe(tickers: &[Ticker], cfg: &UniverseConfig) -> Vec<String> {
    let quote = cfg.quote_asset.to_uppercase();

    let mut candidates: Vec<(&str, f64)> = tickers
        .iter()
        .filter_map(|t| {
            let symbol = t.symbol.to_uppercase();
            let base = symbol.strip_suffix(quote.as_str())?;
            if base.is_empty() {
                return None;
            }
            if cfg.excluded_suffixes.iter().any(|s| base.ends_with(s.as_str())) {
                return None;
            }
            let volume = if t.quote_volume.is_nan() { 0.0 } else { t.quote_volume };
            (volume >= cfg.min_quote_volume).then_some((t.symbol.as_str(), volume))
        })
        .collect();

    // Stable sort keeps exchange order among equal volumes.
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    candidates
        .into_iter()
        .take(cfg.top_n)
        .map(|(symbol, _)| symbol.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(symbol: &str, quote_volume: f64) -> Ticker {
        Ticker {
            symbol: symbol.into(),
            quote_volume,
        }
    }

    #[test]
    fn ranks_by_volume_and_truncates() {
        let tickers = vec![
            t("ETHUSDT", 500.0),
            t("BTCUSDT", 900.0),
            t("SOLUSDT", 300.0),
            t("DOGEUSDT", 100.0),
        ];
        let cfg = UniverseConfig {
            top_n: 3,
            ..UniverseConfig::default()
        };
        assert_eq!(
            select_universe(&tickers, &cfg),
            vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]
        );
    }

    #[test]
    fn filters_quote_asset() {
        let tickers = vec![t("ETHBTC", 1e9), t("BTCUSDC", 1e9), t("BTCUSDT", 1.0), t("USDT", 5.0)];
        assert_eq!(
            select_universe(&tickers, &UniverseConfig::default()),
            vec!["BTCUSDT"]
        );
    }

    #[test]
    fn excludes_leveraged_tokens() {
        let tickers = vec![
            t("BTC3LUSDT", 1e9),
            t("BTC3SUSDT", 1e9),
            t("ETH5LUSDT", 1e9),
            t("BTCUSDT", 10.0),
        ];
        assert_eq!(
            select_universe(&tickers, &UniverseConfig::default()),
            vec!["BTCUSDT"]
        );
    }

    #[test]
    fn applies_minimum_volume() {
        let tickers = vec![t("BTCUSDT", 1_000_000.0), t("PEPEUSDT", 999.0), t("NANUSDT", f64::NAN)];
        let cfg = UniverseConfig {
            min_quote_volume: 1_000.0,
            ..UniverseConfig::default()
        };
        assert_eq!(select_universe(&tickers, &cfg), vec!["BTCUSDT"]);
    }

    #[test]
    fn equal_volumes_keep_input_order() {
        let tickers = vec![t("AUSDT", 1.0), t("BUSDT", 1.0), t("CUSDT", 1.0)];
        assert_eq!(
            select_universe(&tickers, &UniverseConfig::default()),
            vec!["AUSDT", "BUSDT", "CUSDT"]
        );
    }

    #[test]
    fn empty_input_gives_empty_universe() {
        assert!(select_universe(&[], &UniverseConfig::default()).is_empty());
    }
}
