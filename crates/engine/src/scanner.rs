use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use common::{Config, Error, MarketData, Match, Result, Timeframe};
use strategy::PatternDetector;

use crate::pacer::Pacer;
use crate::universe::{select_universe, UniverseConfig};

/// Everything the scanner needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Checked in order; the first timeframe that matches wins.
    pub timeframes: Vec<Timeframe>,
    pub universe: UniverseConfig,
    /// Extra per-cycle cap applied after universe selection.
    pub max_symbols: Option<usize>,
    /// Minimum spacing between per-symbol fetches.
    pub request_delay: Duration,
    /// Symbols evaluated at once. 1 means strictly sequential.
    pub concurrency: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            timeframes: vec![Timeframe::H1, Timeframe::H4],
            universe: UniverseConfig::default(),
            max_symbols: None,
            request_delay: Duration::from_millis(100),
            concurrency: 1,
        }
    }
}

impl From<&Config> for ScanSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            timeframes: cfg.timeframes.clone(),
            universe: UniverseConfig::from(cfg),
            max_symbols: cfg.max_symbols_per_cycle,
            request_delay: cfg.request_delay,
            concurrency: cfg.scan_concurrency,
        }
    }
}

/// Result of one pass over the universe.
#[derive(Debug, Clone, Default)]
pub struct ScanCycle {
    /// Matches in discovery order, at most one per symbol.
    pub matches: Vec<Match>,
    pub symbols_scanned: usize,
    /// (symbol, timeframe) pairs skipped for fetch errors or short series.
    pub pairs_skipped: usize,
    /// True when cancellation cut the cycle short.
    pub cancelled: bool,
}

/// Outcome of checking one symbol across all timeframes.
#[derive(Debug, Default)]
struct SymbolScan {
    matched: Option<Match>,
    skipped: usize,
}

/// Drives one scan cycle: universe → candles → detector → matches.
pub struct Scanner {
    client: Arc<dyn MarketData>,
    detector: Arc<dyn PatternDetector>,
    settings: ScanSettings,
}

impl Scanner {
    pub fn new(
        client: Arc<dyn MarketData>,
        detector: Arc<dyn PatternDetector>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            client,
            detector,
            settings,
        }
    }

    /// Candles requested per fetch: the detector's minimum plus a little slack.
    pub fn candle_limit(&self) -> usize {
        self.detector.min_candles() + 2
    }

    /// Fetch tickers and pick the symbols for this cycle.
    pub async fn select_symbols(&self) -> Result<Vec<String>> {
        let tickers = self.client.tickers().await?;
        let mut symbols = select_universe(&tickers, &self.settings.universe);
        if let Some(max) = self.settings.max_symbols {
            symbols.truncate(max);
        }
        Ok(symbols)
    }

    /// Run a full cycle. A universe failure yields an empty cycle.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> ScanCycle {
        let selected = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return ScanCycle { cancelled: true, ..ScanCycle::default() };
            }
            selected = self.select_symbols() => selected,
        };

        let symbols = match selected {
            Ok(symbols) => symbols,
            Err(e) => {
                error!(error = %e, "Universe selection failed; skipping this cycle");
                return ScanCycle::default();
            }
        };

        info!(
            symbols = symbols.len(),
            timeframes = ?self.settings.timeframes,
            detector = %self.detector.name(),
            "Scan cycle started"
        );
        let cycle = self.scan_symbols(&symbols, cancel).await;
        info!(
            matches = cycle.matches.len(),
            scanned = cycle.symbols_scanned,
            skipped = cycle.pairs_skipped,
            cancelled = cycle.cancelled,
            "Scan cycle finished"
        );
        cycle
    }

    /// Evaluate `symbols` and collect matches in symbol order.
    pub async fn scan_symbols(&self, symbols: &[String], cancel: &CancellationToken) -> ScanCycle {
        let pacer = Pacer::new(self.settings.request_delay);
        let mut cycle = ScanCycle::default();

        let results = stream::iter(symbols.iter().cloned())
            .map(|symbol| {
                let pacer = &pacer;
                async move {
                    pacer.wait().await;
                    self.evaluate_symbol(&symbol).await
                }
            })
            .buffered(self.settings.concurrency.max(1));
        tokio::pin!(results);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(scanned = cycle.symbols_scanned, "Scan cancelled mid-cycle");
                    cycle.cancelled = true;
                    break;
                }
                next = results.next() => match next {
                    Some(scan) => {
                        cycle.symbols_scanned += 1;
                        cycle.pairs_skipped += scan.skipped;
                        cycle.matches.extend(scan.matched);
                    }
                    None => break,
                },
            }
        }
        cycle
    }

    /// Check one symbol across the configured timeframes; first match wins.
    pub async fn scan_symbol(&self, symbol: &str) -> Option<Match> {
        self.evaluate_symbol(symbol).await.matched
    }

    async fn evaluate_symbol(&self, symbol: &str) -> SymbolScan {
        let mut scan = SymbolScan::default();
        let limit = self.candle_limit();

        for &timeframe in &self.settings.timeframes {
            let candles = match self.client.candles(symbol, timeframe, limit).await {
                Ok(candles) => candles,
                Err(Error::RateLimited(msg)) => {
                    warn!(symbol = %symbol, timeframe = %timeframe, %msg, "Rate limited; skipping");
                    scan.skipped += 1;
                    continue;
                }
                Err(e) if e.is_transient() => {
                    debug!(symbol = %symbol, timeframe = %timeframe, error = %e, "Fetch failed; skipping");
                    scan.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(symbol = %symbol, timeframe = %timeframe, error = %e, "Unexpected fetch error; skipping");
                    scan.skipped += 1;
                    continue;
                }
            };

            if candles.len() < self.detector.min_candles() {
                debug!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    got = candles.len(),
                    need = self.detector.min_candles(),
                    "Not enough candles; skipping"
                );
                scan.skipped += 1;
                continue;
            }

            if let Some(detection) = self.detector.detect(&candles) {
                let signal = &candles[candles.len() - 2];
                info!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    direction = %detection.direction,
                    pattern = detection.pattern,
                    "Pattern matched"
                );
                scan.matched = Some(Match {
                    symbol: symbol.to_string(),
                    timeframe,
                    direction: detection.direction,
                    pattern: detection.pattern.to_string(),
                    wick: detection.wick,
                    price: signal.close,
                    candle_time: signal.open_time,
                });
                break;
            }
        }
        scan
    }
}
