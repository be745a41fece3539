use async_trait::async_trait;

use crate::{Candle, Match, Result, Ticker, Timeframe};

/// Abstraction over the market-data source.
///
/// `MexcClient` in `crates/engine` implements this against the MEXC spot
/// REST API. Tests substitute in-memory fakes.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch up to `limit` candles, oldest first. The last candle is the one
    /// still forming.
    async fn candles(&self, symbol: &str, timeframe: Timeframe, limit: usize)
        -> Result<Vec<Candle>>;

    /// Fetch 24h ticker statistics for every listed symbol.
    async fn tickers(&self) -> Result<Vec<Ticker>>;
}

/// Delivers the matches of one scan cycle to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single notification covering all `matches`.
    /// Called at most once per cycle and only with a non-empty slice.
    async fn notify(&self, matches: &[Match]) -> Result<()>;
}
