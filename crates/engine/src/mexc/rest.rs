use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use common::{Candle, Error, MarketData, Result, Ticker, Timeframe};

/// REST client for the public MEXC spot market endpoints.
/// Only unauthenticated market data is used, so no request signing.
pub struct MexcClient {
    base_url: String,
    http: Client,
}

impl MexcClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn public_get(&self, path: &str, query: &str) -> Result<String> {
        let url = if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        };

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        // 418 is sent once a client keeps ignoring 429s.
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT {
            return Err(Error::RateLimited(format!("HTTP {status} on {path}")));
        }
        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketData for MexcClient {
    async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let query = format!(
            "symbol={}&interval={}&limit={limit}",
            symbol.to_uppercase(),
            timeframe.exchange_code()
        );
        debug!(symbol = %symbol, timeframe = %timeframe, limit, "Fetching klines");
        let body = self.public_get("/api/v3/klines", &query).await?;
        parse_klines(&body)
    }

    async fn tickers(&self) -> Result<Vec<Ticker>> {
        let body = self.public_get("/api/v3/ticker/24hr", "").await?;
        parse_tickers(&body)
    }
}

// ─── MEXC JSON parsing ────────────────────────────────────────────────────────

/// Kline rows are arrays: `[openTime, open, high, low, close, volume, closeTime, quoteVolume]`
/// with prices as numeric strings. Rows arrive oldest first.
pub(crate) fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;
    rows.iter().map(|row| parse_kline_row(row)).collect()
}

fn parse_kline_row(row: &[Value]) -> Result<Candle> {
    if row.len() < 6 {
        return Err(Error::Exchange(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }
    let open_ms = row[0]
        .as_i64()
        .ok_or_else(|| Error::Exchange(format!("invalid kline open time: {}", row[0])))?;
    let open_time = Utc
        .timestamp_millis_opt(open_ms)
        .single()
        .ok_or_else(|| Error::Exchange(format!("kline open time out of range: {open_ms}")))?;

    Ok(Candle {
        open_time,
        open: number(&row[1], "open")?,
        high: number(&row[2], "high")?,
        low: number(&row[3], "low")?,
        close: number(&row[4], "close")?,
        volume: number(&row[5], "volume")?,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerRow {
    symbol: String,
    #[serde(default)]
    quote_volume: Option<Value>,
}

/// Missing or unparseable volumes count as zero so the pair ranks last.
pub(crate) fn parse_tickers(body: &str) -> Result<Vec<Ticker>> {
    let rows: Vec<TickerRow> = serde_json::from_str(body)?;
    Ok(rows
        .into_iter()
        .map(|row| Ticker {
            quote_volume: row
                .quote_volume
                .as_ref()
                .and_then(|v| number(v, "quoteVolume").ok())
                .unwrap_or(0.0),
            symbol: row.symbol,
        })
        .collect())
}

fn number(value: &Value, field: &str) -> Result<f64> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Exchange(format!("invalid {field} value: {value}")))
}
