use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use common::{Error, Match, Notifier, Result};

use crate::render::render_alert;

/// Posts one message per cycle to a Discord-compatible webhook
/// (`{"content": "..."}` JSON body).
pub struct WebhookNotifier {
    url: String,
    max_len: usize,
    http: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, max_len: usize, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            max_len,
            http,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, matches: &[Match]) -> Result<()> {
        let content = render_alert(matches, self.max_len);
        debug!(chars = content.chars().count(), "Posting webhook alert");

        let resp = self
            .http
            .post(&self.url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Notify(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

/// Fallback when no webhook is configured: matches only go to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, matches: &[Match]) -> Result<()> {
        for m in matches {
            info!(
                symbol = %m.symbol,
                timeframe = %m.timeframe,
                direction = %m.direction,
                pattern = %m.pattern,
                wick = ?m.wick,
                price = m.price,
                "Pattern alert (no webhook configured)"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{Direction, Timeframe};
    use mockito::Matcher;

    fn sample() -> Vec<Match> {
        vec![Match {
            symbol: "BTCUSDT".into(),
            timeframe: Timeframe::H4,
            direction: Direction::Bullish,
            pattern: "sweep".into(),
            wick: Some(2.5),
            price: 103.0,
            candle_time: Utc::now(),
        }]
    }

    #[tokio::test]
    async fn posts_rendered_content_as_json() {
        let mut server = mockito::Server::new_async().await;
        let expected = render_alert(&sample(), 2000);
        assert!(expected.contains("**BTCUSDT** [4h]\nBULLISH 🟢 (Wick: 2.5000)"));
        let hook = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "content": expected })))
            .with_status(204)
            .create_async()
            .await;

        let notifier =
            WebhookNotifier::new(format!("{}/hook", server.url()), 2000, Duration::from_secs(5))
                .unwrap();
        notifier.notify(&sample()).await.unwrap();

        hook.assert_async().await;
    }

    #[tokio::test]
    async fn long_alert_is_truncated_before_posting() {
        let mut server = mockito::Server::new_async().await;
        let matches: Vec<Match> = sample().into_iter().cycle().take(50).collect();
        let hook = server
            .mock("POST", "/hook")
            .match_body(Matcher::Json(json!({ "content": render_alert(&matches, 120) })))
            .with_status(204)
            .create_async()
            .await;

        let notifier =
            WebhookNotifier::new(format!("{}/hook", server.url()), 120, Duration::from_secs(5))
                .unwrap();
        notifier.notify(&matches).await.unwrap();

        hook.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_notify_error() {
        let mut server = mockito::Server::new_async().await;
        let hook = server
            .mock("POST", "/hook")
            .with_status(429)
            .with_body("You are being rate limited.")
            .create_async()
            .await;

        let notifier =
            WebhookNotifier::new(format!("{}/hook", server.url()), 2000, Duration::from_secs(5))
                .unwrap();
        let err = notifier.notify(&sample()).await.unwrap_err();

        assert!(matches!(err, Error::Notify(ref msg) if msg.contains("429")));
        hook.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_webhook_is_notify_error() {
        let notifier =
            WebhookNotifier::new("http://127.0.0.1:9/hook", 2000, Duration::from_secs(2)).unwrap();
        assert!(matches!(
            notifier.notify(&sample()).await,
            Err(Error::Notify(_))
        ));
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        assert!(LogNotifier.notify(&sample()).await.is_ok());
    }
}
