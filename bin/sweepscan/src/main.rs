use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, Notifier};
use engine::{MexcClient, ScanLoop, ScanSettings, Scanner};
use notify::{LogNotifier, WebhookNotifier};
use strategy::{build_detector, PatternFileConfig};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    let pattern_cfg = match &cfg.pattern_config_path {
        Some(path) => PatternFileConfig::load(path)
            .unwrap_or_else(|e| panic!("Failed to load pattern config: {e}")),
        None => PatternFileConfig::default(),
    };
    info!(
        mode = ?pattern_cfg.mode,
        timeframes = ?cfg.timeframes,
        top_n = cfg.top_n_pairs,
        "SweepScan starting"
    );

    // ── Collaborators ─────────────────────────────────────────────────────────
    let client = MexcClient::new(&cfg.exchange_base_url, cfg.fetch_timeout)
        .unwrap_or_else(|e| panic!("Failed to build exchange client: {e}"));

    let notifier: Arc<dyn Notifier> = match &cfg.webhook_url {
        Some(url) => Arc::new(
            WebhookNotifier::new(url, cfg.max_message_len, cfg.fetch_timeout)
                .unwrap_or_else(|e| panic!("Failed to build webhook client: {e}")),
        ),
        None => {
            warn!("WEBHOOK_URL not set; alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let scanner = Scanner::new(
        Arc::new(client),
        Arc::from(build_detector(&pattern_cfg)),
        ScanSettings::from(&cfg),
    );
    let (scan_loop, _handle) = ScanLoop::new(scanner, notifier, cfg.scan_interval);

    // ── Shutdown ──────────────────────────────────────────────────────────────
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to listen for shutdown signal: {e}"),
            }
            cancel.cancel();
        });
    }

    if cfg.scan_once {
        let cycle = scan_loop.run_once(&cancel).await;
        info!(matches = cycle.matches.len(), "Single scan finished");
    } else {
        scan_loop.run(cancel).await;
    }
    info!("Exiting.");
}
