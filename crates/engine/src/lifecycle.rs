use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use common::{Notifier, ScanState};

use crate::scanner::{ScanCycle, Scanner};

/// Summary of the most recent completed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    pub finished_at: DateTime<Utc>,
    pub matches: usize,
    pub symbols_scanned: usize,
    pub pairs_skipped: usize,
}

/// Cloneable read-only view of the scan loop.
#[derive(Clone)]
pub struct ScanHandle {
    state: Arc<RwLock<ScanState>>,
    last_cycle: Arc<RwLock<Option<CycleSummary>>>,
}

impl ScanHandle {
    pub async fn state(&self) -> ScanState {
        *self.state.read().await
    }

    pub async fn last_cycle(&self) -> Option<CycleSummary> {
        self.last_cycle.read().await.clone()
    }
}

/// Repeats scan cycles on a fixed interval until cancelled.
///
/// States: `Idle` while sleeping, `Scanning` while a cycle runs. There is no
/// terminal state other than cancellation.
pub struct ScanLoop {
    scanner: Scanner,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    state: Arc<RwLock<ScanState>>,
    last_cycle: Arc<RwLock<Option<CycleSummary>>>,
}

impl ScanLoop {
    pub fn new(scanner: Scanner, notifier: Arc<dyn Notifier>, interval: Duration) -> (Self, ScanHandle) {
        let state = Arc::new(RwLock::new(ScanState::Idle));
        let last_cycle = Arc::new(RwLock::new(None));

        let handle = ScanHandle {
            state: state.clone(),
            last_cycle: last_cycle.clone(),
        };

        let scan_loop = ScanLoop {
            scanner,
            notifier,
            interval,
            state,
            last_cycle,
        };

        (scan_loop, handle)
    }

    /// Run a single cycle and notify if it found anything.
    /// A cancelled cycle is discarded without notifying.
    pub async fn run_once(&self, cancel: &CancellationToken) -> ScanCycle {
        *self.state.write().await = ScanState::Scanning;
        let cycle = self.scanner.run_cycle(cancel).await;
        *self.state.write().await = ScanState::Idle;

        if cycle.cancelled {
            return cycle;
        }

        *self.last_cycle.write().await = Some(CycleSummary {
            finished_at: Utc::now(),
            matches: cycle.matches.len(),
            symbols_scanned: cycle.symbols_scanned,
            pairs_skipped: cycle.pairs_skipped,
        });

        if cycle.matches.is_empty() {
            info!("Scan complete. No patterns found.");
        } else {
            match self.notifier.notify(&cycle.matches).await {
                Ok(()) => info!(alerts = cycle.matches.len(), "Alerts delivered"),
                Err(e) => error!(error = %e, alerts = cycle.matches.len(), "Failed to deliver alerts"),
            }
        }
        cycle
    }

    /// Run the loop. Call from `tokio::spawn` or await directly.
    pub async fn run(self, cancel: CancellationToken) {
        info!(interval = ?self.interval, "Scan loop running");
        loop {
            if cancel.is_cancelled() {
                break;
            }
            let cycle = self.run_once(&cancel).await;
            if cycle.cancelled {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => break,
            }
        }
        info!("Scan loop stopped");
    }
}
