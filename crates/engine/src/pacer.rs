use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};

/// Spaces out upstream requests. Every caller shares one interval, so the
/// configured delay holds in aggregate no matter how many tasks are waiting.
///
/// Must be created inside a Tokio runtime.
pub struct Pacer {
    interval: Option<Mutex<Interval>>,
}

impl Pacer {
    /// A zero delay disables pacing.
    pub fn new(delay: Duration) -> Self {
        let interval = (!delay.is_zero()).then(|| {
            let mut interval = tokio::time::interval(delay);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Mutex::new(interval)
        });
        Self { interval }
    }

    /// Wait for the next free slot. The first call returns immediately.
    pub async fn wait(&self) {
        if let Some(interval) = &self.interval {
            interval.lock().await.tick().await;
        }
    }
}
