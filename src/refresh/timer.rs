//! The repeating fetch timer behind `AutoRefresh::Active`.

use std::sync::Arc;
use std::time::Duration;

use clusterpulse_types::TransactionSignature;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::StatusFetcher;

/// A running refresh timer.
///
/// Issues one fetch per period, starting one period after
/// [`start`](Self::start). Stop it explicitly with [`stop`](Self::stop) or
/// drop it; either way no fetch is issued afterwards.
#[derive(Debug)]
pub struct RefreshTimer {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshTimer {
    /// Spawn the timer task on `runtime`.
    pub fn start<F: StatusFetcher>(
        runtime: &Handle,
        period: Duration,
        signature: TransactionSignature,
        fetcher: Arc<F>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = runtime.spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticks.tick() => fetcher.fetch(&signature),
                }
            }
        });

        Self { stop_tx, task }
    }

    /// Stop the timer.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
        self.task.abort();
    }
}
