//! Per-signature auto-refresh controller.

use std::sync::Arc;

use clusterpulse_types::{StatusSnapshot, TransactionSignature};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::card::{RefreshIndicator, StatusView};
use super::fetch::{FetchStatus, StatusEvent, StatusFetcher};
use super::machine::{evaluate, AutoRefresh};
use super::timer::RefreshTimer;
use crate::config::{RefreshSettings, Settings};
use crate::error::Fault;

/// Decides when to poll a transaction's status and owns the polling timer.
///
/// The controller never waits on a fetch. It asks its [`StatusFetcher`] to
/// start one and learns the outcome through [`observe`](Self::observe).
/// After every input the phase is re-evaluated; entering
/// [`AutoRefresh::Active`] arms the timer and leaving it stops the timer, so
/// at most one timer exists and none survives the controller.
///
/// Arming the timer needs a tokio runtime on the calling thread. An active
/// controller with no timer arms one on the next input made inside a runtime.
#[derive(Debug)]
pub struct RefreshController<F: StatusFetcher> {
    signature: TransactionSignature,
    fetcher: Arc<F>,
    settings: RefreshSettings,
    first_available_block: u64,

    visible: bool,
    zero_confirmation_retries: u32,
    last_status: Option<StatusSnapshot>,
    fetch_status: Option<FetchStatus>,
    phase: AutoRefresh,
    timer: Option<RefreshTimer>,
}

impl<F: StatusFetcher> RefreshController<F> {
    /// Create a controller for `signature`. It starts visible and inactive.
    pub fn new(signature: TransactionSignature, fetcher: Arc<F>, settings: &Settings) -> Self {
        Self {
            signature,
            fetcher,
            settings: settings.refresh,
            first_available_block: settings.cluster.first_available_block,
            visible: true,
            zero_confirmation_retries: 0,
            last_status: None,
            fetch_status: None,
            phase: AutoRefresh::Inactive,
            timer: None,
        }
    }

    /// Issue the initial fetch if nothing has been fetched yet.
    pub fn load(&mut self) {
        if self.fetch_status.is_none() {
            self.refresh();
        }
    }

    /// Manually fetch now. The only way out of [`AutoRefresh::BailedOut`].
    pub fn refresh(&mut self) {
        self.fetcher.fetch(&self.signature);
        self.observe(StatusEvent::Fetching);
    }

    /// Apply a report from the fetch collaborator.
    pub fn observe(&mut self, event: StatusEvent) {
        match event {
            // Only an observed fetch start resets the counter; becoming visible
            // while a fetch is already in flight leaves it as is.
            StatusEvent::Fetching => {
                self.fetch_status = Some(FetchStatus::Fetching);
                if self.phase == AutoRefresh::BailedOut {
                    debug!(signature = %self.signature.abbreviated(), "retry counter reset");
                    self.zero_confirmation_retries = 0;
                }
            }
            StatusEvent::Fetched(snapshot) => {
                self.fetch_status = Some(FetchStatus::Fetched);
                if snapshot.has_zero_confirmations() {
                    self.zero_confirmation_retries =
                        self.zero_confirmation_retries.saturating_add(1);
                }
                debug!(
                    signature = %self.signature.abbreviated(),
                    slot = snapshot.slot,
                    confirmations = ?snapshot.confirmations,
                    retries = self.zero_confirmation_retries,
                    "status fetched"
                );
                self.last_status = Some(snapshot);
            }
            StatusEvent::NotFound => {
                self.fetch_status = Some(FetchStatus::Fetched);
                self.last_status = None;
                debug!(signature = %self.signature.abbreviated(), "signature not found");
            }
            StatusEvent::FetchFailed => {
                self.fetch_status = Some(FetchStatus::FetchFailed);
                debug!(signature = %self.signature.abbreviated(), "status fetch failed");
            }
        }
        self.reconcile();
    }

    /// Record whether the status view is on screen.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.reconcile();
        }
    }

    /// Switch to another signature, discarding everything known about the
    /// previous one.
    pub fn track(&mut self, signature: TransactionSignature) {
        self.stop_timer();
        self.signature = signature;
        self.zero_confirmation_retries = 0;
        self.last_status = None;
        self.fetch_status = None;
        self.phase = AutoRefresh::Inactive;
    }

    /// Stop polling for good.
    pub fn detach(mut self) {
        self.stop_timer();
    }

    pub fn signature(&self) -> &TransactionSignature {
        &self.signature
    }

    pub fn phase(&self) -> AutoRefresh {
        self.phase
    }

    pub fn zero_confirmation_retries(&self) -> u32 {
        self.zero_confirmation_retries
    }

    pub fn last_status(&self) -> Option<&StatusSnapshot> {
        self.last_status.as_ref()
    }

    pub fn fetch_status(&self) -> Option<FetchStatus> {
        self.fetch_status
    }

    /// Returns true while a timer task is armed.
    pub fn is_polling(&self) -> bool {
        self.timer.is_some()
    }

    pub fn indicator(&self) -> RefreshIndicator {
        match self.phase {
            AutoRefresh::Active => RefreshIndicator::Spinner,
            AutoRefresh::Inactive | AutoRefresh::BailedOut => RefreshIndicator::RefreshButton,
        }
    }

    /// Classify what the status card should show.
    pub fn view(&self) -> StatusView {
        match self.fetch_status {
            None => StatusView::Loading,
            Some(FetchStatus::Fetching) if self.phase == AutoRefresh::Inactive => {
                StatusView::Loading
            }
            Some(FetchStatus::FetchFailed) => StatusView::FetchFailed,
            Some(_) => match self.last_status {
                Some(snapshot) => StatusView::Found(snapshot),
                None => StatusView::NotFound {
                    first_available_block: self.first_available_block,
                },
            },
        }
    }

    /// The fault to surface, if any.
    pub fn fault(&self) -> Option<Fault> {
        if self.phase == AutoRefresh::BailedOut {
            Some(Fault::StalledConfirmation {
                retries: self.zero_confirmation_retries,
            })
        } else if self.fetch_status == Some(FetchStatus::FetchFailed) {
            Some(Fault::FetchFailure)
        } else {
            None
        }
    }

    fn reconcile(&mut self) {
        let next = evaluate(
            self.visible,
            self.zero_confirmation_retries,
            self.settings.zero_confirmation_bailout,
            self.last_status.as_ref(),
        );
        if next == self.phase {
            if next == AutoRefresh::Active && self.timer.is_none() {
                self.arm_timer();
            }
            return;
        }

        debug!(
            signature = %self.signature.abbreviated(),
            from = self.phase.symbol(),
            to = next.symbol(),
            "auto-refresh phase changed"
        );

        if self.phase == AutoRefresh::Active {
            self.stop_timer();
        }
        self.phase = next;
        if next == AutoRefresh::Active {
            self.arm_timer();
        }
    }

    fn arm_timer(&mut self) {
        self.stop_timer();
        match Handle::try_current() {
            Ok(runtime) => {
                self.timer = Some(RefreshTimer::start(
                    &runtime,
                    self.settings.interval(),
                    self.signature.clone(),
                    self.fetcher.clone(),
                ));
            }
            Err(_) => warn!("no tokio runtime, auto-refresh timer not armed"),
        }
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}

impl<F: StatusFetcher> Drop for RefreshController<F> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::ChannelFetcher;
    use clusterpulse_types::Confirmations;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::sleep;

    const SIG_A: &str =
        "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";
    const SIG_B: &str =
        "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi5bE4fSbg4gGC2CKz5gFpj9Er6MYbQ4vHq1ZQ48G3AbZXk";

    fn fetched(confirmations: Confirmations) -> StatusEvent {
        StatusEvent::Fetched(
            StatusSnapshot::builder()
                .confirmations(confirmations)
                .slot(100)
                .fetched_at_ms(0)
                .build(),
        )
    }

    fn controller() -> (
        RefreshController<ChannelFetcher>,
        UnboundedReceiver<TransactionSignature>,
    ) {
        let (fetcher, rx) = ChannelFetcher::create();
        let controller =
            RefreshController::new(SIG_A.parse().unwrap(), Arc::new(fetcher), &Settings::default());
        (controller, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<TransactionSignature>) -> usize {
        let mut n = 0;
        while rx.try_recv().is_ok() {
            n += 1;
        }
        n
    }

    #[tokio::test]
    async fn test_load_fetches_once() {
        let (mut controller, mut rx) = controller();
        assert_eq!(controller.view(), StatusView::Loading);

        controller.load();
        assert_eq!(drain(&mut rx), 1);
        assert_eq!(controller.fetch_status(), Some(FetchStatus::Fetching));
        assert_eq!(controller.view(), StatusView::Loading);

        controller.observe(fetched(Confirmations::Count(3)));
        controller.load();
        assert_eq!(drain(&mut rx), 0);
    }

    #[tokio::test]
    async fn test_unconfirmed_status_activates_polling() {
        let (mut controller, _rx) = controller();
        controller.observe(fetched(Confirmations::Count(1)));

        assert_eq!(controller.phase(), AutoRefresh::Active);
        assert!(controller.is_polling());
        assert_eq!(controller.indicator(), RefreshIndicator::Spinner);
        assert!(matches!(controller.view(), StatusView::Found(_)));
    }

    #[tokio::test]
    async fn test_invisible_forces_inactive() {
        let (mut controller, _rx) = controller();
        controller.observe(fetched(Confirmations::Count(1)));

        controller.set_visible(false);
        assert_eq!(controller.phase(), AutoRefresh::Inactive);
        assert!(!controller.is_polling());

        controller.observe(fetched(Confirmations::Count(2)));
        assert_eq!(controller.phase(), AutoRefresh::Inactive);

        controller.set_visible(true);
        assert_eq!(controller.phase(), AutoRefresh::Active);
        assert!(controller.is_polling());
    }

    #[tokio::test]
    async fn test_five_zero_confirmations_bail_out() {
        let (mut controller, _rx) = controller();

        for i in 1..=4 {
            controller.observe(fetched(Confirmations::Count(0)));
            assert_eq!(controller.zero_confirmation_retries(), i);
            assert_eq!(controller.phase(), AutoRefresh::Active);
        }

        controller.observe(fetched(Confirmations::Count(0)));
        assert_eq!(controller.phase(), AutoRefresh::BailedOut);
        assert!(!controller.is_polling());
        assert_eq!(controller.indicator(), RefreshIndicator::RefreshButton);
        assert_eq!(
            controller.fault(),
            Some(Fault::StalledConfirmation { retries: 5 })
        );
    }

    #[tokio::test]
    async fn test_manual_refresh_leaves_bailout() {
        let (mut controller, mut rx) = controller();
        for _ in 0..5 {
            controller.observe(fetched(Confirmations::Count(0)));
        }
        assert_eq!(controller.phase(), AutoRefresh::BailedOut);

        controller.refresh();
        assert_eq!(drain(&mut rx), 1);
        assert_eq!(controller.zero_confirmation_retries(), 0);
        assert_eq!(controller.phase(), AutoRefresh::Active);
        assert!(controller.is_polling());
        assert!(controller.fault().is_none());
    }

    #[tokio::test]
    async fn test_fetching_while_not_bailed_keeps_retries() {
        let (mut controller, _rx) = controller();
        controller.observe(fetched(Confirmations::Count(0)));
        controller.observe(fetched(Confirmations::Count(0)));

        controller.observe(StatusEvent::Fetching);
        assert_eq!(controller.zero_confirmation_retries(), 2);
    }

    #[tokio::test]
    async fn test_max_confirmations_stop_polling() {
        let (mut controller, _rx) = controller();
        controller.observe(fetched(Confirmations::Count(1)));
        assert!(controller.is_polling());

        controller.observe(fetched(Confirmations::Max));
        assert_eq!(controller.phase(), AutoRefresh::Inactive);
        assert!(!controller.is_polling());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_retryable_and_keeps_retries() {
        let (mut controller, _rx) = controller();
        controller.observe(fetched(Confirmations::Count(0)));
        controller.observe(StatusEvent::FetchFailed);

        assert_eq!(controller.view(), StatusView::FetchFailed);
        assert_eq!(controller.fault(), Some(Fault::FetchFailure));
        assert_eq!(controller.zero_confirmation_retries(), 1);
        assert_eq!(controller.phase(), AutoRefresh::Active);
    }

    #[tokio::test]
    async fn test_not_found_view() {
        let (fetcher, _rx) = ChannelFetcher::create();
        let mut settings = Settings::default();
        settings.cluster.first_available_block = 42;
        let mut controller =
            RefreshController::new(SIG_A.parse().unwrap(), Arc::new(fetcher), &settings);

        controller.observe(StatusEvent::NotFound);
        assert_eq!(controller.phase(), AutoRefresh::Inactive);
        assert_eq!(
            controller.view(),
            StatusView::NotFound {
                first_available_block: 42
            }
        );
    }

    #[tokio::test]
    async fn test_track_discards_previous_state() {
        let (mut controller, _rx) = controller();
        for _ in 0..3 {
            controller.observe(fetched(Confirmations::Count(0)));
        }

        controller.track(SIG_B.parse().unwrap());
        assert_eq!(controller.signature().as_str(), SIG_B);
        assert_eq!(controller.zero_confirmation_retries(), 0);
        assert!(controller.last_status().is_none());
        assert_eq!(controller.phase(), AutoRefresh::Inactive);
        assert!(!controller.is_polling());
        assert_eq!(controller.view(), StatusView::Loading);
    }

    #[test]
    fn test_timer_armed_once_runtime_available() {
        let (mut controller, mut rx) = controller();
        controller.observe(fetched(Confirmations::Count(1)));
        assert_eq!(controller.phase(), AutoRefresh::Active);
        assert!(!controller.is_polling());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        runtime.block_on(async {
            controller.observe(fetched(Confirmations::Count(2)));
            assert_eq!(controller.phase(), AutoRefresh::Active);
            assert!(controller.is_polling());

            sleep(Duration::from_millis(2001)).await;
            assert_eq!(drain(&mut rx), 1);
            controller.detach();
        });
    }

    #[tokio::test]
    async fn test_active_always_has_timer() {
        let (mut controller, mut rx) = controller();
        let inputs = [
            fetched(Confirmations::Count(1)),
            StatusEvent::FetchFailed,
            fetched(Confirmations::Count(0)),
            StatusEvent::Fetching,
            fetched(Confirmations::Max),
            fetched(Confirmations::Count(4)),
            StatusEvent::NotFound,
            fetched(Confirmations::Count(2)),
        ];
        for event in inputs {
            controller.observe(event);
            assert_eq!(
                controller.phase() == AutoRefresh::Active,
                controller.is_polling()
            );
        }

        controller.set_visible(false);
        assert!(!controller.is_polling());
        controller.set_visible(true);
        assert_eq!(controller.phase(), AutoRefresh::Active);
        assert!(controller.is_polling());
        drain(&mut rx);
    }

    #[tokio::test]
    async fn test_retry_counter_saturates() {
        let (fetcher, _rx) = ChannelFetcher::create();
        let mut settings = Settings::default();
        settings.refresh.zero_confirmation_bailout = u32::MAX;
        let mut controller =
            RefreshController::new(SIG_A.parse().unwrap(), Arc::new(fetcher), &settings);
        controller.zero_confirmation_retries = u32::MAX - 1;

        controller.observe(fetched(Confirmations::Count(0)));
        controller.observe(fetched(Confirmations::Count(0)));
        assert_eq!(controller.zero_confirmation_retries(), u32::MAX);
        assert_eq!(controller.phase(), AutoRefresh::BailedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ten_active_ticks_fetch_ten_times() {
        let (mut controller, mut rx) = controller();
        controller.observe(fetched(Confirmations::Count(1)));

        sleep(Duration::from_millis(1)).await;
        for _ in 0..10 {
            sleep(Duration::from_millis(2000)).await;
            assert_eq!(drain(&mut rx), 1);
        }

        controller.observe(fetched(Confirmations::Max));
        sleep(Duration::from_secs(60)).await;
        assert_eq!(drain(&mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_and_detached_controllers_do_not_fetch() {
        let (mut controller, mut rx) = controller();
        controller.observe(fetched(Confirmations::Count(1)));
        controller.set_visible(false);
        sleep(Duration::from_secs(60)).await;
        assert_eq!(drain(&mut rx), 0);

        controller.set_visible(true);
        controller.detach();
        sleep(Duration::from_secs(60)).await;
        assert_eq!(drain(&mut rx), 0);
    }
}
