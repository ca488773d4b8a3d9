use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clusterpulse::refresh::{ChannelFetcher, RefreshIndicator};
use clusterpulse::{
    App, AutoRefresh, ClusterSettings, ClusterStatsStatus, Confirmations, FileSource, Settings,
    StatusEvent, StatusSnapshot, StatusView,
};
use tempfile::NamedTempFile;

const SIGNATURE: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

fn samples_line(totals: &[u64]) -> String {
    let samples: Vec<String> = totals
        .iter()
        .map(|t| {
            format!(
                r#"{{"numTransactions":{},"numNonVoteTransactions":{},"numSlots":150,"samplePeriodSecs":60}}"#,
                t,
                t / 4
            )
        })
        .collect();
    format!(r#"{{"type":"perfSamples","data":[{}]}}"#, samples.join(","))
}

#[test]
fn file_feed_replays_into_ready_stats() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", samples_line(&[12_000, 6_000])).unwrap();
    writeln!(file, r#"{{"type":"transactionCount","data":312456789}}"#).unwrap();

    let mut app = App::new(Box::new(FileSource::new(file.path())), ClusterSettings::default());
    assert_eq!(app.reload_data(), 2);

    let info = app.performance();
    assert_eq!(info.status, ClusterStatsStatus::Ready);
    assert_eq!(info.avg_tps, 150.0);
    assert_eq!(info.perf_history.short, vec![100.0, 200.0]);

    let summary = app.stats(ClusterStatsStatus::Ready).unwrap();
    assert_eq!(summary.total_tps, "150");

    // Appended lines are picked up on the next reload
    writeln!(file, r#"{{"type":"error","data":"node unhealthy"}}"#).unwrap();
    file.flush().unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(app.reload_data(), 1);
    assert_eq!(app.performance().status, ClusterStatsStatus::Error);
    assert_eq!(app.performance().avg_tps, 150.0);
}

fn fetched(confirmations: Confirmations) -> StatusEvent {
    StatusEvent::Fetched(
        StatusSnapshot::builder()
            .confirmations(confirmations)
            .slot(250_000_000)
            .fetched_at_ms(0)
            .build(),
    )
}

#[tokio::test(start_paused = true)]
async fn tracked_transaction_polls_until_finalized() {
    let mut responses: VecDeque<StatusEvent> = VecDeque::from(vec![
        fetched(Confirmations::Count(0)),
        fetched(Confirmations::Count(1)),
        fetched(Confirmations::Count(12)),
        fetched(Confirmations::Max),
    ]);

    let (fetcher, mut requests) = ChannelFetcher::create();
    let mut controller = clusterpulse::RefreshController::new(
        SIGNATURE.parse().unwrap(),
        Arc::new(fetcher),
        &Settings::default(),
    );
    controller.load();

    let mut served = 0;
    while let Some(_signature) = requests.recv().await {
        let response = responses.pop_front().unwrap();
        controller.observe(StatusEvent::Fetching);
        controller.observe(response);
        served += 1;

        if controller.phase() != AutoRefresh::Active {
            break;
        }
        assert_eq!(controller.indicator(), RefreshIndicator::Spinner);
    }

    assert_eq!(served, 4);
    assert_eq!(controller.phase(), AutoRefresh::Inactive);
    assert_eq!(controller.zero_confirmation_retries(), 1);
    assert!(matches!(
        controller.view(),
        StatusView::Found(s) if s.is_finalized()
    ));

    // Nothing more is requested once finalized
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(requests.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn stalled_transaction_bails_out_and_recovers_manually() {
    let (fetcher, mut requests) = ChannelFetcher::create();
    let mut controller = clusterpulse::RefreshController::new(
        SIGNATURE.parse().unwrap(),
        Arc::new(fetcher),
        &Settings::default(),
    );
    controller.load();

    while requests.recv().await.is_some() {
        controller.observe(fetched(Confirmations::Count(0)));
        if controller.phase() != AutoRefresh::Active {
            break;
        }
    }

    assert_eq!(controller.phase(), AutoRefresh::BailedOut);
    assert_eq!(controller.zero_confirmation_retries(), 5);
    assert_eq!(
        controller.fault().map(|f| f.to_string()).as_deref(),
        Some("Stopped auto-refreshing after 5 polls without a confirmation")
    );

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(requests.try_recv().is_err());

    controller.refresh();
    assert!(requests.try_recv().is_ok());
    assert_eq!(controller.phase(), AutoRefresh::Active);

    controller.observe(fetched(Confirmations::Count(3)));
    tokio::time::sleep(Duration::from_millis(2001)).await;
    assert!(requests.try_recv().is_ok());
}
