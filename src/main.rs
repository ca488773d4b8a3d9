use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clusterpulse::data::TpsSummary;
use clusterpulse::refresh::{block_time_label, confirmations_label, ChannelFetcher};
use clusterpulse::{
    App, AutoRefresh, ClusterStatsStatus, FeedSource, FileSource, LogSettings, RefreshController,
    Settings, StatusEvent, StatusView, StreamSource, TransactionSignature,
};

#[derive(Parser, Debug)]
#[command(name = "clusterpulse")]
#[command(about = "Cluster throughput telemetry and transaction status tracking")]
struct Args {
    /// Path to a TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fold a performance feed into cluster stats
    Telemetry {
        /// Replay an NDJSON feed file
        #[arg(short, long, conflicts_with = "connect", required_unless_present = "connect")]
        file: Option<PathBuf>,

        /// Connect to a TCP endpoint streaming the feed (host:port)
        #[arg(short, long)]
        connect: Option<String>,

        /// Write the final stats as JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Auto-refresh a transaction status against recorded responses
    Track {
        /// Base58 transaction signature
        signature: String,

        /// NDJSON file with one status response per fetch
        #[arg(short, long)]
        responses: PathBuf,

        /// Override the refresh interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())
        .context("Failed to load settings")?;
    init_tracing(&settings.log);

    let rt = tokio::runtime::Runtime::new()?;

    match args.command {
        Command::Telemetry {
            file,
            connect,
            export,
        } => rt.block_on(async {
            let (source, streaming): (Box<dyn FeedSource>, bool) = match (file, connect) {
                (_, Some(addr)) => (connect_stream(&addr).await?, true),
                (Some(path), None) => (Box::new(FileSource::new(path)), false),
                (None, None) => anyhow::bail!("either --file or --connect is required"),
            };
            run_telemetry(source, streaming, &settings, export.as_deref()).await
        }),
        Command::Track {
            signature,
            responses,
            interval_ms,
        } => {
            if let Some(interval_ms) = interval_ms {
                settings.refresh.interval_ms = interval_ms;
            }
            let signature: TransactionSignature = signature
                .parse()
                .with_context(|| format!("Invalid signature {}", signature))?;
            let responses = load_responses(&responses)?;
            rt.block_on(run_track(signature, responses, &settings))
        }
    }
}

fn init_tracing(log: &LogSettings) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&log.filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn connect_stream(addr: &str) -> Result<Box<dyn FeedSource>> {
    use tokio::net::TcpStream;

    info!(%addr, "connecting");
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to {}", addr))?;
    info!(%addr, "connected");
    Ok(Box::new(StreamSource::spawn(stream, addr)))
}

/// Run a telemetry session. File feeds are replayed to the end; stream
/// feeds run until Ctrl-C.
async fn run_telemetry(
    source: Box<dyn FeedSource>,
    streaming: bool,
    settings: &Settings,
    export: Option<&Path>,
) -> Result<()> {
    let mut app = App::new(source, settings.cluster.clone());
    info!(cluster = %app.cluster().name, source = app.source_description(), "telemetry session started");

    let mut status = app.performance().status;
    let mut report = |app: &App| {
        let current = app.performance().status;
        if current != status {
            info!(from = status.symbol(), to = current.symbol(), "cluster stats status changed");
            status = current;
        }
        if let Some(fault) = app.fault() {
            warn!("{}", fault);
        }
    };

    app.reload_data();
    report(&app);

    if streaming {
        let mut ticks = tokio::time::interval(Duration::from_millis(100));
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    if app.reload_data() > 0 {
                        report(&app);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    break;
                }
            }
        }
    }

    print_summary(&app);

    if let Some(path) = export {
        let json = serde_json::to_string_pretty(app.performance())?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported stats to {}", path.display());
    }

    Ok(())
}

fn print_summary(app: &App) {
    let info = app.performance();
    println!("Cluster:            {}", app.cluster().name);
    println!("Status:             {}", info.status.symbol());
    println!("Transaction count:  {}", info.transaction_count);

    // The dashboard feed is not part of this session; treat it as ready.
    match app.stats(ClusterStatsStatus::Ready) {
        Ok(TpsSummary {
            user_tps,
            total_tps,
        }) => {
            println!("User TPS:           {}", user_tps);
            println!("Total TPS:          {}", total_tps);
            println!(
                "History:            {} samples, peak {}",
                info.perf_history.short.len(),
                clusterpulse::format_tps(info.history_max_tps)
            );
        }
        Err(not_ready) if not_ready.error => println!("Stats unavailable"),
        Err(_) => println!("Stats still loading"),
    }

    if let Some(fault) = app.fault() {
        println!("{}", fault);
    }
}

fn load_responses(path: &Path) -> Result<VecDeque<StatusEvent>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line.trim())
                .with_context(|| format!("{}: invalid response on line {}", path.display(), i + 1))
        })
        .collect()
}

/// How a tracked transaction stopped being polled.
#[derive(Debug)]
enum TrackOutcome {
    Finalized,
    BailedOut,
    NotFound,
    FetchFailed,
    Exhausted,
    Interrupted,
}

/// Serve every fetch the controller issues from the scripted responses,
/// until polling stops.
async fn run_track(
    signature: TransactionSignature,
    mut responses: VecDeque<StatusEvent>,
    settings: &Settings,
) -> Result<()> {
    let (fetcher, mut requests) = ChannelFetcher::create();
    let mut controller = RefreshController::new(signature, Arc::new(fetcher), settings);
    info!(
        signature = %controller.signature().abbreviated(),
        interval_ms = settings.refresh.interval_ms,
        "tracking transaction"
    );

    controller.load();

    let outcome = loop {
        let request = tokio::select! {
            request = requests.recv() => request,
            _ = tokio::signal::ctrl_c() => break TrackOutcome::Interrupted,
        };
        if request.is_none() {
            break TrackOutcome::Exhausted;
        }

        let Some(response) = responses.pop_front() else {
            break TrackOutcome::Exhausted;
        };
        controller.observe(StatusEvent::Fetching);
        controller.observe(response);

        match controller.phase() {
            AutoRefresh::Active => continue,
            AutoRefresh::BailedOut => break TrackOutcome::BailedOut,
            AutoRefresh::Inactive => {}
        }

        break match controller.view() {
            StatusView::Found(snapshot) if snapshot.is_finalized() => TrackOutcome::Finalized,
            StatusView::NotFound { .. } => TrackOutcome::NotFound,
            StatusView::FetchFailed => TrackOutcome::FetchFailed,
            _ => TrackOutcome::Exhausted,
        };
    };

    let confirmations = controller.last_status().and_then(|s| s.confirmations);
    println!("Signature:      {}", controller.signature());
    println!("Outcome:        {:?}", outcome);
    println!("Confirmations:  {}", confirmations_label(confirmations));
    if let Some(status) = controller.last_status() {
        println!("Slot:           {}", status.slot);
    }
    println!(
        "Block time:     {}",
        block_time_label(controller.last_status().and_then(|s| s.block_time))
    );
    println!("Retries:        {}", controller.zero_confirmation_retries());
    if let Some(note) = controller.view().note() {
        println!("{}", note);
    }
    if let Some(fault) = controller.fault() {
        println!("{}", fault);
    }

    controller.detach();
    Ok(())
}
