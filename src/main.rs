// ===============================
// src/main.rs
// ===============================
/*
 # feed untuk viewer 2 dari snapshot lokal
 VIEWER_ID=2 SNAPSHOT_DIR=./snapshot cargo run -- feed

 # grafik pembayaran (12 titik terakhir, label WIB)
 LABEL_UTC_OFFSET_MINUTES=420 cargo run -- --viewer 2 chart --source payments --max-points 12

 # cek draft expense sebelum dikirim ke ledger service
 cargo run -- --viewer 2 check-expense ./drafts/dinner.json

 # rincian split satu expense (yang bayar di atas)
 cargo run -- splits ./snapshot/splits-11.json
*/
/*
=============================================================================
Project : group_ledger — client-side core for a group-expense ledger
Module  : main.rs
Version : 0.1.0
License : MIT (see LICENSE)

Summary : Host binary over the pure core: loads snapshot files exported
          from the ledger service, prints the unified activity feed and
          chart series as JSON, checks expense / payment / group drafts,
          optionally records the feed as JSONL and dumps Prometheus text.
=============================================================================
*/
mod config;
mod error;
mod metrics;
mod recorder;
mod snapshot;

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use group_ledger::display::{balance_summary, share_line, split_detail_rows};
use group_ledger::group::GroupDraft;
use group_ledger::payment::PaymentDraft;
use group_ledger::series::{expense_series, payment_series};
use group_ledger::{
    aggregate_with_report, sample_time_series_with, validate, ActivityEntry, DraftAllocation, MemberId,
    SeriesOptions,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::{Args, SeriesSource};
use crate::error::{AppError, Result};
use crate::metrics::{FEED_ENTRIES, RECORDS_DROPPED, SERIES_POINTS};

#[derive(Parser, Debug)]
#[command(name = "group_ledger", version, about = "Activity feed, charts and draft checks for a group ledger")]
struct Cli {
    /// Viewer member id (overrides VIEWER_ID)
    #[arg(long)]
    viewer: Option<MemberId>,

    /// Snapshot directory (overrides SNAPSHOT_DIR)
    #[arg(long = "snapshot-dir")]
    snapshot_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Unified, newest-first activity feed plus balance lines
    Feed,
    /// Chart-ready series of expense shares or payments
    Chart {
        #[arg(long, value_parser = parse_source)]
        source: Option<SeriesSource>,
        #[arg(long = "max-points")]
        max_points: Option<usize>,
    },
    /// Validate an expense draft and print the create payload
    CheckExpense { draft: PathBuf },
    /// Validate a payment draft (payer = viewer)
    CheckPayment { draft: PathBuf },
    /// Validate a group creation draft (creator = viewer)
    CheckGroup { draft: PathBuf },
    /// Detail rows for one expense's split list, paid first
    Splits { file: PathBuf },
}

fn parse_source(s: &str) -> std::result::Result<SeriesSource, String> {
    SeriesSource::parse_one(s).ok_or_else(|| format!("unknown source `{s}` (expected expenses|payments)"))
}

#[derive(Serialize)]
struct FeedView<'a> {
    balance: String,
    shares: Vec<String>,
    activity: &'a [ActivityEntry],
}

#[derive(Serialize)]
struct CheckOutcome<P: Serialize> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<P>,
}

impl<P: Serialize> CheckOutcome<P> {
    fn accepted(payload: P) -> Self { Self { valid: true, message: None, payload: Some(payload) } }
    fn rejected(message: String) -> Self { Self { valid: false, message: Some(message), payload: None } }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ---- Load config ----
    let (mut args, mut series_opts) = config::load();
    if let Some(v) = cli.viewer {
        args.viewer_id = Some(v);
    }
    if let Some(dir) = cli.snapshot_dir.clone() {
        args.snapshot_dir = dir;
    }

    // ---- Logging (stderr, stdout is for JSON) ----
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    // ---- Metrics ----
    metrics::init();

    info!(
        snapshot_dir = %args.snapshot_dir.display(),
        viewer = ?args.viewer_id,
        room_id = args.room_id,
        chart_source = args.chart_source.as_str(),
        max_points = series_opts.max_points,
        label_offset_minutes = args.label_offset_minutes,
        record_file = ?args.record_file,
        metrics_file = ?args.metrics_file,
        "startup config"
    );

    let outcome = match cli.command {
        Command::Feed => run_feed(&args).await,
        Command::Chart { source, max_points } => {
            if let Some(n) = max_points {
                series_opts.max_points = n;
            }
            run_chart(&args, &series_opts, source.unwrap_or(args.chart_source)).await
        }
        Command::CheckExpense { draft } => run_check_expense(&args, &draft).await,
        Command::CheckPayment { draft } => run_check_payment(&args, &draft).await,
        Command::CheckGroup { draft } => run_check_group(&args, &draft).await,
        Command::Splits { file } => run_splits(&file).await,
    };

    if let Some(path) = &args.metrics_file {
        if let Err(e) = metrics::write_metrics(path).await {
            warn!(error = %e, "metrics: dump failed");
        }
    }

    if let Err(e) = outcome {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run_feed(args: &Args) -> Result<()> {
    let viewer = args.viewer_id.ok_or(AppError::MissingViewer)?;
    let snap = snapshot::load(&args.snapshot_dir).await?;

    let (feed, report) = aggregate_with_report(&snap.expenses, &snap.payments, viewer, &snap.members);
    for entry in &feed {
        FEED_ENTRIES.with_label_values(&[entry.kind()]).inc();
    }
    RECORDS_DROPPED.with_label_values(&["expense"]).inc_by(report.expenses_dropped as u64);
    RECORDS_DROPPED.with_label_values(&["payment"]).inc_by(report.payments_dropped as u64);
    if report.dropped() > 0 {
        warn!(
            expenses = report.expenses_dropped,
            payments = report.payments_dropped,
            "feed: malformed records excluded"
        );
    }
    info!(entries = feed.len(), viewer, "feed: aggregated");

    // ---- Recorder (optional) ----
    if let Some(path) = args.record_file.clone() {
        let (tx, rx) = mpsc::channel::<ActivityEntry>(1024);
        let handle = tokio::spawn(recorder::run(rx, path));
        for entry in feed.iter().cloned() {
            // recorder sudah berhenti (error) -> hasilnya diambil dari handle
            if tx.send(entry).await.is_err() {
                break;
            }
        }
        drop(tx);
        let written = handle.await.map_err(|e| AppError::Recorder(e.to_string()))??;
        info!(written, "feed: exported");
    }

    let view = FeedView {
        balance: balance_summary(snap.summary.total),
        shares: snap.summary.shares.iter().map(share_line).collect(),
        activity: &feed,
    };
    print_json(&view)
}

async fn run_chart(args: &Args, opts: &SeriesOptions, source: SeriesSource) -> Result<()> {
    let snap = snapshot::load(&args.snapshot_dir).await?;
    let events = match source {
        SeriesSource::Expenses => expense_series(&snap.expenses),
        SeriesSource::Payments => {
            let viewer = args.viewer_id.ok_or(AppError::MissingViewer)?;
            payment_series(&snap.payments, viewer)
        }
    };
    let points = sample_time_series_with(&events, opts);
    SERIES_POINTS.set(points.len() as i64);
    info!(source = source.as_str(), events = events.len(), points = points.len(), "chart: sampled");
    print_json(&points)
}

async fn run_check_expense(args: &Args, draft_path: &Path) -> Result<()> {
    let draft: DraftAllocation = snapshot::read_json(draft_path).await?;
    let members = snapshot::load_members(&args.snapshot_dir).await?;
    let outcome = match validate(&draft, &members) {
        Ok(valid) => {
            let payer = args.viewer_id.ok_or(AppError::MissingViewer)?;
            CheckOutcome::accepted(valid.into_payload(args.room_id, payer, Utc::now()))
        }
        Err(e) => CheckOutcome::rejected(e.to_string()),
    };
    metrics::record_validation("expense", outcome.valid);
    print_json(&outcome)
}

async fn run_check_payment(args: &Args, draft_path: &Path) -> Result<()> {
    let payer = args.viewer_id.ok_or(AppError::MissingViewer)?;
    let draft: PaymentDraft = snapshot::read_json(draft_path).await?;
    let members = snapshot::load_members(&args.snapshot_dir).await?;
    let outcome = match draft.validate(payer, &members) {
        Ok(valid) => CheckOutcome::accepted(valid.into_payload(args.room_id, Utc::now())),
        Err(e) => CheckOutcome::rejected(e.to_string()),
    };
    metrics::record_validation("payment", outcome.valid);
    print_json(&outcome)
}

async fn run_check_group(args: &Args, draft_path: &Path) -> Result<()> {
    let creator = args.viewer_id.ok_or(AppError::MissingViewer)?;
    let draft: GroupDraft = snapshot::read_json(draft_path).await?;
    let outcome = match draft.validate(creator, Utc::now()) {
        Ok(payload) => CheckOutcome::accepted(payload),
        Err(e) => CheckOutcome::rejected(e.to_string()),
    };
    metrics::record_validation("group", outcome.valid);
    print_json(&outcome)
}

async fn run_splits(path: &Path) -> Result<()> {
    let splits = snapshot::load_splits(path).await?;
    let rows = split_detail_rows(&splits);
    info!(rows = rows.len(), "splits: reshaped");
    print_json(&rows)
}
