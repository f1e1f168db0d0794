// ===============================
// src/metrics.rs
// ===============================
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::path::PathBuf;
use tracing::warn;

use crate::error::{AppError, Result};

// Single custom registry (we register everything here)
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// -------- Feed --------
pub static FEED_ENTRIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("feed_entries_total", "activity entries produced (label: kind)"),
        &["kind"],
    )
    .unwrap()
});

pub static RECORDS_DROPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("feed_records_dropped_total", "malformed records excluded from the feed (label: kind)"),
        &["kind"],
    )
    .unwrap()
});

pub static SNAPSHOT_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("snapshot_records_skipped_total", "snapshot elements that failed to deserialize"),
        &["file"],
    )
    .unwrap()
});

// -------- Chart --------
pub static SERIES_POINTS: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("series_points", "points in the last sampled series").unwrap());

// -------- Drafts --------
pub static VALIDATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("draft_validations_total", "draft checks (labels: form, outcome)"),
        &["form", "outcome"],
    )
    .unwrap()
});

/// Registers every collector; returns how many registrations failed.
pub fn init() -> usize {
    let results = [
        ("feed_entries_total", REGISTRY.register(Box::new(FEED_ENTRIES.clone()))),
        ("feed_records_dropped_total", REGISTRY.register(Box::new(RECORDS_DROPPED.clone()))),
        ("snapshot_records_skipped_total", REGISTRY.register(Box::new(SNAPSHOT_SKIPPED.clone()))),
        ("series_points", REGISTRY.register(Box::new(SERIES_POINTS.clone()))),
        ("draft_validations_total", REGISTRY.register(Box::new(VALIDATIONS.clone()))),
    ];
    let mut failed = 0;
    for (name, res) in results {
        if let Err(e) = res {
            warn!(metric = name, error = %e, "metrics: register failed");
            failed += 1;
        }
    }
    failed
}

/// Records a draft check; `form` is expense / payment / group.
pub fn record_validation(form: &str, ok: bool) {
    let outcome = if ok { "accepted" } else { "rejected" };
    VALIDATIONS.with_label_values(&[form, outcome]).inc();
}

// Encode all metrics in Prometheus text format
pub fn encode_metrics() -> Result<Vec<u8>> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buf = Vec::new();
    encoder.encode(&families, &mut buf)?;
    if buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    Ok(buf)
}

/// Text-file dump (node_exporter textfile collector format).
pub async fn write_metrics(path: &str) -> Result<()> {
    let body = encode_metrics()?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| AppError::Io { path: PathBuf::from(path), source })
}
