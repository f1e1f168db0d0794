// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : group_ledger — client-side core for a group-expense ledger
Module  : config.rs
Version : 0.1.0
License : MIT (see LICENSE)

Summary : Host configuration from environment (.env aware). CLI flags in
          main.rs override the viewer / snapshot dir when given.
=============================================================================
*/
use std::env;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use dotenvy::dotenv;
use group_ledger::series::{SeriesOptions, DEFAULT_MAX_POINTS};
use group_ledger::{MemberId, RoomId};

/// Sumber data untuk perintah `chart`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesSource {
    Expenses,
    Payments,
}

impl SeriesSource {
    pub fn parse_one(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expenses" | "expense" | "e" => Some(SeriesSource::Expenses),
            "payments" | "payment" | "p" => Some(SeriesSource::Payments),
            _ => None,
        }
    }

    pub fn from_env(key: &str, default_source: SeriesSource) -> SeriesSource {
        env::var(key).ok().and_then(|v| Self::parse_one(&v)).unwrap_or(default_source)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesSource::Expenses => "expenses",
            SeriesSource::Payments => "payments",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Args {
    // data
    pub snapshot_dir: PathBuf,
    pub viewer_id: Option<MemberId>,
    pub room_id: RoomId,

    // chart
    pub chart_source: SeriesSource,
    pub label_offset_minutes: i32,

    // files / logging
    pub record_file: Option<String>,
    pub metrics_file: Option<String>,
    pub log_filter: String,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Offsets beyond a day are rejected by chrono; fall back to UTC.
pub fn label_offset(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

pub fn load() -> (Args, SeriesOptions) {
    // Pastikan .env dibaca (SNAPSHOT_DIR, VIEWER_ID, dll)
    let _ = dotenv();

    let snapshot_dir = env::var("SNAPSHOT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./snapshot"));
    let viewer_id = env_parse("VIEWER_ID");
    let room_id = env_parse("ROOM_ID").unwrap_or(0);

    let chart_source = SeriesSource::from_env("CHART_SOURCE", SeriesSource::Expenses);
    let label_offset_minutes = env_parse("LABEL_UTC_OFFSET_MINUTES").unwrap_or(0);
    let max_points = env_parse("MAX_POINTS").unwrap_or(DEFAULT_MAX_POINTS);

    let record_file = env::var("RECORD_FILE").ok().filter(|s| !s.trim().is_empty());
    let metrics_file = env::var("METRICS_FILE").ok().filter(|s| !s.trim().is_empty());
    let log_filter = env::var("LOG_FILTER").unwrap_or_else(|_| "info".to_string());

    let args = Args {
        snapshot_dir,
        viewer_id,
        room_id,
        chart_source,
        label_offset_minutes,
        record_file,
        metrics_file,
        log_filter,
    };

    let series = SeriesOptions { max_points, label_offset: label_offset(label_offset_minutes) };
    (args, series)
}
