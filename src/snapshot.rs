// ===============================
// src/snapshot.rs
// ===============================
//
// Loader untuk data yang sudah diambil dari ledger service (JSON array per file):
//   members.json   - [{id, name}]                  (opsional)
//   expenses.json  - [{id, name, amount, createTime, payerId, splitType, userShare}]
//   payments.json  - [{id, roomId, payerId, payeeId, amount, paymentTime}] (opsional)
//   summary.json   - {total, shares: [{user:{id,name}, amount}]}          (opsional)
// Tiap elemen di-deserialize sendiri: satu record rusak hanya di-skip.
//
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use group_ledger::domain::{ShareSummary, SplitDetail};
use group_ledger::{ExpenseRecord, Member, PaymentRecord};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::metrics::SNAPSHOT_SKIPPED;

#[derive(Debug, Default)]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub expenses: Vec<ExpenseRecord>,
    pub payments: Vec<PaymentRecord>,
    pub summary: RoomSummary,
}

/// Server-computed balance figures for the viewer; display only.
#[derive(Debug, Default, Deserialize)]
pub struct RoomSummary {
    #[serde(default, deserialize_with = "group_ledger::numeric::lenient_decimal")]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub shares: Vec<ShareSummary>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

pub async fn load(dir: &Path) -> Result<Snapshot> {
    let (members, expenses, payments, summary) = tokio::try_join!(
        read_records::<Member>(dir.join("members.json"), Presence::Optional),
        read_records::<ExpenseRecord>(dir.join("expenses.json"), Presence::Required),
        read_records::<PaymentRecord>(dir.join("payments.json"), Presence::Optional),
        read_summary(dir.join("summary.json")),
    )?;
    info!(
        dir = %dir.display(),
        members = members.len(),
        expenses = expenses.len(),
        payments = payments.len(),
        "snapshot: loaded"
    );
    Ok(Snapshot { members, expenses, payments, summary })
}

pub async fn load_members(dir: &Path) -> Result<Vec<Member>> {
    read_records::<Member>(dir.join("members.json"), Presence::Optional).await
}

/// Per-expense split list (`[{username, amount}]`) as returned by the ledger.
pub async fn load_splits(path: &Path) -> Result<Vec<SplitDetail>> {
    read_records::<SplitDetail>(path.to_path_buf(), Presence::Required).await
}

/// Whole-document read, used for draft files.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path.to_path_buf(), Presence::Required).await?.unwrap_or_default();
    serde_json::from_str(&text).map_err(|source| AppError::Json { path: path.to_path_buf(), source })
}

async fn read_text(path: PathBuf, presence: Presence) -> Result<Option<String>> {
    match fs::read_to_string(&path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound && presence == Presence::Optional => {
            warn!(path = %path.display(), "snapshot: file missing, treating as empty");
            Ok(None)
        }
        Err(source) => Err(AppError::Io { path, source }),
    }
}

async fn read_records<T: DeserializeOwned>(path: PathBuf, presence: Presence) -> Result<Vec<T>> {
    let Some(text) = read_text(path.clone(), presence).await? else {
        return Ok(Vec::new());
    };
    let doc: Value = serde_json::from_str(&text).map_err(|source| AppError::Json { path: path.clone(), source })?;
    Ok(records_from(doc, &file_label(&path)))
}

async fn read_summary(path: PathBuf) -> Result<RoomSummary> {
    let Some(text) = read_text(path.clone(), Presence::Optional).await? else {
        return Ok(RoomSummary::default());
    };
    serde_json::from_str(&text).map_err(|source| AppError::Json { path, source })
}

fn file_label(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Non-array documents become an empty list; bad elements are skipped.
fn records_from<T: DeserializeOwned>(doc: Value, label: &str) -> Vec<T> {
    let items = match doc {
        Value::Array(items) => items,
        other => {
            warn!(file = %label, kind = ?value_kind(&other), "snapshot: expected a JSON array, using empty list");
            return Vec::new();
        }
    };
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(rec) => out.push(rec),
            Err(e) => {
                warn!(file = %label, idx, error = %e, "snapshot: skipping malformed record");
                SNAPSHOT_SKIPPED.with_label_values(&[label]).inc();
            }
        }
    }
    out
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
