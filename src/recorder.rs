// ===============================
// src/recorder.rs
// ===============================
//
// JSONL export untuk activity feed:
// - Tulis setiap ActivityEntry ke file .jsonl (append).
// - Bufer dengan BufWriter agar hemat syscall.
// - Flush tiap 1000 entry dan saat channel ditutup.
// - Otomatis membuat parent directory jika belum ada.
// - Entry yang gagal di-serialize di-skip, bukan menghentikan export.
//
// ENV: set `RECORD_FILE=/path/to/feed.jsonl` agar aktif (lihat main.rs).
//
use std::path::{Path, PathBuf};

use group_ledger::ActivityEntry;
use tokio::{
    fs::{self, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
    sync::mpsc,
};
use tracing::{error, info};

use crate::error::{AppError, Result};

const FLUSH_EVERY_N_ENTRIES: u32 = 1000;

async fn open_writer(path: &Path) -> Result<BufWriter<tokio::fs::File>> {
    // Pastikan parent directory ada (kalau ada)
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| AppError::Io { path: parent.to_path_buf(), source })?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| AppError::Io { path: path.to_path_buf(), source })?;

    Ok(BufWriter::new(file))
}

/// Drains `rx` into `path`; returns the number of lines written.
pub async fn run(mut rx: mpsc::Receiver<ActivityEntry>, path: String) -> Result<usize> {
    let path = PathBuf::from(path);
    info!(path = %path.display(), "recorder: started");
    let mut writer = open_writer(&path).await?;
    let io_err = |source: std::io::Error| AppError::Io { path: path.clone(), source };

    let mut written = 0usize;
    let mut since_last_flush: u32 = 0;

    while let Some(entry) = rx.recv().await {
        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                error!(?e, key = entry.key(), "recorder: serialize error, skip entry");
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await.map_err(io_err)?;
        written += 1;

        since_last_flush += 1;
        if since_last_flush >= FLUSH_EVERY_N_ENTRIES {
            writer.flush().await.map_err(io_err)?;
            since_last_flush = 0;
        }
    }

    // Channel closed: flush dan keluar
    writer.flush().await.map_err(io_err)?;
    info!(written, "recorder: channel closed, stopped");
    Ok(written)
}
