// ===============================
// src/error.rs (host errors)
// ===============================
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Viewer id missing: pass --viewer or set VIEWER_ID")]
    MissingViewer,

    #[error("Recorder task failed: {0}")]
    Recorder(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
