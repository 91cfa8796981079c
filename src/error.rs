use std::path::PathBuf;
use thiserror::Error;

use crate::ink::io_lines::DecodeError;

/// The main error type for rmdraw operations.
#[derive(Debug, Error)]
pub enum RmdrawError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {path}: {source}")]
    LinesDecode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to write Excalidraw JSON to {path}: {source}")]
    ExcalidrawWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read background image {path}: {message}")]
    BackgroundImage { path: PathBuf, message: String },

    #[error("No .rm or .lines files found under {path}")]
    EmptyBatch { path: PathBuf },

    #[error("{failed} of {total} page(s) failed to convert")]
    BatchFailed { failed: usize, total: usize },

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
