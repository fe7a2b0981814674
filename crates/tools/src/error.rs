use std::path::PathBuf;

use grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path:?} line {line}: {source}")]
    ReplayLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("not a cell identifier: {0}")]
    InvalidCell(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}
