//! Error types for recorded feeds

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading a recorded event feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to open feed file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read feed")]
    Read(#[source] std::io::Error),

    #[error("invalid feed record on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
