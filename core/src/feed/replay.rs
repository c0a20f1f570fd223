//! JSON-lines event feeds.
//!
//! One [`FeedRecord`] per line. Blank lines and lines starting with `#` are
//! skipped so recordings can be annotated by hand.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{FeedError, FeedRecord};

/// Read every record of a feed file, in file order.
pub fn read_feed(path: &Path) -> Result<Vec<FeedRecord>, FeedError> {
    let file = File::open(path).map_err(|source| FeedError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_feed_from(BufReader::new(file))
}

/// Read every record from a buffered reader.
pub fn read_feed_from(reader: impl BufRead) -> Result<Vec<FeedRecord>, FeedError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(FeedError::Read)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|source| FeedError::Parse {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    tracing::debug!(records = records.len(), "feed loaded");
    Ok(records)
}
