use std::sync::{Mutex, PoisonError};

use dpsmeter_types::MeterSnapshot;

/// Receives snapshots from the refresh task.
pub trait SnapshotSink: Send + Sync {
    fn render(&self, snapshot: &MeterSnapshot);
}

/// Keeps only the most recent snapshot, for hosts that draw on their own schedule.
#[derive(Debug, Default)]
pub struct LatestSnapshot {
    latest: Mutex<Option<MeterSnapshot>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<MeterSnapshot> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotSink for LatestSnapshot {
    fn render(&self, snapshot: &MeterSnapshot) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
    }
}
