//! Tracking session lifecycle
//!
//! A [`TrackingSession`] owns everything the meter mutates: the correlation
//! store, the attribution engine and the ledger. Hosts create one per meter;
//! nothing lives at process scope.

mod tracking;

#[cfg(test)]
mod tracking_tests;

pub use tracking::{SessionState, TrackingSession};
