//! The injected reservation capability and run cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::SchedulingRequest;
use crate::error::CommitError;
use crate::timeline::Interval;

/// Durably reserves a proposed slot (e.g. creates a calendar event).
///
/// The scheduler waits for each call to return before moving on; calls
/// never overlap. Any `Err` leaves the request unplaced.
pub trait CommitTarget {
    fn commit(&mut self, request: &SchedulingRequest, slot: &Interval) -> Result<(), CommitError>;
}

impl<F> CommitTarget for F
where
    F: FnMut(&SchedulingRequest, &Interval) -> Result<(), CommitError>,
{
    fn commit(&mut self, request: &SchedulingRequest, slot: &Interval) -> Result<(), CommitError> {
        self(request, slot)
    }
}

/// Commit target that keeps reservations in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: Vec<(String, Interval)>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reservations in commit order, as `(label, slot)`.
    pub fn entries(&self) -> &[(String, Interval)] {
        &self.entries
    }
}

impl CommitTarget for MemoryLedger {
    fn commit(&mut self, request: &SchedulingRequest, slot: &Interval) -> Result<(), CommitError> {
        self.entries.push((request.label.clone(), *slot));
        Ok(())
    }
}

/// Shared flag a caller sets to stop a run between requests.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
