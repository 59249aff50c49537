//! Human-readable run summaries ("N/M scheduled; unscheduled: ...").

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scheduler::{ScheduleRun, SchedulingRequest, UnplacedReason};

/// A request left unscheduled, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledEntry {
    pub label: String,
    pub reason: UnplacedReason,
}

/// Counts and unplaced labels for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub scheduled: usize,
    pub total: usize,
    pub unscheduled: Vec<UnscheduledEntry>,
    /// Requests never attempted because the run was cancelled
    pub skipped: usize,
}

impl RunSummary {
    /// Pair each result with the request at the same index.
    pub fn from_run(requests: &[SchedulingRequest], run: &ScheduleRun) -> Self {
        let unscheduled = requests
            .iter()
            .zip(&run.results)
            .filter_map(|(request, result)| {
                result.unplaced_reason().map(|reason| UnscheduledEntry {
                    label: request.label.clone(),
                    reason,
                })
            })
            .collect();

        Self {
            scheduled: run.placed_count(),
            total: requests.len(),
            unscheduled,
            skipped: requests.len().saturating_sub(run.results.len()),
        }
    }

    pub fn all_scheduled(&self) -> bool {
        self.scheduled == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} scheduled", self.scheduled, self.total)?;
        if !self.unscheduled.is_empty() {
            f.write_str("; unscheduled: ")?;
            for (i, entry) in self.unscheduled.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} ({})", entry.label, entry.reason)?;
            }
        }
        if self.skipped > 0 {
            write!(f, "; {} not attempted (cancelled)", self.skipped)?;
        }
        Ok(())
    }
}
