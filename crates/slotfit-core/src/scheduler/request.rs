use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::timeline::Interval;

/// One task to place.
///
/// The label is opaque and only carried through for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    pub label: String,
    pub duration_minutes: u32,
}

impl SchedulingRequest {
    pub fn new(label: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            label: label.into(),
            duration_minutes,
        }
    }
}

/// Why a request was left unplaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// The search exhausted the window without a conflict-free, in-hours slot
    NoSlotInWindow,
    /// A slot was found but the commit target failed to reserve it
    DownstreamCommitFailed,
}

impl UnplacedReason {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            UnplacedReason::NoSlotInWindow => "no slot in window",
            UnplacedReason::DownstreamCommitFailed => "commit failed",
        }
    }
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome for a single request, index-aligned with the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacementResult {
    Placed { interval: Interval },
    Unplaced { reason: UnplacedReason },
}

impl PlacementResult {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementResult::Placed { .. })
    }

    pub fn interval(&self) -> Option<&Interval> {
        match self {
            PlacementResult::Placed { interval } => Some(interval),
            PlacementResult::Unplaced { .. } => None,
        }
    }

    pub fn unplaced_reason(&self) -> Option<UnplacedReason> {
        match self {
            PlacementResult::Placed { .. } => None,
            PlacementResult::Unplaced { reason } => Some(*reason),
        }
    }
}

/// The `[start, end)` horizon a run searches in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl SearchWindow {
    /// Create a window, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
