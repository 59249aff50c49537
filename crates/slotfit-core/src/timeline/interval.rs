//! Half-open time intervals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open time range `[start, end)`.
///
/// Instants are wall-clock values already normalized to the policy's
/// reference timezone; the `Utc` tag carries no conversion meaning.
/// Ordering is by start, then end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Create a new interval, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Interval of `minutes` starting at `start`. `None` for zero minutes.
    pub fn from_minutes(start: DateTime<Utc>, minutes: u32) -> Option<Self> {
        if minutes == 0 {
            return None;
        }
        Some(Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this interval overlaps `[start, end)`.
    ///
    /// Touching endpoints do not overlap.
    pub fn overlaps_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Check if two intervals overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.overlaps_range(other.start, other.end)
    }

    /// Same start, end pushed out by `minutes`.
    pub fn extended_by(&self, minutes: u32) -> Interval {
        Interval {
            start: self.start,
            end: self.end + Duration::minutes(i64::from(minutes)),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        RawInterval {
            start: interval.start,
            end: interval.end,
        }
    }
}
