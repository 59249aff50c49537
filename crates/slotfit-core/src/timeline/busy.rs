//! The busy set: intervals a candidate slot must not overlap.

use chrono::{DateTime, Utc};

use super::Interval;

/// Intervals kept sorted by start after every mutation.
///
/// Owned by a single scheduling run. Intervals are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusySet {
    intervals: Vec<Interval>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an unordered snapshot.
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut intervals: Vec<_> = intervals.into_iter().collect();
        intervals.sort();
        Self { intervals }
    }

    /// Sorted insert.
    pub fn insert(&mut self, interval: Interval) {
        let index = self.intervals.partition_point(|existing| *existing <= interval);
        self.intervals.insert(index, interval);
    }

    /// First interval in start order that overlaps `[start, end)`.
    pub fn first_conflict(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<&Interval> {
        first_conflict(&self.intervals, start, end)
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }
}

impl<'a> IntoIterator for &'a BusySet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl FromIterator<Interval> for BusySet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::from_intervals(iter)
    }
}

/// Scan `busy` in order for the first interval overlapping `[start, end)`.
///
/// Intervals starting at or after `end` cannot overlap, so the scan stops
/// there; `busy` must be sorted by start.
pub(crate) fn first_conflict(
    busy: &[Interval],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&Interval> {
    busy.iter()
        .take_while(|b| b.start() < end)
        .find(|b| b.end() > start)
}
