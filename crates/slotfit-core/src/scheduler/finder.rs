//! Earliest-fit slot search.
//!
//! A greedy forward scan: starting at the cursor, the trial start either
//! passes both the working-hours and the conflict test, or jumps forward
//! (to the next working-day opening, or past the conflicting interval)
//! and the scan restarts. Every jump strictly increases the trial start,
//! so the scan ends after at most one jump per busy interval plus one per
//! calendar day before the deadline.

use chrono::{DateTime, Duration, Utc};

use crate::policy::WorkingHoursPolicy;
use crate::timeline::{first_conflict, Interval};

/// Find the earliest slot of `duration_minutes` at or after `cursor`.
///
/// The slot plus its trailing `buffer_minutes` must end by `deadline` and
/// must not overlap any interval in `busy`; the slot itself must satisfy
/// [`WorkingHoursPolicy::admits`]. The returned interval excludes the
/// buffer.
///
/// `busy` must be sorted by start ([`BusySet`](crate::timeline::BusySet)
/// guarantees this). Callers must pass `duration_minutes > 0` and
/// `cursor <= deadline`; the batch scheduler checks both before a run.
pub fn find_earliest_slot(
    cursor: DateTime<Utc>,
    duration_minutes: u32,
    busy: &[Interval],
    policy: &WorkingHoursPolicy,
    buffer_minutes: u32,
    deadline: DateTime<Utc>,
) -> Option<Interval> {
    let task = Duration::minutes(i64::from(duration_minutes));
    let reserved = task + Duration::minutes(i64::from(buffer_minutes));

    let mut t = cursor;
    while t < deadline {
        let candidate_end = t + reserved;
        if candidate_end > deadline {
            return None;
        }

        if !policy.admits(t, duration_minutes) {
            t = next_working_day_start(policy, t)?;
            continue;
        }

        if let Some(next) = jump_past_conflict(busy, t, candidate_end) {
            tracing::trace!("slot at {} conflicts, retrying at {}", t, next);
            t = next;
            continue;
        }

        return Interval::new(t, t + task).ok();
    }
    None
}

/// Next trial start after `t` fails the working-hours test.
pub fn next_working_day_start(
    policy: &WorkingHoursPolicy,
    t: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    policy.next_working_start(t)
}

/// End of the first busy interval overlapping `[t, candidate_end)`.
///
/// `None` means the range is free.
pub fn jump_past_conflict(
    busy: &[Interval],
    t: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    first_conflict(busy, t, candidate_end).map(Interval::end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::BusySet;
    use chrono::TimeZone;

    // 2024-01-08 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn empty_calendar_places_at_opening() {
        let policy = WorkingHoursPolicy::default();
        let slot = find_earliest_slot(at(8, 8, 0), 30, &[], &policy, 15, at(15, 0, 0));
        assert_eq!(slot, Some(span(at(8, 9, 0), at(8, 9, 30))));
    }

    #[test]
    fn fully_booked_day_rolls_to_next() {
        let policy = WorkingHoursPolicy::default();
        let busy = BusySet::from_intervals(vec![span(at(8, 9, 0), at(8, 17, 0))]);
        let slot = find_earliest_slot(at(8, 8, 0), 60, busy.as_slice(), &policy, 15, at(15, 0, 0));
        assert_eq!(slot, Some(span(at(9, 9, 0), at(9, 10, 0))));
    }

    #[test]
    fn busy_ending_at_cursor_does_not_conflict() {
        let policy = WorkingHoursPolicy::default();
        let busy = vec![span(at(8, 9, 0), at(8, 10, 0))];
        let slot = find_earliest_slot(at(8, 10, 0), 30, &busy, &policy, 0, at(9, 0, 0));
        assert_eq!(slot, Some(span(at(8, 10, 0), at(8, 10, 30))));
    }

    #[test]
    fn buffer_must_clear_the_next_busy_interval() {
        let policy = WorkingHoursPolicy::default();
        let busy = vec![span(at(8, 10, 0), at(8, 11, 0))];
        // 45 + 15 ends exactly at 10:00: fits.
        let slot = find_earliest_slot(at(8, 9, 0), 45, &busy, &policy, 15, at(9, 0, 0));
        assert_eq!(slot, Some(span(at(8, 9, 0), at(8, 9, 45))));
        // 50 + 15 runs into the meeting: jump past it.
        let slot = find_earliest_slot(at(8, 9, 0), 50, &busy, &policy, 15, at(9, 0, 0));
        assert_eq!(slot, Some(span(at(8, 11, 0), at(8, 11, 50))));
    }

    #[test]
    fn buffer_may_run_past_closing() {
        let policy = WorkingHoursPolicy::default();
        let slot = find_earliest_slot(at(8, 16, 0), 60, &[], &policy, 15, at(9, 0, 0));
        assert_eq!(slot, Some(span(at(8, 16, 0), at(8, 17, 0))));
    }

    #[test]
    fn slot_past_closing_moves_to_next_day() {
        let policy = WorkingHoursPolicy::default();
        let slot = find_earliest_slot(at(8, 16, 1), 60, &[], &policy, 0, at(15, 0, 0));
        assert_eq!(slot, Some(span(at(9, 9, 0), at(9, 10, 0))));
    }

    #[test]
    fn oversized_task_terminates_with_none() {
        let policy = WorkingHoursPolicy::default();
        let slot = find_earliest_slot(at(8, 8, 0), 600, &[], &policy, 15, at(8, 0, 0) + Duration::days(365));
        assert_eq!(slot, None);
    }

    #[test]
    fn deadline_before_end_of_task_is_none() {
        let policy = WorkingHoursPolicy::default();
        let slot = find_earliest_slot(at(8, 9, 0), 60, &[], &policy, 0, at(8, 9, 30));
        assert_eq!(slot, None);
    }

    #[test]
    fn buffer_counts_against_deadline() {
        let policy = WorkingHoursPolicy::default();
        let slot = find_earliest_slot(at(8, 9, 0), 60, &[], &policy, 15, at(8, 10, 0));
        assert_eq!(slot, None);
        let slot = find_earliest_slot(at(8, 9, 0), 60, &[], &policy, 15, at(8, 10, 15));
        assert_eq!(slot, Some(span(at(8, 9, 0), at(8, 10, 0))));
    }

    #[test]
    fn cursor_equal_to_deadline_is_none() {
        let policy = WorkingHoursPolicy::default();
        assert_eq!(find_earliest_slot(at(8, 9, 0), 30, &[], &policy, 0, at(8, 9, 0)), None);
    }

    #[test]
    fn jump_past_conflict_uses_first_in_scan_order() {
        let busy = BusySet::from_intervals(vec![
            span(at(8, 9, 0), at(8, 12, 0)),
            span(at(8, 9, 30), at(8, 10, 0)),
        ]);
        assert_eq!(
            jump_past_conflict(busy.as_slice(), at(8, 9, 0), at(8, 10, 0)),
            Some(at(8, 12, 0))
        );
        assert_eq!(jump_past_conflict(busy.as_slice(), at(8, 12, 0), at(8, 13, 0)), None);
    }

    #[test]
    fn next_working_day_start_skips_non_working_stretch() {
        let policy = WorkingHoursPolicy::default();
        assert_eq!(next_working_day_start(&policy, at(12, 17, 0)), Some(at(15, 9, 0)));
    }
}
