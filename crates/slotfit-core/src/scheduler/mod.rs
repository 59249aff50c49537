//! Batch scheduler for variable-duration tasks.
//!
//! This module provides earliest-fit placement of an ordered request list:
//! - Finds the earliest in-hours, conflict-free slot for each request
//! - Commits each slot through an injected [`CommitTarget`]
//! - Feeds the slot plus its trailing buffer back into the busy set
//! - Never backtracks a prior placement
//!
//! Requests are processed strictly in input order, so earlier requests
//! get first claim on early slots.

mod commit;
mod finder;
mod request;

pub use commit::{CancellationFlag, CommitTarget, MemoryLedger};
pub use finder::{find_earliest_slot, jump_past_conflict, next_working_day_start};
pub use request::{PlacementResult, SchedulingRequest, SearchWindow, UnplacedReason};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::policy::WorkingHoursPolicy;
use crate::timeline::{BusySet, Interval};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Eligible hours and weekdays
    pub policy: WorkingHoursPolicy,
    /// Idle time reserved after each placement (minutes)
    pub buffer_minutes: u32,
    /// Cursor advance after a failed commit (minutes)
    pub commit_failure_nudge_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            policy: WorkingHoursPolicy::default(),
            buffer_minutes: 15,
            commit_failure_nudge_minutes: 1,
        }
    }
}

/// Everything a finished (or cancelled) run produced.
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    /// One result per processed request, in input order
    pub results: Vec<PlacementResult>,
    /// Initial snapshot plus every committed slot extended by its buffer
    pub busy: BusySet,
    /// Whether the run stopped early; `results` then covers a prefix only
    pub cancelled: bool,
}

impl ScheduleRun {
    pub fn placed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_placed()).count()
    }
}

/// Earliest-fit batch scheduler
pub struct BatchScheduler {
    config: SchedulerConfig,
}

impl BatchScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Place every request, in order.
    ///
    /// # Arguments
    /// * `requests` - Tasks to place; earlier entries get earlier slots
    /// * `initial_busy` - Snapshot of existing commitments, any order
    /// * `window` - Search horizon; placements start at or after its start
    /// * `commit` - Reserves each slot before it counts as placed
    ///
    /// # Errors
    /// Returns a [`ValidationError`] before any placement if the policy is
    /// malformed or a request has a zero duration.
    pub fn schedule_all<C>(
        &self,
        requests: &[SchedulingRequest],
        initial_busy: impl IntoIterator<Item = Interval>,
        window: SearchWindow,
        commit: &mut C,
    ) -> Result<ScheduleRun, ValidationError>
    where
        C: CommitTarget + ?Sized,
    {
        self.schedule_all_with_cancel(
            requests,
            initial_busy,
            window,
            commit,
            &CancellationFlag::new(),
        )
    }

    /// Like [`schedule_all`](Self::schedule_all), checking `cancel` before
    /// each request. Results already produced stand.
    pub fn schedule_all_with_cancel<C>(
        &self,
        requests: &[SchedulingRequest],
        initial_busy: impl IntoIterator<Item = Interval>,
        window: SearchWindow,
        commit: &mut C,
        cancel: &CancellationFlag,
    ) -> Result<ScheduleRun, ValidationError>
    where
        C: CommitTarget + ?Sized,
    {
        self.validate(requests)?;

        let policy = &self.config.policy;
        let buffer = self.config.buffer_minutes;
        let nudge = Duration::minutes(i64::from(self.config.commit_failure_nudge_minutes));

        let mut busy = BusySet::from_intervals(initial_busy);
        let mut cursor: DateTime<Utc> = window.start();
        let mut results = Vec::with_capacity(requests.len());
        let mut cancelled = false;

        for (index, request) in requests.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("run cancelled after {} of {} requests", index, requests.len());
                cancelled = true;
                break;
            }

            tracing::debug!(
                "searching slot for #{} '{}' ({} min) from {}",
                index, request.label, request.duration_minutes, cursor
            );

            let found = find_earliest_slot(
                cursor,
                request.duration_minutes,
                busy.as_slice(),
                policy,
                buffer,
                window.end(),
            );

            let result = match found {
                None => {
                    tracing::warn!("no slot in window for '{}'", request.label);
                    // Cursor stays put: a shorter request may still fit.
                    PlacementResult::Unplaced {
                        reason: UnplacedReason::NoSlotInWindow,
                    }
                }
                Some(slot) => match commit.commit(request, &slot) {
                    Ok(()) => {
                        let reserved = slot.extended_by(buffer);
                        busy.insert(reserved);
                        cursor = reserved.end();
                        tracing::info!(
                            "placed '{}' at {} - {}",
                            request.label,
                            slot.start(),
                            slot.end()
                        );
                        PlacementResult::Placed { interval: slot }
                    }
                    Err(err) => {
                        tracing::warn!("commit failed for '{}': {}", request.label, err);
                        cursor += nudge;
                        PlacementResult::Unplaced {
                            reason: UnplacedReason::DownstreamCommitFailed,
                        }
                    }
                },
            };
            results.push(result);
        }

        Ok(ScheduleRun {
            results,
            busy,
            cancelled,
        })
    }

    fn validate(&self, requests: &[SchedulingRequest]) -> Result<(), ValidationError> {
        self.config.policy.validate()?;
        if let Some((index, request)) = requests
            .iter()
            .enumerate()
            .find(|(_, r)| r.duration_minutes == 0)
        {
            return Err(ValidationError::NonPositiveDuration {
                index,
                label: request.label.clone(),
            });
        }
        Ok(())
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommitError;
    use chrono::TimeZone;

    // 2024-01-08 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn week_from(start: DateTime<Utc>) -> SearchWindow {
        SearchWindow::new(start, start + Duration::days(7)).unwrap()
    }

    #[test]
    fn sequential_requests_are_separated_by_buffer() {
        let scheduler = BatchScheduler::new();
        let requests = vec![
            SchedulingRequest::new("draft", 60),
            SchedulingRequest::new("review", 60),
        ];
        let mut ledger = MemoryLedger::new();

        let run = scheduler
            .schedule_all(&requests, Vec::new(), week_from(at(8, 9, 0)), &mut ledger)
            .unwrap();

        assert_eq!(
            run.results,
            vec![
                PlacementResult::Placed { interval: span(at(8, 9, 0), at(8, 10, 0)) },
                PlacementResult::Placed { interval: span(at(8, 10, 15), at(8, 11, 15)) },
            ]
        );
        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(run.busy.len(), 2);
        assert_eq!(run.busy.as_slice()[1], span(at(8, 10, 15), at(8, 11, 30)));
    }

    #[test]
    fn unplaced_request_does_not_advance_cursor() {
        let scheduler = BatchScheduler::new();
        // 10:00-10:45 free before a meeting; 60 min won't fit there but 30 will.
        let busy = vec![span(at(8, 9, 0), at(8, 10, 0)), span(at(8, 10, 45), at(8, 17, 0))];
        let requests = vec![
            SchedulingRequest::new("too long", 600),
            SchedulingRequest::new("short", 30),
        ];
        let window = SearchWindow::new(at(8, 9, 0), at(8, 17, 0)).unwrap();

        let run = scheduler
            .schedule_all(&requests, busy, window, &mut MemoryLedger::new())
            .unwrap();

        assert_eq!(
            run.results[0],
            PlacementResult::Unplaced { reason: UnplacedReason::NoSlotInWindow }
        );
        assert_eq!(
            run.results[1],
            PlacementResult::Placed { interval: span(at(8, 10, 0), at(8, 10, 30)) }
        );
    }

    #[test]
    fn failed_commit_nudges_cursor_and_reserves_nothing() {
        let scheduler = BatchScheduler::new();
        let requests = vec![
            SchedulingRequest::new("rejected", 30),
            SchedulingRequest::new("accepted", 30),
        ];
        let mut attempts = Vec::new();
        let mut commit = |request: &SchedulingRequest, slot: &Interval| -> Result<(), CommitError> {
            attempts.push(slot.start());
            if request.label == "rejected" {
                Err(CommitError::Unavailable {
                    service: "calendar".to_string(),
                    message: "timeout".to_string(),
                })
            } else {
                Ok(())
            }
        };

        let run = scheduler
            .schedule_all(&requests, Vec::new(), week_from(at(8, 9, 0)), &mut commit)
            .unwrap();

        assert_eq!(
            run.results[0],
            PlacementResult::Unplaced { reason: UnplacedReason::DownstreamCommitFailed }
        );
        assert_eq!(
            run.results[1],
            PlacementResult::Placed { interval: span(at(8, 9, 1), at(8, 9, 31)) }
        );
        assert_eq!(run.busy.len(), 1);
        assert_eq!(attempts, vec![at(8, 9, 0), at(8, 9, 1)]);
    }

    #[test]
    fn nudge_is_configurable() {
        let scheduler = BatchScheduler::with_config(SchedulerConfig {
            commit_failure_nudge_minutes: 30,
            ..SchedulerConfig::default()
        });
        let requests = vec![SchedulingRequest::new("a", 30), SchedulingRequest::new("b", 30)];
        let mut first = true;
        let mut commit = |_: &SchedulingRequest, _: &Interval| -> Result<(), CommitError> {
            if std::mem::take(&mut first) {
                Err(CommitError::Rejected("busy".to_string()))
            } else {
                Ok(())
            }
        };

        let run = scheduler
            .schedule_all(&requests, Vec::new(), week_from(at(8, 9, 0)), &mut commit)
            .unwrap();

        assert_eq!(run.results[1].interval(), Some(&span(at(8, 9, 30), at(8, 10, 0))));
    }

    #[test]
    fn zero_duration_is_rejected_before_any_commit() {
        let scheduler = BatchScheduler::new();
        let requests = vec![SchedulingRequest::new("ok", 30), SchedulingRequest::new("empty", 0)];
        let mut ledger = MemoryLedger::new();

        let err = scheduler
            .schedule_all(&requests, Vec::new(), week_from(at(8, 9, 0)), &mut ledger)
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::NonPositiveDuration { index: 1, label: "empty".to_string() }
        );
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn malformed_policy_is_rejected() {
        let mut config = SchedulerConfig::default();
        config.policy.work_days.clear();
        let scheduler = BatchScheduler::with_config(config);

        let err = scheduler
            .schedule_all(
                &[SchedulingRequest::new("a", 30)],
                Vec::new(),
                week_from(at(8, 9, 0)),
                &mut MemoryLedger::new(),
            )
            .unwrap_err();

        assert_eq!(err, ValidationError::NoWorkDays);
    }

    #[test]
    fn cancellation_keeps_prefix() {
        let scheduler = BatchScheduler::new();
        let cancel = CancellationFlag::new();
        let requests = vec![
            SchedulingRequest::new("a", 30),
            SchedulingRequest::new("b", 30),
            SchedulingRequest::new("c", 30),
        ];
        let stopper = cancel.clone();
        let mut commit = |_: &SchedulingRequest, _: &Interval| -> Result<(), CommitError> {
            stopper.cancel();
            Ok(())
        };

        let run = scheduler
            .schedule_all_with_cancel(
                &requests,
                Vec::new(),
                week_from(at(8, 9, 0)),
                &mut commit,
                &cancel,
            )
            .unwrap();

        assert!(run.cancelled);
        assert_eq!(run.results.len(), 1);
        assert!(run.results[0].is_placed());
    }

    #[test]
    fn empty_request_list_yields_empty_run() {
        let run = BatchScheduler::new()
            .schedule_all(&[], Vec::new(), week_from(at(8, 9, 0)), &mut MemoryLedger::new())
            .unwrap();
        assert!(run.results.is_empty());
        assert!(!run.cancelled);
        assert_eq!(run.placed_count(), 0);
    }
}
