use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which wall-clock hours on which weekdays accept placements.
///
/// Placements start in `[start_hour, end_hour)` on a work day and must end
/// no later than `end_hour:00` on the same calendar day. No timezone is
/// encoded; instants are assumed to be in the policy's reference zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursPolicy {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_work_days")]
    pub work_days: Vec<Weekday>,
}

fn default_start_hour() -> u32 {
    9
}
fn default_end_hour() -> u32 {
    17
}
fn default_work_days() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
}

impl Default for WorkingHoursPolicy {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            work_days: default_work_days(),
        }
    }
}

impl WorkingHoursPolicy {
    /// Create a policy, validating it.
    pub fn new(
        start_hour: u32,
        end_hour: u32,
        work_days: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self, ValidationError> {
        let policy = Self {
            start_hour,
            end_hour,
            work_days: work_days.into_iter().collect(),
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check `start_hour < end_hour <= 23` and at least one work day.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_hour >= self.end_hour || self.end_hour > 23 {
            return Err(ValidationError::InvalidWorkingHours {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        if self.work_days.is_empty() {
            return Err(ValidationError::NoWorkDays);
        }
        Ok(())
    }

    /// Length of one working day in minutes.
    pub fn day_span_minutes(&self) -> i64 {
        i64::from(self.end_hour.saturating_sub(self.start_hour)) * 60
    }

    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.work_days.contains(&date.weekday())
    }

    /// `start_hour:00` on `date`.
    pub fn opening_on(&self, date: NaiveDate) -> DateTime<Utc> {
        at_hour(date, self.start_hour)
    }

    /// `end_hour:00` on `date`.
    pub fn closing_on(&self, date: NaiveDate) -> DateTime<Utc> {
        at_hour(date, self.end_hour)
    }

    /// Working-hours test for a task of `minutes` starting at `start`.
    ///
    /// The start must be on a work day within `[start_hour, end_hour)`, and
    /// the unbuffered end must not pass `end_hour:00` or cross midnight.
    pub fn admits(&self, start: DateTime<Utc>, minutes: u32) -> bool {
        let date = start.date_naive();
        if !self.is_work_day(date) {
            return false;
        }
        if start.hour() < self.start_hour || start.hour() >= self.end_hour {
            return false;
        }
        let end = start + Duration::minutes(i64::from(minutes));
        end.date_naive() == date && end <= self.closing_on(date)
    }

    /// Earliest working-day opening strictly after `t`.
    ///
    /// Same day if `t` is before opening on a work day, otherwise the
    /// opening of the next work day, skipping any non-working stretch.
    /// `None` only when the policy has no work days.
    pub fn next_working_start(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let date = t.date_naive();
        if self.is_work_day(date) && t < self.opening_on(date) {
            return Some(self.opening_on(date));
        }
        date.iter_days()
            .skip(1)
            .take(7)
            .find(|d| self.is_work_day(*d))
            .map(|d| self.opening_on(d))
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(i64::from(hour))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 2024-01-08 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn default_is_weekday_nine_to_five() {
        let policy = WorkingHoursPolicy::default();
        assert_eq!(policy.start_hour, 9);
        assert_eq!(policy.end_hour, 17);
        assert_eq!(policy.work_days.len(), 5);
        assert!(policy.validate().is_ok());
        assert_eq!(policy.day_span_minutes(), 480);
    }

    #[test]
    fn validate_rejects_malformed_policies() {
        assert!(WorkingHoursPolicy::new(17, 9, [Weekday::Mon]).is_err());
        assert!(WorkingHoursPolicy::new(9, 9, [Weekday::Mon]).is_err());
        assert!(WorkingHoursPolicy::new(9, 24, [Weekday::Mon]).is_err());
        assert_eq!(
            WorkingHoursPolicy::new(9, 17, []),
            Err(ValidationError::NoWorkDays)
        );
    }

    #[test]
    fn admits_slot_ending_exactly_at_close() {
        let policy = WorkingHoursPolicy::default();
        assert!(policy.admits(at(8, 16, 0), 60));
        assert!(!policy.admits(at(8, 16, 1), 60));
        assert!(policy.admits(at(8, 9, 0), 480));
        assert!(!policy.admits(at(8, 9, 0), 481));
    }

    #[test]
    fn admits_rejects_outside_hours_and_weekends() {
        let policy = WorkingHoursPolicy::default();
        assert!(!policy.admits(at(8, 8, 59), 30));
        assert!(!policy.admits(at(8, 17, 0), 30));
        // Saturday
        assert!(!policy.admits(at(13, 10, 0), 30));
    }

    #[test]
    fn next_working_start_same_day_before_opening() {
        let policy = WorkingHoursPolicy::default();
        assert_eq!(policy.next_working_start(at(8, 8, 0)), Some(at(8, 9, 0)));
    }

    #[test]
    fn next_working_start_skips_weekend() {
        let policy = WorkingHoursPolicy::default();
        // Friday afternoon jumps to Monday morning.
        assert_eq!(policy.next_working_start(at(12, 16, 30)), Some(at(15, 9, 0)));
        // Saturday morning, before opening, still jumps to Monday.
        assert_eq!(policy.next_working_start(at(13, 7, 0)), Some(at(15, 9, 0)));
    }

    #[test]
    fn next_working_start_always_moves_forward() {
        let policy = WorkingHoursPolicy::new(9, 17, [Weekday::Wed]).unwrap();
        let t = at(10, 9, 0);
        let next = policy.next_working_start(t).unwrap();
        assert!(next > t);
        assert_eq!(next, at(17, 9, 0));
    }

    #[test]
    fn weekdays_roundtrip_through_toml() {
        let policy = WorkingHoursPolicy::new(8, 12, [Weekday::Sat, Weekday::Sun]).unwrap();
        let text = toml::to_string(&policy).unwrap();
        let parsed: WorkingHoursPolicy = toml::from_str(&text).unwrap();
        assert_eq!(parsed, policy);
    }
}
