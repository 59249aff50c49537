//! Working-hours policy.
//!
//! The recurring weekly template of eligible weekdays and the daily hour
//! range placements must fall inside.

mod hours;

pub use hours::WorkingHoursPolicy;
