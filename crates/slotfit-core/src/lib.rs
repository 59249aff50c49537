//! # slotfit Core Library
//!
//! Earliest-fit interval scheduling: given an ordered list of
//! variable-duration tasks and a snapshot of busy intervals, place each
//! task in the earliest conflict-free slot inside configured working
//! hours, reserving a buffer after every placement.
//!
//! ## Architecture
//!
//! - **Timeline**: the half-open [`Interval`] value type and the sorted
//!   [`BusySet`]
//! - **Policy**: [`WorkingHoursPolicy`], the weekly template of eligible
//!   hours and weekdays
//! - **Scheduler**: the pure [`find_earliest_slot`] search and the
//!   [`BatchScheduler`] that threads the busy set and cursor through a run
//! - **Storage**: TOML-based configuration
//!
//! The engine never talks to an external service. Durable reservations go
//! through the injected [`CommitTarget`].

pub mod error;
pub mod policy;
pub mod scheduler;
pub mod storage;
pub mod summary;
pub mod timeline;

pub use error::{CommitError, ConfigError, ValidationError};
pub use policy::WorkingHoursPolicy;
pub use scheduler::{
    find_earliest_slot, BatchScheduler, CancellationFlag, CommitTarget, MemoryLedger,
    PlacementResult, ScheduleRun, SchedulerConfig, SchedulingRequest, SearchWindow,
    UnplacedReason,
};
pub use storage::{Config, SchedulingConfig};
pub use summary::RunSummary;
pub use timeline::{BusySet, Interval};
