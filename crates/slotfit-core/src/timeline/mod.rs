//! Time intervals and the busy set.
//!
//! This module provides:
//! - The half-open [`Interval`] value type
//! - [`BusySet`], the sorted collection of intervals a slot must avoid

mod busy;
mod interval;

pub use busy::BusySet;
pub(crate) use busy::first_conflict;
pub use interval::Interval;
