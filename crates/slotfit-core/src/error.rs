//! Core error types for slotfit-core.
//!
//! Placement-level failures (no slot, downstream commit failure) are not
//! errors here: they are reported per request as
//! [`PlacementResult::Unplaced`](crate::scheduler::PlacementResult). The
//! types below cover precondition violations, the typed failure a commit
//! target hands back, and configuration I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations, rejected before a run starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// A request asked for zero minutes
    #[error("Request #{index} ('{label}') has a non-positive duration")]
    NonPositiveDuration { index: usize, label: String },

    /// Working hours do not form a valid daily window
    #[error("Invalid working hours: {start_hour}:00-{end_hour}:00")]
    InvalidWorkingHours { start_hour: u32, end_hour: u32 },

    /// No weekday is eligible for placement
    #[error("Working-hours policy has no work days")]
    NoWorkDays,
}

/// Failure reported by a commit target when it could not reserve a slot.
///
/// The scheduler never looks inside; any variant turns into
/// `UnplacedReason::DownstreamCommitFailed`.
#[derive(Error, Debug)]
pub enum CommitError {
    /// The downstream service refused the reservation
    #[error("Reservation rejected: {0}")]
    Rejected(String),

    /// The downstream service could not be reached
    #[error("Service '{service}' unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// IO errors while persisting the reservation
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors while persisting the reservation
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::InvalidValue {
            key: "policy".to_string(),
            message: err.to_string(),
        }
    }
}
