//! Append-only JSON-lines ledger used as the CLI's commit target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use slotfit_core::{CommitError, CommitTarget, Interval, SchedulingRequest};

/// One reserved slot, as written to the ledger.
#[derive(Debug, Serialize)]
pub struct LedgerEntry<'a> {
    pub id: String,
    pub label: &'a str,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Writes each committed slot as a JSON line and flushes before returning.
pub struct JsonlLedger {
    file: File,
}

impl JsonlLedger {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl CommitTarget for JsonlLedger {
    fn commit(&mut self, request: &SchedulingRequest, slot: &Interval) -> Result<(), CommitError> {
        let entry = LedgerEntry {
            id: uuid::Uuid::new_v4().to_string(),
            label: &request.label,
            start: slot.start(),
            end: slot.end(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}
