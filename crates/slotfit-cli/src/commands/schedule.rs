use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

use slotfit_core::{
    BatchScheduler, CommitTarget, Config, Interval, MemoryLedger, PlacementResult, RunSummary,
    SchedulingRequest, SearchWindow,
};

use crate::ledger::JsonlLedger;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Place tasks into the earliest free slots
    Run {
        /// JSON file with an array of {"label", "duration_minutes"}
        #[arg(long)]
        requests: PathBuf,
        /// JSON file with an array of busy {"start", "end"} intervals
        #[arg(long)]
        busy: Option<PathBuf>,
        /// Window start (RFC 3339)
        #[arg(long)]
        from: DateTime<Utc>,
        /// Window end (RFC 3339); defaults to scheduling.default_window_days after --from
        #[arg(long)]
        until: Option<DateTime<Utc>>,
        /// Override scheduling.buffer_minutes
        #[arg(long)]
        buffer: Option<u32>,
        /// Append committed slots to this JSON-lines file
        #[arg(long)]
        ledger: Option<PathBuf>,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ResultLine<'a> {
    label: &'a str,
    #[serde(flatten)]
    result: &'a PlacementResult,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    summary: String,
    results: Vec<ResultLine<'a>>,
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Run {
            requests,
            busy,
            from,
            until,
            buffer,
            ledger,
            json,
        } => {
            let config = Config::load()?;
            let requests: Vec<SchedulingRequest> = read_json(&requests)?;
            let busy: Vec<Interval> = match busy {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let until = match until {
                Some(until) => until,
                None => from
                    .checked_add_signed(Duration::days(i64::from(
                        config.scheduling.default_window_days,
                    )))
                    .ok_or_else(|| {
                        format!(
                            "window of {} days from {from} is out of range",
                            config.scheduling.default_window_days
                        )
                    })?,
            };
            let window = SearchWindow::new(from, until)?;
            tracing::debug!(
                "loaded {} requests and {} busy intervals; window {} - {}",
                requests.len(),
                busy.len(),
                window.start(),
                window.end()
            );

            let mut scheduler_config = config.scheduler_config();
            if let Some(buffer) = buffer {
                scheduler_config.buffer_minutes = buffer;
            }
            let scheduler = BatchScheduler::with_config(scheduler_config);

            let mut target: Box<dyn CommitTarget> = match ledger {
                Some(path) => Box::new(JsonlLedger::open(&path)?),
                None => Box::new(MemoryLedger::new()),
            };
            let run = scheduler.schedule_all(&requests, busy, window, target.as_mut())?;
            let summary = RunSummary::from_run(&requests, &run);

            if json {
                let output = RunOutput {
                    summary: summary.to_string(),
                    results: requests
                        .iter()
                        .zip(&run.results)
                        .map(|(request, result)| ResultLine {
                            label: &request.label,
                            result,
                        })
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for (request, result) in requests.iter().zip(&run.results) {
                    match result {
                        PlacementResult::Placed { interval } => println!(
                            "{}: {} - {}",
                            request.label,
                            interval.start().format("%a %Y-%m-%d %H:%M"),
                            interval.end().format("%H:%M")
                        ),
                        PlacementResult::Unplaced { reason } => {
                            println!("{}: unscheduled ({})", request.label, reason)
                        }
                    }
                }
                println!("{summary}");
            }
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
    Ok(value)
}
