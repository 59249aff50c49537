//! Working-hours policy inspection commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use slotfit_core::Config;

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Show the configured working-hours policy
    Show,
    /// Check whether a task starting at a given instant fits working hours
    Check {
        /// Task start (RFC 3339)
        #[arg(long)]
        at: DateTime<Utc>,
        /// Task duration in minutes
        #[arg(long)]
        minutes: u32,
    },
}

pub fn run(action: PolicyAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let policy = &config.policy;
    match action {
        PolicyAction::Show => {
            println!("{}", serde_json::to_string_pretty(policy)?);
        }
        PolicyAction::Check { at, minutes } => {
            if policy.admits(at, minutes) {
                println!("within working hours");
            } else {
                match policy.next_working_start(at) {
                    Some(next) => println!("outside working hours; next opening {}", next.to_rfc3339()),
                    None => println!("outside working hours; no work days configured"),
                }
            }
        }
    }
    Ok(())
}
