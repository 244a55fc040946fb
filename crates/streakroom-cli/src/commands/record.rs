use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use streakroom_core::{Config, NewCheckIn};

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum RecordAction {
    /// Check in now, or at --at for a catch-up entry
    Add {
        /// Mood from 1 (worst) to 5 (best)
        #[arg(long, default_value_t = 3, allow_hyphen_values = true)]
        mood: i64,
        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,
        /// Image URI to attach
        #[arg(long)]
        image: Option<String>,
        /// Duration in minutes
        #[arg(long, default_value_t = 0)]
        duration: u32,
        /// RFC 3339 timestamp, e.g. 2026-10-18T07:30:00+09:00
        #[arg(long)]
        at: Option<String>,
    },
    /// List check-ins, newest first
    List {
        /// Only this local date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Maximum number of rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete one check-in by id
    Delete {
        /// Check-in ID
        id: i64,
    },
    /// Delete every check-in and relock all achievements
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: RecordAction) -> CliResult {
    let tracker = open_tracker(&Config::load()?)?;

    match action {
        RecordAction::Add {
            mood,
            note,
            image,
            duration,
            at,
        } => {
            let timestamp = at
                .map(|s| DateTime::parse_from_rfc3339(&s).map(|t| t.with_timezone(&Utc)))
                .transpose()?;
            let input = NewCheckIn {
                mood: Some(mood),
                note,
                image_uri: image,
                duration_min: duration,
                timestamp,
            };
            let outcome = tracker.check_in(input)?;
            print_json(&outcome.events)?;
        }
        RecordAction::List { date, limit } => {
            let mut records = match date {
                Some(d) => tracker.records_on(NaiveDate::parse_from_str(&d, "%Y-%m-%d")?)?,
                None => tracker.records()?,
            };
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            print_json(&records)?;
        }
        RecordAction::Delete { id } => {
            let outcome = tracker.delete_check_in(id)?;
            print_json(&outcome.events)?;
        }
        RecordAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear all data without --yes".into());
            }
            print_json(&tracker.clear_all()?)?;
        }
    }
    Ok(())
}
