use clap::{Subcommand, ValueEnum};
use streakroom_core::Config;

use super::{open_tracker, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Print the current goal and reminder settings
    Show,
    /// Set the daily and weekly goals
    Set {
        /// Check-ins per day
        daily: u32,
        /// Check-ins per week (defaults to daily x 7)
        #[arg(long)]
        weekly: Option<u32>,
    },
    /// Configure the daily reminder
    Reminder {
        state: Toggle,
        /// Hour of day, 0-23
        #[arg(long, default_value_t = 9)]
        hour: u32,
        /// Minute, 0-59
        #[arg(long, default_value_t = 0)]
        minute: u32,
    },
    /// Enable or disable the remote advisor for this user
    Ai { state: Toggle },
}

pub fn run(action: GoalAction) -> CliResult {
    let tracker = open_tracker(&Config::load()?)?;

    match action {
        GoalAction::Show => print_json(&tracker.goal()?)?,
        GoalAction::Set { daily, weekly } => {
            let weekly = weekly.unwrap_or_else(|| daily.saturating_mul(7));
            print_json(&tracker.update_goals(daily, weekly)?)?;
        }
        GoalAction::Reminder {
            state,
            hour,
            minute,
        } => {
            print_json(&tracker.update_reminder(state.enabled(), hour, minute)?)?;
        }
        GoalAction::Ai { state } => {
            print_json(&tracker.set_ai_analysis(state.enabled())?)?;
        }
    }
    Ok(())
}
