use clap::Subcommand;
use streakroom_core::Config;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum AchievementAction {
    /// List the catalog with unlock state and progress
    List {
        /// Only unlocked achievements
        #[arg(long)]
        unlocked: bool,
    },
    /// Re-evaluate all achievements against the stored history
    Check,
    /// Relock every achievement
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: AchievementAction) -> CliResult {
    let tracker = open_tracker(&Config::load()?)?;

    match action {
        AchievementAction::List { unlocked } => {
            let mut list = tracker.achievements()?;
            if unlocked {
                list.retain(|a| a.is_unlocked);
            }
            print_json(&list)?;
        }
        AchievementAction::Check => {
            let outcome = tracker.evaluate_achievements()?;
            print_json(&outcome.events)?;
        }
        AchievementAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset achievements without --yes".into());
            }
            print_json(&tracker.reset_achievements()?)?;
        }
    }
    Ok(())
}
