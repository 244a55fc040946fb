use clap::Subcommand;
use serde_json::json;
use streakroom_core::stats::MAX_WINDOW_DAYS;
use streakroom_core::Config;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today, week, total, streak and rolling average
    Show,
    /// Today's and this week's counts against the goal
    Goal,
    /// Check-ins per hour of day
    Hourly {
        /// Number of days to include, today included
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS))]
        days: i64,
    },
    /// Check-ins per weekday, Monday first
    Weekday {
        /// Number of days to include, today included
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS))]
        days: i64,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let tracker = open_tracker(&Config::load()?)?;

    match action {
        StatsAction::Show => {
            let stats = tracker.recompute_statistics()?;
            let longest = tracker.engine().longest_streak()?;
            print_json(&json!({
                "todayCount": stats.today_count,
                "weekCount": stats.week_count,
                "totalCount": stats.total_count,
                "streak": stats.streak,
                "longestStreak": longest,
                "rollingAverage": stats.rolling_average,
            }))?;
        }
        StatsAction::Goal => print_json(&tracker.goal_progress()?)?,
        StatsAction::Hourly { days } => {
            let dist = tracker.hourly_distribution(days)?;
            print_json(&json!({
                "counts": dist.counts,
                "peakHour": dist.peak_hour(),
            }))?;
        }
        StatsAction::Weekday { days } => {
            print_json(&tracker.weekday_distribution(days)?)?;
        }
    }
    Ok(())
}
