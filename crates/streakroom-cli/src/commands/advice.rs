use clap::Subcommand;
use streakroom_core::{Advisor, Config};

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum AdviceAction {
    /// One line of advice for right now
    Daily,
    /// Assessment of recent check-in patterns
    Analyze,
}

pub fn run(action: AdviceAction) -> CliResult {
    let config = Config::load()?;
    let mut tracker = open_tracker(&config)?;
    match Advisor::from_config(&config.advisor) {
        Ok(advisor) => tracker = tracker.with_advisor(advisor),
        Err(e) => tracing::debug!(error = %e, "advisor unavailable, using canned advice"),
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match action {
        AdviceAction::Daily => {
            let advice = rt.block_on(tracker.daily_advice())?;
            println!("{advice}");
        }
        AdviceAction::Analyze => {
            let analysis = rt.block_on(tracker.health_analysis())?;
            print_json(&analysis)?;
        }
    }
    Ok(())
}
