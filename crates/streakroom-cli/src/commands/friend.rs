use clap::{Subcommand, ValueEnum};
use streakroom_core::{Config, RankBy};

use super::{open_tracker, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Rank {
    Total,
    Week,
    Streak,
}

impl From<Rank> for RankBy {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Total => RankBy::Total,
            Rank::Week => RankBy::Week,
            Rank::Streak => RankBy::Streak,
        }
    }
}

#[derive(Subcommand)]
pub enum FriendAction {
    /// List friends in the order they were added
    List,
    /// Add a friend
    Add {
        nickname: String,
        /// Avatar emoji
        #[arg(long, default_value = "🙂")]
        emoji: String,
    },
    /// Remove a friend by id
    Remove { id: String },
    /// Record a head-to-head result against a friend
    Pk {
        /// Friend ID
        id: String,
        /// You won this round
        #[arg(long)]
        won: bool,
    },
    /// Rank yourself among your friends
    Leaderboard {
        #[arg(long, value_enum, default_value_t = Rank::Total)]
        by: Rank,
    },
}

pub fn run(action: FriendAction) -> CliResult {
    let tracker = open_tracker(&Config::load()?)?;

    match action {
        FriendAction::List => print_json(&tracker.friends()?)?,
        FriendAction::Add { nickname, emoji } => {
            print_json(&tracker.add_friend(&nickname, &emoji)?)?;
        }
        FriendAction::Remove { id } => print_json(&tracker.remove_friend(&id)?)?,
        FriendAction::Pk { id, won } => print_json(&tracker.record_pk_result(&id, won)?)?,
        FriendAction::Leaderboard { by } => print_json(&tracker.leaderboard(by.into())?)?,
    }
    Ok(())
}
