use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::Statistics;

/// Every state change in the system produces an Event.
/// The CLI prints them with `--json`; other front ends can subscribe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CheckInRecorded {
        id: i64,
        mood: u8,
        date: String,
        hour: u32,
        stats: Statistics,
        at: DateTime<Utc>,
    },
    CheckInDeleted {
        id: i64,
        stats: Statistics,
        at: DateTime<Utc>,
    },
    /// All check-ins removed and achievements relocked.
    DataCleared {
        records_removed: usize,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: String,
        title: String,
        at: DateTime<Utc>,
    },
    AchievementsReset {
        at: DateTime<Utc>,
    },
    GoalUpdated {
        daily_goal: u32,
        weekly_goal: u32,
        at: DateTime<Utc>,
    },
    FriendAdded {
        id: String,
        nickname: String,
        at: DateTime<Utc>,
    },
    FriendRemoved {
        id: String,
        at: DateTime<Utc>,
    },
    PkFinished {
        friend_id: String,
        won: bool,
        total_wins: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::CheckInRecorded { at, .. }
            | Event::CheckInDeleted { at, .. }
            | Event::DataCleared { at, .. }
            | Event::AchievementUnlocked { at, .. }
            | Event::AchievementsReset { at }
            | Event::GoalUpdated { at, .. }
            | Event::FriendAdded { at, .. }
            | Event::FriendRemoved { at, .. }
            | Event::PkFinished { at, .. } => *at,
        }
    }
}
