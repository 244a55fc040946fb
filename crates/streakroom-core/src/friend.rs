//! Locally seeded peers used for comparison.
//!
//! Friends are not computed by the core; their numbers are static demo data
//! (or randomized on creation) and only read back for ranking.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Id used for the user's own row in a leaderboard.
pub const SELF_ID: &str = "me";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    Online,
    Offline,
    Busy,
}

impl FriendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendStatus::Online => "online",
            FriendStatus::Offline => "offline",
            FriendStatus::Busy => "busy",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "offline" => FriendStatus::Offline,
            "busy" => FriendStatus::Busy,
            _ => FriendStatus::Online,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: String,
    pub nickname: String,
    pub avatar_emoji: String,
    pub today_count: u32,
    pub week_count: u32,
    pub total_count: u32,
    pub current_streak: u32,
    pub unlocked_achievements: u32,
    pub status: FriendStatus,
    pub last_active_at: DateTime<Utc>,
    pub added_at: DateTime<Utc>,
}

impl Friend {
    /// New friend with plausible random stats.
    pub fn random(nickname: &str, avatar_emoji: &str, now: DateTime<Utc>) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            nickname: nickname.to_string(),
            avatar_emoji: avatar_emoji.to_string(),
            today_count: rng.gen_range(0..=3),
            week_count: rng.gen_range(0..=15),
            total_count: rng.gen_range(0..=100),
            current_streak: rng.gen_range(0..=10),
            unlocked_achievements: rng.gen_range(0..=8),
            status: FriendStatus::Online,
            last_active_at: now,
            added_at: now,
        }
    }
}

/// Demo peers seeded on first launch.
pub fn demo_friends(now: DateTime<Utc>) -> Vec<Friend> {
    let demo = |id: &str, nickname: &str, emoji: &str, stats: [u32; 5], status| Friend {
        id: id.to_string(),
        nickname: nickname.to_string(),
        avatar_emoji: emoji.to_string(),
        today_count: stats[0],
        week_count: stats[1],
        total_count: stats[2],
        current_streak: stats[3],
        unlocked_achievements: stats[4],
        status,
        last_active_at: now,
        added_at: now,
    };
    vec![
        demo("demo_1", "Steady Sam", "🤓", [3, 18, 156, 12, 8], FriendStatus::Online),
        demo("demo_2", "Self-Discipline King", "💪", [1, 8, 89, 5, 5], FriendStatus::Online),
        demo("demo_3", "Slacker Supreme", "🐟", [5, 28, 320, 30, 15], FriendStatus::Busy),
        demo("demo_4", "Zen Player", "🧘", [0, 2, 34, 0, 3], FriendStatus::Offline),
    ]
}

/// Ranking dimension for [`leaderboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    Total,
    Week,
    Streak,
}

/// The user's own numbers for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnStats {
    pub week_count: u64,
    pub total_count: u64,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: String,
    pub nickname: String,
    pub avatar_emoji: String,
    pub value: u64,
    pub is_self: bool,
}

/// Rank the user among friends, highest first. Ties keep the user ahead.
pub fn leaderboard(own: OwnStats, friends: &[Friend], by: RankBy) -> Vec<LeaderboardEntry> {
    let own_value = match by {
        RankBy::Total => own.total_count,
        RankBy::Week => own.week_count,
        RankBy::Streak => own.streak as u64,
    };

    let mut rows: Vec<LeaderboardEntry> = Vec::with_capacity(friends.len() + 1);
    rows.push(LeaderboardEntry {
        rank: 0,
        id: SELF_ID.to_string(),
        nickname: "Me".to_string(),
        avatar_emoji: "😎".to_string(),
        value: own_value,
        is_self: true,
    });
    rows.extend(friends.iter().map(|f| LeaderboardEntry {
        rank: 0,
        id: f.id.clone(),
        nickname: f.nickname.clone(),
        avatar_emoji: f.avatar_emoji.clone(),
        value: match by {
            RankBy::Total => f.total_count as u64,
            RankBy::Week => f.week_count as u64,
            RankBy::Streak => f.current_streak as u64,
        },
        is_self: false,
    }));

    // Stable sort keeps "me" (inserted first) ahead on ties.
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}
