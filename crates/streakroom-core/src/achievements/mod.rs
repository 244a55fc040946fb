//! Achievement catalog and unlock rule engine.
//!
//! The catalog is a static table of [`AchievementDef`]s. Each definition
//! names the [`Metric`] it watches and a [`Rule`] over that metric; a single
//! evaluator in [`engine`] applies whichever definitions have their metric
//! present in the current pass.

mod catalog;
pub mod engine;

pub use catalog::{find, CATALOG};
pub use engine::{
    check_achievements, check_pattern_achievements, check_pk_wins, check_social,
    check_special_achievements, evaluate, reset, CheckInContext, MetricSet, PatternMetrics,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Milestone,
    Streak,
    Funny,
    Extreme,
    Frequency,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Milestone => "milestone",
            Category::Streak => "streak",
            Category::Funny => "funny",
            Category::Extreme => "extreme",
            Category::Frequency => "frequency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "milestone" => Some(Category::Milestone),
            "streak" => Some(Category::Streak),
            "funny" => Some(Category::Funny),
            "extreme" => Some(Category::Extreme),
            "frequency" => Some(Category::Frequency),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Rarity::Common),
            "rare" => Some(Rarity::Rare),
            "epic" => Some(Rarity::Epic),
            "legendary" => Some(Rarity::Legendary),
            _ => None,
        }
    }
}

/// A live number an achievement can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalCount,
    CurrentStreak,
    TodayCount,
    /// Local hour of the triggering check-in.
    CheckInHour,
    /// Today's check-ins with a non-empty note.
    NoteCount,
    FriendCount,
    PkWins,
    DistinctMoods,
    /// Most recent consecutive check-ins with the best mood.
    HappyRun,
    /// Full days without a check-in before the triggering one.
    IdleDays,
    /// Distinct days with a check-in in the current Monday-Sunday week.
    WeekCoverage,
    /// Consecutive weekends with a check-in.
    WeekendRun,
}

/// Unlock condition over one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Unlocks once the metric reaches the definition's target.
    Reach(Metric),
    /// Unlocks when the metric falls in `min..=max` (one-shot events).
    Within { metric: Metric, min: u32, max: u32 },
}

impl Rule {
    pub fn metric(&self) -> Metric {
        match *self {
            Rule::Reach(metric) => metric,
            Rule::Within { metric, .. } => metric,
        }
    }

    pub fn is_satisfied(&self, value: u32, target: u32) -> bool {
        match *self {
            Rule::Reach(_) => value >= target,
            Rule::Within { min, max, .. } => (min..=max).contains(&value),
        }
    }
}

/// How stored progress follows the metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// `progress = min(live, target)` on every pass, locked or not.
    Live,
    /// Progress only moves when the rule is satisfied.
    OnUnlock,
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: Category,
    pub rarity: Rarity,
    pub target: u32,
    pub rule: Rule,
    pub progress: ProgressMode,
}

/// Persisted achievement row: catalog metadata plus unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: Category,
    pub rarity: Rarity,
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub progress: u32,
    pub target: u32,
}

impl Achievement {
    /// Fresh locked row for a catalog entry.
    pub fn locked(def: &AchievementDef) -> Self {
        Self {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            icon: def.icon.to_string(),
            category: def.category,
            rarity: def.rarity,
            is_unlocked: false,
            unlocked_at: None,
            progress: 0,
            target: def.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_rule_is_inclusive() {
        let rule = Rule::Within {
            metric: Metric::CheckInHour,
            min: 0,
            max: 3,
        };
        assert!(rule.is_satisfied(0, 1));
        assert!(rule.is_satisfied(3, 1));
        assert!(!rule.is_satisfied(4, 1));
    }

    #[test]
    fn category_and_rarity_round_trip_through_strings() {
        for c in [
            Category::Milestone,
            Category::Streak,
            Category::Funny,
            Category::Extreme,
            Category::Frequency,
        ] {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Rarity::parse("legendary"), Some(Rarity::Legendary));
        assert_eq!(Rarity::parse("mythic"), None);
    }
}
