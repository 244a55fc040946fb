//! Generic evaluator over the achievement catalog.
//!
//! Each pass builds a [`MetricSet`] with the metrics it knows about and hands
//! it to [`evaluate`]. Definitions whose metric is absent are left untouched,
//! so passes triggered at different moments never clobber each other.
//!
//! Evaluation happens in two sweeps over the catalog:
//! 1. every satisfied rule unlocks its achievement (idempotent; the first
//!    unlock time is kept) and pins progress to the satisfied value;
//! 2. every [`ProgressMode::Live`] definition with `target > 1` then has its
//!    progress set to `min(live, target)`, locked or not.
//!
//! `is_unlocked` never goes back to `false` here; only [`reset`] does that.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{AchievementDef, Metric, ProgressMode, Rule, CATALOG};
use crate::error::DatabaseError;
use crate::storage::AchievementStore;

/// Observed metric values for one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSet {
    values: BTreeMap<Metric, u32>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: Metric, value: u32) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn set(&mut self, metric: Metric, value: u32) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<u32> {
        self.values.get(&metric).copied()
    }
}

/// Per-event context for the contextual pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInContext {
    /// Local hour of the check-in, 0-23.
    pub hour: u32,
    /// Check-ins dated today, including this one.
    pub today_count: u64,
    pub mood: u8,
    /// Today's check-ins with a non-empty note, recounted each call.
    pub note_count: u64,
}

/// History-derived metrics for the pattern pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternMetrics {
    pub distinct_moods: u32,
    pub happy_run: u32,
    /// `None` when there is no triggering check-in or no earlier one.
    pub idle_days: Option<u32>,
    pub week_coverage: u32,
    pub weekend_run: u32,
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn unlock_progress(def: &AchievementDef, value: u32) -> u32 {
    match def.rule {
        Rule::Reach(_) => value.min(def.target),
        Rule::Within { .. } => def.target,
    }
}

/// Apply every catalog rule whose metric is present in `metrics`.
///
/// Returns the ids that transitioned from locked to unlocked in this call.
pub fn evaluate(
    store: &dyn AchievementStore,
    metrics: &MetricSet,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, DatabaseError> {
    let mut unlocked = Vec::new();

    for def in CATALOG {
        let Some(value) = metrics.get(def.rule.metric()) else {
            continue;
        };
        if !def.rule.is_satisfied(value, def.target) {
            continue;
        }
        if store.set_unlocked(def.id, at)? {
            tracing::info!(achievement = def.id, value, "achievement unlocked");
            unlocked.push(def.id);
        }
        store.set_progress(def.id, unlock_progress(def, value))?;
    }

    for def in CATALOG {
        if def.progress != ProgressMode::Live || def.target <= 1 {
            continue;
        }
        if let Some(value) = metrics.get(def.rule.metric()) {
            store.set_progress(def.id, value.min(def.target))?;
        }
    }

    Ok(unlocked)
}

/// Milestone and streak pass, run after check-ins and deletions.
pub fn check_achievements(
    store: &dyn AchievementStore,
    total_count: u64,
    current_streak: u32,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, DatabaseError> {
    let metrics = MetricSet::new()
        .with(Metric::TotalCount, saturate(total_count))
        .with(Metric::CurrentStreak, current_streak);
    evaluate(store, &metrics, at)
}

/// Hour-of-day, same-day frequency and note rules for one check-in.
pub fn check_special_achievements(
    store: &dyn AchievementStore,
    ctx: CheckInContext,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, DatabaseError> {
    tracing::debug!(
        hour = ctx.hour,
        today = ctx.today_count,
        mood = ctx.mood,
        notes = ctx.note_count,
        "contextual achievement pass"
    );
    let metrics = MetricSet::new()
        .with(Metric::CheckInHour, ctx.hour)
        .with(Metric::TodayCount, saturate(ctx.today_count))
        .with(Metric::NoteCount, saturate(ctx.note_count));
    evaluate(store, &metrics, at)
}

/// Mood, comeback and weekly-pattern rules.
pub fn check_pattern_achievements(
    store: &dyn AchievementStore,
    patterns: PatternMetrics,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, DatabaseError> {
    let mut metrics = MetricSet::new()
        .with(Metric::DistinctMoods, patterns.distinct_moods)
        .with(Metric::HappyRun, patterns.happy_run)
        .with(Metric::WeekCoverage, patterns.week_coverage)
        .with(Metric::WeekendRun, patterns.weekend_run);
    if let Some(idle) = patterns.idle_days {
        metrics.set(Metric::IdleDays, idle);
    }
    evaluate(store, &metrics, at)
}

pub fn check_social(
    store: &dyn AchievementStore,
    friend_count: u64,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, DatabaseError> {
    let metrics = MetricSet::new().with(Metric::FriendCount, saturate(friend_count));
    evaluate(store, &metrics, at)
}

pub fn check_pk_wins(
    store: &dyn AchievementStore,
    wins: u32,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, DatabaseError> {
    let metrics = MetricSet::new().with(Metric::PkWins, wins);
    evaluate(store, &metrics, at)
}

/// Drop all unlock state and reinsert the catalog locked at zero.
pub fn reset(store: &dyn AchievementStore) -> Result<(), DatabaseError> {
    store.delete_all()?;
    store.upsert_catalog(CATALOG)?;
    tracing::info!(entries = CATALOG.len(), "achievement catalog reset");
    Ok(())
}
