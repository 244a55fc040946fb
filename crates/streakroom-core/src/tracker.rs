//! Application facade over storage, statistics and achievements.
//!
//! Every mutation runs in one database transaction and returns the
//! [`Event`]s it produced. Reads go straight to the store.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::achievements::{self, Achievement, CheckInContext};
use crate::advisor::{self, Advisor, AnalysisInput, HealthAnalysis};
use crate::clock::Clock;
use crate::error::{CoreError, DatabaseError, ValidationError};
use crate::events::Event;
use crate::export;
use crate::friend::{self, Friend, LeaderboardEntry, OwnStats, RankBy};
use crate::goal::{self, GoalProgress, UserGoal};
use crate::record::{CheckInEvent, NewCheckIn};
use crate::stats::{
    self, HourlyDistribution, Statistics, StatisticsEngine, WeekdayDistribution,
    DEFAULT_ROLLING_WINDOW_DAYS,
};
use crate::storage::{AchievementStore, Config, Database, RecordStore};

const DEMO_SEEDED_KEY: &str = "demo_friends_seeded";
const PK_WINS_KEY: &str = "pk_wins";

/// Result of a successful check-in.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub record: CheckInEvent,
    pub statistics: Statistics,
    /// Achievement ids unlocked by this check-in, in evaluation order.
    pub unlocked: Vec<&'static str>,
    pub events: Vec<Event>,
}

/// Result of a deletion or re-evaluation.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub statistics: Statistics,
    pub events: Vec<Event>,
}

pub struct Tracker {
    db: Database,
    clock: Box<dyn Clock>,
    rolling_window_days: i64,
    advisor: Option<Advisor>,
    initialized: bool,
}

impl Tracker {
    pub fn new(db: Database, clock: Box<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            rolling_window_days: DEFAULT_ROLLING_WINDOW_DAYS,
            advisor: None,
            initialized: false,
        }
    }

    /// Apply the statistics settings from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.rolling_window_days = config.stats.rolling_window_days;
        self
    }

    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Seed the catalog, the default goal and the demo friends.
    ///
    /// Safe to call repeatedly; existing unlock state is kept.
    pub fn ensure_initialized(&mut self) -> Result<(), CoreError> {
        if self.initialized {
            return Ok(());
        }
        let now = self.now();
        self.db.transaction(|db| -> Result<(), DatabaseError> {
            db.upsert_catalog(achievements::CATALOG)?;
            if db.get_goal()?.is_none() {
                db.save_goal(&UserGoal::with_defaults(now))?;
            }
            if db.kv_get(DEMO_SEEDED_KEY)?.is_none() {
                for f in friend::demo_friends(now) {
                    db.insert_friend(&f)?;
                }
                db.kv_set(DEMO_SEEDED_KEY, "1")?;
                tracing::debug!("seeded demo friends");
            }
            Ok(())
        })?;
        self.initialized = true;
        Ok(())
    }

    fn require_initialized(&self) -> Result<(), DatabaseError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DatabaseError::NotInitialized)
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn engine(&self) -> StatisticsEngine<'_> {
        StatisticsEngine::new(&self.db).with_rolling_window(self.rolling_window_days)
    }

    pub fn recompute_statistics(&self) -> Result<Statistics, CoreError> {
        Ok(self.engine().snapshot(self.today())?)
    }

    // Check-ins

    /// Validate, store and evaluate one check-in.
    ///
    /// Invalid input is rejected before anything is written.
    pub fn check_in(&self, input: NewCheckIn) -> Result<CheckInOutcome, CoreError> {
        self.require_initialized()?;
        let pending = input.into_record(&*self.clock)?;
        let today = self.today();
        let now = self.now();

        let (record, statistics, unlocked) = self.db.transaction(|db| -> Result<_, DatabaseError> {
            let id = db.append(&pending)?;
            let record = pending.with_id(id);
            let engine = StatisticsEngine::new(db).with_rolling_window(self.rolling_window_days);
            let statistics = engine.snapshot(today)?;

            let mut unlocked =
                achievements::check_achievements(db, statistics.total_count, statistics.streak, now)?;

            let note_count = db
                .events_on(today)?
                .iter()
                .filter(|e| e.has_note())
                .count() as u64;
            let ctx = CheckInContext {
                hour: record.hour,
                today_count: statistics.today_count,
                mood: record.mood,
                note_count,
            };
            unlocked.extend(achievements::check_special_achievements(db, ctx, now)?);

            let patterns = engine.pattern_metrics(today, Some(&record))?;
            unlocked.extend(achievements::check_pattern_achievements(db, patterns, now)?);

            Ok((record, statistics, unlocked))
        })?;

        tracing::info!(
            id = record.id,
            mood = record.mood,
            date = %record.date,
            unlocked = unlocked.len(),
            "check-in recorded"
        );

        let mut events = vec![Event::CheckInRecorded {
            id: record.id,
            mood: record.mood,
            date: record.date.clone(),
            hour: record.hour,
            stats: statistics,
            at: now,
        }];
        events.extend(unlock_events(&unlocked, now));

        Ok(CheckInOutcome {
            record,
            statistics,
            unlocked,
            events,
        })
    }

    /// Newest first.
    pub fn records(&self) -> Result<Vec<CheckInEvent>, CoreError> {
        Ok(self.db.all_events()?)
    }

    pub fn records_on(&self, date: NaiveDate) -> Result<Vec<CheckInEvent>, CoreError> {
        Ok(self.db.events_on(date)?)
    }

    /// Remove one check-in and re-run the milestone pass.
    ///
    /// Unlocked achievements stay unlocked; only live progress drops.
    pub fn delete_check_in(&self, id: i64) -> Result<Outcome, CoreError> {
        self.require_initialized()?;
        let today = self.today();
        let now = self.now();

        let (statistics, unlocked) = self.db.transaction(|db| -> Result<_, CoreError> {
            if !db.delete(id)? {
                return Err(ValidationError::NotFound {
                    kind: "check-in",
                    id: id.to_string(),
                }
                .into());
            }
            let statistics = StatisticsEngine::new(db)
                .with_rolling_window(self.rolling_window_days)
                .snapshot(today)?;
            let unlocked =
                achievements::check_achievements(db, statistics.total_count, statistics.streak, now)?;
            Ok((statistics, unlocked))
        })?;

        tracing::info!(id, "check-in deleted");
        let mut events = vec![Event::CheckInDeleted {
            id,
            stats: statistics,
            at: now,
        }];
        events.extend(unlock_events(&unlocked, now));
        Ok(Outcome { statistics, events })
    }

    /// Delete every check-in and relock every achievement.
    pub fn clear_all(&self) -> Result<Event, CoreError> {
        self.require_initialized()?;
        let removed = self.db.transaction(|db| -> Result<_, DatabaseError> {
            let removed = RecordStore::delete_all(db)?;
            achievements::reset(db)?;
            Ok(removed)
        })?;
        tracing::info!(removed, "all data cleared");
        Ok(Event::DataCleared {
            records_removed: removed,
            at: self.now(),
        })
    }

    // Achievements

    pub fn achievements(&self) -> Result<Vec<Achievement>, CoreError> {
        Ok(self.db.list()?)
    }

    /// Re-run every history-based pass against the current data.
    ///
    /// The per-event contextual pass needs a triggering check-in and is
    /// skipped here.
    pub fn evaluate_achievements(&self) -> Result<Outcome, CoreError> {
        self.require_initialized()?;
        let today = self.today();
        let now = self.now();
        let pk_wins = self.pk_wins()?;

        let (statistics, unlocked) = self.db.transaction(|db| -> Result<_, DatabaseError> {
            let engine = StatisticsEngine::new(db).with_rolling_window(self.rolling_window_days);
            let statistics = engine.snapshot(today)?;
            let mut unlocked =
                achievements::check_achievements(db, statistics.total_count, statistics.streak, now)?;
            let patterns = engine.pattern_metrics(today, None)?;
            unlocked.extend(achievements::check_pattern_achievements(db, patterns, now)?);
            unlocked.extend(achievements::check_social(db, db.friend_count()?, now)?);
            unlocked.extend(achievements::check_pk_wins(db, pk_wins, now)?);
            Ok((statistics, unlocked))
        })?;

        Ok(Outcome {
            statistics,
            events: unlock_events(&unlocked, now),
        })
    }

    pub fn reset_achievements(&self) -> Result<Event, CoreError> {
        self.require_initialized()?;
        self.db
            .transaction(|db| -> Result<(), DatabaseError> { achievements::reset(db) })?;
        Ok(Event::AchievementsReset { at: self.now() })
    }

    // Goals

    pub fn goal(&self) -> Result<UserGoal, CoreError> {
        Ok(self
            .db
            .get_goal()?
            .unwrap_or_else(|| UserGoal::with_defaults(self.now())))
    }

    pub fn update_goals(&self, daily: u32, weekly: u32) -> Result<Event, CoreError> {
        self.require_initialized()?;
        goal::validate_goals(daily, weekly)?;
        let now = self.now();
        let mut current = self.goal()?;
        current.daily_goal = daily;
        current.weekly_goal = weekly;
        current.updated_at = now;
        self.db.save_goal(&current)?;
        Ok(Event::GoalUpdated {
            daily_goal: daily,
            weekly_goal: weekly,
            at: now,
        })
    }

    pub fn update_reminder(
        &self,
        enabled: bool,
        hour: u32,
        minute: u32,
    ) -> Result<UserGoal, CoreError> {
        self.require_initialized()?;
        goal::validate_reminder(hour, minute)?;
        let mut current = self.goal()?;
        current.reminder_enabled = enabled;
        current.reminder_hour = hour;
        current.reminder_minute = minute;
        current.updated_at = self.now();
        self.db.save_goal(&current)?;
        Ok(current)
    }

    pub fn set_ai_analysis(&self, enabled: bool) -> Result<UserGoal, CoreError> {
        self.require_initialized()?;
        let mut current = self.goal()?;
        current.ai_analysis_enabled = enabled;
        current.updated_at = self.now();
        self.db.save_goal(&current)?;
        Ok(current)
    }

    pub fn goal_progress(&self) -> Result<GoalProgress, CoreError> {
        let today = self.today();
        let engine = self.engine();
        Ok(GoalProgress::new(
            &self.goal()?,
            engine.today_count(today)?,
            engine.week_count(today)?,
        ))
    }

    // Friends

    pub fn friends(&self) -> Result<Vec<Friend>, CoreError> {
        Ok(self.db.list_friends()?)
    }

    pub fn add_friend(&self, nickname: &str, avatar_emoji: &str) -> Result<Vec<Event>, CoreError> {
        self.require_initialized()?;
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "nickname".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        let now = self.now();
        let friend = Friend::random(nickname, avatar_emoji, now);

        let unlocked = self.db.transaction(|db| -> Result<_, DatabaseError> {
            db.insert_friend(&friend)?;
            achievements::check_social(db, db.friend_count()?, now)
        })?;

        tracing::info!(id = %friend.id, "friend added");
        let mut events = vec![Event::FriendAdded {
            id: friend.id,
            nickname: friend.nickname,
            at: now,
        }];
        events.extend(unlock_events(&unlocked, now));
        Ok(events)
    }

    pub fn remove_friend(&self, id: &str) -> Result<Event, CoreError> {
        self.require_initialized()?;
        let now = self.now();
        self.db.transaction(|db| -> Result<_, CoreError> {
            if !db.delete_friend(id)? {
                return Err(ValidationError::NotFound {
                    kind: "friend",
                    id: id.to_string(),
                }
                .into());
            }
            achievements::check_social(db, db.friend_count()?, now)?;
            Ok(())
        })?;
        Ok(Event::FriendRemoved {
            id: id.to_string(),
            at: now,
        })
    }

    pub fn pk_wins(&self) -> Result<u32, CoreError> {
        Ok(self
            .db
            .kv_get(PK_WINS_KEY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    /// Record a head-to-head result against a friend.
    pub fn record_pk_result(&self, friend_id: &str, won: bool) -> Result<Vec<Event>, CoreError> {
        self.require_initialized()?;
        let now = self.now();
        let (total_wins, unlocked) = self.db.transaction(|db| -> Result<_, CoreError> {
            if db.get_friend(friend_id)?.is_none() {
                return Err(ValidationError::NotFound {
                    kind: "friend",
                    id: friend_id.to_string(),
                }
                .into());
            }
            let mut wins: u32 = db
                .kv_get(PK_WINS_KEY)?
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            if won {
                wins = wins.saturating_add(1);
                db.kv_set(PK_WINS_KEY, &wins.to_string())?;
            }
            Ok((wins, achievements::check_pk_wins(db, wins, now)?))
        })?;

        let mut events = vec![Event::PkFinished {
            friend_id: friend_id.to_string(),
            won,
            total_wins,
            at: now,
        }];
        events.extend(unlock_events(&unlocked, now));
        Ok(events)
    }

    pub fn leaderboard(&self, by: RankBy) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let stats = self.recompute_statistics()?;
        let own = OwnStats {
            week_count: stats.week_count,
            total_count: stats.total_count,
            streak: stats.streak,
        };
        Ok(friend::leaderboard(own, &self.db.list_friends()?, by))
    }

    // Distributions

    /// Hourly counts over the last `days` days, today included.
    pub fn hourly_distribution(&self, days: i64) -> Result<HourlyDistribution, CoreError> {
        let (start, end) = self.window(days);
        Ok(self.engine().hourly_distribution(start, end)?)
    }

    pub fn weekday_distribution(&self, days: i64) -> Result<WeekdayDistribution, CoreError> {
        let (start, end) = self.window(days);
        Ok(self.engine().weekday_distribution(start, end)?)
    }

    fn window(&self, days: i64) -> (NaiveDate, NaiveDate) {
        let end = self.today();
        (stats::days_before(end, days.max(1) - 1), end)
    }

    // Export

    pub fn export_csv(&self) -> Result<String, CoreError> {
        Ok(export::to_csv(&self.db.all_events()?))
    }

    pub fn write_csv(&self, path: &Path) -> Result<usize, CoreError> {
        let events = self.db.all_events()?;
        export::write_csv(path, &events)?;
        Ok(events.len())
    }

    pub fn default_export_name(&self) -> String {
        export::default_file_name(self.today())
    }

    // Advisor

    /// One line of advice; canned text when the advisor is off or fails.
    pub async fn daily_advice(&self) -> Result<String, CoreError> {
        let has_record = self.engine().today_count(self.today())? > 0;
        let Some(client) = self.active_advisor()? else {
            return Ok(advisor::fallback_advice(has_record));
        };
        let hour = self.clock.now().hour();
        match client.daily_advice(hour, has_record).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(error = %e, "advisor request failed, using fallback advice");
                Ok(advisor::fallback_advice(has_record))
            }
        }
    }

    /// Pattern analysis of recent check-ins; canned analysis on failure.
    pub async fn health_analysis(&self) -> Result<HealthAnalysis, CoreError> {
        let stats = self.recompute_statistics()?;
        let events = self.db.all_events()?;
        let Some(client) = self.active_advisor()? else {
            return Ok(advisor::fallback_analysis());
        };
        let input = AnalysisInput::from_events(&events, stats.total_count, stats.streak);
        match client.analyze_health(&input).await {
            Ok(analysis) => Ok(analysis),
            Err(e) => {
                tracing::warn!(error = %e, "advisor request failed, using fallback analysis");
                Ok(advisor::fallback_analysis())
            }
        }
    }

    fn active_advisor(&self) -> Result<Option<&Advisor>, CoreError> {
        if !self.goal()?.ai_analysis_enabled {
            tracing::debug!("ai analysis disabled by user");
            return Ok(None);
        }
        Ok(self.advisor.as_ref())
    }
}

fn unlock_events(ids: &[&'static str], at: DateTime<Utc>) -> Vec<Event> {
    ids.iter()
        .map(|id| Event::AchievementUnlocked {
            id: id.to_string(),
            title: achievements::find(id)
                .map(|d| d.title.to_string())
                .unwrap_or_else(|| id.to_string()),
            at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn tracker(now: &str) -> Tracker {
        let db = Database::open_memory().unwrap();
        let mut t = Tracker::new(db, Box::new(FixedClock::parse(now).unwrap()));
        t.ensure_initialized().unwrap();
        t
    }

    fn unlocked(t: &Tracker, id: &str) -> bool {
        AchievementStore::get(t.db(), id).unwrap().unwrap().is_unlocked
    }

    #[test]
    fn mutations_require_initialization() {
        let db = Database::open_memory().unwrap();
        let t = Tracker::new(db, Box::new(FixedClock::parse("2026-10-18T12:00:00+00:00").unwrap()));
        let err = t.check_in(NewCheckIn::with_mood(3)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::NotInitialized)
        ));
    }

    #[test]
    fn initialization_is_idempotent() {
        let mut t = tracker("2026-10-18T12:00:00+00:00");
        t.initialized = false;
        t.ensure_initialized().unwrap();
        assert_eq!(t.friends().unwrap().len(), 4);
        assert_eq!(t.achievements().unwrap().len(), achievements::CATALOG.len());
    }

    #[test]
    fn first_check_in_unlocks_first_step() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        let out = t.check_in(NewCheckIn::with_mood(4)).unwrap();
        assert_eq!(out.statistics.total_count, 1);
        assert_eq!(out.statistics.streak, 1);
        assert!(out.unlocked.contains(&"first_step"));
        assert!(matches!(out.events[0], Event::CheckInRecorded { .. }));
        assert!(out.events.iter().any(|e| matches!(
            e,
            Event::AchievementUnlocked { id, title, .. } if id == "first_step" && title == "First Step"
        )));
    }

    #[test]
    fn invalid_mood_writes_nothing() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        let err = t.check_in(NewCheckIn::with_mood(9)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidMood(9))
        ));
        assert_eq!(t.db().count_all().unwrap(), 0);
        assert!(!unlocked(&t, "first_step"));
    }

    #[test]
    fn deleting_missing_record_is_not_found() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        let err = t.delete_check_in(42).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotFound { kind: "check-in", .. })
        ));
    }

    #[test]
    fn clear_all_relocks_achievements() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        t.check_in(NewCheckIn::with_mood(3)).unwrap();
        let event = t.clear_all().unwrap();
        assert!(matches!(event, Event::DataCleared { records_removed: 1, .. }));
        assert!(!unlocked(&t, "first_step"));
        assert_eq!(t.recompute_statistics().unwrap().total_count, 0);
    }

    #[test]
    fn fifth_friend_unlocks_social_butterfly() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        let events = t.add_friend("Dana", "🐼").unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::AchievementUnlocked { id, .. } if id == "social_butterfly"
        )));
        assert_eq!(t.friends().unwrap().len(), 5);
    }

    #[test]
    fn blank_nickname_is_rejected() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        assert!(t.add_friend("   ", "🐼").is_err());
        assert_eq!(t.friends().unwrap().len(), 4);
    }

    #[test]
    fn three_pk_wins_unlock_champion() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        t.record_pk_result("demo_1", true).unwrap();
        t.record_pk_result("demo_2", false).unwrap();
        t.record_pk_result("demo_2", true).unwrap();
        assert!(!unlocked(&t, "pk_winner"));
        t.record_pk_result("demo_3", true).unwrap();
        assert!(unlocked(&t, "pk_winner"));
        assert_eq!(t.pk_wins().unwrap(), 3);
    }

    #[test]
    fn pk_against_unknown_friend_is_not_found() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        assert!(t.record_pk_result("nobody", true).is_err());
        assert_eq!(t.pk_wins().unwrap(), 0);
    }

    #[test]
    fn goal_updates_are_validated() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        assert!(t.update_goals(0, 7).is_err());
        t.update_goals(2, 10).unwrap();
        let goal = t.goal().unwrap();
        assert_eq!((goal.daily_goal, goal.weekly_goal), (2, 10));
        assert!(t.update_reminder(true, 24, 0).is_err());
        let goal = t.update_reminder(false, 21, 30).unwrap();
        assert!(!goal.reminder_enabled);
    }

    #[test]
    fn goal_progress_counts_today() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        t.check_in(NewCheckIn::with_mood(3)).unwrap();
        let progress = t.goal_progress().unwrap();
        assert_eq!(progress.today_count, 1);
        assert!(!progress.daily_met);
    }

    #[test]
    fn leaderboard_includes_self() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        let rows = t.leaderboard(RankBy::Total).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.iter().filter(|r| r.is_self).count(), 1);
    }

    #[test]
    fn oversized_windows_do_not_overflow() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        t.check_in(NewCheckIn::with_mood(3)).unwrap();
        assert_eq!(t.hourly_distribution(200_000_000).unwrap().counts[12], 1);
        assert_eq!(t.weekday_distribution(i64::MAX).unwrap().counts[6], 1);

        let mut t = t;
        t.rolling_window_days = 200_000_000;
        let out = t.check_in(NewCheckIn::with_mood(3)).unwrap();
        assert_eq!(out.statistics.total_count, 2);
    }

    #[test]
    fn hourly_distribution_covers_today() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        t.check_in(NewCheckIn::with_mood(3)).unwrap();
        let dist = t.hourly_distribution(7).unwrap();
        assert_eq!(dist.counts[12], 1);
        assert_eq!(dist.peak_hour(), Some(12));
    }

    fn remote(t: Tracker, base_url: &str) -> Tracker {
        let config = crate::storage::AdvisorConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        t.with_advisor(Advisor::new(&config, "test-key").unwrap())
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn advice_uses_remote_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(completion("Stretch before bed."))
            .create_async()
            .await;

        let t = remote(tracker("2026-10-18T12:00:00+00:00"), &server.url());
        assert_eq!(t.daily_advice().await.unwrap(), "Stretch before bed.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn advice_falls_back_on_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let t = remote(tracker("2026-10-18T12:00:00+00:00"), &server.url());
        t.check_in(NewCheckIn::with_mood(4)).unwrap();
        assert_eq!(t.daily_advice().await.unwrap(), advisor::fallback_advice(true));
        assert_eq!(t.health_analysis().await.unwrap(), advisor::fallback_analysis());
    }

    #[tokio::test]
    async fn disabled_ai_analysis_skips_remote() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let t = remote(tracker("2026-10-18T12:00:00+00:00"), &server.url());
        t.set_ai_analysis(false).unwrap();
        assert_eq!(t.daily_advice().await.unwrap(), advisor::fallback_advice(false));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn advice_falls_back_without_advisor() {
        let t = tracker("2026-10-18T12:00:00+00:00");
        let text = t.daily_advice().await.unwrap();
        assert_eq!(text, advisor::fallback_advice(false));
        let analysis = t.health_analysis().await.unwrap();
        assert_eq!(analysis, advisor::fallback_analysis());
    }
}
