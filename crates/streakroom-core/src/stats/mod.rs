//! Statistics over the check-in history.
//!
//! [`StatisticsEngine`] reads a [`RecordStore`] and derives the counts the
//! rest of the app displays and feeds into achievement rules. It holds no
//! state of its own; every call reads the store.

mod patterns;
mod streak;

pub use patterns::{
    distinct_moods, idle_days_before, trailing_happy_run, week_coverage, week_start, weekend_run,
};
pub use streak::{consecutive_days, longest_run};

use std::collections::BTreeSet;

use chrono::{Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::achievements::PatternMetrics;
use crate::error::DatabaseError;
use crate::record::{CheckInEvent, DATE_FORMAT};
use crate::storage::RecordStore;

/// Default rolling-average window in days.
pub const DEFAULT_ROLLING_WINDOW_DAYS: i64 = 7;

/// Largest window accepted from configuration or the CLI.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// `today - days`, saturating at the earliest representable date.
pub fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    let days = u64::try_from(days).unwrap_or(0);
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Snapshot returned by `recompute_statistics`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub today_count: u64,
    pub week_count: u64,
    pub total_count: u64,
    pub streak: u32,
    pub rolling_average: f64,
}

/// Check-in counts per hour of day, index 0-23.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyDistribution {
    pub counts: [u64; 24],
}

impl HourlyDistribution {
    /// Hour with the most check-ins; earliest hour wins ties.
    pub fn peak_hour(&self) -> Option<u32> {
        let (hour, count) = self
            .counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))?;
        (*count > 0).then_some(hour as u32)
    }
}

/// Check-in counts per ISO weekday, index 0 = Monday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayDistribution {
    pub counts: [u64; 7],
}

/// Read-only metrics over a record store.
pub struct StatisticsEngine<'a> {
    store: &'a dyn RecordStore,
    rolling_window_days: i64,
}

impl<'a> StatisticsEngine<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self {
            store,
            rolling_window_days: DEFAULT_ROLLING_WINDOW_DAYS,
        }
    }

    pub fn with_rolling_window(mut self, days: i64) -> Self {
        self.rolling_window_days = days;
        self
    }

    pub fn today_count(&self, today: NaiveDate) -> Result<u64, DatabaseError> {
        self.store.count_on(today)
    }

    /// Check-ins in the Monday-Sunday week containing `today`.
    pub fn week_count(&self, today: NaiveDate) -> Result<u64, DatabaseError> {
        let monday = week_start(today);
        self.store.count_between(monday, monday + Duration::days(6))
    }

    pub fn total_count(&self) -> Result<u64, DatabaseError> {
        self.store.count_all()
    }

    pub fn streak(&self, today: NaiveDate) -> Result<u32, DatabaseError> {
        let dates = self.store.distinct_dates_desc()?;
        Ok(consecutive_days(&dates, today))
    }

    pub fn longest_streak(&self) -> Result<u32, DatabaseError> {
        let dates = self.store.distinct_dates_desc()?;
        Ok(longest_run(&dates))
    }

    /// Check-ins dated in `[today - days, today]`, divided by `days`.
    ///
    /// The window spans `days + 1` calendar days; this matches the
    /// historical numbers users have seen. Zero when `days <= 0`.
    pub fn rolling_average(&self, today: NaiveDate, days: i64) -> Result<f64, DatabaseError> {
        if days <= 0 {
            return Ok(0.0);
        }
        let start = days_before(today, days);
        let count = self.store.count_between(start, today)?;
        Ok(count as f64 / days as f64)
    }

    pub fn snapshot(&self, today: NaiveDate) -> Result<Statistics, DatabaseError> {
        Ok(Statistics {
            today_count: self.today_count(today)?,
            week_count: self.week_count(today)?,
            total_count: self.total_count()?,
            streak: self.streak(today)?,
            rolling_average: self.rolling_average(today, self.rolling_window_days)?,
        })
    }

    /// Dense 24-slot histogram; hours with no events are zero.
    pub fn hourly_distribution(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HourlyDistribution, DatabaseError> {
        let mut counts = [0u64; 24];
        for (hour, count) in self.store.hourly_counts(start, end)? {
            if let Some(slot) = counts.get_mut(hour as usize) {
                *slot = count;
            }
        }
        Ok(HourlyDistribution { counts })
    }

    /// Dense 7-slot histogram, Monday first.
    pub fn weekday_distribution(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeekdayDistribution, DatabaseError> {
        let mut counts = [0u64; 7];
        for (weekday, count) in self.store.weekday_counts(start, end)? {
            if let Some(slot) = (weekday as usize)
                .checked_sub(1)
                .and_then(|i| counts.get_mut(i))
            {
                *slot = count;
            }
        }
        Ok(WeekdayDistribution { counts })
    }

    /// Metrics for the pattern achievements after `trigger` was stored.
    pub fn pattern_metrics(
        &self,
        today: NaiveDate,
        trigger: Option<&CheckInEvent>,
    ) -> Result<PatternMetrics, DatabaseError> {
        let events = self.store.all_events()?;
        let dates: BTreeSet<NaiveDate> = self
            .store
            .distinct_dates_desc()?
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
            .collect();

        Ok(PatternMetrics {
            distinct_moods: distinct_moods(&events),
            happy_run: trailing_happy_run(&events),
            idle_days: trigger.and_then(|t| idle_days_before(t, &events)),
            week_coverage: week_coverage(&dates, today),
            weekend_run: weekend_run(&dates, today),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::record::NewCheckIn;
    use crate::storage::Database;
    use chrono::{DateTime, Utc};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn seed(db: &Database, clock: &FixedClock, at: &[&str]) {
        for ts in at {
            let ts: DateTime<Utc> = DateTime::parse_from_rfc3339(ts).unwrap().into();
            let pending = NewCheckIn::with_mood(3).at(ts).into_record(clock).unwrap();
            db.append(&pending).unwrap();
        }
    }

    fn clock() -> FixedClock {
        FixedClock::parse("2026-10-18T23:59:00+00:00").unwrap()
    }

    #[test]
    fn empty_store_is_all_zero() {
        let db = Database::open_memory().unwrap();
        let stats = StatisticsEngine::new(&db).snapshot(d("2026-10-18")).unwrap();
        assert_eq!(
            stats,
            Statistics {
                today_count: 0,
                week_count: 0,
                total_count: 0,
                streak: 0,
                rolling_average: 0.0,
            }
        );
    }

    #[test]
    fn week_count_is_monday_to_sunday() {
        let db = Database::open_memory().unwrap();
        let clock = clock();
        seed(
            &db,
            &clock,
            &[
                "2026-10-11T09:00:00Z", // previous Sunday
                "2026-10-12T09:00:00Z",
                "2026-10-15T09:00:00Z",
                "2026-10-18T09:00:00Z",
            ],
        );
        let engine = StatisticsEngine::new(&db);
        assert_eq!(engine.week_count(d("2026-10-18")).unwrap(), 3);
        assert_eq!(engine.week_count(d("2026-10-11")).unwrap(), 1);
        assert_eq!(engine.today_count(d("2026-10-18")).unwrap(), 1);
        assert_eq!(engine.total_count().unwrap(), 4);
    }

    #[test]
    fn rolling_average_one_per_day() {
        let db = Database::open_memory().unwrap();
        let clock = clock();
        seed(
            &db,
            &clock,
            &[
                "2026-10-12T09:00:00Z",
                "2026-10-13T09:00:00Z",
                "2026-10-14T09:00:00Z",
                "2026-10-15T09:00:00Z",
                "2026-10-16T09:00:00Z",
                "2026-10-17T09:00:00Z",
                "2026-10-18T09:00:00Z",
            ],
        );
        let engine = StatisticsEngine::new(&db);
        let avg = engine.rolling_average(d("2026-10-18"), 7).unwrap();
        assert!((avg - 1.0).abs() < f64::EPSILON);
        assert_eq!(engine.rolling_average(d("2026-10-18"), 0).unwrap(), 0.0);
        assert_eq!(engine.rolling_average(d("2026-10-18"), -3).unwrap(), 0.0);
        assert_eq!(engine.streak(d("2026-10-18")).unwrap(), 7);
    }

    #[test]
    fn rolling_average_with_huge_window_saturates() {
        let db = Database::open_memory().unwrap();
        let clock = clock();
        seed(&db, &clock, &["2026-10-18T09:00:00Z"]);
        let engine = StatisticsEngine::new(&db).with_rolling_window(200_000_000);
        let stats = engine.snapshot(d("2026-10-18")).unwrap();
        assert_eq!(stats.total_count, 1);
        assert!(stats.rolling_average > 0.0);
        assert_eq!(days_before(d("2026-10-18"), i64::MAX), NaiveDate::MIN);
        assert_eq!(days_before(d("2026-10-18"), 1), d("2026-10-17"));
    }

    #[test]
    fn distributions_are_dense() {
        let db = Database::open_memory().unwrap();
        let clock = clock();
        seed(
            &db,
            &clock,
            &[
                "2026-10-14T08:10:00Z",
                "2026-10-14T08:40:00Z",
                "2026-10-18T23:30:00Z",
            ],
        );
        let engine = StatisticsEngine::new(&db);
        let hourly = engine
            .hourly_distribution(d("2026-10-01"), d("2026-10-31"))
            .unwrap();
        assert_eq!(hourly.counts[8], 2);
        assert_eq!(hourly.counts[23], 1);
        assert_eq!(hourly.counts.iter().sum::<u64>(), 3);
        assert_eq!(hourly.peak_hour(), Some(8));

        let weekly = engine
            .weekday_distribution(d("2026-10-01"), d("2026-10-31"))
            .unwrap();
        assert_eq!(weekly.counts, [0, 0, 2, 0, 0, 0, 1]);

        let empty = engine
            .hourly_distribution(d("2025-01-01"), d("2025-01-31"))
            .unwrap();
        assert_eq!(empty.peak_hour(), None);
    }
}
