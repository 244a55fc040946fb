use chrono::{DateTime, NaiveDate, Utc};

use crate::achievements::{Achievement, AchievementDef};
use crate::error::DatabaseError;
use crate::record::{CheckInEvent, PendingCheckIn};

/// Persistence for check-in events.
///
/// Dates are the stored `YYYY-MM-DD` strings; ranges are inclusive on both
/// ends. Reads over an empty store return zero or empty, never an error.
pub trait RecordStore {
    /// Insert a validated check-in and return its new id.
    fn append(&self, record: &PendingCheckIn) -> Result<i64, DatabaseError>;

    fn get(&self, id: i64) -> Result<Option<CheckInEvent>, DatabaseError>;

    /// Returns `false` when no row had that id.
    fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Returns the number of rows removed.
    fn delete_all(&self) -> Result<usize, DatabaseError>;

    /// Snapshot of every event, newest first.
    fn all_events(&self) -> Result<Vec<CheckInEvent>, DatabaseError>;

    fn events_on(&self, date: NaiveDate) -> Result<Vec<CheckInEvent>, DatabaseError>;

    fn distinct_dates_desc(&self) -> Result<Vec<String>, DatabaseError>;

    fn count_on(&self, date: NaiveDate) -> Result<u64, DatabaseError>;

    fn count_between(&self, start: NaiveDate, end: NaiveDate) -> Result<u64, DatabaseError>;

    fn count_all(&self) -> Result<u64, DatabaseError>;

    /// `(hour, count)` for hours that have at least one event.
    fn hourly_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(u32, u64)>, DatabaseError>;

    /// `(iso_weekday, count)` for weekdays that have at least one event.
    fn weekday_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(u32, u64)>, DatabaseError>;
}

/// Persistence for achievement unlock state.
pub trait AchievementStore {
    /// Insert missing catalog rows and refresh metadata of existing ones.
    /// Unlock state and progress of existing rows are kept.
    fn upsert_catalog(&self, entries: &[AchievementDef]) -> Result<(), DatabaseError>;

    fn get(&self, id: &str) -> Result<Option<Achievement>, DatabaseError>;

    fn list(&self) -> Result<Vec<Achievement>, DatabaseError>;

    /// Mark unlocked at `at` unless already unlocked.
    /// Returns `true` only on the locked -> unlocked transition.
    fn set_unlocked(&self, id: &str, at: DateTime<Utc>) -> Result<bool, DatabaseError>;

    /// Store progress clamped to `[0, target]`.
    fn set_progress(&self, id: &str, value: u32) -> Result<(), DatabaseError>;

    fn delete_all(&self) -> Result<(), DatabaseError>;
}
