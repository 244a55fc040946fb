//! SQLite-backed storage for check-ins, achievements, goals and friends.
//!
//! Timestamps are stored as fixed-width RFC 3339 text in UTC so that string
//! ordering matches time ordering. Dates are the local `YYYY-MM-DD` strings
//! captured at write time.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::migrations;
use super::traits::{AchievementStore, RecordStore};
use super::data_dir;
use crate::achievements::{Achievement, AchievementDef, Category, Rarity};
use crate::error::DatabaseError;
use crate::friend::{Friend, FriendStatus};
use crate::goal::UserGoal;
use crate::record::{CheckInEvent, PendingCheckIn, DATE_FORMAT};

/// File name inside the data directory.
pub const DB_FILE: &str = "streakroom.db";

const RECORD_COLUMNS: &str =
    "id, timestamp, date, time, hour, weekday, mood, note, image_uri, duration_min, created_at";

const ACHIEVEMENT_COLUMNS: &str =
    "id, title, description, icon, category, rarity, is_unlocked, unlocked_at, progress, target";

const FRIEND_COLUMNS: &str = "id, nickname, avatar_emoji, today_count, week_count, total_count, \
     current_streak, unlocked_achievements, status, last_active_at, added_at";

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a stored timestamp, falling back to the epoch for corrupt rows.
fn parse_ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(value = raw, error = %e, "unparseable timestamp in database");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

fn day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn row_to_event(row: &Row) -> Result<CheckInEvent, rusqlite::Error> {
    Ok(CheckInEvent {
        id: row.get(0)?,
        timestamp: parse_ts(&row.get::<_, String>(1)?),
        date: row.get(2)?,
        time: row.get(3)?,
        hour: row.get(4)?,
        weekday: row.get(5)?,
        mood: row.get(6)?,
        note: row.get(7)?,
        image_uri: row.get(8)?,
        duration_min: row.get(9)?,
        created_at: parse_ts(&row.get::<_, String>(10)?),
    })
}

fn row_to_achievement(row: &Row) -> Result<Achievement, rusqlite::Error> {
    let category: String = row.get(4)?;
    let rarity: String = row.get(5)?;
    Ok(Achievement {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        icon: row.get(3)?,
        category: Category::parse(&category).unwrap_or(Category::Milestone),
        rarity: Rarity::parse(&rarity).unwrap_or(Rarity::Common),
        is_unlocked: row.get(6)?,
        unlocked_at: row.get::<_, Option<String>>(7)?.map(|s| parse_ts(&s)),
        progress: row.get(8)?,
        target: row.get(9)?,
    })
}

fn row_to_friend(row: &Row) -> Result<Friend, rusqlite::Error> {
    Ok(Friend {
        id: row.get(0)?,
        nickname: row.get(1)?,
        avatar_emoji: row.get(2)?,
        today_count: row.get(3)?,
        week_count: row.get(4)?,
        total_count: row.get(5)?,
        current_streak: row.get(6)?,
        unlocked_achievements: row.get(7)?,
        status: FriendStatus::parse(&row.get::<_, String>(8)?),
        last_active_at: parse_ts(&row.get::<_, String>(9)?),
        added_at: parse_ts(&row.get::<_, String>(10)?),
    })
}

/// SQLite database for all persisted state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/streakroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Ok(Self::open_at(path)?)
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, DatabaseError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Run `f` inside `BEGIN IMMEDIATE`; commit on `Ok`, roll back on `Err`.
    ///
    /// Not reentrant: `f` must not call `transaction` again.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE TRANSACTION;")
            .map_err(DatabaseError::from)?;
        match f(self) {
            Ok(value) => {
                self.conn
                    .execute_batch("COMMIT;")
                    .map_err(DatabaseError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = self.conn.execute_batch("ROLLBACK;") {
                    tracing::warn!(error = %e, "rollback failed");
                }
                Err(err)
            }
        }
    }

    // Goals

    pub fn get_goal(&self) -> Result<Option<UserGoal>, DatabaseError> {
        let goal = self
            .conn
            .query_row(
                "SELECT daily_goal, weekly_goal, reminder_enabled, reminder_hour,
                        reminder_minute, ai_analysis_enabled, updated_at
                 FROM user_goal WHERE id = 1",
                [],
                |row| {
                    Ok(UserGoal {
                        daily_goal: row.get(0)?,
                        weekly_goal: row.get(1)?,
                        reminder_enabled: row.get(2)?,
                        reminder_hour: row.get(3)?,
                        reminder_minute: row.get(4)?,
                        ai_analysis_enabled: row.get(5)?,
                        updated_at: parse_ts(&row.get::<_, String>(6)?),
                    })
                },
            )
            .optional()?;
        Ok(goal)
    }

    pub fn save_goal(&self, goal: &UserGoal) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_goal
                (id, daily_goal, weekly_goal, reminder_enabled, reminder_hour,
                 reminder_minute, ai_analysis_enabled, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.daily_goal,
                goal.weekly_goal,
                goal.reminder_enabled,
                goal.reminder_hour,
                goal.reminder_minute,
                goal.ai_analysis_enabled,
                format_ts(&goal.updated_at),
            ],
        )?;
        Ok(())
    }

    // Friends

    /// Friends in the order they were added.
    pub fn list_friends(&self) -> Result<Vec<Friend>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {FRIEND_COLUMNS} FROM friends ORDER BY added_at ASC, rowid ASC"
        ))?;
        let friends = stmt
            .query_map([], row_to_friend)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(friends)
    }

    pub fn get_friend(&self, id: &str) -> Result<Option<Friend>, DatabaseError> {
        let friend = self
            .conn
            .query_row(
                &format!("SELECT {FRIEND_COLUMNS} FROM friends WHERE id = ?1"),
                params![id],
                row_to_friend,
            )
            .optional()?;
        Ok(friend)
    }

    pub fn insert_friend(&self, friend: &Friend) -> Result<(), DatabaseError> {
        self.conn.execute(
            &format!(
                "INSERT INTO friends ({FRIEND_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                friend.id,
                friend.nickname,
                friend.avatar_emoji,
                friend.today_count,
                friend.week_count,
                friend.total_count,
                friend.current_streak,
                friend.unlocked_achievements,
                friend.status.as_str(),
                format_ts(&friend.last_active_at),
                format_ts(&friend.added_at),
            ],
        )?;
        Ok(())
    }

    /// Returns `false` when no friend had that id.
    pub fn delete_friend(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM friends WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn friend_count(&self) -> Result<u64, DatabaseError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM friends", [], |row| row.get(0))?;
        Ok(count(n))
    }

    // Key-value state

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl RecordStore for Database {
    fn append(&self, record: &PendingCheckIn) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO records
                (timestamp, date, time, hour, weekday, mood, note, image_uri, duration_min, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                format_ts(&record.timestamp),
                record.date,
                record.time,
                record.hour,
                record.weekday,
                record.mood,
                record.note,
                record.image_uri,
                record.duration_min,
                format_ts(&record.created_at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: i64) -> Result<Option<CheckInEvent>, DatabaseError> {
        let event = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
                params![id],
                row_to_event,
            )
            .optional()?;
        Ok(event)
    }

    fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn delete_all(&self) -> Result<usize, DatabaseError> {
        Ok(self.conn.execute("DELETE FROM records", [])?)
    }

    fn all_events(&self) -> Result<Vec<CheckInEvent>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records ORDER BY timestamp DESC, id DESC"
        ))?;
        let events = stmt
            .query_map([], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn events_on(&self, date: NaiveDate) -> Result<Vec<CheckInEvent>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE date = ?1
             ORDER BY timestamp DESC, id DESC"
        ))?;
        let events = stmt
            .query_map(params![day(date)], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn distinct_dates_desc(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT date FROM records ORDER BY date DESC")?;
        let dates = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    fn count_on(&self, date: NaiveDate) -> Result<u64, DatabaseError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE date = ?1",
            params![day(date)],
            |row| row.get(0),
        )?;
        Ok(count(n))
    }

    fn count_between(&self, start: NaiveDate, end: NaiveDate) -> Result<u64, DatabaseError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE date >= ?1 AND date <= ?2",
            params![day(start), day(end)],
            |row| row.get(0),
        )?;
        Ok(count(n))
    }

    fn count_all(&self) -> Result<u64, DatabaseError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count(n))
    }

    fn hourly_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(u32, u64)>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT hour, COUNT(*) FROM records
             WHERE date >= ?1 AND date <= ?2
             GROUP BY hour ORDER BY hour",
        )?;
        let rows = stmt
            .query_map(params![day(start), day(end)], |row| {
                Ok((row.get::<_, u32>(0)?, count(row.get::<_, i64>(1)?)))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn weekday_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(u32, u64)>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT weekday, COUNT(*) FROM records
             WHERE date >= ?1 AND date <= ?2
             GROUP BY weekday ORDER BY weekday",
        )?;
        let rows = stmt
            .query_map(params![day(start), day(end)], |row| {
                Ok((row.get::<_, u32>(0)?, count(row.get::<_, i64>(1)?)))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl AchievementStore for Database {
    fn upsert_catalog(&self, entries: &[AchievementDef]) -> Result<(), DatabaseError> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO achievements
                (id, title, description, icon, category, rarity,
                 is_unlocked, unlocked_at, progress, target, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, NULL, 0, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                icon = excluded.icon,
                category = excluded.category,
                rarity = excluded.rarity,
                target = excluded.target,
                sort_order = excluded.sort_order,
                progress = MIN(achievements.progress, excluded.target)",
        )?;
        for (order, def) in entries.iter().enumerate() {
            stmt.execute(params![
                def.id,
                def.title,
                def.description,
                def.icon,
                def.category.as_str(),
                def.rarity.as_str(),
                def.target,
                order as i64,
            ])?;
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Achievement>, DatabaseError> {
        let achievement = self
            .conn
            .query_row(
                &format!("SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE id = ?1"),
                params![id],
                row_to_achievement,
            )
            .optional()?;
        Ok(achievement)
    }

    fn list(&self) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements ORDER BY sort_order ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map([], row_to_achievement)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn set_unlocked(&self, id: &str, at: DateTime<Utc>) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE achievements SET is_unlocked = 1, unlocked_at = ?2
             WHERE id = ?1 AND is_unlocked = 0",
            params![id, format_ts(&at)],
        )?;
        Ok(changed > 0)
    }

    fn set_progress(&self, id: &str, value: u32) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE achievements SET progress = MIN(?2, target) WHERE id = ?1",
            params![id, value],
        )?;
        Ok(())
    }

    fn delete_all(&self) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM achievements", [])?;
        Ok(())
    }
}
