//! Database schema migrations for streakroom.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: base tables.
///
/// - records: one row per check-in, local date/hour/weekday frozen at write time
/// - achievements: catalog metadata plus unlock state, ordered by `sort_order`
/// - user_goal: singleton row (id = 1)
/// - friends: locally seeded comparison peers
/// - kv: small application state (PK wins, seeding flags)
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS records (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp    TEXT NOT NULL,
            date         TEXT NOT NULL,
            time         TEXT NOT NULL,
            hour         INTEGER NOT NULL,
            weekday      INTEGER NOT NULL,
            mood         INTEGER NOT NULL DEFAULT 3,
            note         TEXT NOT NULL DEFAULT '',
            image_uri    TEXT,
            duration_min INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS achievements (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            icon        TEXT NOT NULL,
            category    TEXT NOT NULL,
            rarity      TEXT NOT NULL,
            is_unlocked INTEGER NOT NULL DEFAULT 0,
            unlocked_at TEXT,
            progress    INTEGER NOT NULL DEFAULT 0,
            target      INTEGER NOT NULL,
            sort_order  INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS user_goal (
            id                  INTEGER PRIMARY KEY CHECK (id = 1),
            daily_goal          INTEGER NOT NULL,
            weekly_goal         INTEGER NOT NULL,
            reminder_enabled    INTEGER NOT NULL,
            reminder_hour       INTEGER NOT NULL,
            reminder_minute     INTEGER NOT NULL,
            ai_analysis_enabled INTEGER NOT NULL,
            updated_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS friends (
            id                    TEXT PRIMARY KEY,
            nickname              TEXT NOT NULL,
            avatar_emoji          TEXT NOT NULL,
            today_count           INTEGER NOT NULL DEFAULT 0,
            week_count            INTEGER NOT NULL DEFAULT 0,
            total_count           INTEGER NOT NULL DEFAULT 0,
            current_streak        INTEGER NOT NULL DEFAULT 0,
            unlocked_achievements INTEGER NOT NULL DEFAULT 0,
            status                TEXT NOT NULL DEFAULT 'offline',
            last_active_at        TEXT NOT NULL,
            added_at              TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: indexes for the date-range and histogram queries.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_records_date ON records(date);
         CREATE INDEX IF NOT EXISTS idx_records_timestamp ON records(timestamp);
         CREATE INDEX IF NOT EXISTS idx_records_date_hour ON records(date, hour);
         CREATE INDEX IF NOT EXISTS idx_achievements_sort ON achievements(sort_order);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}
