//! Check-in records.
//!
//! A [`CheckInEvent`] is immutable once written. Its calendar fields
//! (`date`, `time`, `hour`, `weekday`) are derived from the timestamp in the
//! local offset at write time and are never recomputed afterwards.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::ValidationError;

/// Storage format for `CheckInEvent::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MIN_MOOD: u8 = 1;
pub const MAX_MOOD: u8 = 5;
pub const DEFAULT_MOOD: u8 = 3;

/// How far into the future a check-in may be stamped (clock skew).
const FUTURE_TOLERANCE_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInEvent {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// Local calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local wall time, `HH:MM`.
    pub time: String,
    /// Local hour of day, 0-23.
    pub hour: u32,
    /// ISO weekday, 1 (Monday) - 7 (Sunday).
    pub weekday: u32,
    pub mood: u8,
    pub note: String,
    pub image_uri: Option<String>,
    pub duration_min: u32,
    pub created_at: DateTime<Utc>,
}

impl CheckInEvent {
    /// Parsed calendar date, or `None` if the stored string is malformed.
    pub fn local_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }
}

/// User input for a check-in, before the store assigns an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCheckIn {
    /// 1-5; `None` means the default of 3.
    pub mood: Option<i64>,
    pub note: String,
    pub image_uri: Option<String>,
    pub duration_min: u32,
    /// Backdated instant for catch-up entries; `None` means now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewCheckIn {
    pub fn with_mood(mood: i64) -> Self {
        Self {
            mood: Some(mood),
            ..Self::default()
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Validate the input and derive the calendar fields.
    ///
    /// Moods outside 1-5 are rejected, not clamped.
    pub fn into_record(self, clock: &dyn Clock) -> Result<PendingCheckIn, ValidationError> {
        let mood = match self.mood {
            None => DEFAULT_MOOD,
            Some(m) if (MIN_MOOD as i64..=MAX_MOOD as i64).contains(&m) => m as u8,
            Some(m) => return Err(ValidationError::InvalidMood(m)),
        };

        let now = clock.now();
        let timestamp = self.timestamp.unwrap_or_else(|| now.with_timezone(&Utc));
        if timestamp > now.with_timezone(&Utc) + Duration::seconds(FUTURE_TOLERANCE_SECS) {
            return Err(ValidationError::FutureTimestamp(timestamp));
        }

        let image_uri = self.image_uri.filter(|uri| !uri.trim().is_empty());
        Ok(PendingCheckIn::derive(
            timestamp,
            clock.localize(timestamp),
            mood,
            self.note,
            image_uri,
            self.duration_min,
            now.with_timezone(&Utc),
        ))
    }
}

/// A validated check-in ready to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheckIn {
    pub timestamp: DateTime<Utc>,
    pub date: String,
    pub time: String,
    pub hour: u32,
    pub weekday: u32,
    pub mood: u8,
    pub note: String,
    pub image_uri: Option<String>,
    pub duration_min: u32,
    pub created_at: DateTime<Utc>,
}

impl PendingCheckIn {
    fn derive(
        timestamp: DateTime<Utc>,
        local: DateTime<FixedOffset>,
        mood: u8,
        note: String,
        image_uri: Option<String>,
        duration_min: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            date: local.format(DATE_FORMAT).to_string(),
            time: local.format("%H:%M").to_string(),
            hour: local.hour(),
            weekday: local.weekday().number_from_monday(),
            mood,
            note,
            image_uri,
            duration_min,
            created_at,
        }
    }

    pub fn with_id(self, id: i64) -> CheckInEvent {
        CheckInEvent {
            id,
            timestamp: self.timestamp,
            date: self.date,
            time: self.time,
            hour: self.hour,
            weekday: self.weekday,
            mood: self.mood,
            note: self.note,
            image_uri: self.image_uri,
            duration_min: self.duration_min,
            created_at: self.created_at,
        }
    }
}
