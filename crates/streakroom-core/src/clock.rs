//! Wall-clock source for "today" and local-time derivation.
//!
//! Everything that depends on the current date asks a [`Clock`] instead of
//! calling `Local::now()` directly, so statistics can be computed against a
//! fixed date in tests.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};

pub trait Clock: Send + Sync {
    /// Current instant in the device's local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Convert an instant into the device's local offset.
    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset>;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time and the OS time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        Local.from_utc_datetime(&instant.naive_utc()).fixed_offset()
    }
}

/// Clock pinned to one instant and offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Build from an RFC 3339 string, e.g. `2026-10-18T02:00:00+08:00`.
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(self.now.offset())
    }
}
