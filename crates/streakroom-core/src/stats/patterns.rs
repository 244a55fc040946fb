//! History-derived metrics for the pattern achievements.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::record::{CheckInEvent, MAX_MOOD};

/// Number of different moods used across all events.
pub fn distinct_moods(events: &[CheckInEvent]) -> u32 {
    let moods: BTreeSet<u8> = events.iter().map(|e| e.mood).collect();
    moods.len() as u32
}

/// Most recent consecutive events with the best mood. `events` newest first.
pub fn trailing_happy_run(events: &[CheckInEvent]) -> u32 {
    events.iter().take_while(|e| e.mood == MAX_MOOD).count() as u32
}

/// Full days without a check-in before `trigger`.
///
/// Looks at the latest other event dated on or before the trigger's day.
/// `None` when there is no such event.
pub fn idle_days_before(trigger: &CheckInEvent, events: &[CheckInEvent]) -> Option<u32> {
    let day = trigger.local_date()?;
    let previous = events
        .iter()
        .filter(|e| e.id != trigger.id)
        .filter_map(CheckInEvent::local_date)
        .filter(|d| *d <= day)
        .max()?;
    let gap = (day - previous).num_days() - 1;
    Some(gap.max(0) as u32)
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Distinct days with a check-in in the Monday-Sunday week of `today`.
pub fn week_coverage(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let monday = week_start(today);
    let sunday = monday + Duration::days(6);
    dates.range(monday..=sunday).count() as u32
}

/// Consecutive weekends with at least one check-in on Saturday or Sunday.
///
/// Starts at the most recent such weekend on or before `today` and walks
/// back one week at a time.
pub fn weekend_run(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(latest) = dates
        .range(..=today)
        .rev()
        .find(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
    else {
        return 0;
    };

    let mut saturday = week_start(*latest) + Duration::days(5);
    let mut run = 0;
    loop {
        let sunday = saturday + Duration::days(1);
        if dates.range(saturday..=sunday).next().is_none() {
            break;
        }
        run += 1;
        saturday -= Duration::weeks(1);
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: i64, date: &str, mood: u8) -> CheckInEvent {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let ts = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
        CheckInEvent {
            id,
            timestamp: ts,
            date: date.to_string(),
            time: "12:00".to_string(),
            hour: 12,
            weekday: day.weekday().number_from_monday(),
            mood,
            note: String::new(),
            image_uri: None,
            duration_min: 0,
            created_at: ts,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn set(days: &[&str]) -> BTreeSet<NaiveDate> {
        days.iter().map(|d| day(d)).collect()
    }

    #[test]
    fn moods_and_happy_run() {
        let events = vec![
            event(4, "2026-10-18", 5),
            event(3, "2026-10-17", 5),
            event(2, "2026-10-16", 2),
            event(1, "2026-10-15", 5),
        ];
        assert_eq!(distinct_moods(&events), 2);
        assert_eq!(trailing_happy_run(&events), 2);
        assert_eq!(trailing_happy_run(&[]), 0);
    }

    #[test]
    fn idle_days_counts_the_gap() {
        let events = vec![event(2, "2026-10-18", 3), event(1, "2026-10-14", 3)];
        assert_eq!(idle_days_before(&events[0], &events), Some(3));

        let same_day = vec![event(2, "2026-10-18", 3), event(1, "2026-10-18", 3)];
        assert_eq!(idle_days_before(&same_day[0], &same_day), Some(0));

        assert_eq!(idle_days_before(&events[1], &events[1..]), None);
    }

    #[test]
    fn week_coverage_uses_monday_start() {
        // 2026-10-18 is a Sunday; its week starts 2026-10-12
        let dates = set(&["2026-10-11", "2026-10-12", "2026-10-14", "2026-10-18"]);
        assert_eq!(week_start(day("2026-10-18")), day("2026-10-12"));
        assert_eq!(week_coverage(&dates, day("2026-10-18")), 3);
    }

    #[test]
    fn weekend_run_walks_back_weekly() {
        let dates = set(&[
            "2026-10-17", // Sat
            "2026-10-11", // Sun
            "2026-10-03", // Sat
            "2026-09-20", // Sun, after a missed weekend
        ]);
        assert_eq!(weekend_run(&dates, day("2026-10-18")), 3);
        assert_eq!(weekend_run(&set(&["2026-10-14"]), day("2026-10-18")), 0);
    }
}
