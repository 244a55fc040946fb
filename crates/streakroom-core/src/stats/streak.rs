//! Consecutive-day streak calculation.

use chrono::{Duration, NaiveDate};

use crate::record::DATE_FORMAT;

/// Length of the gap-free run of days ending today.
///
/// `dates_desc` are stored `YYYY-MM-DD` strings, distinct and sorted newest
/// first. The walk expects `today`, then `today - 1`, and so on; the first
/// date older than the expected one ends the run. No check-in today means a
/// streak of zero even if yesterday had one.
///
/// Unparseable rows and dates after today are skipped.
pub fn consecutive_days<S: AsRef<str>>(dates_desc: &[S], today: NaiveDate) -> u32 {
    let mut expected = today;
    let mut consecutive = 0u32;

    for raw in dates_desc {
        let Ok(date) = NaiveDate::parse_from_str(raw.as_ref(), DATE_FORMAT) else {
            tracing::debug!(date = raw.as_ref(), "skipping malformed record date");
            continue;
        };
        if date > expected {
            continue;
        }
        if date < expected {
            break;
        }
        consecutive += 1;
        expected -= Duration::days(1);
    }

    consecutive
}

/// Longest gap-free run anywhere in the history.
pub fn longest_run<S: AsRef<str>>(dates: &[S]) -> u32 {
    let mut days: Vec<NaiveDate> = dates
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d.as_ref(), DATE_FORMAT).ok())
        .collect();
    days.sort_unstable();
    days.dedup();

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn empty_history_is_zero() {
        let none: [&str; 0] = [];
        assert_eq!(consecutive_days(&none, d("2026-10-18")), 0);
    }

    #[test]
    fn gap_stops_the_walk() {
        let dates = ["2026-10-18", "2026-10-17", "2026-10-15"];
        assert_eq!(consecutive_days(&dates, d("2026-10-18")), 2);
    }

    #[test]
    fn no_check_in_today_is_zero() {
        let dates = ["2026-10-17", "2026-10-16"];
        assert_eq!(consecutive_days(&dates, d("2026-10-18")), 0);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dates = ["garbage", "2026-10-18", "2026/10/17", "2026-10-17"];
        assert_eq!(consecutive_days(&dates, d("2026-10-18")), 2);
    }

    #[test]
    fn future_dates_are_ignored() {
        let dates = ["2026-10-20", "2026-10-18", "2026-10-17"];
        assert_eq!(consecutive_days(&dates, d("2026-10-18")), 2);
    }

    #[test]
    fn longest_run_finds_older_runs() {
        let dates = [
            "2026-10-18",
            "2026-10-10",
            "2026-10-09",
            "2026-10-08",
            "2026-10-01",
        ];
        assert_eq!(longest_run(&dates), 3);
        let none: [&str; 0] = [];
        assert_eq!(longest_run(&none), 0);
    }

    proptest! {
        #[test]
        fn streak_never_exceeds_history(offsets in proptest::collection::btree_set(0i64..60, 0..40)) {
            let today = d("2026-10-18");
            let dates: Vec<String> = offsets
                .iter()
                .map(|o| (today - Duration::days(*o)).format(DATE_FORMAT).to_string())
                .collect();
            // btree_set ascending offsets = newest date first
            let streak = consecutive_days(&dates, today);
            prop_assert!(streak as usize <= dates.len());

            let expected = (0i64..).take_while(|o| offsets.contains(o)).count();
            prop_assert_eq!(streak as usize, expected);
        }
    }
}
