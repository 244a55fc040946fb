//! CSV export of the check-in history.

use std::path::Path;

use crate::error::CoreError;
use crate::record::CheckInEvent;

pub const CSV_HEADER: [&str; 6] = ["date", "time", "mood", "note", "duration_min", "image"];

fn csv_escape(value: &str) -> String {
    if value.contains(['\n', '\r', '"', ',']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv_line(values: &[String]) -> String {
    values.iter().map(|v| csv_escape(v)).collect::<Vec<_>>().join(",")
}

/// Render events as CSV, one row per event in the given order.
pub fn to_csv(events: &[CheckInEvent]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');
    for e in events {
        let row = [
            e.date.clone(),
            e.time.clone(),
            e.mood.to_string(),
            e.note.clone(),
            e.duration_min.to_string(),
            e.image_uri.clone().unwrap_or_default(),
        ];
        out.push_str(&to_csv_line(&row));
        out.push('\n');
    }
    out
}

/// Write the CSV to `path`, creating parent directories.
pub fn write_csv(path: &Path, events: &[CheckInEvent]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_csv(events))?;
    tracing::info!(path = %path.display(), rows = events.len(), "exported check-ins");
    Ok(())
}

/// Default export file name for a given local date, e.g. `streakroom_2026-10-18.csv`.
pub fn default_file_name(date: chrono::NaiveDate) -> String {
    format!("streakroom_{}.csv", date.format("%Y-%m-%d"))
}
