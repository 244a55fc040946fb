pub mod achievement;
pub mod advice;
pub mod auth;
pub mod config;
pub mod export;
pub mod friend;
pub mod goal;
pub mod record;
pub mod stats;

use serde::Serialize;
use streakroom_core::{Config, Database, SystemClock, Tracker};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the database and seed the catalog, goal and demo friends.
pub fn open_tracker(config: &Config) -> Result<Tracker, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = Tracker::new(db, Box::new(SystemClock)).with_config(config);
    tracker.ensure_initialized()?;
    Ok(tracker)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
