//! # Streakroom Core Library
//!
//! Core logic for the Streakroom habit tracker. Every operation is available
//! through the `streakroom-cli` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite persistence for check-ins, achievements, goals and
//!   friends, plus TOML configuration
//! - **Statistics**: today/week/total counts, day streaks and distributions
//!   derived from the stored history on every read
//! - **Achievements**: a static catalog evaluated by a generic rule engine
//!   after each mutation
//! - **Advisor**: optional remote chat-completion client with canned fallbacks
//!
//! ## Key Components
//!
//! - [`Tracker`]: application facade; every mutation returns [`Event`]s
//! - [`StatisticsEngine`]: read-only metrics over a [`RecordStore`]
//! - [`Database`]: SQLite implementation of both store traits
//! - [`Config`]: application configuration management

pub mod achievements;
pub mod advisor;
pub mod clock;
pub mod error;
pub mod events;
pub mod export;
pub mod friend;
pub mod goal;
pub mod record;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use achievements::{Achievement, AchievementDef, Category, Rarity, CATALOG};
pub use advisor::{Advisor, HealthAnalysis};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AdvisorError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use friend::{Friend, LeaderboardEntry, RankBy};
pub use goal::{GoalProgress, UserGoal};
pub use record::{CheckInEvent, NewCheckIn};
pub use stats::{HourlyDistribution, Statistics, StatisticsEngine, WeekdayDistribution};
pub use storage::{AchievementStore, Config, Database, RecordStore};
pub use tracker::{CheckInOutcome, Outcome, Tracker};
