//! Daily/weekly goals and reminder settings (singleton row).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGoal {
    pub daily_goal: u32,
    pub weekly_goal: u32,
    pub reminder_enabled: bool,
    pub reminder_hour: u32,
    pub reminder_minute: u32,
    pub ai_analysis_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl UserGoal {
    pub const DEFAULT_DAILY: u32 = 3;

    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            daily_goal: Self::DEFAULT_DAILY,
            weekly_goal: Self::DEFAULT_DAILY * 7,
            reminder_enabled: true,
            reminder_hour: 9,
            reminder_minute: 0,
            ai_analysis_enabled: true,
            updated_at: now,
        }
    }
}

/// Validate goal values before writing them.
pub fn validate_goals(daily: u32, weekly: u32) -> Result<(), ValidationError> {
    if daily == 0 {
        return Err(ValidationError::InvalidValue {
            field: "daily_goal".into(),
            message: "must be at least 1".into(),
        });
    }
    if weekly == 0 {
        return Err(ValidationError::InvalidValue {
            field: "weekly_goal".into(),
            message: "must be at least 1".into(),
        });
    }
    Ok(())
}

pub fn validate_reminder(hour: u32, minute: u32) -> Result<(), ValidationError> {
    if hour > 23 {
        return Err(ValidationError::InvalidValue {
            field: "reminder_hour".into(),
            message: format!("{hour} is not in 0-23"),
        });
    }
    if minute > 59 {
        return Err(ValidationError::InvalidValue {
            field: "reminder_minute".into(),
            message: format!("{minute} is not in 0-59"),
        });
    }
    Ok(())
}

/// Today/week counts measured against the goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub today_count: u64,
    pub daily_goal: u32,
    pub daily_fraction: f64,
    pub daily_met: bool,
    pub week_count: u64,
    pub weekly_goal: u32,
    pub weekly_fraction: f64,
    pub weekly_met: bool,
}

impl GoalProgress {
    pub fn new(goal: &UserGoal, today_count: u64, week_count: u64) -> Self {
        let fraction = |count: u64, target: u32| {
            if target == 0 {
                0.0
            } else {
                (count as f64 / target as f64).min(1.0)
            }
        };
        Self {
            today_count,
            daily_goal: goal.daily_goal,
            daily_fraction: fraction(today_count, goal.daily_goal),
            daily_met: today_count >= goal.daily_goal as u64,
            week_count,
            weekly_goal: goal.weekly_goal,
            weekly_fraction: fraction(week_count, goal.weekly_goal),
            weekly_met: week_count >= goal.weekly_goal as u64,
        }
    }
}
