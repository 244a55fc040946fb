//! Core error types for streakroom-core.
//!
//! Storage failures bubble up unchanged through [`CoreError::Database`].
//! Advisor failures have their own enum so callers can swap them for a
//! canned fallback without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for streakroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Remote advisor errors
    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A mutation arrived before `ensure_initialized` ran
    #[error("Store is not initialized")]
    NotInitialized,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// OS keyring failure
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Mood outside 1..=5
    #[error("Invalid mood {0}: must be between 1 and 5")]
    InvalidMood(i64),

    /// Check-in timestamp in the future
    #[error("Check-in time {0} is in the future")]
    FutureTimestamp(chrono::DateTime<chrono::Utc>),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Referenced row does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

/// Errors from the remote chat-completion advisor.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// No API key stored
    #[error("Advisor is not configured (no API key)")]
    NotConfigured,

    /// Invalid endpoint URL
    #[error("Invalid advisor base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure
    #[error("Advisor request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Advisor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response had no choices or empty content
    #[error("Advisor returned an empty response")]
    EmptyResponse,
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
