//! Core error types for quizdrill-core.
//!
//! Out-of-protocol session calls (answering twice, advancing an unanswered
//! question) are not errors -- the engine treats them as no-ops. The types
//! here cover the cases that genuinely fail: invalid question packs,
//! storage, configuration, and the leaderboard transport.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for quizdrill-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Question pack validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Leaderboard-related errors
    #[error("Leaderboard error: {0}")]
    Leaderboard(#[from] LeaderboardError),

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

/// Question pack validation errors.
///
/// A [`crate::QuestionSet`] that fails these checks cannot be constructed,
/// so a session can never start on a malformed pack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A session needs at least one question
    #[error("question list is empty")]
    EmptyQuestionList,

    /// Every question carries exactly five options
    #[error("question {id}: expected {expected} options, found {found}")]
    WrongOptionCount {
        id: u32,
        expected: usize,
        found: usize,
    },

    /// Option keys must be A..E in display order
    #[error("question {id}: option keys must be A through E in display order")]
    BadOptionKeys { id: u32 },
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse a configuration value
    #[error("Failed to parse configuration value: {0}")]
    ParseFailed(String),
}

/// Leaderboard client errors.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// No base URL configured
    #[error("Leaderboard base URL is not configured")]
    NotConfigured,

    /// Base URL failed to parse
    #[error("Invalid leaderboard base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Server answered with a non-success status
    #[error("Leaderboard request failed (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure
    #[error("Leaderboard transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
