//! # Quizdrill Core Library
//!
//! This library provides the core business logic for the Quizdrill quiz
//! trainer. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary; any GUI would be a thin layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A tick-driven state machine that requires the
//!   caller to invoke `tick()` once per second while a session is playing
//! - **Scoring / Streak**: Pure functions for point awards, accuracy,
//!   rank classification, and the cross-session day-streak
//! - **Storage**: SQLite-based result storage and TOML-based configuration
//! - **Leaderboard**: HTTP client for the remote ranked list
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core session state machine
//! - [`QuestionSet`]: Validated, ordered question pack
//! - [`Database`]: Result and progress persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod leaderboard;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, LeaderboardError, ValidationError};
pub use events::Event;
pub use leaderboard::{LeaderboardClient, LeaderboardEntry};
pub use scoring::{Rank, POINTS_PER_CORRECT};
pub use session::{
    AnswerOption, Difficulty, FinishedSummary, OptionKey, Question, QuestionSet, SessionEngine,
    SessionPhase, DEFAULT_SECONDS_PER_QUESTION,
};
pub use storage::{Config, Database, Stats};
pub use streak::{apply_session_result, calculate_streak, PlayerProgress};
