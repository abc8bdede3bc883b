use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::Rank;
use crate::session::{OptionKey, SessionPhase};

/// Every session transition produces an Event.
/// Callers diff the fields they care about instead of registering
/// per-field observers; `StateSnapshot` serves pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        total_questions: u32,
        seconds_per_question: u32,
        at: DateTime<Utc>,
    },
    /// A question was answered and locked, by user selection.
    /// `awarded` is non-zero exactly when the answer was correct, which is
    /// all the presentation layer needs for its "+XP" pulse.
    AnswerLocked {
        question_index: usize,
        selected: OptionKey,
        correct: bool,
        correct_key: OptionKey,
        awarded: u32,
        score: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// The countdown expired before any selection; the question is locked
    /// with no option chosen and the engine will auto-advance.
    TimedOut {
        question_index: usize,
        correct_key: OptionKey,
        score: u32,
        at: DateTime<Utc>,
    },
    QuestionAdvanced {
        question_index: usize,
        time_remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Emitted exactly once per session, at the Playing -> Finished
    /// transition.
    SessionFinished {
        score: u32,
        accuracy: f64,
        correct_count: u32,
        total_questions: u32,
        rank: Rank,
        at: DateTime<Utc>,
    },
    /// Session abandoned mid-run; `score` is the partial credit.
    SessionQuit {
        score: u32,
        at: DateTime<Utc>,
    },
    /// Finished snapshot discarded, back to Idle.
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        question_index: usize,
        total_questions: u32,
        score: u32,
        streak: u32,
        correct_count: u32,
        selected: Option<OptionKey>,
        answered: bool,
        time_remaining_secs: u32,
        at: DateTime<Utc>,
    },
}
