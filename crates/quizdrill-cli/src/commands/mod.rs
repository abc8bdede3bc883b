pub mod config;
pub mod leaderboard;
pub mod play;
pub mod progress;
pub mod questions;
pub mod session;
pub mod stats;

use chrono::Utc;
use quizdrill_core::storage::Database;
use quizdrill_core::{apply_session_result, scoring, PlayerProgress, Rank};

/// Persisted outcome of a finished session.
pub(crate) struct FinishOutcome {
    pub progress: PlayerProgress,
    pub new_high_score: bool,
}

/// Record a finished session: append the result row and fold the score
/// into the stored player progress (XP, high score, day-streak).
pub(crate) fn record_finished_session(
    db: &Database,
    score: u32,
    accuracy: f64,
    correct_count: u32,
    total_questions: u32,
    rank: Rank,
) -> Result<FinishOutcome, Box<dyn std::error::Error>> {
    let now = Utc::now();
    db.record_result(score, accuracy, correct_count, total_questions, rank, now)?;

    let today = now.date_naive();
    let previous = db.load_progress(today);
    let new_high_score = scoring::is_new_high_score(score, previous.high_score);
    let progress = apply_session_result(&previous, score, today);
    db.save_progress(&progress)?;

    Ok(FinishOutcome {
        progress,
        new_high_score,
    })
}

/// Credit the partial score of an abandoned session. XP only: a quit does
/// not count as a completed play for the high score or the day-streak.
pub(crate) fn credit_partial_xp(
    db: &Database,
    score: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let today = Utc::now().date_naive();
    let mut progress = db.load_progress(today);
    progress.total_xp += u64::from(score);
    db.save_progress(&progress)?;
    Ok(())
}
