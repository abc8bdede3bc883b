//! Cross-session day-streak and player progress.
//!
//! Distinct from the in-session answer streak: this one counts consecutive
//! calendar days played. All functions take dates at calendar-day
//! granularity (`NaiveDate`) so time-of-day and timezone jitter cannot
//! produce off-by-one streaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Apply the day-streak law for a session played on `today`.
///
/// Same-day replay leaves the streak unchanged, playing on the next
/// calendar day increments it, and any other gap (two or more days, or a
/// clock-skewed negative delta) resets it to 1.
pub fn calculate_streak(last_played: NaiveDate, current_streak: u32, today: NaiveDate) -> u32 {
    if last_played == today {
        current_streak
    } else if (today - last_played).num_days() == 1 {
        current_streak + 1
    } else {
        1
    }
}

/// Persisted cross-session record. The storage layer owns reading and
/// writing it; the transforms here never touch I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub total_xp: u64,
    pub high_score: u32,
    pub streak_days: u32,
    pub last_played: NaiveDate,
}

impl PlayerProgress {
    /// The documented default for a player with no stored record.
    pub fn zeroed(today: NaiveDate) -> Self {
        Self {
            total_xp: 0,
            high_score: 0,
            streak_days: 0,
            last_played: today,
        }
    }
}

/// Fold a finished session's score into the stored progress.
///
/// XP accumulates, the high score is a max, the day-streak follows
/// [`calculate_streak`], and the played date is stamped. Cannot fail on
/// well-typed inputs; storage failures belong to the caller.
pub fn apply_session_result(
    progress: &PlayerProgress,
    session_score: u32,
    today: NaiveDate,
) -> PlayerProgress {
    PlayerProgress {
        total_xp: progress.total_xp + u64::from(session_score),
        high_score: progress.high_score.max(session_score),
        streak_days: calculate_streak(progress.last_played, progress.streak_days, today),
        last_played: today,
    }
}
