//! Pure scoring rules.
//!
//! Stateless functions over explicit inputs. The session engine applies
//! them; nothing here reads or writes session state.

use serde::{Deserialize, Serialize};

use crate::session::{OptionKey, Question};

/// Points awarded for a correct answer.
pub const POINTS_PER_CORRECT: u32 = 20;

/// Whether `key` is the correct option for `question`.
pub fn is_correct(question: &Question, key: OptionKey) -> bool {
    question.correct == key
}

pub fn points_for_answer(correct: bool) -> u32 {
    if correct {
        POINTS_PER_CORRECT
    } else {
        0
    }
}

/// Percentage of questions answered correctly, 0.0..=100.0.
///
/// Empty sessions cannot exist (see `QuestionSet::new`), but the guard
/// keeps the function total.
pub fn accuracy(correct_count: u32, total_questions: u32) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    f64::from(correct_count) / f64::from(total_questions) * 100.0
}

/// Strictly-greater comparison: tying the previous best is not a new one.
pub fn is_new_high_score(final_score: u32, previous_high_score: u32) -> bool {
    final_score > previous_high_score
}

/// Display-only classification of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Cadet,
    Captain,
    Grandmaster,
}

impl Rank {
    /// Thresholds: below 50 Cadet, 50..=80 Captain, above 80 Grandmaster.
    pub fn from_score(score: u32) -> Self {
        if score < 50 {
            Rank::Cadet
        } else if score <= 80 {
            Rank::Captain
        } else {
            Rank::Grandmaster
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Cadet => "Cadet",
            Rank::Captain => "Captain",
            Rank::Grandmaster => "Grandmaster",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
