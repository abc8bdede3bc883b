//! Session engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no thread and no
//! timer - the caller fires `tick()` once per second while a session is
//! playing.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Playing -> Finished -> Idle
//!            |
//!            +-> Idle (quit)
//! ```
//!
//! Within `Playing`, each question runs its own cycle: unanswered ->
//! answered (by selection or countdown expiry) -> advance. Out-of-protocol
//! calls (answering twice, advancing an unanswered question, ticking while
//! idle) return `None` and leave the state untouched, so stale UI event
//! handlers cannot corrupt a session.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new();
//! engine.start(QuestionSet::builtin_pack());
//! engine.select_option(OptionKey::B);
//! engine.advance();
//! // In a loop, once per second:
//! engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::question::{OptionKey, Question, QuestionSet};
use crate::events::Event;
use crate::scoring::{self, Rank};

/// Per-question countdown length.
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 30;

/// Ticks between a timeout lock and the forced advance. The exact length
/// is a presentation choice; that the advance happens is a contract.
const TIMEOUT_ACK_TICKS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Playing,
    Finished,
}

/// Immutable result of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedSummary {
    pub score: u32,
    pub accuracy: f64,
    pub correct_count: u32,
    pub total_questions: u32,
    pub rank: Rank,
}

/// Core session state machine.
///
/// All mutation goes through the command methods; callers read state via
/// the query methods or [`SessionEngine::snapshot`]. Serializable so a
/// driver can persist it between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEngine {
    phase: SessionPhase,
    /// `Some` exactly while a session is live (Playing or Finished).
    questions: Option<QuestionSet>,
    current_index: usize,
    score: u32,
    streak: u32,
    correct_count: u32,
    selected: Option<OptionKey>,
    answered: bool,
    time_remaining_secs: u32,
    seconds_per_question: u32,
    /// Countdown to the forced advance after a timeout lock.
    #[serde(default)]
    auto_advance_in: Option<u32>,
    /// Final snapshot, kept until `try_again()`.
    #[serde(default)]
    finished: Option<FinishedSummary>,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            questions: None,
            current_index: 0,
            score: 0,
            streak: 0,
            correct_count: 0,
            selected: None,
            answered: false,
            time_remaining_secs: DEFAULT_SECONDS_PER_QUESTION,
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            auto_advance_in: None,
            finished: None,
        }
    }

    /// Override the per-question countdown (minimum 1 second).
    pub fn with_seconds_per_question(mut self, secs: u32) -> Self {
        self.seconds_per_question = secs.max(1);
        if self.phase == SessionPhase::Idle {
            self.time_remaining_secs = self.seconds_per_question;
        }
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.as_ref()?.get(self.current_index)
    }

    pub fn total_questions(&self) -> u32 {
        self.questions.as_ref().map(|q| q.len() as u32).unwrap_or(0)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn selected(&self) -> Option<OptionKey> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    pub fn finished(&self) -> Option<&FinishedSummary> {
        self.finished.as_ref()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            question_index: self.current_index,
            total_questions: self.total_questions(),
            score: self.score,
            streak: self.streak,
            correct_count: self.correct_count,
            selected: self.selected,
            answered: self.answered,
            time_remaining_secs: self.time_remaining_secs,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session over `questions`. Idle only.
    ///
    /// Malformed question lists cannot reach this point: they are rejected
    /// when the `QuestionSet` is constructed.
    pub fn start(&mut self, questions: QuestionSet) -> Option<Event> {
        if self.phase != SessionPhase::Idle {
            return None;
        }
        self.phase = SessionPhase::Playing;
        self.current_index = 0;
        self.score = 0;
        self.streak = 0;
        self.correct_count = 0;
        self.selected = None;
        self.answered = false;
        self.time_remaining_secs = self.seconds_per_question;
        self.auto_advance_in = None;
        self.finished = None;
        let total = questions.len() as u32;
        self.questions = Some(questions);
        Some(Event::SessionStarted {
            total_questions: total,
            seconds_per_question: self.seconds_per_question,
            at: Utc::now(),
        })
    }

    /// Lock in an answer for the current question.
    ///
    /// First writer wins: once a question is answered (by selection or
    /// timeout), every further selection is a no-op.
    pub fn select_option(&mut self, key: OptionKey) -> Option<Event> {
        if self.phase != SessionPhase::Playing || self.answered {
            return None;
        }
        let question = self.current_question()?;
        let correct_key = question.correct;
        let correct = scoring::is_correct(question, key);
        let awarded = scoring::points_for_answer(correct);

        self.selected = Some(key);
        self.answered = true;
        if correct {
            self.score += awarded;
            self.correct_count += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        Some(Event::AnswerLocked {
            question_index: self.current_index,
            selected: key,
            correct,
            correct_key,
            awarded,
            score: self.score,
            streak: self.streak,
            at: Utc::now(),
        })
    }

    /// Advance one second of countdown. Call once per second while
    /// `Playing`; every other phase ignores it.
    ///
    /// Expiry while unanswered locks the question as a timeout (streak
    /// reset, no score change) and arms the forced advance; expiry after
    /// the question was answered changes nothing.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Playing {
            return None;
        }

        if let Some(remaining) = self.auto_advance_in {
            if remaining <= 1 {
                self.auto_advance_in = None;
                return self.advance_locked();
            }
            self.auto_advance_in = Some(remaining - 1);
            return None;
        }

        if self.time_remaining_secs > 0 {
            self.time_remaining_secs -= 1;
        }
        if self.time_remaining_secs == 0 && !self.answered {
            let correct_key = self.current_question()?.correct;
            self.selected = None;
            self.answered = true;
            self.streak = 0;
            self.auto_advance_in = Some(TIMEOUT_ACK_TICKS);
            return Some(Event::TimedOut {
                question_index: self.current_index,
                correct_key,
                score: self.score,
                at: Utc::now(),
            });
        }
        None
    }

    /// Move past an answered question: next question, or Finished after
    /// the last one. Unanswered questions cannot be skipped.
    pub fn advance(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Playing || !self.answered {
            return None;
        }
        self.advance_locked()
    }

    fn advance_locked(&mut self) -> Option<Event> {
        let total = self.questions.as_ref()?.len();
        if self.current_index + 1 < total {
            self.current_index += 1;
            self.selected = None;
            self.answered = false;
            self.time_remaining_secs = self.seconds_per_question;
            self.auto_advance_in = None;
            Some(Event::QuestionAdvanced {
                question_index: self.current_index,
                time_remaining_secs: self.time_remaining_secs,
                at: Utc::now(),
            })
        } else {
            let total = total as u32;
            let summary = FinishedSummary {
                score: self.score,
                accuracy: scoring::accuracy(self.correct_count, total),
                correct_count: self.correct_count,
                total_questions: total,
                rank: Rank::from_score(self.score),
            };
            self.phase = SessionPhase::Finished;
            self.auto_advance_in = None;
            let event = Event::SessionFinished {
                score: summary.score,
                accuracy: summary.accuracy,
                correct_count: summary.correct_count,
                total_questions: summary.total_questions,
                rank: summary.rank,
                at: Utc::now(),
            };
            self.finished = Some(summary);
            Some(event)
        }
    }

    /// Abandon the running session; the event carries the partial score.
    pub fn quit(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        let score = self.score;
        self.reset_to_idle();
        Some(Event::SessionQuit {
            score,
            at: Utc::now(),
        })
    }

    /// Discard a finished session's snapshot and return to Idle, ready
    /// for a fresh `start()`.
    pub fn try_again(&mut self) -> Option<Event> {
        if self.phase != SessionPhase::Finished {
            return None;
        }
        self.reset_to_idle();
        Some(Event::SessionReset { at: Utc::now() })
    }

    fn reset_to_idle(&mut self) {
        self.phase = SessionPhase::Idle;
        self.questions = None;
        self.current_index = 0;
        self.score = 0;
        self.streak = 0;
        self.correct_count = 0;
        self.selected = None;
        self.answered = false;
        self.time_remaining_secs = self.seconds_per_question;
        self.auto_advance_in = None;
        self.finished = None;
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_engine() -> SessionEngine {
        let mut engine = SessionEngine::new();
        assert!(engine.start(QuestionSet::builtin_pack()).is_some());
        engine
    }

    fn correct_key(engine: &SessionEngine) -> OptionKey {
        engine.current_question().unwrap().correct
    }

    fn wrong_key(engine: &SessionEngine) -> OptionKey {
        let correct = correct_key(engine);
        OptionKey::ALL.into_iter().find(|&k| k != correct).unwrap()
    }

    #[test]
    fn start_enters_playing_with_zeroed_counters() {
        let engine = started_engine();
        assert_eq!(engine.phase(), SessionPhase::Playing);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.streak(), 0);
        assert_eq!(engine.time_remaining_secs(), DEFAULT_SECONDS_PER_QUESTION);
        assert!(!engine.is_answered());
    }

    #[test]
    fn start_is_a_noop_while_playing() {
        let mut engine = started_engine();
        engine.select_option(correct_key(&engine));
        assert!(engine.start(QuestionSet::builtin_pack()).is_none());
        assert_eq!(engine.score(), 20);
    }

    #[test]
    fn correct_answer_awards_points_and_streak() {
        let mut engine = started_engine();
        let event = engine.select_option(correct_key(&engine)).unwrap();
        match event {
            Event::AnswerLocked {
                correct, awarded, ..
            } => {
                assert!(correct);
                assert_eq!(awarded, 20);
            }
            other => panic!("Expected AnswerLocked, got {other:?}"),
        }
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.streak(), 1);
        assert_eq!(engine.correct_count(), 1);
    }

    #[test]
    fn wrong_answer_resets_streak_only() {
        let mut engine = started_engine();
        engine.select_option(correct_key(&engine));
        engine.advance();
        engine.select_option(wrong_key(&engine));
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.streak(), 0);
        assert_eq!(engine.correct_count(), 1);
    }

    #[test]
    fn second_selection_is_a_noop() {
        let mut engine = started_engine();
        let wrong = wrong_key(&engine);
        engine.select_option(wrong);
        let snapshot = (engine.score(), engine.streak(), engine.selected());
        assert!(engine.select_option(correct_key(&engine)).is_none());
        assert_eq!(
            (engine.score(), engine.streak(), engine.selected()),
            snapshot
        );
    }

    #[test]
    fn tick_counts_down_and_floors_at_zero() {
        let mut engine = started_engine();
        engine.select_option(correct_key(&engine));
        for _ in 0..DEFAULT_SECONDS_PER_QUESTION + 10 {
            engine.tick();
        }
        assert_eq!(engine.time_remaining_secs(), 0);
        // Answered before expiry: no timeout penalty, no auto-advance.
        assert_eq!(engine.streak(), 1);
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn expiry_locks_question_as_timeout() {
        let mut engine = started_engine();
        let mut timed_out = None;
        for _ in 0..DEFAULT_SECONDS_PER_QUESTION {
            timed_out = engine.tick();
        }
        assert!(matches!(timed_out, Some(Event::TimedOut { .. })));
        assert!(engine.is_answered());
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.streak(), 0);
        assert_eq!(engine.score(), 0);
        // Selection after the lock is a no-op.
        assert!(engine.select_option(correct_key(&engine)).is_none());
    }

    #[test]
    fn timeout_auto_advances_on_the_next_tick() {
        let mut engine = started_engine();
        for _ in 0..DEFAULT_SECONDS_PER_QUESTION {
            engine.tick();
        }
        assert_eq!(engine.current_index(), 0);
        let event = engine.tick();
        assert!(matches!(event, Some(Event::QuestionAdvanced { .. })));
        assert_eq!(engine.current_index(), 1);
        assert!(!engine.is_answered());
        assert_eq!(engine.time_remaining_secs(), DEFAULT_SECONDS_PER_QUESTION);
    }

    #[test]
    fn timeout_on_last_question_finishes_the_session() {
        let mut engine = started_engine();
        let total = engine.total_questions() as usize;
        for _ in 0..total - 1 {
            engine.select_option(correct_key(&engine));
            engine.advance();
        }
        for _ in 0..DEFAULT_SECONDS_PER_QUESTION {
            engine.tick();
        }
        let event = engine.tick();
        assert!(matches!(event, Some(Event::SessionFinished { .. })));
        assert_eq!(engine.phase(), SessionPhase::Finished);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut engine = started_engine();
        assert!(engine.advance().is_none());
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn finishing_emits_summary_once() {
        let mut engine = started_engine();
        let total = engine.total_questions() as usize;
        let mut finish = None;
        for _ in 0..total {
            engine.select_option(correct_key(&engine));
            finish = engine.advance();
        }
        match finish {
            Some(Event::SessionFinished {
                score, accuracy, ..
            }) => {
                assert_eq!(score, 20 * total as u32);
                assert_eq!(accuracy, 100.0);
            }
            other => panic!("Expected SessionFinished, got {other:?}"),
        }
        let summary = engine.finished().unwrap().clone();

        // Idempotent past the end: no re-emission, no mutation.
        assert!(engine.advance().is_none());
        assert!(engine.tick().is_none());
        assert!(engine.select_option(OptionKey::A).is_none());
        assert_eq!(engine.finished().unwrap(), &summary);
    }

    #[test]
    fn quit_reports_partial_score_and_resets() {
        let mut engine = started_engine();
        engine.select_option(correct_key(&engine));
        let event = engine.quit().unwrap();
        assert!(matches!(event, Event::SessionQuit { score: 20, .. }));
        assert_eq!(engine.phase(), SessionPhase::Idle);
        assert!(engine.current_question().is_none());
        // Quit outside Playing is a no-op.
        assert!(engine.quit().is_none());
    }

    #[test]
    fn try_again_returns_to_idle_for_a_fresh_start() {
        let mut engine = SessionEngine::new();
        let pack = QuestionSet::new(QuestionSet::builtin_pack().questions()[..1].to_vec()).unwrap();
        engine.start(pack.clone());
        engine.select_option(engine.current_question().unwrap().correct);
        engine.advance();
        assert_eq!(engine.phase(), SessionPhase::Finished);
        assert!(engine.try_again().is_some());
        assert_eq!(engine.phase(), SessionPhase::Idle);
        assert!(engine.finished().is_none());
        assert!(engine.start(pack).is_some());
    }

    #[test]
    fn engine_snapshot_roundtrips_through_serde() {
        let mut engine = started_engine();
        engine.select_option(correct_key(&engine));
        engine.tick();
        let json = serde_json::to_string(&engine).unwrap();
        let restored: SessionEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase(), engine.phase());
        assert_eq!(restored.score(), engine.score());
        assert_eq!(restored.time_remaining_secs(), engine.time_remaining_secs());
    }

    #[test]
    fn custom_countdown_length_applies_per_question() {
        let mut engine = SessionEngine::new().with_seconds_per_question(5);
        engine.start(QuestionSet::builtin_pack());
        assert_eq!(engine.time_remaining_secs(), 5);
        for _ in 0..5 {
            engine.tick();
        }
        assert!(engine.is_answered());
    }
}
