//! Property tests for the session engine and the pure scoring/streak
//! modules.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use quizdrill_core::{
    calculate_streak, Event, OptionKey, QuestionSet, SessionEngine, SessionPhase,
};

fn key(index: usize) -> OptionKey {
    OptionKey::ALL[index % OptionKey::ALL.len()]
}

/// Builtin pack truncated to `n` questions.
fn pack_of(n: usize) -> QuestionSet {
    let full = QuestionSet::builtin_pack();
    QuestionSet::new(full.questions()[..n.min(full.len())].to_vec()).unwrap()
}

proptest! {
    // Single-attempt invariant: a second selection changes nothing.
    #[test]
    fn second_selection_never_changes_state(first in 0..5usize, second in 0..5usize) {
        let mut engine = SessionEngine::new();
        engine.start(pack_of(3));
        engine.select_option(key(first));

        let before = (
            engine.score(),
            engine.streak(),
            engine.correct_count(),
            engine.selected(),
            engine.is_answered(),
        );
        prop_assert!(engine.select_option(key(second)).is_none());
        let after = (
            engine.score(),
            engine.streak(),
            engine.correct_count(),
            engine.selected(),
            engine.is_answered(),
        );
        prop_assert_eq!(before, after);
    }

    // Scoring correctness: a correct pick awards exactly 20 and one
    // correct-count; a wrong pick leaves the score and resets the streak.
    #[test]
    fn selection_applies_exact_deltas(choice in 0..5usize) {
        let mut engine = SessionEngine::new();
        engine.start(pack_of(4));
        // Build up a streak so a wrong answer has something to reset.
        let correct = engine.current_question().unwrap().correct;
        engine.select_option(correct);
        engine.advance();

        let (score0, correct0) = (engine.score(), engine.correct_count());
        let chosen = key(choice);
        let was_correct = engine.current_question().unwrap().correct == chosen;
        engine.select_option(chosen);

        if was_correct {
            prop_assert_eq!(engine.score(), score0 + 20);
            prop_assert_eq!(engine.correct_count(), correct0 + 1);
            prop_assert_eq!(engine.streak(), 2);
        } else {
            prop_assert_eq!(engine.score(), score0);
            prop_assert_eq!(engine.correct_count(), correct0);
            prop_assert_eq!(engine.streak(), 0);
        }
    }

    // Completion fires exactly once with the exact score and accuracy.
    #[test]
    fn completion_fires_exactly_once(
        n in 1..=8usize,
        choices in proptest::collection::vec(0..5usize, 8),
    ) {
        let mut engine = SessionEngine::new();
        engine.start(pack_of(n));
        let n = engine.total_questions() as usize;

        let mut finished = 0u32;
        let mut expected_correct = 0u32;
        for choice in choices.iter().take(n) {
            let chosen = key(*choice);
            if engine.current_question().unwrap().correct == chosen {
                expected_correct += 1;
            }
            engine.select_option(chosen);
            if let Some(Event::SessionFinished { score, accuracy, .. }) = engine.advance() {
                finished += 1;
                prop_assert_eq!(score, 20 * expected_correct);
                let expected_accuracy = f64::from(expected_correct) / n as f64 * 100.0;
                prop_assert!((accuracy - expected_accuracy).abs() < 1e-9);
            }
        }
        prop_assert_eq!(finished, 1);
        prop_assert_eq!(engine.phase(), SessionPhase::Finished);
    }

    // Timer law: after t ticks the countdown reads max(0, T - t).
    #[test]
    fn countdown_is_monotonic_and_non_negative(t0 in 1..=30u32, ticks in 0..=60u32) {
        let mut engine = SessionEngine::new().with_seconds_per_question(t0);
        engine.start(pack_of(1));
        // Answer first so expiry cannot reshape the state mid-measurement.
        let correct = engine.current_question().unwrap().correct;
        engine.select_option(correct);

        for _ in 0..ticks {
            engine.tick();
        }
        prop_assert_eq!(engine.time_remaining_secs(), t0.saturating_sub(ticks));
    }

    // Streak date law over arbitrary day gaps.
    #[test]
    fn streak_follows_the_date_law(streak in 0..1000u32, gap in -5i64..=400) {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let last_played = today - Duration::days(gap);
        let result = calculate_streak(last_played, streak, today);
        match gap {
            0 => prop_assert_eq!(result, streak),
            1 => prop_assert_eq!(result, streak + 1),
            _ => prop_assert_eq!(result, 1),
        }
    }

    // Advancing past Finished is inert: no events, no state drift.
    #[test]
    fn advance_past_finished_is_idempotent(extra_calls in 1..10usize) {
        let mut engine = SessionEngine::new();
        engine.start(pack_of(2));
        for _ in 0..2 {
            let correct = engine.current_question().unwrap().correct;
            engine.select_option(correct);
            engine.advance();
        }
        prop_assert_eq!(engine.phase(), SessionPhase::Finished);
        let summary = engine.finished().unwrap().clone();

        for _ in 0..extra_calls {
            prop_assert!(engine.advance().is_none());
            prop_assert!(engine.tick().is_none());
        }
        prop_assert_eq!(engine.finished().unwrap(), &summary);
    }
}
