//! Interactive session driver.
//!
//! Owns the one live countdown per session: a 1 Hz interval scoped to the
//! play loop, so every exit path (finish, quit, EOF) tears it down.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use quizdrill_core::storage::{Config, Database};
use quizdrill_core::{
    Event, FinishedSummary, LeaderboardClient, LeaderboardError, OptionKey, QuestionSet,
    SessionEngine, SessionPhase,
};

#[derive(Args)]
pub struct PlayArgs {
    /// Question pack file (JSON); defaults to the configured pack
    #[arg(long)]
    pack: Option<PathBuf>,
    /// Shuffle the question order
    #[arg(long)]
    shuffle: bool,
    /// Skip the leaderboard submission even when configured
    #[arg(long)]
    no_submit: bool,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let pack = super::questions::load_pack(
        args.pack.as_deref(),
        &config,
        args.shuffle || config.session.shuffle,
    )?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(play_session(pack, &config, &db, args.no_submit))
}

async fn play_session(
    pack: QuestionSet,
    config: &Config,
    db: &Database,
    no_submit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine =
        SessionEngine::new().with_seconds_per_question(config.session.seconds_per_question);
    engine.start(pack);

    println!(
        "{} questions, {} seconds each. Answer with A-E, Enter for next, 'q' to quit.",
        engine.total_questions(),
        config.session.seconds_per_question
    );
    render_question(&engine);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick fires immediately; consume it so the
    // countdown starts a full second out.
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let summary: Option<FinishedSummary> = loop {
        tokio::select! {
            _ = ticker.tick() => {
                match engine.tick() {
                    Some(Event::TimedOut { correct_key, .. }) => {
                        println!("Time's up! The answer was {correct_key}.");
                    }
                    Some(Event::QuestionAdvanced { .. }) => render_question(&engine),
                    Some(Event::SessionFinished { .. }) => break engine.finished().cloned(),
                    _ => {
                        if engine.phase() == SessionPhase::Playing
                            && !engine.is_answered()
                            && engine.time_remaining_secs() == 5
                        {
                            println!("5 seconds left...");
                        }
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break None; // EOF behaves like quit
                };
                let input = line.trim();
                if input.eq_ignore_ascii_case("q") {
                    break None;
                } else if input.is_empty() || input.eq_ignore_ascii_case("n") {
                    match engine.advance() {
                        Some(Event::QuestionAdvanced { .. }) => render_question(&engine),
                        Some(Event::SessionFinished { .. }) => break engine.finished().cloned(),
                        _ => println!("Answer first (A-E)."),
                    }
                } else if let Some(key) = OptionKey::parse(input) {
                    match engine.select_option(key) {
                        Some(Event::AnswerLocked {
                            correct,
                            correct_key,
                            awarded,
                            streak,
                            ..
                        }) => {
                            if correct {
                                println!("Correct! +{awarded} XP (streak {streak})");
                            } else {
                                println!("Wrong -- the answer was {correct_key}.");
                            }
                            if let Some(q) = engine.current_question() {
                                if !q.explanation.is_empty() {
                                    println!("  {}", q.explanation);
                                }
                            }
                            println!("Press Enter for the next question.");
                        }
                        _ => println!("Already answered -- press Enter to continue."),
                    }
                } else {
                    println!("Answer with A-E, Enter for next, 'q' to quit.");
                }
            }
        }
    };

    match summary {
        Some(summary) => finish(db, config, no_submit, summary).await,
        None => {
            if let Some(Event::SessionQuit { score, .. }) = engine.quit() {
                super::credit_partial_xp(db, score)?;
                println!("Session abandoned with {score} XP banked.");
            }
            Ok(())
        }
    }
}

async fn finish(
    db: &Database,
    config: &Config,
    no_submit: bool,
    summary: FinishedSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = super::record_finished_session(
        db,
        summary.score,
        summary.accuracy,
        summary.correct_count,
        summary.total_questions,
        summary.rank,
    )?;

    println!();
    println!(
        "Finished: {} XP, {}/{} correct ({:.0}%) -- rank {}",
        summary.score,
        summary.correct_count,
        summary.total_questions,
        summary.accuracy,
        summary.rank
    );
    if outcome.new_high_score {
        println!("New high score!");
    }
    println!(
        "Total XP {}, day streak {}",
        outcome.progress.total_xp, outcome.progress.streak_days
    );

    if !no_submit {
        match LeaderboardClient::from_config(config) {
            Ok(client) => {
                match client
                    .submit(&config.player.name, summary.score, summary.accuracy)
                    .await
                {
                    Ok(()) => println!("Score submitted to the leaderboard."),
                    Err(e) => eprintln!("leaderboard submit failed: {e}"),
                }
            }
            Err(LeaderboardError::NotConfigured) => {}
            Err(e) => eprintln!("leaderboard: {e}"),
        }
    }
    Ok(())
}

fn render_question(engine: &SessionEngine) {
    let Some(q) = engine.current_question() else {
        return;
    };
    println!();
    println!(
        "[{}/{}] ({}, {:?}) {}",
        engine.current_index() + 1,
        engine.total_questions(),
        q.category,
        q.difficulty,
        q.prompt
    );
    for opt in &q.options {
        println!("  {}. {}", opt.key, opt.text);
    }
}
