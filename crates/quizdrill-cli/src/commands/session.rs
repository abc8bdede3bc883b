use clap::Subcommand;
use quizdrill_core::storage::{Config, Database};
use quizdrill_core::{Event, OptionKey, SessionEngine};

const ENGINE_KEY: &str = "session_engine";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new session
    Start {
        /// Shuffle the question order
        #[arg(long)]
        shuffle: bool,
    },
    /// Answer the current question
    Answer {
        /// Option key (A-E)
        option: String,
    },
    /// Advance past an answered question
    Next,
    /// Apply one second of countdown
    Tick,
    /// Print current session state as JSON
    Status,
    /// Abandon the running session
    Quit,
    /// Discard a finished session
    Retry,
}

fn load_engine(db: &Database, config: &Config) -> SessionEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<SessionEngine>(&json) {
            return engine;
        }
    }
    SessionEngine::new().with_seconds_per_question(config.session.seconds_per_question)
}

fn save_engine(db: &Database, engine: &SessionEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut engine = load_engine(&db, &config);

    let event = match action {
        SessionAction::Start { shuffle } => {
            let pack =
                super::questions::load_pack(None, &config, shuffle || config.session.shuffle)?;
            engine.start(pack)
        }
        SessionAction::Answer { option } => match OptionKey::parse(&option) {
            Some(key) => engine.select_option(key),
            None => return Err(format!("not an option key (A-E): {option}").into()),
        },
        SessionAction::Next => engine.advance(),
        SessionAction::Tick => engine.tick(),
        SessionAction::Status => Some(engine.snapshot()),
        SessionAction::Quit => engine.quit(),
        SessionAction::Retry => engine.try_again(),
    };

    match &event {
        Some(event) => {
            println!("{}", serde_json::to_string_pretty(event)?);
            match event {
                Event::SessionFinished {
                    score,
                    accuracy,
                    correct_count,
                    total_questions,
                    rank,
                    ..
                } => {
                    super::record_finished_session(
                        &db,
                        *score,
                        *accuracy,
                        *correct_count,
                        *total_questions,
                        *rank,
                    )?;
                }
                Event::SessionQuit { score, .. } => {
                    super::credit_partial_xp(&db, *score)?;
                }
                _ => {}
            }
        }
        None => eprintln!("no-op: not applicable in the current session phase"),
    }

    save_engine(&db, &engine)?;
    Ok(())
}
