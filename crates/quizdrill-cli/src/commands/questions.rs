use std::path::{Path, PathBuf};

use clap::Subcommand;
use quizdrill_core::storage::Config;
use quizdrill_core::QuestionSet;

#[derive(Subcommand)]
pub enum QuestionsAction {
    /// Validate a question pack file
    Validate {
        /// Path to a JSON pack (an array of questions)
        path: PathBuf,
    },
    /// List the questions a session would use
    Show,
}

/// Resolve the question source: explicit path, then the configured pack,
/// then the built-in fallback. Unreadable or invalid packs fall back with
/// a warning -- a session never starts on a broken source.
pub(crate) fn load_pack(
    explicit: Option<&Path>,
    config: &Config,
    shuffle: bool,
) -> Result<QuestionSet, Box<dyn std::error::Error>> {
    let configured = config.questions.pack_path.as_ref().map(PathBuf::from);
    let path = explicit.map(Path::to_path_buf).or(configured);

    let pack = match path {
        Some(path) => match read_pack(&path) {
            Ok(pack) => pack,
            Err(e) => {
                eprintln!(
                    "warning: failed to load pack {}: {e}; using the built-in pack",
                    path.display()
                );
                QuestionSet::builtin_pack()
            }
        },
        None => QuestionSet::builtin_pack(),
    };

    Ok(if shuffle {
        pack.shuffled(&mut rand::thread_rng())
    } else {
        pack
    })
}

fn read_pack(path: &Path) -> Result<QuestionSet, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(QuestionSet::from_json(&json)?)
}

pub fn run(action: QuestionsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuestionsAction::Validate { path } => {
            let pack = read_pack(&path)?;
            println!("ok: {} questions", pack.len());
        }
        QuestionsAction::Show => {
            let config = Config::load_or_default();
            let pack = load_pack(None, &config, false)?;
            for q in pack.questions() {
                println!("{:>4}  [{}] {}", q.id, q.category, q.prompt);
            }
        }
    }
    Ok(())
}
