use clap::Subcommand;
use quizdrill_core::storage::{Config, Database};
use quizdrill_core::LeaderboardClient;

#[derive(Subcommand)]
pub enum LeaderboardAction {
    /// Show the top entries
    Top {
        /// Number of entries to fetch
        #[arg(default_value = "10")]
        count: usize,
    },
    /// Submit a score (defaults to the most recent result)
    Submit {
        #[arg(long)]
        score: Option<u32>,
        #[arg(long)]
        accuracy: Option<f64>,
    },
}

pub fn run(action: LeaderboardAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = LeaderboardClient::from_config(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    match action {
        LeaderboardAction::Top { count } => {
            let entries = runtime.block_on(client.fetch_top(count))?;
            if entries.is_empty() {
                println!("leaderboard is empty");
            }
            for (i, entry) in entries.iter().enumerate() {
                println!("{:>3}. {:<24} {}", i + 1, entry.name, entry.score);
            }
        }
        LeaderboardAction::Submit { score, accuracy } => {
            let (score, accuracy) = match (score, accuracy) {
                (Some(score), accuracy) => (score, accuracy.unwrap_or(0.0)),
                (None, _) => {
                    let db = Database::open()?;
                    let last = db
                        .last_result()?
                        .ok_or("no recorded session to submit; pass --score")?;
                    (last.score, last.accuracy)
                }
            };
            runtime.block_on(client.submit(&config.player.name, score, accuracy))?;
            println!("submitted {score} for {}", config.player.name);
        }
    }
    Ok(())
}
