use chrono::Utc;
use clap::Subcommand;
use quizdrill_core::storage::Database;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show the stored player progress
    Show,
    /// Delete the stored player progress
    Reset,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ProgressAction::Show => {
            let progress = db.load_progress(Utc::now().date_naive());
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        ProgressAction::Reset => {
            db.reset_progress()?;
            println!("progress reset");
        }
    }
    Ok(())
}
