//! SQLite-based result storage and statistics.
//!
//! Provides persistent storage for:
//! - Finished session results
//! - Aggregate statistics (daily and all-time)
//! - Key-value store for application state, including the player
//!   progress record and the step-wise CLI's engine snapshot

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::scoring::Rank;
use crate::streak::PlayerProgress;

/// kv key holding the serialized [`PlayerProgress`] record.
const PROGRESS_KEY: &str = "player_progress";

/// One finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: i64,
    pub session_id: String,
    pub score: u32,
    pub accuracy: f64,
    pub correct_count: u32,
    pub total_questions: u32,
    pub rank: String,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_games: u64,
    pub total_score: u64,
    pub best_score: u32,
    pub avg_accuracy: f64,
    pub today_games: u64,
    pub today_score: u64,
}

/// SQLite database for session results.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/quizdrill/quizdrill.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("quizdrill.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS results (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id      TEXT NOT NULL,
                score           INTEGER NOT NULL,
                accuracy        REAL NOT NULL,
                correct_count   INTEGER NOT NULL,
                total_questions INTEGER NOT NULL,
                rank            TEXT NOT NULL,
                played_at       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_results_played_at ON results(played_at);",
        )?;
        Ok(())
    }

    /// Record a finished session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_result(
        &self,
        score: u32,
        accuracy: f64,
        correct_count: u32,
        total_questions: u32,
        rank: Rank,
        played_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO results (session_id, score, accuracy, correct_count, total_questions, rank, played_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Uuid::new_v4().to_string(),
                score,
                accuracy,
                correct_count,
                total_questions,
                rank.as_str(),
                played_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recently played result, if any.
    pub fn last_result(&self) -> Result<Option<ResultRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, score, accuracy, correct_count, total_questions, rank, played_at
             FROM results ORDER BY id DESC LIMIT 1",
        )?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> Result<ResultRecord, rusqlite::Error> {
        let played_at: String = row.get(7)?;
        Ok(ResultRecord {
            id: row.get(0)?,
            session_id: row.get(1)?,
            score: row.get(2)?,
            accuracy: row.get(3)?,
            correct_count: row.get(4)?,
            total_questions: row.get(5)?,
            rank: row.get(6)?,
            played_at: DateTime::parse_from_rfc3339(&played_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    pub fn stats_today(&self) -> Result<Stats, DatabaseError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.stats_where(Some(format!("{today}T00:00:00+00:00")))
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        self.stats_where(None)
    }

    fn stats_where(&self, since: Option<String>) -> Result<Stats, DatabaseError> {
        let (filter, args): (&str, Vec<String>) = match &since {
            Some(bound) => ("WHERE played_at >= ?1", vec![bound.clone()]),
            None => ("", vec![]),
        };
        let sql = format!(
            "SELECT COUNT(*), COALESCE(SUM(score), 0), COALESCE(MAX(score), 0),
                    COALESCE(AVG(accuracy), 0.0)
             FROM results {filter}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let (games, total_score, best_score, avg_accuracy) = stmt.query_row(
            rusqlite::params_from_iter(args.iter()),
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            },
        )?;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let (today_games, today_score) = self
            .conn
            .prepare(
                "SELECT COUNT(*), COALESCE(SUM(score), 0)
                 FROM results WHERE played_at >= ?1",
            )?
            .query_row(params![format!("{today}T00:00:00+00:00")], |row| {
                Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?))
            })?;

        Ok(Stats {
            total_games: games,
            total_score,
            best_score,
            avg_accuracy,
            today_games,
            today_score,
        })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a value from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Load the player progress record, falling back to the documented
    /// default (all-zero, last played `today`) when the record is absent
    /// or unreadable.
    pub fn load_progress(&self, today: NaiveDate) -> PlayerProgress {
        self.kv_get(PROGRESS_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_else(|| PlayerProgress::zeroed(today))
    }

    /// Persist the player progress record.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save_progress(&self, progress: &PlayerProgress) -> Result<(), CoreError> {
        let json = serde_json::to_string(progress)?;
        self.kv_set(PROGRESS_KEY, &json)?;
        Ok(())
    }

    /// Remove the stored progress record.
    pub fn reset_progress(&self) -> Result<(), DatabaseError> {
        self.kv_delete(PROGRESS_KEY)
    }
}
