//! Leaderboard client -- submit scores and fetch the top list over HTTP.
//!
//! The session engine never calls this; the driving application decides
//! when (and whether) a finished session is submitted.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LeaderboardError;
use crate::storage::Config;

/// One row of the remote ranked list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    name: &'a str,
    score: u32,
    accuracy: f64,
}

/// HTTP client for a leaderboard service exposing
/// `POST {base}/scores` and `GET {base}/scores?limit=N`.
pub struct LeaderboardClient {
    base_url: String,
    client: reqwest::Client,
}

impl LeaderboardClient {
    /// Build a client against `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL does not parse.
    pub fn new(base_url: &str) -> Result<Self, LeaderboardError> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Build a client from the configured base URL, if any.
    ///
    /// # Errors
    /// Returns `NotConfigured` when the config carries no URL.
    pub fn from_config(config: &Config) -> Result<Self, LeaderboardError> {
        let base = config
            .leaderboard
            .base_url
            .as_deref()
            .ok_or(LeaderboardError::NotConfigured)?;
        Self::new(base)
    }

    /// Submit a finished session's score.
    ///
    /// # Errors
    /// Returns an error for transport failures or non-success statuses.
    pub async fn submit(
        &self,
        name: &str,
        score: u32,
        accuracy: f64,
    ) -> Result<(), LeaderboardError> {
        let resp = self
            .client
            .post(format!("{}/scores", self.base_url))
            .json(&Submission {
                name,
                score,
                accuracy,
            })
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Fetch the top `n` entries.
    ///
    /// # Errors
    /// Returns an error for transport failures, non-success statuses, or
    /// an unparseable body.
    pub async fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let resp = self
            .client
            .get(format!("{}/scores", self.base_url))
            .query(&[("limit", n)])
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn check_status(
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, LeaderboardError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(LeaderboardError::Http {
            status: status.as_u16(),
            body,
        })
    }
}
