//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Per-question countdown length and shuffle behavior
//! - Player name used for leaderboard submissions
//! - Question pack location
//! - Leaderboard endpoint
//!
//! Configuration is stored at `~/.config/quizdrill/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::session::DEFAULT_SECONDS_PER_QUESTION;

/// Session behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_seconds_per_question")]
    pub seconds_per_question: u32,
    /// Shuffle the question order on each `play`.
    #[serde(default)]
    pub shuffle: bool,
}

/// Player identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_name")]
    pub name: String,
}

/// Question source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionsConfig {
    /// Path to a JSON question pack; the built-in pack is used when unset
    /// or unreadable.
    #[serde(default)]
    pub pack_path: Option<String>,
}

/// Leaderboard endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Base URL of the leaderboard service; submissions are skipped when
    /// unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/quizdrill/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub questions: QuestionsConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

fn default_seconds_per_question() -> u32 {
    DEFAULT_SECONDS_PER_QUESTION
}
fn default_player_name() -> String {
    "player".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seconds_per_question: default_seconds_per_question(),
            shuffle: false,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: default_player_name(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            player: PlayerConfig::default(),
            questions: QuestionsConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    ConfigError::ParseFailed(format!(
                                        "cannot parse '{value}' as number"
                                    ))
                                })?
                        } else {
                            return Err(ConfigError::ParseFailed(format!(
                                "cannot parse '{value}' as number"
                            )));
                        }
                    }
                    // Optional string fields deserialize from null, so a
                    // plain string assignment covers them too.
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        }

        Err(ConfigError::UnknownKey(key.into()))
    }

    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path; missing files yield the default and
    /// create it.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting. Returns an error if
    /// the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.seconds_per_question, 30);
        assert_eq!(parsed.player.name, "player");
        assert!(parsed.questions.pack_path.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.seconds_per_question").as_deref(), Some("30"));
        assert_eq!(cfg.get("session.shuffle").as_deref(), Some("false"));
        assert_eq!(cfg.get("player.name").as_deref(), Some("player"));
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("session.seconds_per_question", "15").unwrap();
        cfg.set("session.shuffle", "true").unwrap();
        cfg.set("player.name", "nova").unwrap();
        assert_eq!(cfg.session.seconds_per_question, 15);
        assert!(cfg.session.shuffle);
        assert_eq!(cfg.player.name, "nova");
    }

    #[test]
    fn set_fills_optional_fields() {
        let mut cfg = Config::default();
        cfg.set("leaderboard.base_url", "https://example.test/api")
            .unwrap();
        assert_eq!(
            cfg.leaderboard.base_url.as_deref(),
            Some("https://example.test/api")
        );
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.shuffle", "not_a_bool"),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn load_from_missing_path_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.session.seconds_per_question, 30);
        assert!(path.exists());

        // Saved file parses back.
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.player.name, cfg.player.name);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
