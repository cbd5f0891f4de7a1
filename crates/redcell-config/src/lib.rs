//! Configuration for the redcell live layer.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_REDCELL_CONFIG: &str = "REDCELL_CONFIG";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8700";
const DEFAULT_RECONNECT_ATTEMPTS: u32 = 3;
const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;
const DEFAULT_ACTIVE_POLL_INTERVAL_SECS: u64 = 3;
const DEFAULT_PULL_CACHE_TTL_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

impl ConfigError {
    fn configuration(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamSettings {
    #[serde(default = "default_reconnect_attempts")]
    pub reconnect_attempts: u32,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

impl StreamSettings {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncSettings {
    #[serde(default = "default_active_poll_interval_secs")]
    pub active_poll_interval_secs: u64,
    #[serde(default = "default_pull_cache_ttl_secs")]
    pub pull_cache_ttl_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            active_poll_interval_secs: DEFAULT_ACTIVE_POLL_INTERVAL_SECS,
            pull_cache_ttl_secs: DEFAULT_PULL_CACHE_TTL_SECS,
        }
    }
}

impl SyncSettings {
    pub fn active_poll_interval(&self) -> Duration {
        Duration::from_secs(self.active_poll_interval_secs)
    }

    pub fn pull_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.pull_cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedcellConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Default for RedcellConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            stream: StreamSettings::default(),
            sync: SyncSettings::default(),
        }
    }
}

impl RedcellConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|error| {
            ConfigError::configuration(format!(
                "failed to read config file {}: {error}",
                path.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|error| {
            ConfigError::configuration(format!(
                "failed to parse config file {}: {error}",
                path.display()
            ))
        })
    }

    /// Loads from the path in `REDCELL_CONFIG` when set, falling back to
    /// defaults when the variable is absent.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        match std::env::var(ENV_REDCELL_CONFIG) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_reconnect_attempts() -> u32 {
    DEFAULT_RECONNECT_ATTEMPTS
}

fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

fn default_active_poll_interval_secs() -> u64 {
    DEFAULT_ACTIVE_POLL_INTERVAL_SECS
}

fn default_pull_cache_ttl_secs() -> u64 {
    DEFAULT_PULL_CACHE_TTL_SECS
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RedcellConfig;

    #[test]
    fn defaults_apply_when_sections_are_missing() {
        let config: RedcellConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config, RedcellConfig::default());
        assert_eq!(config.stream.reconnect_attempts, 3);
        assert_eq!(config.sync.active_poll_interval(), Duration::from_secs(3));
    }

    #[test]
    fn partial_sections_keep_field_level_defaults() {
        let config: RedcellConfig = toml::from_str(
            "api_base_url = \"http://dash.internal:9000\"\n\n[stream]\nreconnect_attempts = 5\n",
        )
        .expect("parse partial config");

        assert_eq!(config.api_base_url, "http://dash.internal:9000");
        assert_eq!(config.stream.reconnect_attempts, 5);
        assert_eq!(config.stream.reconnect_delay(), Duration::from_millis(1000));
        assert_eq!(config.sync.pull_cache_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = RedcellConfig::default();
        let serialized = toml::to_string(&config).expect("serialize config");
        let parsed: RedcellConfig = toml::from_str(&serialized).expect("reparse config");
        assert_eq!(parsed, config);
    }
}
