//! Engine configuration.
//!
//! Every field has a default; [`EngineConfig::from_env`] overrides them from
//! `GENNIFER_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::http_client::HttpPoolConfig;

pub const DEFAULT_NODE_NORMALIZER_URL: &str = "https://nodenormalization-sri.renci.org/1.4";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on status polls after dispatch. Unbounded when unset.
    #[serde(default)]
    pub max_poll_attempts: Option<u32>,
    /// Upper bound on total polling time. Unbounded when unset.
    #[serde(default)]
    pub max_poll_duration_secs: Option<u64>,
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    #[serde(default = "default_node_normalizer_url")]
    pub node_normalizer_url: String,
    #[serde(default)]
    pub http: HttpPoolConfig,
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_max_concurrent_jobs() -> usize {
    16
}

fn default_node_normalizer_url() -> String {
    DEFAULT_NODE_NORMALIZER_URL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: None,
            max_poll_duration_secs: None,
            max_concurrent_jobs: default_max_concurrent_jobs(),
            node_normalizer_url: default_node_normalizer_url(),
            http: HttpPoolConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "GENNIFER_POLL_INTERVAL_MS")? {
            config.poll_interval_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "GENNIFER_MAX_POLL_ATTEMPTS")? {
            config.max_poll_attempts = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "GENNIFER_MAX_POLL_DURATION_SECS")? {
            config.max_poll_duration_secs = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "GENNIFER_MAX_CONCURRENT_JOBS")? {
            config.max_concurrent_jobs = v;
        }
        if let Some(url) = lookup("GENNIFER_NODE_NORMALIZER_URL") {
            config.node_normalizer_url = url;
        }
        if let Some(v) = parse_var(&lookup, "GENNIFER_HTTP_TIMEOUT_SECS")? {
            config.http.request_timeout_secs = Some(v);
        }
        Ok(config)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_poll_attempts,
            max_duration: self.max_poll_duration_secs.map(Duration::from_secs),
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

/// Timing bounds of the status poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_duration: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        EngineConfig::default().poll_policy()
    }
}

impl PollPolicy {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            max_duration: None,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }
}
