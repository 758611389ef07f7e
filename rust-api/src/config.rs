//! Environment-backed configuration
//!
//! Built once at start-up and handed to the client, poller and server.

use std::time::Duration;
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the stats/odds backend
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub log_level: Level,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            log_level: Level::INFO,
        }
    }
}

impl DashboardConfig {
    /// Read from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("COURTSIDE_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_value("PORT", &port)?;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_value("REQUEST_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(interval) = lookup("POLL_INTERVAL_SECS") {
            let secs: u64 = parse_value("POLL_INTERVAL_SECS", &interval)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: "POLL_INTERVAL_SECS",
                    value: interval,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.poll_interval_secs = secs;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = parse_value("LOG_LEVEL", &level)?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
