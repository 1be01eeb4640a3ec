use std::fs;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::upstream::retry::Backoff;

pub const ENV_BASE_URL: &str = "SPACEX_BASE_URL";
pub const ENV_CACHE_EXPIRY: &str = "CACHE_EXPIRY";
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v4";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server_config: ServerConfig,
    #[serde(default)]
    pub upstream_config: UpstreamConfig,
    #[serde(default)]
    pub notify_config: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    // listen address: eg: 127.0.0.1:5000
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    // launches per page on the list view
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            page_size: default_page_size(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_page_size() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    // launch data API, eg: https://api.spacexdata.com/v4
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // seconds a fetched snapshot stays fresh
    #[serde(default = "default_cache_expiry")]
    pub cache_expiry: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    // backoff unit, the delay after attempt n is base * (2^n + jitter)
    #[serde(default = "default_retry_base_millis")]
    pub retry_base_millis: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_expiry: default_cache_expiry(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_base_millis: default_retry_base_millis(),
        }
    }
}

impl UpstreamConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.cache_expiry)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.retry_attempts.max(1), Duration::from_millis(self.retry_base_millis))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_expiry() -> u64 {
    3600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_millis() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_notify_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Apply environment overrides. `lookup` returns the value of a variable.
    ///
    /// Invalid values are logged and replaced with their default.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.upstream_config.base_url = base_url;
        }

        if let Some(raw) = lookup(ENV_CACHE_EXPIRY) {
            self.upstream_config.cache_expiry = parse_cache_expiry(&raw);
        }

        if self.server_config.page_size == 0 {
            tracing::error!("Invalid page_size 0, using default of {}", default_page_size());
            self.server_config.page_size = default_page_size();
        }
    }
}

/// Parse a cache expiry in seconds, falling back to the default
pub fn parse_cache_expiry(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(secs) => secs,
        Err(_) => {
            tracing::error!(
                "Invalid {} value {:?}, using default of {}",
                ENV_CACHE_EXPIRY,
                raw,
                default_cache_expiry()
            );
            default_cache_expiry()
        }
    }
}

/// Load configuration from an optional TOML file, then apply the
/// process environment on top.
pub fn load(path: Option<&str>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
