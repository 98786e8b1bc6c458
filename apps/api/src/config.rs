use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Default upstream sensor endpoint used when `CGM_FEED_URL` is not set.
pub const DEFAULT_FEED_URL: &str = "https://bloodsuger.onrender.com/";

/// Which glucose feed implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    Live,
    Synthetic,
}

impl FromStr for FeedMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(FeedMode::Live),
            "synthetic" | "mock" => Ok(FeedMode::Synthetic),
            other => bail!("Unknown CGM_FEED_MODE '{other}' (expected 'live' or 'synthetic')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub feed_mode: FeedMode,
    pub feed_url: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
    pub log_history_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            feed_mode: optional_env("CGM_FEED_MODE", "live")
                .parse()
                .context("CGM_FEED_MODE is invalid")?,
            feed_url: optional_env("CGM_FEED_URL", DEFAULT_FEED_URL),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            request_timeout_secs: optional_env("REQUEST_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            log_history_limit: optional_env("LOG_HISTORY_LIMIT", "500")
                .parse::<usize>()
                .context("LOG_HISTORY_LIMIT must be a non-negative integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_mode_parses_case_insensitively() {
        assert_eq!("LIVE".parse::<FeedMode>().unwrap(), FeedMode::Live);
        assert_eq!(" synthetic ".parse::<FeedMode>().unwrap(), FeedMode::Synthetic);
        assert_eq!("mock".parse::<FeedMode>().unwrap(), FeedMode::Synthetic);
    }

    #[test]
    fn test_feed_mode_rejects_unknown_value() {
        let err = "replay".parse::<FeedMode>().unwrap_err();
        assert!(err.to_string().contains("replay"));
    }
}
