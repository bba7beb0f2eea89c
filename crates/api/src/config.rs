use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/chat";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub chat_backend_url: String,
    pub chat_timeout: Duration,
    pub language_packs: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    pub payment_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            chat_backend_url: DEFAULT_BACKEND_URL.to_string(),
            chat_timeout: Duration::from_millis(10_000),
            language_packs: None,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 120,
            payment_delay: Duration::from_millis(2_000),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            bind: env_string("RAAHI_BIND").unwrap_or(defaults.bind),
            chat_backend_url: env_string("RAAHI_CHAT_BACKEND_URL")
                .unwrap_or(defaults.chat_backend_url),
            chat_timeout: env_parse::<u64>("RAAHI_CHAT_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.chat_timeout),
            language_packs: env_string("RAAHI_LANGUAGE_PACKS").map(PathBuf::from),
            allowed_origins: env_string("RAAHI_ALLOWED_ORIGINS")
                .map(|value| parse_origins(&value))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.allowed_origins),
            rate_limit_window: env_parse::<u64>("RAAHI_RATE_LIMIT_WINDOW_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_window),
            rate_limit_max: env_parse::<usize>("RAAHI_RATE_LIMIT_MAX")?
                .unwrap_or(defaults.rate_limit_max),
            payment_delay: env_parse::<u64>("RAAHI_PAYMENT_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.payment_delay),
        })
    }
}

pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_string(key)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("{key} must be a number, got {value:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_split() {
        assert_eq!(
            parse_origins(" http://localhost:3000/ ,https://proraahi.in,, "),
            vec!["http://localhost:3000", "https://proraahi.in"]
        );
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ApiConfig::default();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.chat_timeout, Duration::from_secs(10));
        assert_eq!(config.rate_limit_max, 120);
        assert!(config.language_packs.is_none());
    }
}
