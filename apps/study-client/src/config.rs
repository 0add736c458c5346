//! Client configuration from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::guard::GuardTiming;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Set DRILL_API_TOKEN, or both DRILL_USERNAME and DRILL_PASSWORD")]
    MissingCredentials,
}

/// How to authenticate against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Login { username: String, password: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub credentials: Credentials,
    pub timing: GuardTiming,
}

impl ClientConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("DRILL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let credentials = match (
            lookup("DRILL_API_TOKEN"),
            lookup("DRILL_USERNAME"),
            lookup("DRILL_PASSWORD"),
        ) {
            (Some(token), _, _) if !token.is_empty() => Credentials::Token(token),
            (_, Some(username), Some(password)) => Credentials::Login { username, password },
            _ => return Err(ConfigError::MissingCredentials),
        };

        let defaults = GuardTiming::default();
        let timing = GuardTiming {
            first_fetch_delay: millis(&lookup, "DRILL_FIRST_FETCH_DELAY_MS")?
                .unwrap_or(defaults.first_fetch_delay),
            retry_delay: millis(&lookup, "DRILL_RETRY_DELAY_MS")?.unwrap_or(defaults.retry_delay),
            max_fetch_attempts: number(&lookup, "DRILL_MAX_FETCH_ATTEMPTS")?
                .unwrap_or(defaults.max_fetch_attempts),
        };

        Ok(Self {
            api_url,
            credentials,
            timing,
        })
    }
}

fn millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(number(lookup, key)?.map(Duration::from_millis))
}

fn number<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
