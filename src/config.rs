use std::str::FromStr;
use std::time::Duration;

use crate::database::retry::RetryPolicy;
use crate::errors::config::ConfigError;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_url: String,
    pub database_url: String,
    /// Write routes are unreachable while this is unset.
    pub admin_key: Option<String>,
    pub max_connections: u32,
    pub retry: RetryPolicy,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &'static str| lookup(name).filter(|value| !value.is_empty());

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse(&lookup, "RETRY_MAX_ATTEMPTS", defaults.max_attempts)?,
            base_delay: Duration::from_millis(parse(
                &lookup,
                "RETRY_BASE_DELAY_MS",
                defaults.base_delay.as_millis() as u64,
            )?),
            ..defaults
        };

        Ok(Self {
            server_url: required("SERVER_URL")?,
            database_url: required("DATABASE_URL")?,
            admin_key: optional("ADMIN_KEY"),
            max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            retry,
            cors_origin: optional("CORS_ORIGIN"),
        })
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
