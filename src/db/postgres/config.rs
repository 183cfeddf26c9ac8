//! PostgreSQL connection settings read from the environment.

use std::time::Duration;

use miette::Diagnostic;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' is not a valid number")]
    #[diagnostic(
        code(project_api::config::invalid_number),
        help("Set {key} to a positive integer or unset it to use the default")
    )]
    InvalidNumber { key: String, value: String },
}

/// Connection parameters for the PostgreSQL backend.
#[derive(Clone, PartialEq, Eq)]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// How long a request waits for a free pooled connection
    pub acquire_timeout: Duration,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

// Keep the password out of logs
impl std::fmt::Debug for PgConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl PgConfig {
    /// Read configuration from `POSTGRES_*` environment variables.
    ///
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("POSTGRES_HOST").unwrap_or(defaults.host),
            port: parse_number(&get, "POSTGRES_PORT")?.unwrap_or(defaults.port),
            user: get("POSTGRES_USER").unwrap_or(defaults.user),
            password: get("POSTGRES_PASSWORD").unwrap_or(defaults.password),
            database: get("POSTGRES_DB").unwrap_or(defaults.database),
            max_connections: parse_number(&get, "POSTGRES_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            acquire_timeout: parse_number(&get, "POSTGRES_ACQUIRE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        })
    }

    /// Build sqlx connect options. TLS is disabled, matching the deployment
    /// this service runs in.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(PgSslMode::Disable)
    }
}

fn parse_number<T, F>(get: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}
