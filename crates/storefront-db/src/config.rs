//! # Database Configuration
//!
//! Built in code with the [`DbConfig`] builder, or loaded from environment
//! variables with fallback to defaults.
//!
//! | Variable                              | Default          |
//! |---------------------------------------|------------------|
//! | `STOREFRONT_DB_PATH`                  | `./storefront.db`|
//! | `STOREFRONT_DB_MAX_CONNECTIONS`       | `5`              |
//! | `STOREFRONT_DB_MIN_CONNECTIONS`       | `1`              |
//! | `STOREFRONT_DB_CONNECT_TIMEOUT_SECS`  | `30`             |
//! | `STOREFRONT_DB_RUN_MIGRATIONS`        | `true`           |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "STOREFRONT_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "STOREFRONT_DB_MAX_CONNECTIONS";
pub const ENV_MIN_CONNECTIONS: &str = "STOREFRONT_DB_MIN_CONNECTIONS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "STOREFRONT_DB_CONNECT_TIMEOUT_SECS";
pub const ENV_RUN_MIGRATIONS: &str = "STOREFRONT_DB_RUN_MIGRATIONS";

const DEFAULT_DB_PATH: &str = "./storefront.db";

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/storefront/storefront.db")
///     .max_connections(8)
///     .min_connections(2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Path to the SQLite database file. Created if missing.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a pooled connection. Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Each in-memory SQLite connection is its own database, so the pool is
    /// pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value for a
    /// variable name or `None` when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        if path.trim().is_empty() {
            return Err(ConfigError::InvalidValue(ENV_DB_PATH.to_string()));
        }

        let defaults = DbConfig::new(path);

        let max_connections = parse_or(&lookup, ENV_MAX_CONNECTIONS, defaults.max_connections)?;
        let min_connections = parse_or(&lookup, ENV_MIN_CONNECTIONS, defaults.min_connections)?;
        let connect_timeout_secs = parse_or(
            &lookup,
            ENV_CONNECT_TIMEOUT_SECS,
            defaults.connect_timeout.as_secs(),
        )?;
        let run_migrations = parse_or(&lookup, ENV_RUN_MIGRATIONS, defaults.run_migrations)?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()));
        }
        if min_connections > max_connections {
            return Err(ConfigError::InvalidValue(ENV_MIN_CONNECTIONS.to_string()));
        }

        Ok(defaults
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .run_migrations(run_migrations))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = DbConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, DbConfig::new(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DbConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/data/shop.db"),
            (ENV_MAX_CONNECTIONS, "8"),
            (ENV_MIN_CONNECTIONS, " 2 "),
            (ENV_CONNECT_TIMEOUT_SECS, "3"),
            (ENV_RUN_MIGRATIONS, "false"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/shop.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = DbConfig::from_lookup(lookup_from(&[(ENV_MAX_CONNECTIONS, "lots")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()));

        let err = DbConfig::from_lookup(lookup_from(&[(ENV_RUN_MIGRATIONS, "yes")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue(ENV_RUN_MIGRATIONS.to_string()));
    }

    #[test]
    fn test_from_lookup_rejects_inconsistent_pool_bounds() {
        let err = DbConfig::from_lookup(lookup_from(&[
            (ENV_MAX_CONNECTIONS, "2"),
            (ENV_MIN_CONNECTIONS, "3"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue(ENV_MIN_CONNECTIONS.to_string()));

        let err = DbConfig::from_lookup(lookup_from(&[(ENV_MAX_CONNECTIONS, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()));
    }
}
