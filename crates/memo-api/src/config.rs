//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `MEMO_STORE` | `postgres` (`postgres` or `memory`) |
//! | `DATABASE_URL` | `postgres://localhost/memos` |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `MEMO_MAX_TAGS` | `5` |
//! | `SUMMARY_CACHE` | `memory` (`disabled`, `memory` or `redis`) |
//! | `SUMMARY_CACHE_CAPACITY` | `1024` |
//! | `REDIS_URL` | `redis://localhost:6379` |
//! | `EVENT_BUS_CAPACITY` | `256` |
//! | `CORS_ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `LOG_FORMAT` | `text` (`text` or `json`) |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |
//!
//! The Gemini credential is read separately by
//! [`memo_inference::GeminiConfig::from_env`].

use std::str::FromStr;

use thiserror::Error;

use memo_core::defaults;
use memo_db::pool::DEFAULT_MAX_CONNECTIONS;

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which memo store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    /// Process-local store, lost on restart.
    Memory,
}

impl FromStr for StoreKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Summary cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheKind {
    Disabled,
    #[default]
    Memory,
    Redis,
}

impl FromStr for CacheKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disabled" | "off" | "false" | "0" => Ok(Self::Disabled),
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub kind: CacheKind,
    pub capacity: usize,
    pub redis_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub file: Option<String>,
    /// `None` leaves ANSI detection to the subscriber.
    pub ansi: Option<bool>,
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Cap applied to generated tag lists.
    pub max_tags: usize,
    pub cache: CacheConfig,
    pub event_bus_capacity: usize,
    pub cors_allowed_origins: Vec<String>,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: get("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string()),
            port: parse_var(&get, "PORT", defaults::SERVER_PORT)?,
            store: parse_enum(&get, "MEMO_STORE")?,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            database_max_connections: parse_var(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            max_tags: parse_var(&get, "MEMO_MAX_TAGS", defaults::MAX_GENERATED_TAGS)?,
            cache: CacheConfig {
                kind: parse_enum(&get, "SUMMARY_CACHE")?,
                capacity: parse_var(
                    &get,
                    "SUMMARY_CACHE_CAPACITY",
                    defaults::SUMMARY_CACHE_CAPACITY,
                )?,
                redis_url: get("REDIS_URL").unwrap_or_else(|| defaults::REDIS_URL.to_string()),
            },
            event_bus_capacity: parse_var(
                &get,
                "EVENT_BUS_CAPACITY",
                defaults::EVENT_BUS_CAPACITY,
            )?,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec![defaults::CORS_ALLOWED_ORIGIN.to_string()]),
            log: LogConfig {
                format: match get("LOG_FORMAT").as_deref() {
                    Some("json") => LogFormat::Json,
                    _ => LogFormat::Text,
                },
                file: get("LOG_FILE"),
                ansi: get("LOG_ANSI").map(|v| v == "true" || v == "1"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_tags == 0 {
            return Err(ConfigError::Validation(
                "MEMO_MAX_TAGS must be at least 1".to_string(),
            ));
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::Validation(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if self.cache.kind == CacheKind::Memory && self.cache.capacity == 0 {
            return Err(ConfigError::Validation(
                "SUMMARY_CACHE_CAPACITY must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<G, T>(get: &G, var: &'static str, default: T) -> ConfigResult<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}

fn parse_enum<G, T>(get: &G, var: &'static str) -> ConfigResult<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr + Default,
{
    parse_var(get, var, T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ConfigResult<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.max_tags, 5);
        assert_eq!(config.cache.kind, CacheKind::Memory);
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(config.log.ansi.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("MEMO_STORE", "memory"),
            ("MEMO_MAX_TAGS", "3"),
            ("SUMMARY_CACHE", "redis"),
            ("REDIS_URL", "redis://cache:6379"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("LOG_FORMAT", "json"),
            ("LOG_ANSI", "false"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.max_tags, 3);
        assert_eq!(config.cache.kind, CacheKind::Redis);
        assert_eq!(config.cache.redis_url, "redis://cache:6379");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.ansi, Some(false));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_store_kind() {
        assert!(matches!(
            load(&[("MEMO_STORE", "sqlite")]),
            Err(ConfigError::InvalidValue { var: "MEMO_STORE", .. })
        ));
    }

    #[test]
    fn test_zero_tag_cap_rejected() {
        assert!(matches!(
            load(&[("MEMO_MAX_TAGS", "0")]),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("PORT", "  "), ("SUMMARY_CACHE", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache.kind, CacheKind::Memory);
    }
}
