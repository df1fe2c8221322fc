//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `DATABASE_URL` | `postgres://localhost/archives` |
//! | `STORE_BACKEND` | `postgres` (`memory` keeps items in process) |
//! | `ALLOWED_ORIGINS` | `http://localhost:5173,http://localhost:3000`; `*` allows any |
//! | `MAX_BODY_SIZE_BYTES` | 1 MiB |
//! | `DB_MAX_CONNECTIONS` | 10 |
//! | `RUN_MIGRATIONS` | `true` |

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;

use archive_core::defaults;
use archive_core::{Error, Result};

/// Where items are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// CORS origin policy.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Parse a comma-separated origin list. `*` anywhere in the list allows any
/// origin; entries that are not valid header values are skipped with a warning.
pub fn parse_allowed_origins(raw: &str) -> AllowedOrigins {
    let raw = if raw.trim().is_empty() {
        defaults::ALLOWED_ORIGINS
    } else {
        raw
    };

    let mut origins = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if entry == "*" {
            return AllowedOrigins::Any;
        }
        match entry.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::warn!("Invalid CORS origin '{}': {}", entry, e),
        }
    }
    AllowedOrigins::List(origins)
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub allowed_origins: AllowedOrigins,
    pub max_body_size: usize,
    pub db_max_connections: u32,
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            database_url: defaults::DATABASE_URL.to_string(),
            store_backend: StoreBackend::Postgres,
            allowed_origins: parse_allowed_origins(defaults::ALLOWED_ORIGINS),
            max_body_size: defaults::MAX_BODY_SIZE_BYTES,
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(base.host),
            port: parse_var(&get, "PORT")?.unwrap_or(base.port),
            database_url: get("DATABASE_URL").unwrap_or(base.database_url),
            store_backend: get("STORE_BACKEND")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(base.store_backend),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| parse_allowed_origins(&v))
                .unwrap_or(base.allowed_origins),
            max_body_size: parse_var(&get, "MAX_BODY_SIZE_BYTES")?.unwrap_or(base.max_body_size),
            db_max_connections: parse_var(&get, "DB_MAX_CONNECTIONS")?
                .unwrap_or(base.db_max_connections),
            run_migrations: get("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(base.run_migrations),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid HOST/PORT: {}", e)))
    }
}

fn parse_var<F, T>(get: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("{} must be a number: {}", key, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.max_body_size, defaults::MAX_BODY_SIZE_BYTES);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides_from_env() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("STORE_BACKEND", "memory"),
            ("RUN_MIGRATIONS", "false"),
            ("DB_MAX_CONNECTIONS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(!config.run_migrations);
        assert_eq!(config.db_max_connections, 3);
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:8080".parse().unwrap()
        );
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("STORE_BACKEND", "mongo")])).unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }

    #[test]
    fn test_parse_allowed_origins_list() {
        match parse_allowed_origins("http://a.test, http://b.test ,") {
            AllowedOrigins::List(origins) => {
                assert_eq!(origins.len(), 2);
                assert_eq!(origins[1], "http://b.test");
            }
            AllowedOrigins::Any => panic!("expected explicit list"),
        }
    }

    #[test]
    fn test_parse_allowed_origins_wildcard() {
        assert_eq!(parse_allowed_origins("*"), AllowedOrigins::Any);
        assert_eq!(
            parse_allowed_origins("http://a.test,*"),
            AllowedOrigins::Any
        );
    }

    #[test]
    fn test_parse_allowed_origins_blank_uses_default() {
        match parse_allowed_origins("  ") {
            AllowedOrigins::List(origins) => assert_eq!(origins.len(), 2),
            AllowedOrigins::Any => panic!("expected default list"),
        }
    }
}
