// src/config.rs
//
// Runtime configuration, read once at startup from the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::default_database_path;
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};

pub const STORAGE_VAR: &str = "FILMCIRCLE_STORAGE";
pub const DB_PATH_VAR: &str = "FILMCIRCLE_DB_PATH";
pub const POOL_SIZE_VAR: &str = "FILMCIRCLE_POOL_SIZE";

pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Which family of stores backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[serde(rename = "memory")]
    InMemory,
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::InMemory => "memory",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::InMemory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(DomainError::invalid(
                "storage",
                format!("unknown backend '{}' (expected memory or sqlite)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageBackend,
    /// Only consulted by the sqlite backend
    pub database_path: PathBuf,
    pub pool_size: u32,
}

impl AppConfig {
    /// In-memory configuration, mostly for tests and demos
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::InMemory,
            database_path: PathBuf::new(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    pub fn sqlite(database_path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageBackend::Sqlite,
            database_path: database_path.into(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let storage = match lookup(STORAGE_VAR) {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Sqlite,
        };

        let database_path = match lookup(DB_PATH_VAR) {
            Some(raw) if !raw.trim().is_empty() => PathBuf::from(raw),
            _ => default_database_path()?,
        };

        let pool_size = match lookup(POOL_SIZE_VAR) {
            Some(raw) => parse_pool_size(&raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        let config = Self {
            storage,
            database_path,
            pool_size,
        };
        log::debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }
}

fn parse_pool_size(raw: &str) -> AppResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(AppError::Domain(DomainError::invalid(
            "pool_size",
            format!("expected a positive integer, got '{}'", raw),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_backend_parsing_is_case_insensitive() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::InMemory);
        assert_eq!(" SQLite ".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
    }

    #[test]
    fn test_unknown_backend_names_storage_field() {
        let err = "postgres".parse::<StorageBackend>().unwrap_err();
        assert_eq!(err.field(), Some("storage"));
    }

    #[test]
    fn test_explicit_values_win() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (STORAGE_VAR, "memory"),
            (DB_PATH_VAR, "/tmp/films.db"),
            (POOL_SIZE_VAR, "2"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageBackend::InMemory);
        assert_eq!(config.database_path, PathBuf::from("/tmp/films.db"));
        assert_eq!(config.pool_size, 2);
    }

    #[test]
    fn test_zero_pool_size_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (DB_PATH_VAR, "/tmp/films.db"),
            (POOL_SIZE_VAR, "0"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_defaults_use_sqlite() {
        let config =
            AppConfig::from_lookup(lookup_from(&[(DB_PATH_VAR, "/tmp/films.db")])).unwrap();
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
    }
}
