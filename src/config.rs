//! Runtime configuration, read from the environment.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{KeyValueStore, LoroStore, SqliteStore};

const DEFAULT_DATA_DIR: &str = ".plotline";
const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which on-disk key-value backend persists the stores. Every CLI command is a
/// fresh process, so only durable backends are selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Loro,
    Sqlite,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Loro => write!(f, "loro"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loro" => Ok(StorageBackend::Loro),
            "sqlite" => Ok(StorageBackend::Sqlite),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the backend's files
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    /// Simulated login/signup round-trip
    pub login_delay_ms: u64,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            backend: StorageBackend::default(),
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load from `PLOTLINE_DIR`, `PLOTLINE_BACKEND`, `PLOTLINE_LOGIN_DELAY_MS`
    /// and `PLOTLINE_LOG`, falling back to defaults for unset variables.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup("PLOTLINE_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(backend) = lookup("PLOTLINE_BACKEND") {
            config.backend = backend
                .parse()
                .map_err(|e: String| ConfigError::InvalidValue("PLOTLINE_BACKEND".to_string(), e))?;
        }

        if let Some(delay) = lookup("PLOTLINE_LOGIN_DELAY_MS") {
            config.login_delay_ms = delay.parse().map_err(|_| {
                ConfigError::InvalidValue(
                    "PLOTLINE_LOGIN_DELAY_MS".to_string(),
                    format!("'{}' is not a number of milliseconds", delay),
                )
            })?;
        }

        if let Some(level) = lookup("PLOTLINE_LOG") {
            level.parse::<tracing::Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "PLOTLINE_LOG".to_string(),
                    format!("'{}' is not a log level", level),
                )
            })?;
            config.log_level = level;
        }

        Ok(config)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    /// Open the configured backend under `data_dir`.
    pub fn open_backend(&self) -> Result<Arc<dyn KeyValueStore>> {
        let backend: Arc<dyn KeyValueStore> = match self.backend {
            StorageBackend::Loro => Arc::new(LoroStore::open(&self.data_dir)?),
            StorageBackend::Sqlite => Arc::new(SqliteStore::open(&self.data_dir)?),
        };
        tracing::debug!(backend = %self.backend, dir = %self.data_dir.display(), "opened storage");
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".plotline"));
        assert_eq!(config.backend, StorageBackend::Loro);
        assert_eq!(config.login_delay(), Duration::from_millis(1000));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PLOTLINE_DIR", "/tmp/novels"),
            ("PLOTLINE_BACKEND", "SQLite"),
            ("PLOTLINE_LOGIN_DELAY_MS", "0"),
            ("PLOTLINE_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/novels"));
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.login_delay(), Duration::ZERO);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[("PLOTLINE_BACKEND", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("PLOTLINE_BACKEND"));

        let err = Config::from_lookup(lookup_from(&[("PLOTLINE_LOGIN_DELAY_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("PLOTLINE_LOGIN_DELAY_MS"));

        let err = Config::from_lookup(lookup_from(&[("PLOTLINE_LOG", "loud")])).unwrap_err();
        assert!(err.to_string().contains("PLOTLINE_LOG"));
    }

    #[test]
    fn test_memory_backend_is_not_selectable() {
        let err = Config::from_lookup(lookup_from(&[("PLOTLINE_BACKEND", "memory")])).unwrap_err();
        assert!(err.to_string().contains("PLOTLINE_BACKEND"));
        assert!(err.to_string().contains("memory"));
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [StorageBackend::Loro, StorageBackend::Sqlite] {
            assert_eq!(backend.to_string().parse::<StorageBackend>(), Ok(backend));
        }
    }

    #[test]
    fn test_open_backend_each_kind() {
        for backend in [StorageBackend::Loro, StorageBackend::Sqlite] {
            let tmp = TempDir::new().unwrap();
            let config = Config {
                data_dir: tmp.path().join("data"),
                backend,
                ..Config::default()
            };

            let kv = config.open_backend().unwrap();
            kv.set("ideas", "[]").unwrap();
            assert_eq!(kv.get("ideas").unwrap().as_deref(), Some("[]"));
        }
    }
}
