//! Sync engine configuration.
//!
//! Loaded with the usual priority: environment variables over config file
//! over defaults. The debounce windows are configurable mainly so tests
//! can shrink them; production uses the defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::store::StoreId;

/// Default quiescence window before a changed store is written remotely.
const DEFAULT_DEBOUNCE_MS: u64 = 2000;
/// Chat transcripts are bigger and less urgent, so they wait longer.
const CHAT_DEBOUNCE_MS: u64 = 3000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the remote document service.
    pub server_url: Option<String>,
    /// API key for the document service.
    pub api_key: Option<String>,
    /// Debounce window in milliseconds for most stores.
    pub debounce_ms: u64,
    /// Debounce window in milliseconds for the chat transcript.
    pub chat_debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            chat_debounce_ms: CHAT_DEBOUNCE_MS,
        }
    }
}

impl SyncConfig {
    /// Load configuration with priority: env vars > config file > defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::Parse(path.clone(), e))?;
        }

        if let Ok(url) = std::env::var("VITATRACK_SERVER_URL") {
            config.server_url = Some(url);
        }
        if let Ok(key) = std::env::var("VITATRACK_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(ms) = std::env::var("VITATRACK_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse() {
                config.debounce_ms = ms;
            }
        }
        if let Ok(ms) = std::env::var("VITATRACK_CHAT_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse() {
                config.chat_debounce_ms = ms;
            }
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/vitatrack/sync.yaml
    pub fn default_config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".config")
            .join("vitatrack")
            .join("sync.yaml")
    }

    /// Whether a remote server is configured at all.
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some() && self.api_key.is_some()
    }

    /// The debounce window for one store.
    pub fn window_for(&self, store: StoreId) -> Duration {
        match store {
            StoreId::Chat => Duration::from_millis(self.chat_debounce_ms),
            _ => Duration::from_millis(self.debounce_ms),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file '{0}': {1}")]
    Parse(PathBuf, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_windows() {
        let config = SyncConfig::default();
        assert_eq!(config.window_for(StoreId::Diary), Duration::from_secs(2));
        assert_eq!(config.window_for(StoreId::Chat), Duration::from_secs(3));
        assert!(!config.is_configured());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = SyncConfig::load(Some(dir.path().join("nope.yaml"))).unwrap();
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sync.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "server_url: https://docs.vitatrack.app").unwrap();
        writeln!(file, "api_key: abc123").unwrap();
        writeln!(file, "debounce_ms: 250").unwrap();

        let config = SyncConfig::load(Some(path)).unwrap();
        assert!(config.is_configured());
        assert_eq!(config.debounce_ms, 250);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.chat_debounce_ms, CHAT_DEBOUNCE_MS);
    }

    #[test]
    fn test_env_var_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sync.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "server_url: https://fromfile.example").unwrap();
        writeln!(file, "chat_debounce_ms: 5000").unwrap();

        std::env::set_var("VITATRACK_SERVER_URL", "https://fromenv.example");
        std::env::set_var("VITATRACK_CHAT_DEBOUNCE_MS", "4000");

        let config = SyncConfig::load(Some(path)).unwrap();
        assert_eq!(
            config.server_url.as_deref(),
            Some("https://fromenv.example")
        );
        assert_eq!(config.chat_debounce_ms, 4000);
        assert_eq!(config.window_for(StoreId::Chat), Duration::from_secs(4));

        std::env::remove_var("VITATRACK_SERVER_URL");
        std::env::remove_var("VITATRACK_CHAT_DEBOUNCE_MS");
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sync.yaml");
        std::fs::write(&path, "debounce_ms: [not a number]").unwrap();

        assert!(matches!(
            SyncConfig::load(Some(path)),
            Err(ConfigError::Parse(_, _))
        ));
    }
}
