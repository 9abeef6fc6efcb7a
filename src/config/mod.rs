//! Configuration management for vlsitech

pub mod schema;

pub use schema::Config;

use crate::error::{TechError, TechResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            explicit: false,
        }
    }

    /// Create a config manager with a custom path. The file must exist.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vlsitech")
            .join("config.toml")
    }

    /// Root under which each technology gets its own cache directory
    pub fn cache_root(config: &Config) -> PathBuf {
        config.cache.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vlsitech")
        })
    }

    /// Load configuration, falling back to defaults if the default file is absent
    pub async fn load(&self) -> TechResult<Config> {
        if !self.config_path.exists() {
            if self.explicit {
                return Err(TechError::ConfigNotFound(self.config_path.clone()));
            }
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> TechResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| TechError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| TechError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager {
            config_path: temp.path().join("nonexistent.toml"),
            explicit: false,
        };

        let config = manager.load().await.unwrap();
        assert_eq!(config.general.log_format, "text");
    }

    #[tokio::test]
    async fn explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nonexistent.toml"));

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, TechError::ConfigNotFound(_)));
    }

    #[tokio::test]
    async fn invalid_config_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[cache\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, TechError::ConfigInvalid { .. }));
    }

    #[test]
    fn cache_root_prefers_config() {
        let mut config = Config::default();
        config.cache.dir = Some(PathBuf::from("/scratch/cache"));
        assert_eq!(ConfigManager::cache_root(&config), PathBuf::from("/scratch/cache"));

        assert!(ConfigManager::cache_root(&Config::default()).ends_with("vlsitech"));
    }
}
