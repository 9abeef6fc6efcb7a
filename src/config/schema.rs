//! Configuration schema for vlsitech
//!
//! Configuration is stored at `~/.config/vlsitech/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Extraction cache settings
    pub cache: CacheConfig,

    /// Settings layers applied to every technology
    pub settings: SettingsConfig,

    /// Technology discovery
    pub technology: TechnologyConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root of the per-technology caches (default: platform cache dir)
    pub dir: Option<PathBuf>,
}

/// Settings files layered on top of each technology's defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// JSON, YAML or TOML files, lowest precedence first
    pub files: Vec<PathBuf>,
}

/// Where `--tech NAME` looks for technologies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnologyConfig {
    /// Directories containing `<name>/<name>.tech.json`
    pub search_paths: Vec<PathBuf>,
}
