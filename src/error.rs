//! Error types for vlsitech
//!
//! All modules use `TechResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vlsitech operations
pub type TechResult<T> = Result<T, TechError>;

/// All errors that can occur while loading a technology or resolving its paths
#[derive(Error, Debug)]
pub enum TechError {
    // Resolution errors
    #[error("Path {path} did not match any tarballs, installs or library prefixes in technology {technology}")]
    UnresolvedPath { path: String, technology: String },

    #[error("Path {path} matched more than one path source in technology {technology}: {}", sources.join(", "))]
    AmbiguousPath {
        path: String,
        technology: String,
        sources: Vec<String>,
    },

    #[error("Invalid path: {path}: {reason}")]
    PathInvalid { path: String, reason: String },

    // Settings errors
    #[error("Setting {key} not found (required by technology {technology})")]
    SettingNotFound { key: String, technology: String },

    #[error("Invalid setting {key}: {reason}")]
    SettingInvalid { key: String, reason: String },

    // Cache errors
    #[error("Cache directory not set for technology {technology} (needed to resolve {path})")]
    CacheDirNotSet { path: String, technology: String },

    #[error("Extracting tarball {tarball} for technology {technology} failed: {command}, exit code: {}, stderr: {stderr}", exit_code(*code))]
    Extraction {
        tarball: String,
        technology: String,
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Host tool failure, before the cache attributes it to a tarball
    #[error("Tool failed: {command}, exit code: {}, stderr: {stderr}", exit_code(*code))]
    ToolFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Installs for technology {technology} are missing on disk")]
    MissingInstall { technology: String },

    // Technology document errors
    #[error("Technology {name} not found in {searched}")]
    TechnologyNotFound { name: String, searched: String },

    #[error("Technology {technology} does not match the schema: {reason}")]
    SchemaInvalid { technology: String, reason: String },

    #[error("Invalid library: {0}")]
    LibraryInvalid(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

fn exit_code(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl TechError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether the error points at a defect in the technology document or the
    /// settings it references, rather than at the environment
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedPath { .. }
                | Self::AmbiguousPath { .. }
                | Self::SettingNotFound { .. }
                | Self::SettingInvalid { .. }
                | Self::SchemaInvalid { .. }
                | Self::LibraryInvalid(_)
                | Self::ConfigInvalid { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AmbiguousPath { .. } => {
                Some("Every installs/tarballs path and library prefix must be unique")
            }
            Self::SettingNotFound { .. } => {
                Some("Provide it with --set KEY=VALUE or a --settings file")
            }
            Self::CacheDirNotSet { .. } => Some("Pass --cache-dir or set cache.dir in config"),
            Self::Extraction { .. } | Self::ToolFailed { .. } => {
                Some("Check that the archive exists and is a readable tarball")
            }
            Self::TechnologyNotFound { .. } => {
                Some("Expected <name>.tech.json or <name>.tech.yml in the technology directory")
            }
            _ => None,
        }
    }
}
