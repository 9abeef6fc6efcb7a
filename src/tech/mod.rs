//! Technology plugins
//!
//! A technology lives in its own directory (e.g. `technology/asap7/`) and is
//! described by `asap7.tech.json` or `asap7.tech.yml`. The document declares
//! IP libraries and where their files come from: pre-installed directories
//! (`installs`) and archives extracted into a cache (`tarballs`).

pub mod prefix;
pub mod resolve;
pub mod schema;
pub mod verify;

pub use prefix::{LibraryPrefix, PathPrefix};
pub use resolve::PathResolver;
pub use schema::{Install, Library, Tarball, TechJson, TechSchema};
pub use verify::check_installs;

use crate::cache::ArchiveCache;
use crate::error::{TechError, TechResult};
use crate::settings::{SettingsLookup, SettingsStore};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Default settings shipped inside a technology directory, in lookup order
const DEFAULTS_FILES: &[&str] = &["defaults.json", "defaults.yml"];

/// A loaded technology
#[derive(Debug, Clone)]
pub struct Technology {
    /// Technology name (e.g. "asap7")
    pub name: String,

    /// Technology directory
    pub path: PathBuf,

    /// Parsed technology document
    pub config: TechJson,
}

impl Technology {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, config: TechJson) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            config,
        }
    }

    /// Load `<name>.tech.json` or `<name>.tech.yml` from `dir`.
    ///
    /// Returns `None` if the directory holds neither document.
    pub async fn load_from_dir(
        schema: &TechSchema,
        name: &str,
        dir: &Path,
    ) -> TechResult<Option<Self>> {
        let json_path = dir.join(format!("{name}.tech.json"));
        let yaml_path = dir.join(format!("{name}.tech.yml"));

        if json_path.is_file() {
            let content = read(&json_path).await?;
            Self::load_from_json(schema, name, &content, dir).map(Some)
        } else if yaml_path.is_file() {
            let content = read(&yaml_path).await?;
            Self::load_from_yaml(schema, name, &content, dir).map(Some)
        } else {
            debug!("No technology document for {} in {}", name, dir.display());
            Ok(None)
        }
    }

    /// Find a technology named `name` under the first matching search path
    pub async fn find(schema: &TechSchema, name: &str, search_paths: &[PathBuf]) -> TechResult<Self> {
        for base in search_paths {
            if let Some(tech) = Self::load_from_dir(schema, name, &base.join(name)).await? {
                return Ok(tech);
            }
        }

        let searched: Vec<String> = search_paths
            .iter()
            .map(|p| p.join(name).display().to_string())
            .collect();
        Err(TechError::TechnologyNotFound {
            name: name.to_string(),
            searched: if searched.is_empty() {
                "no search paths".to_string()
            } else {
                searched.join(", ")
            },
        })
    }

    /// Load from a JSON document
    pub fn load_from_json(
        schema: &TechSchema,
        name: &str,
        json: &str,
        dir: &Path,
    ) -> TechResult<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::load_from_value(schema, name, document, dir)
    }

    /// Load from a YAML document, transcoded to JSON before validation
    pub fn load_from_yaml(
        schema: &TechSchema,
        name: &str,
        yaml: &str,
        dir: &Path,
    ) -> TechResult<Self> {
        let document: Value = serde_yaml::from_str(yaml)?;
        Self::load_from_value(schema, name, document, dir)
    }

    fn load_from_value(
        schema: &TechSchema,
        name: &str,
        document: Value,
        dir: &Path,
    ) -> TechResult<Self> {
        schema.validate(name, &document)?;
        let config: TechJson =
            serde_json::from_value(document).map_err(|e| TechError::SchemaInvalid {
                technology: name.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Loaded technology {} from {}", name, dir.display());
        Ok(Self::new(name, dir, config))
    }

    /// Resolve a base variable to a directory. An empty variable names the
    /// technology directory itself.
    pub fn base_dir(&self, base_var: &str, settings: &dyn SettingsLookup) -> TechResult<PathBuf> {
        if base_var.is_empty() {
            return Ok(self.path.clone());
        }

        settings
            .setting_str(base_var)?
            .map(PathBuf::from)
            .ok_or_else(|| TechError::SettingNotFound {
                key: base_var.to_string(),
                technology: self.name.clone(),
            })
    }

    /// Resolve a library-relative path; see [`PathResolver::resolve`]
    pub fn prepend_dir_path(
        &self,
        path: &str,
        settings: &dyn SettingsLookup,
        cache: Option<&ArchiveCache>,
        library: Option<&Library>,
    ) -> TechResult<PathBuf> {
        PathResolver::new(self, settings, cache).resolve(path, library)
    }

    /// Make sure the technology files are available, either by checking the
    /// installs or by extracting the tarballs. Installs take precedence.
    ///
    /// Returns `false` when the files are not available.
    pub fn extract_technology_files(
        &self,
        settings: &dyn SettingsLookup,
        cache: &ArchiveCache,
    ) -> TechResult<bool> {
        if self.config.installs.is_some() {
            return check_installs(self, settings);
        }
        if self.config.tarballs.is_some() {
            cache.extract_all(self, settings)?;
            return Ok(true);
        }

        error!(
            "Technology {} specified neither tarballs nor installs",
            self.name
        );
        Ok(false)
    }

    /// Cells that must not be used, if the technology defines such a list
    pub fn dont_use_list(&self) -> Option<&[String]> {
        self.config.dont_use_list.as_deref()
    }

    /// Libraries declared by the technology document
    pub fn tech_defined_libraries(&self) -> &[Library] {
        self.config.libraries.as_deref().unwrap_or_default()
    }

    /// Look up a declared library by name
    pub fn library(&self, name: &str) -> Option<&Library> {
        self.tech_defined_libraries()
            .iter()
            .find(|lib| lib.name.as_deref() == Some(name))
    }

    /// Parse a library given as a JSON object
    pub fn parse_library(value: Value) -> TechResult<Library> {
        Library::from_value(value)
    }

    /// Path of the technology's default settings file, if it has one
    pub fn defaults_path(&self) -> Option<PathBuf> {
        DEFAULTS_FILES
            .iter()
            .map(|f| self.path.join(f))
            .find(|p| p.is_file())
    }

    /// Push the technology's default settings onto `store`, if present
    pub async fn load_defaults(&self, store: &mut SettingsStore) -> TechResult<()> {
        if let Some(path) = self.defaults_path() {
            store.push_file(&path).await?;
        }
        Ok(())
    }
}

async fn read(path: &Path) -> TechResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| TechError::io(format!("reading technology {}", path.display()), e))
}
