//! Technology, settings and cache assembled from CLI flags and config

use crate::cache::{ArchiveCache, SystemArchiveTool};
use crate::cli::Cli;
use crate::config::{Config, ConfigManager};
use crate::error::{TechError, TechResult};
use crate::settings::SettingsStore;
use crate::tech::{TechSchema, Technology};
use std::path::PathBuf;
use tracing::debug;

/// Everything a command needs to work on one technology
#[derive(Debug)]
pub struct TechContext {
    pub tech: Technology,
    pub settings: SettingsStore,
    cache_dir: PathBuf,
}

impl TechContext {
    /// Load the technology and layer its settings:
    /// technology defaults, config files, `--settings` files, `--set` pairs
    pub async fn load(cli: &Cli, config: &Config) -> TechResult<Self> {
        let schema = TechSchema::compile()?;
        let tech = Self::load_technology(&schema, cli, config).await?;

        let mut settings = SettingsStore::new();
        tech.load_defaults(&mut settings).await?;
        for path in config.settings.files.iter().chain(&cli.settings) {
            settings.push_file(path).await?;
        }
        if !cli.set.is_empty() {
            settings.push_pairs(cli.set.iter().cloned());
        }
        debug!("Settings assembled from {} layer(s)", settings.depth());

        let cache_dir = cli
            .cache_dir
            .clone()
            .unwrap_or_else(|| ConfigManager::cache_root(config).join(&tech.name));

        Ok(Self {
            tech,
            settings,
            cache_dir,
        })
    }

    async fn load_technology(schema: &TechSchema, cli: &Cli, config: &Config) -> TechResult<Technology> {
        match (&cli.tech_dir, &cli.tech) {
            (Some(dir), name) => {
                let name = match name {
                    Some(n) => n.clone(),
                    None => dir
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .ok_or_else(|| TechError::PathInvalid {
                            path: dir.display().to_string(),
                            reason: "cannot derive a technology name".to_string(),
                        })?,
                };
                Technology::load_from_dir(schema, &name, dir)
                    .await?
                    .ok_or_else(|| TechError::TechnologyNotFound {
                        name,
                        searched: dir.display().to_string(),
                    })
            }
            (None, Some(name)) => {
                Technology::find(schema, name, &config.technology.search_paths).await
            }
            (None, None) => Err(TechError::User(
                "No technology selected. Pass --tech-dir DIR or --tech NAME".to_string(),
            )),
        }
    }

    /// Cache for tarball extraction, created on first call
    pub fn cache(&self) -> TechResult<ArchiveCache> {
        ArchiveCache::new(&self.cache_dir, Box::new(SystemArchiveTool::new()))
    }

    /// Cache, but only if the technology declares tarballs
    pub fn cache_if_needed(&self) -> TechResult<Option<ArchiveCache>> {
        match self.tech.config.tarballs {
            Some(ref tarballs) if !tarballs.is_empty() => self.cache().map(Some),
            _ => Ok(None),
        }
    }
}
