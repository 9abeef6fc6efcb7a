//! Tarball extraction cache
//!
//! Each technology gets its own cache directory. A tarball declared with
//! `path = "stdcell"` is extracted to `<cache>/extracted/stdcell` the first
//! time something needs it.
//!
//! Extraction runs in a per-process staging directory next to the target
//! and is renamed into place only after `tar` and permission repair succeed,
//! so a target directory never holds a partial tree. A completion marker
//! under `<cache>/markers/` is written after the rename. A target without a
//! marker was published by another process that has not written its marker
//! yet, and is adopted as is.

use crate::cache::tools::ArchiveTool;
use crate::error::{TechError, TechResult};
use crate::settings::SettingsLookup;
use crate::tech::schema::Tarball;
use crate::tech::Technology;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

const EXTRACTED_DIR: &str = "extracted";
const MARKERS_DIR: &str = "markers";
const MARKER_SUFFIX: &str = ".complete";
const STAGING_INFIX: &str = ".partial-";

/// State of a tarball's extraction target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    /// Target directory does not exist
    Missing,
    /// Target published but not yet marked complete
    Incomplete,
    /// Extracted and marked complete
    Complete,
}

impl fmt::Display for ExtractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Incomplete => write!(f, "incomplete"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Per-technology cache of extracted tarballs
pub struct ArchiveCache {
    cache_dir: PathBuf,
    tool: Box<dyn ArchiveTool>,
}

impl ArchiveCache {
    /// Assign the cache directory, creating it if needed
    pub fn new(cache_dir: impl Into<PathBuf>, tool: Box<dyn ArchiveTool>) -> TechResult<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| {
            TechError::io(
                format!("creating cache directory {}", cache_dir.display()),
                e,
            )
        })?;

        Ok(Self { cache_dir, tool })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory holding every extracted tarball
    pub fn extracted_dir(&self) -> PathBuf {
        self.cache_dir.join(EXTRACTED_DIR)
    }

    /// Extraction target for a tarball.
    ///
    /// The tarball path must be a single plain file name so the target
    /// always sits directly under [`extracted_dir`](Self::extracted_dir).
    pub fn target_dir(&self, tarball: &Tarball) -> TechResult<PathBuf> {
        Ok(self.extracted_dir().join(entry_name(tarball)?))
    }

    fn staging_dir(&self, tarball: &Tarball) -> TechResult<PathBuf> {
        let name = entry_name(tarball)?;
        Ok(self.extracted_dir().join(format!(
            ".{}{}{}",
            name,
            STAGING_INFIX,
            std::process::id()
        )))
    }

    fn marker_path(&self, tarball: &Tarball) -> TechResult<PathBuf> {
        let name = entry_name(tarball)?;
        Ok(self
            .cache_dir
            .join(MARKERS_DIR)
            .join(format!("{}{}", name, MARKER_SUFFIX)))
    }

    /// Current state of a tarball's extraction target
    pub fn state(&self, tarball: &Tarball) -> TechResult<ExtractionState> {
        let state = if !self.target_dir(tarball)?.is_dir() {
            ExtractionState::Missing
        } else if self.marker_path(tarball)?.is_file() {
            ExtractionState::Complete
        } else {
            ExtractionState::Incomplete
        };
        Ok(state)
    }

    /// Make sure `tarball` is extracted, returning its target directory
    pub fn ensure_extracted(
        &self,
        tech: &Technology,
        settings: &dyn SettingsLookup,
        tarball: &Tarball,
    ) -> TechResult<PathBuf> {
        let target = self.target_dir(tarball)?;
        let archive = tech.base_dir(&tarball.base_var, settings)?.join(&tarball.path);
        debug!("Extracting/verifying tarball {}", archive.display());

        match self.state(tarball)? {
            ExtractionState::Complete => return Ok(target),
            ExtractionState::Incomplete => {
                debug!(
                    "Adopting unmarked extraction of {} at {}",
                    tarball.path,
                    target.display()
                );
                self.mark_complete(tarball, &archive)?;
                return Ok(target);
            }
            ExtractionState::Missing => {}
        }

        let staging = self.staging_dir(tarball)?;
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| {
                TechError::io(format!("removing stale staging {}", staging.display()), e)
            })?;
        }
        fs::create_dir_all(&staging)
            .map_err(|e| TechError::io(format!("creating {}", staging.display()), e))?;

        let unpacked = self
            .tool
            .extract(&archive, &staging)
            .and_then(|()| self.tool.grant_user_access(&staging));
        if let Err(e) = unpacked {
            let _ = fs::remove_dir_all(&staging);
            return Err(attribute(e, tech, tarball));
        }

        match fs::rename(&staging, &target) {
            Ok(()) => {}
            Err(_) if target.is_dir() => {
                debug!(
                    "{} was extracted concurrently, discarding {}",
                    tarball.path,
                    staging.display()
                );
                let _ = fs::remove_dir_all(&staging);
            }
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(TechError::io(
                    format!("moving {} to {}", staging.display(), target.display()),
                    e,
                ));
            }
        }
        self.mark_complete(tarball, &archive)?;

        info!("Extracted {} into {}", archive.display(), target.display());
        Ok(target)
    }

    /// Extract every tarball the technology declares, stopping at the first failure
    pub fn extract_all(&self, tech: &Technology, settings: &dyn SettingsLookup) -> TechResult<()> {
        for tarball in tech.config.tarballs.iter().flatten() {
            self.ensure_extracted(tech, settings, tarball)?;
        }
        Ok(())
    }

    fn mark_complete(&self, tarball: &Tarball, archive: &Path) -> TechResult<()> {
        let marker = self.marker_path(tarball)?;
        if let Some(parent) = marker.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TechError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::write(&marker, archive.to_string_lossy().as_bytes())
            .map_err(|e| TechError::io(format!("writing marker {}", marker.display()), e))
    }
}

/// The tarball path as a single normal path component
fn entry_name(tarball: &Tarball) -> TechResult<&str> {
    let mut components = Path::new(&tarball.path).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == tarball.path.as_str() => {
            Ok(&tarball.path)
        }
        _ => Err(TechError::PathInvalid {
            path: tarball.path.clone(),
            reason: "tarball path must be a single file name".to_string(),
        }),
    }
}

/// Name the tarball and technology in a host tool failure
fn attribute(err: TechError, tech: &Technology, tarball: &Tarball) -> TechError {
    match err {
        TechError::ToolFailed {
            command,
            code,
            stderr,
        } => TechError::Extraction {
            tarball: tarball.path.clone(),
            technology: tech.name.clone(),
            command,
            code,
            stderr,
        },
        other => other,
    }
}

impl fmt::Debug for ArchiveCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveCache")
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}
