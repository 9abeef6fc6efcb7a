//! Library path resolution
//!
//! Paths in a technology document are relative to a symbolic root named by
//! their first segment: `vendor/lef/cells.lef` refers to whatever the
//! `vendor` install, tarball or library prefix points at. Exactly one source
//! may claim a segment; overlapping declarations are a document error and
//! fail loudly instead of picking one.

use crate::cache::ArchiveCache;
use crate::error::{TechError, TechResult};
use crate::settings::SettingsLookup;
use crate::tech::prefix::LibraryPrefix;
use crate::tech::schema::{Install, Library, Tarball};
use crate::tech::Technology;
use std::path::PathBuf;
use tracing::debug;

/// Source a path segment matched
enum PathSource<'a> {
    Install(&'a Install),
    Tarball(&'a Tarball),
    Prefix(&'a dyn LibraryPrefix),
}

impl PathSource<'_> {
    fn describe(&self) -> String {
        match self {
            Self::Install(i) => format!("install '{}'", i.path),
            Self::Tarball(t) => format!("tarball '{}'", t.path),
            Self::Prefix(p) => format!("library prefix '{}'", p.prefix()),
        }
    }
}

/// Resolves library-relative paths for one technology
pub struct PathResolver<'a> {
    tech: &'a Technology,
    settings: &'a dyn SettingsLookup,
    cache: Option<&'a ArchiveCache>,
}

impl<'a> PathResolver<'a> {
    /// `cache` is only needed for paths that land in a tarball
    pub fn new(
        tech: &'a Technology,
        settings: &'a dyn SettingsLookup,
        cache: Option<&'a ArchiveCache>,
    ) -> Self {
        Self {
            tech,
            settings,
            cache,
        }
    }

    /// Turn `path` into an absolute path.
    ///
    /// Absolute paths are returned as-is. Otherwise the first segment must
    /// match exactly one install, tarball, or (when `library` is given) one
    /// of the library's extra prefixes:
    ///
    /// - install: base directory from the install's `base_var`, joined with
    ///   the rest of the path
    /// - tarball: the tarball is extracted if needed and the whole path is
    ///   taken relative to `<cache>/extracted`
    /// - prefix: the prefix prepends its root to the rest of the path
    pub fn resolve(&self, path: &str, library: Option<&Library>) -> TechResult<PathBuf> {
        if path.is_empty() {
            return Err(TechError::PathInvalid {
                path: path.to_string(),
                reason: "path must not be empty".to_string(),
            });
        }

        if path.starts_with('/') {
            return Ok(PathBuf::from(path));
        }

        let mut segments = path.split('/');
        let base = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let sources = self.candidates(base, library);
        let resolved = match sources.as_slice() {
            [] => {
                return Err(TechError::UnresolvedPath {
                    path: path.to_string(),
                    technology: self.tech.name.clone(),
                })
            }
            [source] => self.resolve_with(source, path, &rest)?,
            _ => {
                return Err(TechError::AmbiguousPath {
                    path: path.to_string(),
                    technology: self.tech.name.clone(),
                    sources: sources.iter().map(PathSource::describe).collect(),
                })
            }
        };

        debug!("Resolved {} to {}", path, resolved.display());
        Ok(resolved)
    }

    fn candidates<'s>(&'s self, base: &str, library: Option<&'s Library>) -> Vec<PathSource<'s>> {
        let config = &self.tech.config;

        let installs = config
            .installs
            .iter()
            .flatten()
            .filter(|i| i.path == base)
            .map(PathSource::Install);
        let tarballs = config
            .tarballs
            .iter()
            .flatten()
            .filter(|t| t.path == base)
            .map(PathSource::Tarball);
        let prefixes = library
            .map(Library::extra_prefixes)
            .unwrap_or_default()
            .iter()
            .filter(|p| p.prefix() == base)
            .map(|p| PathSource::Prefix(&**p));

        installs.chain(tarballs).chain(prefixes).collect()
    }

    fn resolve_with(&self, source: &PathSource<'_>, path: &str, rest: &[&str]) -> TechResult<PathBuf> {
        match source {
            PathSource::Install(install) => {
                let mut resolved = self.tech.base_dir(&install.base_var, self.settings)?;
                resolved.extend(rest);
                Ok(resolved)
            }
            PathSource::Tarball(tarball) => {
                let cache = self.cache.ok_or_else(|| TechError::CacheDirNotSet {
                    path: path.to_string(),
                    technology: self.tech.name.clone(),
                })?;
                cache.ensure_extracted(self.tech, self.settings, tarball)?;
                Ok(cache.extracted_dir().join(path))
            }
            PathSource::Prefix(prefix) => Ok(prefix.prepend(&rest.iter().collect::<PathBuf>())),
        }
    }
}
