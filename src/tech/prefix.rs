//! Library path prefixes
//!
//! A prefix is a named root that a library can attach on top of the
//! technology's installs and tarballs. When a library-relative path starts
//! with the prefix name, the rest of the path is appended to the prefix root.

use crate::error::{TechError, TechResult};
use serde_json::{json, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// A named root that can be prepended to a relative path
pub trait LibraryPrefix: fmt::Debug + Send + Sync {
    /// Name matched against the first segment of a path, e.g. `mylib`
    fn prefix(&self) -> &str;

    /// Prepend the root held by this prefix to `rest`
    fn prepend(&self, rest: &Path) -> PathBuf;
}

/// Prefix mapping a name to a fixed filesystem path,
/// e.g. `mylib` -> `/usr/share/mylib`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPrefix {
    prefix: String,
    path: PathBuf,
}

impl PathPrefix {
    pub fn new(prefix: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
        }
    }

    /// Root this prefix maps to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize as a `{prefix, path}` settings record
    pub fn to_setting(&self) -> Value {
        json!({
            "prefix": self.prefix,
            "path": self.path.to_string_lossy(),
        })
    }

    /// Parse a `{prefix, path}` settings record
    pub fn from_setting(value: &Value) -> TechResult<Self> {
        let field = |name: &str| -> TechResult<String> {
            match value.get(name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Null) | None => Err(TechError::SettingInvalid {
                    key: name.to_string(),
                    reason: "missing from path prefix record".to_string(),
                }),
                Some(other) => Ok(other.to_string()),
            }
        };

        Ok(Self::new(field("prefix")?, field("path")?))
    }
}

impl LibraryPrefix for PathPrefix {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn prepend(&self, rest: &Path) -> PathBuf {
        if rest.as_os_str().is_empty() {
            self.path.clone()
        } else {
            self.path.join(rest)
        }
    }
}
