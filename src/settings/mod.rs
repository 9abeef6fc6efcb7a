//! Layered settings store
//!
//! Technologies refer to host-specific directories through settings keys
//! (`base_var`). The store holds a stack of layers; later layers override
//! earlier ones. Nested tables are flattened into dotted keys, so
//! `{"vlsi": {"core": {"node": 7}}}` answers `vlsi.core.node`.

use crate::error::{TechError, TechResult};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Read-only key lookup consulted during resolution
pub trait SettingsLookup {
    /// Raw value for `key`, if any layer defines it
    fn lookup(&self, key: &str) -> Option<&Value>;

    /// Value for `key` as a string. Scalars are stringified; `None` means the
    /// key is absent (or explicitly null).
    fn setting_str(&self, key: &str) -> TechResult<Option<String>> {
        match self.lookup(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(v @ (Value::Bool(_) | Value::Number(_))) => Ok(Some(v.to_string())),
            Some(_) => Err(TechError::SettingInvalid {
                key: key.to_string(),
                reason: "expected a string, found a list or table".to_string(),
            }),
        }
    }
}

/// Stack of flattened settings layers
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    layers: Vec<Map<String, Value>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-layer store from key/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut store = Self::new();
        store.push_pairs(pairs);
        store
    }

    /// Push a layer of key/value pairs (keys are used as-is)
    pub fn push_pairs<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let layer = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.layers.push(layer);
    }

    /// Push a document as a new layer, flattening nested tables
    pub fn push_value(&mut self, value: Value) -> TechResult<()> {
        let Value::Object(table) = value else {
            return Err(TechError::User(
                "Settings document must be a table at the top level".to_string(),
            ));
        };

        let mut layer = Map::new();
        flatten_into(&mut layer, None, table);
        self.layers.push(layer);
        Ok(())
    }

    /// Load a JSON, YAML or TOML settings file as a new layer
    pub async fn push_file(&mut self, path: &Path) -> TechResult<()> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| TechError::io(format!("reading settings from {}", path.display()), e))?;

        let value = parse_document(path, &content)?;
        self.push_value(value)?;
        debug!("Loaded settings layer from {}", path.display());
        Ok(())
    }

    /// Number of layers
    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl SettingsLookup for SettingsStore {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.layers.iter().rev().find_map(|layer| layer.get(key))
    }
}

/// Parse a settings document according to its extension (JSON by default)
fn parse_document(path: &Path, content: &str) -> TechResult<Value> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let invalid = |reason: String| TechError::ConfigInvalid {
        path: path.to_path_buf(),
        reason,
    };

    match ext {
        "yml" | "yaml" => serde_yaml::from_str(content).map_err(|e| invalid(e.to_string())),
        "toml" => {
            let table: toml::Table = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
            serde_json::to_value(table).map_err(|e| invalid(e.to_string()))
        }
        _ => serde_json::from_str(content).map_err(|e| invalid(e.to_string())),
    }
}

fn flatten_into(out: &mut Map<String, Value>, prefix: Option<&str>, table: Map<String, Value>) {
    for (key, value) in table {
        let full = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(out, Some(&full), nested),
            other => {
                out.insert(full, other);
            }
        }
    }
}
