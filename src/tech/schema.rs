//! Technology document schema
//!
//! The `<name>.tech.json` (or `.tech.yml`) document is described by an
//! embedded JSON schema. `TechSchema` compiles it once at startup and the
//! loader validates each document against it before deserializing into the
//! statically declared types below.

use crate::error::{TechError, TechResult};
use crate::tech::prefix::LibraryPrefix;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const TECH_SCHEMA: &str = include_str!("../../schema/tech.schema.json");

/// Compiled technology document schema
pub struct TechSchema {
    validator: jsonschema::Validator,
}

impl TechSchema {
    /// Compile the embedded schema
    pub fn compile() -> TechResult<Self> {
        let schema: Value = serde_json::from_str(TECH_SCHEMA)?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| TechError::Internal(format!("technology schema does not compile: {e}")))?;
        Ok(Self { validator })
    }

    /// Validate a document, reporting every violation at once
    pub fn validate(&self, technology: &str, document: &Value) -> TechResult<()> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(document)
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(TechError::SchemaInvalid {
                technology: technology.to_string(),
                reason: violations.join("; "),
            })
        }
    }
}

/// Parsed technology document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechJson {
    pub name: Option<String>,
    pub grid_unit: Option<String>,
    pub time_unit: Option<String>,

    /// Pre-installed directories; `None` when the document omits the key
    pub installs: Option<Vec<Install>>,

    /// Archives extracted into the cache on first use
    pub tarballs: Option<Vec<Tarball>>,

    pub libraries: Option<Vec<Library>>,

    /// Cells the flow must not instantiate
    pub dont_use_list: Option<Vec<String>>,
}

/// A pre-installed directory referenced by the first path segment `path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Install {
    pub path: String,

    /// Settings key holding the real base directory. Empty means the
    /// technology's own directory.
    pub base_var: String,
}

/// An archive extracted to `<cache>/extracted/<path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tarball {
    pub path: String,

    /// Settings key holding the directory the archive lives in
    pub base_var: String,

    /// Where to obtain the archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corner {
    pub nmos: Option<String>,
    pub pmos: Option<String>,
    pub temperature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplies {
    #[serde(rename = "VDD")]
    pub vdd: Option<String>,
    #[serde(rename = "GND")]
    pub gnd: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provide {
    pub lib_type: Option<String>,
    pub vt: Option<String>,
}

/// Semiconductor IP library
///
/// Everything except `extra_prefixes` comes from the technology document.
/// Extra prefixes are attached afterwards by whoever discovers additional
/// search roots for the library. `Clone` produces an independent copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner: Option<Corner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplies: Option<Supplies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<Vec<Provide>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lef_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nldm_liberty_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccs_liberty_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gds_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verilog_sim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verilog_synth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milkyway_lib_in_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milkyway_techfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qrc_techfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tluplus_files: Option<Vec<String>>,

    #[serde(skip)]
    extra_prefixes: Vec<Arc<dyn LibraryPrefix>>,
}

impl Library {
    /// Build a library from a JSON object
    pub fn from_value(value: Value) -> TechResult<Self> {
        if !value.is_object() {
            return Err(TechError::LibraryInvalid(format!(
                "expected an object, got {value}"
            )));
        }
        serde_json::from_value(value).map_err(|e| TechError::LibraryInvalid(e.to_string()))
    }

    /// Library-scoped prefixes consulted during path resolution
    pub fn extra_prefixes(&self) -> &[Arc<dyn LibraryPrefix>] {
        &self.extra_prefixes
    }

    pub fn set_extra_prefixes(&mut self, prefixes: Vec<Arc<dyn LibraryPrefix>>) {
        self.extra_prefixes = prefixes;
    }

    pub fn add_extra_prefix(&mut self, prefix: impl LibraryPrefix + 'static) {
        self.extra_prefixes.push(Arc::new(prefix));
    }

    /// Every path-valued field that is set, in document order
    pub fn file_fields(&self) -> Vec<(&'static str, &str)> {
        let single = [
            ("lef_file", &self.lef_file),
            ("nldm_liberty_file", &self.nldm_liberty_file),
            ("ccs_liberty_file", &self.ccs_liberty_file),
            ("gds_file", &self.gds_file),
            ("spice_file", &self.spice_file),
            ("verilog_sim", &self.verilog_sim),
            ("verilog_synth", &self.verilog_synth),
            ("milkyway_lib_in_dir", &self.milkyway_lib_in_dir),
            ("milkyway_techfile", &self.milkyway_techfile),
            ("qrc_techfile", &self.qrc_techfile),
        ];

        let mut fields: Vec<(&'static str, &str)> = single
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
            .collect();

        if let Some(ref files) = self.tluplus_files {
            fields.extend(files.iter().map(|f| ("tluplus_files", f.as_str())));
        }
        fields
    }
}
