//! Startup configuration for the document registry.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Keys are camelCase to match the document they seed.

use crate::error::{Error, Result};
use crate::parser::is_json_path;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocsConfig {
    /// `basePath` of the root document
    pub base_path: String,
    /// Path the root document is published under
    pub docs_path: String,
    /// Suffix appended to per-resource document paths
    pub doc_ext: String,
    /// Opaque `info` block
    pub info: Value,
    /// Paths present before any resource registers, kept exactly as written
    pub paths: BTreeMap<String, Map<String, Value>>,
    /// Definitions present before any resource registers
    pub definitions: BTreeMap<String, Value>,
    #[serde(alias = "schemaVersion")]
    pub swagger: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            docs_path: "docs".to_string(),
            doc_ext: String::new(),
            info: Value::Object(Map::new()),
            paths: BTreeMap::new(),
            definitions: BTreeMap::new(),
            swagger: "2.0".to_string(),
        }
    }
}

/// Load a configuration file; `.json` files are read as JSON, anything else as YAML.
pub fn load_config(path: &Path) -> Result<DocsConfig> {
    debug!("Loading config: {}", path.display());

    let content = fs::read_to_string(path)?;
    let parsed = if is_json_path(path) {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else if content.trim().is_empty() {
        Ok(DocsConfig::default())
    } else {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| Error::Config {
        file: path.to_path_buf(),
        message,
    })
}
