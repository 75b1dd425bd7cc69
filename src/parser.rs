use crate::error::{Error, Result};
use crate::fragment::DocsFragment;
use crate::operation::Capabilities;
use crate::registry::ResourceRegistration;
use crate::schema_mapper::ModelDescriptor;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for resource manifest files.
///
/// A manifest lists the resources a service exposes, standing in for the service layer's
/// registration hook. JSON files are recognized by extension; everything else is YAML.
///
/// # Example
///
/// ```no_run
/// use resource_swagger::parser::ManifestParser;
/// use std::path::Path;
///
/// let parsed = ManifestParser::parse_file(Path::new("resources.yaml")).unwrap();
/// println!("Parsed {} resources", parsed.manifest.resources.len());
/// ```
pub struct ManifestParser;

/// Contents of one manifest file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// One resource as written in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub path: String,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub docs: DocsFragment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDescriptor>,
}

impl From<ResourceEntry> for ResourceRegistration {
    fn from(entry: ResourceEntry) -> Self {
        ResourceRegistration {
            path: entry.path,
            capabilities: entry.capabilities,
            docs: entry.docs,
            model: entry.model,
        }
    }
}

/// A successfully parsed manifest with the file it came from.
#[derive(Debug)]
pub struct ParsedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Whether `path` should be read as JSON rather than YAML.
pub fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl ManifestParser {
    /// Parses a single manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a manifest.
    pub fn parse_file(path: &Path) -> Result<ParsedManifest> {
        debug!("Parsing manifest: {}", path.display());

        let content = fs::read_to_string(path)?;
        let manifest = Self::parse_str(&content, is_json_path(path)).map_err(|message| {
            Error::Manifest {
                file: path.to_path_buf(),
                message,
            }
        })?;

        debug!(
            "Parsed {} resources from {}",
            manifest.resources.len(),
            path.display()
        );

        Ok(ParsedManifest {
            path: path.to_path_buf(),
            manifest,
        })
    }

    fn parse_str(content: &str, json: bool) -> std::result::Result<Manifest, String> {
        if json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else if content.trim().is_empty() {
            Ok(Manifest::default())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        }
    }

    /// Parses multiple manifests, continuing even if some fail.
    ///
    /// Failures are logged as warnings and returned in place, so the caller can still
    /// generate documentation from the manifests that did parse.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedManifest>> {
        debug!("Parsing {} manifests", paths.len());

        let results: Vec<Result<ParsedManifest>> = paths
            .iter()
            .map(|path| {
                let result = Self::parse_file(path);
                if let Err(e) = &result {
                    warn!("Failed to parse {}: {}", path.display(), e);
                }
                result
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Verb;
    use serde_json::json;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_parse_yaml_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "users.yaml",
            r#"
resources:
  - path: users
    capabilities: [find, get, create]
    docs:
      description: People using the shop
      find:
        summary: List users
    model:
      attributes:
        id: INTEGER
        email: STRING
"#,
        );

        let parsed = ManifestParser::parse_file(&path).unwrap();

        assert_eq!(parsed.path, path);
        assert_eq!(parsed.manifest.resources.len(), 1);
        let entry = &parsed.manifest.resources[0];
        assert_eq!(entry.path, "users");
        assert!(entry.capabilities.contains(Verb::Create));
        assert!(!entry.capabilities.contains(Verb::Remove));
        assert_eq!(entry.docs.description(), Some("People using the shop"));
        assert_eq!(entry.docs.get("find"), Some(&json!({"summary": "List users"})));
        assert!(entry.model.is_some());
    }

    #[test]
    fn test_parse_json_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "posts.json",
            r#"{"resources": [{"path": "posts", "capabilities": ["remove"]}]}"#,
        );

        let parsed = ManifestParser::parse_file(&path).unwrap();
        let entry = &parsed.manifest.resources[0];

        assert!(entry.capabilities.contains(Verb::Remove));
        assert!(entry.docs.is_empty());
        assert!(entry.model.is_none());
    }

    #[test]
    fn test_entry_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "bare.yml", "resources:\n  - path: health\n");

        let parsed = ManifestParser::parse_file(&path).unwrap();
        let registration: ResourceRegistration =
            parsed.manifest.resources[0].clone().into();

        assert_eq!(registration.path, "health");
        assert!(registration.capabilities.is_empty());
        assert!(registration.docs.is_empty());
    }

    #[test]
    fn test_empty_file_has_no_resources() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "empty.yaml", "  \n");

        let parsed = ManifestParser::parse_file(&path).unwrap();

        assert!(parsed.manifest.resources.is_empty());
    }

    #[test]
    fn test_unknown_verb_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "bad.yaml",
            "resources:\n  - path: users\n    capabilities: [find, patch]\n",
        );

        let err = ManifestParser::parse_file(&path).unwrap_err();

        assert!(matches!(err, Error::Manifest { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_parse_files_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "good.yaml", "resources:\n  - path: users\n");
        let bad = create_temp_file(&temp_dir, "bad.json", "{ not json");
        let missing = temp_dir.path().join("missing.yaml");

        let results = ManifestParser::parse_files(&[good, bad, missing]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Manifest { .. })));
        assert!(matches!(results[2], Err(Error::Io(_))));
    }

    #[test]
    fn test_is_json_path() {
        assert!(is_json_path(Path::new("a.json")));
        assert!(is_json_path(Path::new("a.JSON")));
        assert!(!is_json_path(Path::new("a.yaml")));
        assert!(!is_json_path(Path::new("a")));
    }
}
