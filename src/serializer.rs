//! Serialization module for converting generated documents to YAML or JSON format.
//!
//! Works for the root document as well as per-resource fragments, and writes the results
//! to files or returns them as strings.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```ignore
/// use resource_swagger::registry::DocumentRegistry;
/// use resource_swagger::serializer::serialize_yaml;
///
/// let registry = DocumentRegistry::default();
/// let yaml = serialize_yaml(registry.root_document()).unwrap();
/// println!("{}", yaml);
/// ```
pub fn serialize_yaml<T: Serialize + ?Sized>(doc: &T) -> Result<String> {
    debug!("Serializing document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize document to YAML")
}

/// Serializes a document to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json<T: Serialize + ?Sized>(doc: &T) -> Result<String> {
    debug!("Serializing document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites an existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::DocsFragment;
    use crate::operation::{Capabilities, Verb};
    use crate::registry::{DocumentRegistry, ResourceRegistration, RootDocument};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_document() -> RootDocument {
        let mut registry = DocumentRegistry::default();
        registry.register(ResourceRegistration::new(
            "users",
            Capabilities::none().with(Verb::Find).with(Verb::Get),
        ));
        registry.into_document()
    }

    #[test]
    fn test_serialize_yaml() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        assert!(yaml.contains("swagger:"));
        assert!(yaml.contains("paths:"));
        assert!(yaml.contains("/users:"));
        assert!(yaml.contains("securityDefinitions:"));
    }

    #[test]
    fn test_serialize_json() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["swagger"], "2.0");
        assert!(parsed["paths"]["/users/{resourceId}"]["get"].is_object());
        assert_eq!(parsed["tags"][0]["name"], "users");
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  "));
        assert!(json.lines().count() > 5, "Pretty printed JSON should have multiple lines");
    }

    #[test]
    fn test_serialize_fragment() {
        let fragment = DocsFragment::from_value(json!({"description": "People"}));

        let json = serialize_json(&fragment).unwrap();
        let yaml = serialize_yaml(&fragment).unwrap();

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&json).unwrap(),
            json!({"description": "People"})
        );
        assert_eq!(yaml.trim(), "description: People");
    }

    #[test]
    fn test_roundtrip_yaml_serialization() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        let deserialized: RootDocument = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(deserialized, doc);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("users");

        write_to_file("{}", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs.json");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
