use crate::config::DocsConfig;
use crate::fragment::DocsFragment;
use crate::operation::{
    synthesize, Capabilities, HttpMethod, Operation, PartialOperation, PathKey, SECURITY_SCHEME,
};
use crate::schema_mapper::ModelDescriptor;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Tag description used when the author gave none.
pub const DEFAULT_TAG_DESCRIPTION: &str = "Operations about this resource.";

/// Swagger PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// Methods and path-level keys this crate never generates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }

    /// Path item holding exactly the keys of a configured path.
    ///
    /// Every key, operations included, stays in `extra` so it serializes as written.
    pub fn from_raw(raw: Map<String, Value>) -> Self {
        PathItem {
            extra: raw,
            ..PathItem::default()
        }
    }

    /// Install `operation`, replacing any configured one for the same method.
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        self.extra.remove(method.key());
        match method {
            HttpMethod::Get => self.get = Some(operation),
            HttpMethod::Post => self.post = Some(operation),
            HttpMethod::Put => self.put = Some(operation),
            HttpMethod::Delete => self.delete = Some(operation),
        }
    }
}

/// Swagger Tag object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub description: String,
    #[serde(rename = "externalDocs")]
    pub external_docs: Value,
}

impl Tag {
    fn for_resource(path: &str, docs: &DocsFragment) -> Self {
        Tag {
            name: path.to_string(),
            description: docs
                .description()
                .unwrap_or(DEFAULT_TAG_DESCRIPTION)
                .to_string(),
            external_docs: docs
                .external_docs()
                .cloned()
                .unwrap_or_else(|| json!({})),
        }
    }
}

/// Swagger security scheme declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
}

impl SecurityScheme {
    /// API key carried in the `Authentication` header.
    pub fn api_key_header() -> Self {
        SecurityScheme {
            scheme_type: "apiKey".to_string(),
            name: "Authentication".to_string(),
            location: "header".to_string(),
        }
    }
}

/// Complete Swagger document shared by every registered resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootDocument {
    pub info: Value,
    pub paths: BTreeMap<String, PathItem>,
    pub definitions: BTreeMap<String, Value>,
    /// Swagger version
    pub swagger: String,
    pub schemes: Vec<String>,
    pub tags: Vec<Tag>,
    #[serde(rename = "basePath")]
    pub base_path: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    #[serde(rename = "securityDefinitions")]
    pub security_definitions: BTreeMap<String, SecurityScheme>,
}

impl RootDocument {
    pub fn new(config: &DocsConfig) -> Self {
        let media_types = vec!["application/json".to_string()];
        let mut security_definitions = BTreeMap::new();
        security_definitions.insert(SECURITY_SCHEME.to_string(), SecurityScheme::api_key_header());

        RootDocument {
            info: config.info.clone(),
            paths: config
                .paths
                .iter()
                .map(|(key, raw)| (key.clone(), PathItem::from_raw(raw.clone())))
                .collect(),
            definitions: config.definitions.clone(),
            swagger: config.swagger.clone(),
            schemes: vec!["http".to_string()],
            tags: Vec::new(),
            base_path: config.base_path.clone(),
            consumes: media_types.clone(),
            produces: media_types,
            security_definitions,
        }
    }
}

/// One resource becoming available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceRegistration {
    /// Resource name, used as the URL segment and definitions key
    pub path: String,
    pub capabilities: Capabilities,
    pub docs: DocsFragment,
    pub model: Option<ModelDescriptor>,
}

impl ResourceRegistration {
    pub fn new(path: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            path: path.into(),
            capabilities,
            docs: DocsFragment::new(),
            model: None,
        }
    }

    pub fn with_docs(mut self, docs: DocsFragment) -> Self {
        self.docs = docs;
        self
    }

    pub fn with_model(mut self, model: ModelDescriptor) -> Self {
        self.model = Some(model);
        self
    }
}

/// The standalone document of one registered resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceView {
    pub path: String,
    /// Where the fragment is published: `{docsPath}/{path}{docExt}`
    pub document_path: String,
    /// The author's fragment minus every verb override that was consumed
    pub fragment: DocsFragment,
}

/// Owns the root document and merges resources into it.
///
/// `register` is the only way to mutate the document; paths, definitions and tags only
/// ever grow.
pub struct DocumentRegistry {
    docs_path: String,
    doc_ext: String,
    document: RootDocument,
    views: BTreeMap<String, ResourceView>,
    warnings: Vec<String>,
}

impl DocumentRegistry {
    pub fn new(config: DocsConfig) -> Self {
        debug!("Initializing DocumentRegistry (swagger {})", config.swagger);
        Self {
            document: RootDocument::new(&config),
            docs_path: config.docs_path,
            doc_ext: config.doc_ext,
            views: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Merge a resource into the root document.
    pub fn register(&mut self, registration: ResourceRegistration) -> ResourceView {
        let ResourceRegistration {
            path,
            capabilities,
            docs,
            model,
        } = registration;

        info!("Registering resource: {}", path);

        if path.is_empty() {
            self.warn(String::from("registering a resource with an empty path"));
        }
        if self.views.contains_key(&path) {
            self.warn(format!(
                "resource `{}` registered more than once; its tag will be duplicated",
                path
            ));
        }

        let collection_key = PathKey::Collection.for_resource(&path);
        let item_key = PathKey::Item.for_resource(&path);
        self.document.paths.entry(collection_key).or_default();
        self.document.paths.entry(item_key).or_default();

        self.merge_definitions(&path, &docs, model.as_ref());

        let mut remaining = docs;
        for verb in capabilities.iter() {
            let defaults = PartialOperation::defaults_for(
                verb,
                &path,
                &self.document.consumes,
                &self.document.produces,
            );
            let synthesis = synthesize(verb, remaining, defaults);
            remaining = synthesis.remaining;
            for warning in synthesis.warnings {
                self.warnings.push(format!("{}: {}", path, warning));
            }

            let path_key = verb.path_key().for_resource(&path);
            debug!("Adding operation: {} {}", verb.method().as_str(), path_key);
            self.document
                .paths
                .entry(path_key)
                .or_default()
                .set_operation(verb.method(), synthesis.operation);
        }

        self.document.tags.push(Tag::for_resource(&path, &remaining));

        let view = ResourceView {
            document_path: format!("{}/{}{}", self.docs_path, path, self.doc_ext),
            path: path.clone(),
            fragment: remaining,
        };
        self.views.insert(path, view.clone());
        view
    }

    fn merge_definitions(&mut self, path: &str, docs: &DocsFragment, model: Option<&ModelDescriptor>) {
        if let Some(definition) = docs.definition() {
            debug!("Installing authored definition for {}", path);
            self.document
                .definitions
                .insert(path.to_string(), definition.clone());
        } else if let Some(model) = model {
            for (name, tag) in model.unknown_attributes() {
                self.warn(format!(
                    "{}: attribute `{}` has unrecognized storage type `{}`",
                    path, name, tag
                ));
            }
            match serde_json::to_value(model.to_schema()) {
                Ok(schema) => {
                    debug!("Installing model definition for {}", path);
                    self.document.definitions.insert(path.to_string(), schema);
                }
                Err(e) => self.warn(format!("{}: could not encode model schema: {}", path, e)),
            }
        }

        match docs.definitions() {
            Some(Value::Object(definitions)) => {
                for (name, schema) in definitions {
                    self.document.definitions.insert(name.clone(), schema.clone());
                }
            }
            Some(_) => self.warn(format!("{}: `definitions` is not an object; ignored", path)),
            None => {}
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// The full root document.
    pub fn root_document(&self) -> &RootDocument {
        &self.document
    }

    /// The standalone document of a registered resource.
    pub fn resource_document(&self, path: &str) -> Option<&DocsFragment> {
        self.views.get(path).map(|view| &view.fragment)
    }

    /// Latest view of every registered resource, ordered by path.
    pub fn views(&self) -> impl Iterator<Item = &ResourceView> {
        self.views.values()
    }

    /// Path the root document is published under.
    pub fn docs_path(&self) -> &str {
        &self.docs_path
    }

    /// Suffix of every per-resource document path.
    pub fn doc_ext(&self) -> &str {
        &self.doc_ext
    }

    /// Validation findings collected so far. Never fatal.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_document(self) -> RootDocument {
        self.document
    }
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::new(DocsConfig::default())
    }
}
