//! Operation synthesis.
//!
//! Turns a verb, the author's partial operation doc and the verb's default template into a
//! fully populated Swagger operation. Author values always win field by field; missing
//! fields fall back to the template and then to an empty value.

use crate::fragment::DocsFragment;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Name of the security scheme every operation references.
pub const SECURITY_SCHEME: &str = "token";
/// Name of the id path parameter on item paths.
pub const RESOURCE_ID: &str = "resourceId";

/// HTTP methods an operation can be installed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Key of this method's slot in a Swagger path item.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

/// Which of a resource's two paths an operation lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey {
    /// `/{path}`
    Collection,
    /// `/{path}/{resourceId}`
    Item,
}

impl PathKey {
    pub fn for_resource(&self, path: &str) -> String {
        match self {
            PathKey::Collection => format!("/{}", path),
            PathKey::Item => format!("/{}/{{{}}}", path, RESOURCE_ID),
        }
    }
}

/// CRUD verbs a resource service can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Find,
    Get,
    Create,
    Update,
    Remove,
}

impl Verb {
    /// All verbs, in the order they are synthesized.
    pub const ALL: [Verb; 5] = [Verb::Find, Verb::Get, Verb::Create, Verb::Update, Verb::Remove];

    /// Key under which the author's override for this verb lives in a docs fragment.
    pub fn key(&self) -> &'static str {
        match self {
            Verb::Find => "find",
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Remove => "remove",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Verb::Find | Verb::Get => HttpMethod::Get,
            Verb::Create => HttpMethod::Post,
            Verb::Update => HttpMethod::Put,
            Verb::Remove => HttpMethod::Delete,
        }
    }

    pub fn path_key(&self) -> PathKey {
        match self {
            Verb::Find | Verb::Create => PathKey::Collection,
            Verb::Get | Verb::Update | Verb::Remove => PathKey::Item,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Verb::Find => "Retrieves a list of all resources from the service.",
            Verb::Get => "Retrieves a single resource with the given id from the service.",
            Verb::Create => "Creates a new resource with data.",
            Verb::Update => "Updates the resource identified by id using data.",
            Verb::Remove => "Removes the resource with id.",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The set of verbs a resource actually implements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Verb>);

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Verb::ALL.into_iter().collect()
    }

    pub fn with(mut self, verb: Verb) -> Self {
        self.0.insert(verb);
        self
    }

    pub fn contains(&self, verb: Verb) -> bool {
        self.0.contains(&verb)
    }

    pub fn iter(&self) -> impl Iterator<Item = Verb> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Verb> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Verb>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Swagger Parameter object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter location (path, query, header, body)
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Primitive type for non-body parameters
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Schema for body parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Parameter {
    /// Required integer `resourceId` path parameter.
    pub fn resource_id(resource: &str, action: &str) -> Self {
        Parameter {
            name: Some(RESOURCE_ID.to_string()),
            location: Some("path".to_string()),
            description: Some(format!("ID of {} to {}", resource, action)),
            required: Some(true),
            param_type: Some("integer".to_string()),
            schema: None,
            extra: Map::new(),
        }
    }

    /// Required body parameter referencing the resource's definition.
    pub fn body(resource: &str) -> Self {
        Parameter {
            name: Some("body".to_string()),
            location: Some("body".to_string()),
            description: None,
            required: Some(true),
            param_type: None,
            schema: Some(definition_ref(resource)),
            extra: Map::new(),
        }
    }
}

/// Swagger Response object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of an operation's `security` list
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Swagger Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub parameters: Vec<Parameter>,
    pub responses: BTreeMap<String, Response>,
    pub description: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub security: Vec<SecurityRequirement>,
    /// Legacy passthrough; not interpreted
    #[serde(rename = "securityDefinitions", skip_serializing_if = "Value::is_null")]
    pub security_definitions: Value,
    /// Author keys with no dedicated field (operationId, deprecated, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An operation with every field optional.
///
/// Used both for the author's override and for a verb's default template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialOperation {
    pub parameters: Option<Vec<Parameter>>,
    pub responses: Option<BTreeMap<String, Response>>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    pub produces: Option<Vec<String>>,
    pub security_definitions: Option<Value>,
    pub extra: Map<String, Value>,
}

impl PartialOperation {
    /// Default template for `verb` on `resource`.
    pub fn defaults_for(verb: Verb, resource: &str, consumes: &[String], produces: &[String]) -> Self {
        let parameters = match verb {
            Verb::Find => None,
            Verb::Get => Some(vec![Parameter::resource_id(resource, "return")]),
            Verb::Create => Some(vec![Parameter::body(resource)]),
            Verb::Update => Some(vec![
                Parameter::resource_id(resource, "update"),
                Parameter::body(resource),
            ]),
            Verb::Remove => Some(vec![Parameter::resource_id(resource, "return")]),
        };

        let responses = match verb {
            Verb::Get => {
                let mut responses = BTreeMap::new();
                responses.insert(
                    "200".to_string(),
                    Response {
                        description: Some("successful operation".to_string()),
                        schema: Some(definition_ref(resource)),
                        extra: Map::new(),
                    },
                );
                Some(responses)
            }
            _ => None,
        };

        PartialOperation {
            parameters,
            responses,
            description: Some(verb.description().to_string()),
            summary: None,
            tags: Some(vec![resource.to_string()]),
            consumes: Some(consumes.to_vec()),
            produces: Some(produces.to_vec()),
            security_definitions: None,
            extra: Map::new(),
        }
    }

    /// Read an author override field by field.
    ///
    /// Fields that fail to decode are dropped (and fall back to the defaults); a message
    /// for each is returned alongside the result.
    pub fn from_value(value: Value) -> (Self, Vec<String>) {
        let mut problems = Vec::new();
        let mut map = match value {
            Value::Object(map) => map,
            Value::Null => return (Self::default(), problems),
            other => {
                problems.push(format!("expected an object, found {}", json_kind(&other)));
                return (Self::default(), problems);
            }
        };

        // Always replaced by the fixed token requirement
        map.remove("security");

        let partial = PartialOperation {
            parameters: take_field(&mut map, "parameters", &mut problems),
            responses: take_field(&mut map, "responses", &mut problems),
            description: take_field(&mut map, "description", &mut problems),
            summary: take_field(&mut map, "summary", &mut problems),
            tags: take_field(&mut map, "tags", &mut problems),
            consumes: take_field(&mut map, "consumes", &mut problems),
            produces: take_field(&mut map, "produces", &mut problems),
            security_definitions: take_field(&mut map, "securityDefinitions", &mut problems),
            extra: map,
        };

        (partial, problems)
    }
}

fn take_field<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &str,
    problems: &mut Vec<String>,
) -> Option<T> {
    let value = map.remove(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            problems.push(format!("ignoring malformed `{}`: {}", key, e));
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `$ref` pointing at a resource's definition.
pub fn definition_ref(resource: &str) -> Value {
    json!({ "$ref": format!("#/definitions/{}", resource) })
}

/// The `security` list every synthesized operation carries.
pub fn token_security() -> Vec<SecurityRequirement> {
    let mut requirement = SecurityRequirement::new();
    requirement.insert(SECURITY_SCHEME.to_string(), Vec::new());
    vec![requirement]
}

/// Result of synthesizing one verb.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub operation: Operation,
    /// The input fragment with the verb's key removed
    pub remaining: DocsFragment,
    /// Problems found in the author's override
    pub warnings: Vec<String>,
}

/// Build the operation for `verb`, consuming the verb's key from `fragment`.
pub fn synthesize(verb: Verb, fragment: DocsFragment, defaults: PartialOperation) -> Synthesis {
    debug!("Synthesizing {} operation", verb);

    let (raw, remaining) = fragment.take(verb.key());
    let (authored, problems) = raw.map(PartialOperation::from_value).unwrap_or_default();

    let warnings: Vec<String> = problems
        .into_iter()
        .map(|problem| format!("{} override: {}", verb, problem))
        .collect();
    for warning in &warnings {
        warn!("{}", warning);
    }

    let PartialOperation {
        parameters,
        responses,
        description,
        summary,
        tags,
        consumes,
        produces,
        security_definitions,
        mut extra,
    } = defaults;

    // Author passthrough keys win over template ones
    extra.extend(authored.extra);

    let operation = Operation {
        parameters: authored.parameters.or(parameters).unwrap_or_default(),
        responses: authored.responses.or(responses).unwrap_or_default(),
        description: authored.description.or(description).unwrap_or_default(),
        summary: authored.summary.or(summary).unwrap_or_default(),
        tags: authored.tags.or(tags).unwrap_or_default(),
        consumes: authored.consumes.or(consumes).unwrap_or_default(),
        produces: authored.produces.or(produces).unwrap_or_default(),
        security: token_security(),
        security_definitions: authored
            .security_definitions
            .or(security_definitions)
            .unwrap_or_else(|| Value::Array(Vec::new())),
        extra,
    };

    Synthesis {
        operation,
        remaining,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn json_media() -> Vec<String> {
        vec!["application/json".to_string()]
    }

    fn defaults(verb: Verb) -> PartialOperation {
        PartialOperation::defaults_for(verb, "users", &json_media(), &json_media())
    }

    #[test]
    fn test_verb_routing_table() {
        assert_eq!(Verb::Find.method(), HttpMethod::Get);
        assert_eq!(Verb::Find.path_key(), PathKey::Collection);
        assert_eq!(Verb::Get.method(), HttpMethod::Get);
        assert_eq!(Verb::Get.path_key(), PathKey::Item);
        assert_eq!(Verb::Create.method(), HttpMethod::Post);
        assert_eq!(Verb::Create.path_key(), PathKey::Collection);
        assert_eq!(Verb::Update.method(), HttpMethod::Put);
        assert_eq!(Verb::Update.path_key(), PathKey::Item);
        assert_eq!(Verb::Remove.method(), HttpMethod::Delete);
        assert_eq!(Verb::Remove.path_key(), PathKey::Item);
    }

    #[test]
    fn test_path_keys() {
        assert_eq!(PathKey::Collection.for_resource("users"), "/users");
        assert_eq!(PathKey::Item.for_resource("users"), "/users/{resourceId}");
    }

    #[test]
    fn test_find_defaults() {
        let synthesis = synthesize(Verb::Find, DocsFragment::new(), defaults(Verb::Find));
        let operation = synthesis.operation;

        assert_eq!(
            operation.description,
            "Retrieves a list of all resources from the service."
        );
        assert!(operation.parameters.is_empty());
        assert!(operation.responses.is_empty());
        assert_eq!(operation.summary, "");
        assert_eq!(operation.tags, vec!["users".to_string()]);
        assert_eq!(operation.consumes, json_media());
        assert_eq!(operation.produces, json_media());
        assert_eq!(operation.security, token_security());
        assert_eq!(operation.security_definitions, json!([]));
    }

    #[test]
    fn test_get_defaults() {
        let operation = synthesize(Verb::Get, DocsFragment::new(), defaults(Verb::Get)).operation;

        assert_eq!(operation.parameters.len(), 1);
        let id = &operation.parameters[0];
        assert_eq!(id.name.as_deref(), Some("resourceId"));
        assert_eq!(id.location.as_deref(), Some("path"));
        assert_eq!(id.param_type.as_deref(), Some("integer"));
        assert_eq!(id.required, Some(true));
        assert_eq!(id.description.as_deref(), Some("ID of users to return"));

        let ok = &operation.responses["200"];
        assert_eq!(ok.description.as_deref(), Some("successful operation"));
        assert_eq!(ok.schema, Some(json!({"$ref": "#/definitions/users"})));
    }

    #[test]
    fn test_create_defaults() {
        let operation =
            synthesize(Verb::Create, DocsFragment::new(), defaults(Verb::Create)).operation;

        assert_eq!(operation.description, "Creates a new resource with data.");
        assert_eq!(operation.parameters, vec![Parameter::body("users")]);
        assert_eq!(
            serde_json::to_value(&operation.parameters[0]).unwrap(),
            json!({
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {"$ref": "#/definitions/users"}
            })
        );
    }

    #[test]
    fn test_update_defaults() {
        let operation =
            synthesize(Verb::Update, DocsFragment::new(), defaults(Verb::Update)).operation;

        assert_eq!(
            operation.description,
            "Updates the resource identified by id using data."
        );
        assert_eq!(operation.parameters.len(), 2);
        assert_eq!(
            operation.parameters[0].description.as_deref(),
            Some("ID of users to update")
        );
        assert_eq!(operation.parameters[1].location.as_deref(), Some("body"));
    }

    #[test]
    fn test_remove_defaults() {
        let operation =
            synthesize(Verb::Remove, DocsFragment::new(), defaults(Verb::Remove)).operation;

        assert_eq!(operation.description, "Removes the resource with id.");
        assert_eq!(operation.parameters, vec![Parameter::resource_id("users", "return")]);
        assert!(operation.responses.is_empty());
    }

    #[test]
    fn test_author_fields_win() {
        let fragment = DocsFragment::new().with(
            "get",
            json!({
                "description": "Fetch one user",
                "summary": "Get user",
                "parameters": [],
                "tags": ["accounts"],
                "operationId": "getUser"
            }),
        );

        let operation = synthesize(Verb::Get, fragment, defaults(Verb::Get)).operation;

        assert_eq!(operation.description, "Fetch one user");
        assert_eq!(operation.summary, "Get user");
        assert!(operation.parameters.is_empty());
        assert_eq!(operation.tags, vec!["accounts".to_string()]);
        assert_eq!(operation.extra.get("operationId"), Some(&json!("getUser")));
        // Untouched fields keep their defaults
        assert!(operation.responses.contains_key("200"));
        assert_eq!(operation.produces, json_media());
    }

    #[test]
    fn test_ref_parameters_and_responses_pass_through() {
        let parameters = json!([{"$ref": "#/parameters/limit"}]);
        let responses = json!({"200": {"$ref": "#/responses/UserList"}});
        let fragment = DocsFragment::new().with(
            "find",
            json!({"parameters": parameters.clone(), "responses": responses.clone()}),
        );

        let operation = synthesize(Verb::Find, fragment, defaults(Verb::Find)).operation;

        assert_eq!(
            serde_json::to_string(&operation.parameters).unwrap(),
            r##"[{"$ref":"#/parameters/limit"}]"##
        );
        assert_eq!(
            serde_json::to_string(&operation.responses).unwrap(),
            r##"{"200":{"$ref":"#/responses/UserList"}}"##
        );
        let value = serde_json::to_value(&operation).unwrap();
        assert_eq!(value["parameters"], parameters);
        assert_eq!(value["responses"], responses);
    }

    #[test]
    fn test_author_security_is_replaced() {
        let fragment = DocsFragment::new().with("find", json!({"security": [{"oauth": ["read"]}]}));

        let operation = synthesize(Verb::Find, fragment, defaults(Verb::Find)).operation;

        assert_eq!(operation.security, token_security());
        assert!(!operation.extra.contains_key("security"));
    }

    #[test]
    fn test_verb_key_removed_from_remaining() {
        let fragment = DocsFragment::new()
            .with("find", json!({"description": "List"}))
            .with("get", json!({"description": "One"}))
            .with("x-owner", json!("team-a"));

        let synthesis = synthesize(Verb::Find, fragment, defaults(Verb::Find));

        assert!(!synthesis.remaining.contains_key("find"));
        assert!(synthesis.remaining.contains_key("get"));
        assert!(synthesis.remaining.contains_key("x-owner"));
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let fragment = DocsFragment::new().with(
            "find",
            json!({"description": 42, "tags": ["ok"], "parameters": "nope"}),
        );

        let synthesis = synthesize(Verb::Find, fragment, defaults(Verb::Find));

        assert_eq!(
            synthesis.operation.description,
            "Retrieves a list of all resources from the service."
        );
        assert_eq!(synthesis.operation.tags, vec!["ok".to_string()]);
        assert!(synthesis.operation.parameters.is_empty());
        assert_eq!(synthesis.warnings.len(), 2);
    }

    #[test]
    fn test_non_object_override_is_ignored() {
        let fragment = DocsFragment::new().with("remove", json!("not an operation"));

        let synthesis = synthesize(Verb::Remove, fragment, defaults(Verb::Remove));

        assert_eq!(synthesis.operation.description, "Removes the resource with id.");
        assert_eq!(synthesis.warnings.len(), 1);
        assert!(synthesis.remaining.is_empty());
    }

    #[test]
    fn test_empty_template_yields_empty_fields() {
        let operation = synthesize(Verb::Find, DocsFragment::new(), PartialOperation::default())
            .operation;

        assert_eq!(operation.description, "");
        assert!(operation.tags.is_empty());
        assert!(operation.consumes.is_empty());
        assert_eq!(operation.security, token_security());
    }

    #[test]
    fn test_capabilities_from_yaml() {
        let capabilities: Capabilities = serde_yaml::from_str("[find, remove]").unwrap();

        assert!(capabilities.contains(Verb::Find));
        assert!(capabilities.contains(Verb::Remove));
        assert!(!capabilities.contains(Verb::Get));
        assert_eq!(Capabilities::all().iter().count(), 5);
    }
}
