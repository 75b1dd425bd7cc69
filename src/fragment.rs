//! Author-supplied documentation fragments.
//!
//! A resource author may hand over a free-form JSON object alongside the resource. Known
//! keys (`definition`, `definitions`, `description`, `externalDocs` and one key per verb)
//! feed the generated document; whatever is left after synthesis becomes the resource's
//! standalone document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the resource's own schema.
pub const DEFINITION_KEY: &str = "definition";
/// Key holding auxiliary schemas merged into the global definitions.
pub const DEFINITIONS_KEY: &str = "definitions";
/// Key holding the tag description.
pub const DESCRIPTION_KEY: &str = "description";
/// Key holding the tag's external docs.
pub const EXTERNAL_DOCS_KEY: &str = "externalDocs";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocsFragment(Map<String, Value>);

impl DocsFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an arbitrary JSON value. Anything but an object yields an empty fragment.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn definition(&self) -> Option<&Value> {
        self.get(DEFINITION_KEY)
    }

    pub fn definitions(&self) -> Option<&Value> {
        self.get(DEFINITIONS_KEY)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(DESCRIPTION_KEY)
            .and_then(Value::as_str)
            .filter(|description| !description.is_empty())
    }

    pub fn external_docs(&self) -> Option<&Value> {
        self.get(EXTERNAL_DOCS_KEY)
    }

    /// Split off `key`, returning its value and the fragment without it.
    pub fn take(mut self, key: &str) -> (Option<Value>, DocsFragment) {
        let value = self.0.remove(key);
        (value, self)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for DocsFragment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
