//! Flat documents submitted to a search index.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// One record projected for the index: its identifier plus named fields in
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    fields: Vec<(String, Json)>,
}

impl IndexDocument {
    /// Create a document with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing any earlier value under the same name but
    /// keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Json>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Json> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Json)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Render as a JSON object with `id` first.
    pub fn to_json(&self) -> Json {
        let mut map = serde_json::Map::new();
        map.insert("id".into(), Json::String(self.id.clone()));
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.clone());
        }
        Json::Object(map)
    }
}
