use indexmap::IndexMap;
use serde::Deserialize;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub version: String,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Reusable definitions. Entries stay as raw JSON so that a single malformed
/// component is reported on its own instead of rejecting the document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, serde_json::Value>,

    #[serde(default)]
    pub parameters: IndexMap<String, serde_json::Value>,

    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, serde_json::Value>,

    #[serde(default)]
    pub responses: IndexMap<String, serde_json::Value>,
}

/// Top-level OpenAPI 3.x document.
///
/// Path items are kept as raw JSON and decoded one by one during
/// normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    pub info: Info,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub paths: IndexMap<String, serde_json::Value>,

    #[serde(default)]
    pub components: Option<Components>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl OpenApiSpec {
    /// Named component schemas in declaration order.
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.components.iter().flat_map(|c| c.schemas.iter())
    }
}
