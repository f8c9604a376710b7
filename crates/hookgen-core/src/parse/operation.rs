use indexmap::IndexMap;
use serde::Deserialize;

use super::parameter::Parameter;
use super::reference::RefOr;
use super::schema::SchemaOrRef;

pub type ParameterOrRef = RefOr<Parameter>;
pub type RequestBodyOrRef = RefOr<RequestBody>;
pub type ResponseOrRef = RefOr<Response>;

/// A path item. Method entries are kept raw in `entries` (alongside any
/// extension keys) so each one can be decoded and reported independently.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(flatten)]
    pub entries: IndexMap<String, serde_json::Value>,
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody", default)]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default)]
    pub deprecated: Option<bool>,
}

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// A response definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A media type object.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<SchemaOrRef>,
}

/// Pick the preferred media type: JSON first, then the first declared.
pub fn preferred_media_type(
    content: &IndexMap<String, MediaType>,
) -> Option<(&String, &MediaType)> {
    content
        .get_key_value("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(ct, _)| ct.ends_with("+json") || ct.ends_with("/json"))
        })
        .or_else(|| content.first())
}
