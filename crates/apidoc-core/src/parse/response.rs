use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{MediaType, accepts_json, json_schema};
use super::schema::SchemaOrRef;

/// A response definition. OpenAPI 3.x responses carry a `content` map;
/// Swagger 2.0 responses carry their body `schema` directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

impl Response {
    /// The JSON body schema, from either dialect. A Swagger 2.0 `schema`
    /// counts only when the effective `produces` list admits JSON.
    pub fn json_schema(&self, produces: &[String]) -> Option<&SchemaOrRef> {
        json_schema(&self.content)
            .or_else(|| self.schema.as_ref().filter(|_| accepts_json(produces)))
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

/// Whether a response key denotes success (`200`, `201`, `2XX`, ...).
pub fn is_success_status(status: &str) -> bool {
    status.starts_with('2')
}
