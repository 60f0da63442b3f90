use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// The media type whose schemas become request and response models.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A media type object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

/// Whether a Swagger 2.0 `consumes`/`produces` list admits JSON.
/// An empty list counts as JSON.
pub fn accepts_json(media_types: &[String]) -> bool {
    media_types.is_empty() || media_types.iter().any(|m| m == JSON_MEDIA_TYPE)
}

/// Schema of the `application/json` entry of a content map, if any.
pub fn json_schema(content: &IndexMap<String, MediaType>) -> Option<&SchemaOrRef> {
    content
        .get(JSON_MEDIA_TYPE)
        .and_then(|mt| mt.schema.as_ref())
}
