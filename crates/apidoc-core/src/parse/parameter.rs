use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{MediaType, json_schema};
use super::schema::{Schema, SchemaOrRef, TypeSet};

/// Parameter location. `formData` and `body` only occur in Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
    FormData,
    Body,
}

/// An API parameter. OpenAPI 3.x parameters describe their value with
/// `schema` or a single-entry `content` map; Swagger 2.0 non-body parameters inline `type`, `format`,
/// `items` and `enum` next to `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

/// How a parameter declares its value type, decided once per parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterShape<'a> {
    /// OpenAPI 3.x style `schema` sub-object (also 2.0 `in: body`).
    Schema(&'a SchemaOrRef),
    /// OpenAPI 3.x `content` map; the JSON entry, else the first one.
    Content(&'a SchemaOrRef),
    /// Swagger 2.0 style inline keywords, gathered into a schema.
    Inline(Schema),
}

impl Parameter {
    pub fn shape(&self) -> ParameterShape<'_> {
        if let Some(schema) = &self.schema {
            return ParameterShape::Schema(schema);
        }
        let content = json_schema(&self.content)
            .or_else(|| self.content.values().find_map(|mt| mt.schema.as_ref()));
        match content {
            Some(schema) => ParameterShape::Content(schema),
            None => ParameterShape::Inline(Schema {
                schema_type: self.param_type.clone(),
                format: self.format.clone(),
                items: self.items.clone(),
                enum_values: self.enum_values.clone(),
                default_value: self.default_value.clone(),
                ..Schema::default()
            }),
        }
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}
