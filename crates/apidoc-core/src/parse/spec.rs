use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::{PathItem, SecurityRequirement};
use super::parameter::ParameterOrRef;
use super::response::ResponseOrRef;
use super::schema::SchemaOrRef;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level API description. One type covers both dialects: OpenAPI 3.x
/// documents fill `openapi` and `components`, Swagger 2.0 documents fill
/// `swagger`, `definitions` and the top-level `parameters`/`responses`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,

    #[serde(default)]
    pub info: Info,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl OpenApiSpec {
    pub fn is_swagger2(&self) -> bool {
        self.openapi.is_none() && self.swagger.is_some()
    }

    /// Standalone schemas: `components.schemas` for 3.x, `definitions` for 2.0.
    /// A document carrying both yields the 3.x table first.
    pub fn schema_table(&self) -> impl Iterator<Item = (&String, &SchemaOrRef)> {
        self.components
            .iter()
            .flat_map(|c| c.schemas.iter())
            .chain(self.definitions.iter())
    }
}
