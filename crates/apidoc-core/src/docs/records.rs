use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// HTTP methods that produce documentation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Traversal order within a path item.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented endpoint (path + method).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocumentation {
    pub sequence: usize,
    pub endpoint: String,
    pub method: HttpMethod,
    pub tag: String,
    pub operation_id: String,
    pub summary: String,
    /// JSON object of `PathParameter`s keyed by parameter name.
    pub path_params: Option<String>,
    pub query_params_model: Option<String>,
    pub request_body_model: Option<String>,
    pub response_body_model: Option<String>,
    pub is_paginated: bool,
    pub requires_auth: bool,
    pub business_purpose: Option<String>,
}

impl ApiDocumentation {
    pub fn path_param_map(&self) -> Result<IndexMap<String, PathParameter>, serde_json::Error> {
        match &self.path_params {
            Some(raw) => serde_json::from_str(raw),
            None => Ok(IndexMap::new()),
        }
    }
}

/// One named data shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocumentation {
    pub sequence: usize,
    pub model_name: String,
    /// JSON object of `Property` values keyed by property name.
    pub properties: String,
    /// JSON array of required property names; absent when none are required.
    pub required: Option<String>,
    pub description: Option<String>,
    /// Comma-joined operationIds.
    pub used_in_operations: Option<String>,
}

impl ModelDocumentation {
    pub fn property_map(&self) -> Result<IndexMap<String, Property>, serde_json::Error> {
        serde_json::from_str(&self.properties)
    }

    pub fn required_names(&self) -> Result<Vec<String>, serde_json::Error> {
        match &self.required {
            Some(raw) => serde_json::from_str(raw),
            None => Ok(Vec::new()),
        }
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.used_in_operations
            .as_deref()
            .into_iter()
            .flat_map(|ops| ops.split(','))
            .filter(|op| !op.is_empty())
    }
}

/// Output type of a documented property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Number,
    Boolean,
    Date,
    String,
    Array,
    Object,
    Any,
}

/// A property nested inside a model's property map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,

    #[serde(rename = "type")]
    pub property_type: PropertyType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Element type of an `array` property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    /// Fields of an `object` property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Property>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Set instead of `properties` when the schema is already being expanded
    /// higher up (a cycle); names the schema.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            description: None,
            enum_values: None,
            example: None,
            items: None,
            properties: None,
            required: None,
            reference: None,
        }
    }
}

/// Value type of the serialized `pathParams` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathParameter {
    #[serde(rename = "type")]
    pub param_type: PropertyType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&HttpMethod::Patch).unwrap(), "\"PATCH\"");
    }

    #[test]
    fn test_property_serialization_skips_empty_fields() {
        let mut prop = Property::new("status", PropertyType::String);
        prop.enum_values = Some(vec!["on".into(), "off".into()]);
        insta::assert_snapshot!(
            serde_json::to_string(&prop).unwrap(),
            @r#"{"name":"status","type":"string","enum":["on","off"]}"#
        );
    }

    #[test]
    fn test_operations_split() {
        let model = ModelDocumentation {
            sequence: 1,
            model_name: "PetData".to_string(),
            properties: "{}".to_string(),
            required: None,
            description: None,
            used_in_operations: Some("listPets,getPet".to_string()),
        };
        assert_eq!(model.operations().collect::<Vec<_>>(), ["listPets", "getPet"]);
        assert!(model.property_map().unwrap().is_empty());
        assert!(model.required_names().unwrap().is_empty());
    }
}
