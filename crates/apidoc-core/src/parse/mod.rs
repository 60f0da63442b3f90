pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Parse an OpenAPI (3.x) or Swagger (2.0) document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI (3.x) or Swagger (2.0) document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    match (spec.openapi.as_deref(), spec.swagger.as_deref()) {
        (Some(v), _) if v.starts_with("3.") => Ok(()),
        (None, Some(v)) if v.starts_with("2.") => Ok(()),
        (Some(v), _) | (None, Some(v)) => Err(ParseError::UnsupportedVersion(v.to_string())),
        (None, None) => Err(ParseError::MissingField("openapi".to_string())),
    }
}
