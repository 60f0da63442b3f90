use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::heuristics::Heuristics;
use crate::transform::synthesizer::DEFAULT_TAG;

/// Top-level project configuration loaded from `.apidoc.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApidocConfig {
    pub input: String,
    pub format: OutputFormat,
    pub default_tag: String,
    pub heuristics: HeuristicsConfig,
}

impl Default for ApidocConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            format: OutputFormat::Json,
            default_tag: DEFAULT_TAG.to_string(),
            heuristics: HeuristicsConfig::default(),
        }
    }
}

/// Serialization of the synthesized records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Name tables used to classify operations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub pagination_params: Vec<String>,
    pub pagination_fields: Vec<String>,
    pub record_fields: Vec<String>,
    pub inherit_global_security: bool,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        let Heuristics {
            pagination_params,
            pagination_fields,
            record_fields,
            inherit_global_security,
        } = Heuristics::default();
        Self {
            pagination_params,
            pagination_fields,
            record_fields,
            inherit_global_security,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apidoc.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApidocConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ApidocConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apidoc configuration
input: openapi.yaml
format: json          # json | yaml
default_tag: default  # tag for operations that declare none

heuristics:
  # query parameters that mark an operation as paginated
  pagination_params: [page, offset, limit, size, pageSize, pageNumber]
  # response fields that mark a body as a page envelope
  pagination_fields: [totalCount, totalPages, page, pageSize, hasNext, hasPrevious]
  # envelope fields searched, in order, for the record array
  record_fields: [data, records, items, results]
  # operations without `security` inherit the document-level requirements
  inherit_global_security: false
"#
}
