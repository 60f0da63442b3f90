use log::{debug, info, warn};

use crate::config::ApidocConfig;
use crate::docs::Documentation;
use crate::error::SynthesisError;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::OpenApiSpec;

use super::heuristics::Heuristics;
use super::model_extractor::{ModelExtractor, ModelRegistry};
use super::operation_builder::OperationBuilder;

/// Tag given to operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// Options controlling synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    pub heuristics: Heuristics,
    pub default_tag: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            heuristics: Heuristics::default(),
            default_tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl From<&ApidocConfig> for SynthesisOptions {
    fn from(config: &ApidocConfig) -> Self {
        let h = &config.heuristics;
        Self {
            heuristics: Heuristics {
                pagination_params: h.pagination_params.clone(),
                pagination_fields: h.pagination_fields.clone(),
                record_fields: h.record_fields.clone(),
                inherit_global_security: h.inherit_global_security,
            },
            default_tag: config.default_tag.clone(),
        }
    }
}

/// Synthesize API and model records from a parsed document with default options.
pub fn synthesize(spec: &OpenApiSpec) -> Result<Documentation, SynthesisError> {
    synthesize_with_options(spec, &SynthesisOptions::default())
}

/// Synthesize API and model records from a parsed document.
///
/// Paths are visited in declared order and, within a path, methods in the
/// order GET, POST, PUT, PATCH, DELETE. Each operation yields one API record
/// plus its query, request, response and record models; schemas from the
/// component table that were not already emitted follow as standalone
/// models. Unresolvable references degrade to empty schemas.
pub fn synthesize_with_options(
    spec: &OpenApiSpec,
    options: &SynthesisOptions,
) -> Result<Documentation, SynthesisError> {
    let mut operations = OperationBuilder::new(spec, options);
    let mut models = ModelExtractor::new(RefResolver::new(spec), &options.heuristics);
    let mut registry = ModelRegistry::new();
    let mut apis = Vec::new();

    for (path, item) in &spec.paths {
        for (method, op) in item.operations() {
            let resolved = operations.resolve(path, item, method, op);
            debug!("documenting {method} {path} as `{}`", resolved.operation_id);

            let produced = models.operation_models(&mut registry, &resolved);
            apis.push(operations.build(apis.len() + 1, &resolved, &produced)?);
        }
    }

    models.standalone_models(&mut registry, spec);

    let docs = Documentation {
        apis,
        models: registry.into_models()?,
    };
    for defect in docs.integrity_defects() {
        warn!("{defect}");
    }
    info!(
        "synthesized {} operations and {} models for `{}`",
        docs.apis.len(),
        docs.models.len(),
        spec.info.title
    );
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeuristicsConfig;
    use crate::docs::HttpMethod;
    use crate::parse::from_yaml;

    const DOC: &str = r##"
openapi: 3.0.3
info: {title: Orders, version: "1"}
security:
  - apiKey: []
paths:
  /orders:
    delete:
      responses:
        '204': {description: gone}
    get:
      parameters:
        - {name: cursor, in: query, schema: {type: string}}
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: {type: object, properties: {orders: {type: array, items: {type: string}}}}
    options:
      responses:
        '200': {description: ok}
"##;

    #[test]
    fn test_methods_follow_fixed_order() {
        let spec = from_yaml(DOC).unwrap();
        let docs = synthesize(&spec).unwrap();
        let methods: Vec<HttpMethod> = docs.apis.iter().map(|a| a.method).collect();
        assert_eq!(methods, [HttpMethod::Get, HttpMethod::Delete]);
        assert_eq!(docs.apis[0].sequence, 1);
        assert_eq!(docs.apis[1].sequence, 2);
        assert_eq!(docs.apis[1].operation_id, "deleteOrders");
    }

    #[test]
    fn test_options_change_heuristics() {
        let spec = from_yaml(DOC).unwrap();
        let docs = synthesize(&spec).unwrap();
        assert!(!docs.apis[0].is_paginated);
        assert!(!docs.apis[0].requires_auth);
        assert_eq!(docs.apis[0].tag, "default");

        let config = ApidocConfig {
            default_tag: "orders".to_string(),
            heuristics: HeuristicsConfig {
                pagination_params: vec!["cursor".to_string()],
                inherit_global_security: true,
                ..HeuristicsConfig::default()
            },
            ..ApidocConfig::default()
        };
        let docs = synthesize_with_options(&spec, &SynthesisOptions::from(&config)).unwrap();
        assert!(docs.apis[0].is_paginated);
        assert!(docs.apis[0].requires_auth);
        assert_eq!(docs.apis[0].tag, "orders");
        assert_eq!(
            docs.apis[1].business_purpose.as_deref(),
            Some("Remove order data")
        );
    }

    #[test]
    fn test_default_options_match_default_config() {
        assert_eq!(
            SynthesisOptions::from(&ApidocConfig::default()),
            SynthesisOptions::default()
        );
    }

    #[test]
    fn test_empty_document() {
        let spec = from_yaml("openapi: 3.1.0\ninfo: {title: Empty, version: '1'}\n").unwrap();
        assert_eq!(synthesize(&spec).unwrap(), Documentation::default());
    }
}
