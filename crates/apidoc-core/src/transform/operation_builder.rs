use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::docs::{ApiDocumentation, HttpMethod, PathParameter, PropertyType};
use crate::error::SynthesisError;
use crate::parse::media_type::{accepts_json, json_schema};
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::response::is_success_status;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::heuristics::business_purpose;
use super::model_extractor::OperationModels;
use super::name_normalizer::synthesize_operation_id;
use super::property_extractor::PropertyExtractor;
use super::synthesizer::SynthesisOptions;

/// One operation with its references resolved and its inputs gathered
/// from both dialects.
#[derive(Debug, Clone)]
pub struct ResolvedOperation<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    pub operation_id: String,
    /// Path-level parameters overridden by operation-level ones.
    pub parameters: Vec<&'a Parameter>,
    /// JSON request body schema.
    pub request_body: Option<&'a SchemaOrRef>,
    /// `(status, schema)` for every 2xx response with a JSON body.
    pub success_responses: Vec<(&'a str, &'a SchemaOrRef)>,
}

/// Hands out operationIds. Declared ids are used as-is; synthesized ones
/// get a numeric suffix when they would repeat a declared or earlier id.
#[derive(Debug, Default)]
pub struct OperationIds {
    declared: HashSet<String>,
    assigned: HashSet<String>,
}

impl OperationIds {
    pub fn from_spec(spec: &OpenApiSpec) -> Self {
        let declared = spec
            .paths
            .values()
            .flat_map(|item| item.operations())
            .filter_map(|(_, op)| declared_id(op))
            .map(str::to_string)
            .collect();
        Self {
            declared,
            assigned: HashSet::new(),
        }
    }

    pub fn assign(&mut self, declared: Option<&str>, method: HttpMethod, path: &str) -> String {
        if let Some(id) = declared {
            self.assigned.insert(id.to_string());
            return id.to_string();
        }

        let base = synthesize_operation_id(method, path);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.declared.contains(&candidate) || self.assigned.contains(&candidate) {
            candidate = format!("{base}{suffix}");
            suffix += 1;
        }
        debug!("synthesized operationId `{candidate}` for {method} {path}");
        self.assigned.insert(candidate.clone());
        candidate
    }
}

/// Builds one `ApiDocumentation` record per path and method.
pub struct OperationBuilder<'a, 'o> {
    spec: &'a OpenApiSpec,
    resolver: RefResolver<'a>,
    properties: PropertyExtractor<'a>,
    options: &'o SynthesisOptions,
    ids: OperationIds,
}

impl<'a, 'o> OperationBuilder<'a, 'o> {
    pub fn new(spec: &'a OpenApiSpec, options: &'o SynthesisOptions) -> Self {
        let resolver = RefResolver::new(spec);
        Self {
            spec,
            resolver,
            properties: PropertyExtractor::new(resolver),
            options,
            ids: OperationIds::from_spec(spec),
        }
    }

    pub fn resolve(
        &mut self,
        path: &'a str,
        item: &'a PathItem,
        method: HttpMethod,
        operation: &'a Operation,
    ) -> ResolvedOperation<'a> {
        let operation_id = self.ids.assign(declared_id(operation), method, path);
        let parameters = self.effective_parameters(item, operation);
        let request_body = self.request_body(operation, &parameters);
        let success_responses = self.success_responses(operation);

        ResolvedOperation {
            path,
            method,
            operation,
            operation_id,
            parameters,
            request_body,
            success_responses,
        }
    }

    pub fn build(
        &mut self,
        sequence: usize,
        resolved: &ResolvedOperation<'a>,
        models: &OperationModels,
    ) -> Result<ApiDocumentation, SynthesisError> {
        let op = resolved.operation;
        let heuristics = &self.options.heuristics;

        let tag = op
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| self.options.default_tag.clone());
        let param_names = resolved.parameters.iter().map(|p| p.name.as_str());
        let is_paginated = models.paged_response || heuristics.is_paginated(param_names, []);
        let requires_auth =
            heuristics.requires_auth(op.security.as_deref(), self.spec.security.as_deref());
        let purpose = business_purpose(
            resolved.method.as_str(),
            &tag,
            op.summary.as_deref(),
            op.description.as_deref(),
        );

        Ok(ApiDocumentation {
            sequence,
            endpoint: resolved.path.to_string(),
            method: resolved.method,
            tag,
            operation_id: resolved.operation_id.clone(),
            summary: op.summary.clone().unwrap_or_default(),
            path_params: self.path_params(resolved)?,
            query_params_model: models.query_params.clone(),
            request_body_model: models.request_body.clone(),
            response_body_model: models.response_body.clone(),
            is_paginated,
            requires_auth,
            business_purpose: Some(purpose),
        })
    }

    fn effective_parameters(&self, item: &'a PathItem, operation: &'a Operation) -> Vec<&'a Parameter> {
        let mut merged: IndexMap<(&'a str, ParameterLocation), &'a Parameter> = IndexMap::new();
        for node in item.parameters.iter().chain(&operation.parameters) {
            match self.resolver.resolve_parameter(node) {
                Ok(param) => {
                    merged.insert((param.name.as_str(), param.location), param);
                }
                Err(err) => warn!("{err}; skipping parameter"),
            }
        }
        merged.into_values().collect()
    }

    /// The 3.x JSON `requestBody`, else a 2.0 `in: body` parameter when the
    /// operation consumes JSON (an empty `consumes` list counts as JSON).
    fn request_body(
        &self,
        operation: &'a Operation,
        parameters: &[&'a Parameter],
    ) -> Option<&'a SchemaOrRef> {
        if let Some(node) = &operation.request_body {
            return match self.resolver.resolve_request_body(node) {
                Ok(body) => json_schema(&body.content),
                Err(err) => {
                    warn!("{err}; ignoring request body");
                    None
                }
            };
        }

        let body = parameters
            .iter()
            .copied()
            .find(|p| p.location == ParameterLocation::Body)?;
        let consumes = operation
            .consumes
            .as_deref()
            .unwrap_or(self.spec.consumes.as_slice());
        if !accepts_json(consumes) {
            return None;
        }
        body.schema.as_ref()
    }

    /// 2xx responses with a JSON body; a 2.0 response `schema` needs the
    /// operation to produce JSON, with the same rule as `consumes`.
    fn success_responses(&self, operation: &'a Operation) -> Vec<(&'a str, &'a SchemaOrRef)> {
        let produces = operation
            .produces
            .as_deref()
            .unwrap_or(self.spec.produces.as_slice());
        operation
            .responses
            .iter()
            .filter(|(status, _)| is_success_status(status))
            .filter_map(|(status, node)| match self.resolver.resolve_response(node) {
                Ok(response) => response.json_schema(produces).map(|schema| (status.as_str(), schema)),
                Err(err) => {
                    warn!("{err}; ignoring response {status}");
                    None
                }
            })
            .collect()
    }

    /// `{name}` segments of the path, typed from the matching declared path
    /// parameter or defaulting to a required string.
    fn path_params(&mut self, resolved: &ResolvedOperation<'a>) -> Result<Option<String>, SynthesisError> {
        let mut params = IndexMap::new();
        for name in template_params(resolved.path) {
            let declared = resolved
                .parameters
                .iter()
                .copied()
                .find(|p| p.location == ParameterLocation::Path && p.name == name);
            let param = match declared {
                Some(param) => PathParameter {
                    param_type: self.properties.parameter_property(param).property_type,
                    required: param.required,
                    description: param.description.clone(),
                },
                None => PathParameter {
                    param_type: PropertyType::String,
                    required: true,
                    description: None,
                },
            };
            params.insert(name.to_string(), param);
        }

        if params.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&params)?))
    }
}

fn declared_id(operation: &Operation) -> Option<&str> {
    operation
        .operation_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
}

/// Names inside `{}` in a path template, in order.
fn template_params(path: &str) -> impl Iterator<Item = &str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}'))
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
}
