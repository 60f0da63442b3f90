use indexmap::IndexMap;
use log::debug;

use crate::docs::{ModelDocumentation, PropertyType};
use crate::error::SynthesisError;
use crate::parse::parameter::{Parameter, ParameterLocation};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::heuristics::Heuristics;
use super::name_normalizer::model_name;
use super::operation_builder::ResolvedOperation;
use super::property_extractor::{PropertyExtractor, SchemaShape};
use super::type_mapper::schema_property_type;

/// A registered model waiting for its sequence number.
#[derive(Debug, Clone, PartialEq)]
struct PendingModel {
    shape: SchemaShape,
    description: Option<String>,
    used_in_operations: Vec<String>,
}

/// Models emitted during one synthesis run, keyed by name in discovery order.
///
/// The first registration of a name wins; later registrations of the same
/// name only record the operation as another user.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, PendingModel>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Register `name`, building its shape and description only when the
    /// name is new. Returns whether a model was added.
    pub fn register<F>(&mut self, name: &str, operation_id: Option<&str>, build: F) -> bool
    where
        F: FnOnce() -> (SchemaShape, Option<String>),
    {
        if let Some(existing) = self.models.get_mut(name) {
            if let Some(op) = operation_id {
                if !existing.used_in_operations.iter().any(|used| used == op) {
                    existing.used_in_operations.push(op.to_string());
                }
            }
            debug!("model `{name}` already emitted; reusing it");
            return false;
        }

        let (shape, description) = build();
        self.models.insert(
            name.to_string(),
            PendingModel {
                shape,
                description,
                used_in_operations: operation_id.map(|op| vec![op.to_string()]).unwrap_or_default(),
            },
        );
        true
    }

    /// Serialize every model, numbering them from 1 in discovery order.
    pub fn into_models(self) -> Result<Vec<ModelDocumentation>, SynthesisError> {
        self.models
            .into_iter()
            .enumerate()
            .map(|(index, (model_name, model))| {
                let required = if model.shape.required.is_empty() {
                    None
                } else {
                    Some(serde_json::to_string(&model.shape.required)?)
                };
                let used_in_operations = (!model.used_in_operations.is_empty())
                    .then(|| model.used_in_operations.join(","));

                Ok(ModelDocumentation {
                    sequence: index + 1,
                    model_name,
                    properties: serde_json::to_string(&model.shape.properties)?,
                    required,
                    description: model.description,
                    used_in_operations,
                })
            })
            .collect()
    }
}

/// Names of the models one operation produced or reused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationModels {
    pub query_params: Option<String>,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub record: Option<String>,
    /// Some success response body is a page envelope.
    pub paged_response: bool,
}

/// Derives query-parameter, request, response and record models from
/// operations, and standalone models from the schema table.
pub struct ModelExtractor<'a, 'h> {
    properties: PropertyExtractor<'a>,
    heuristics: &'h Heuristics,
}

impl<'a, 'h> ModelExtractor<'a, 'h> {
    pub fn new(resolver: RefResolver<'a>, heuristics: &'h Heuristics) -> Self {
        Self {
            properties: PropertyExtractor::new(resolver),
            heuristics,
        }
    }

    pub fn operation_models(
        &mut self,
        registry: &mut ModelRegistry,
        op: &ResolvedOperation<'a>,
    ) -> OperationModels {
        let op_id = op.operation_id.as_str();
        let mut models = OperationModels {
            query_params: self.query_params_model(registry, op_id, &op.parameters),
            ..OperationModels::default()
        };

        if let Some(body) = op.request_body {
            let name = model_name(op_id, "InData");
            registry.register(&name, Some(op_id), || {
                let description = self
                    .schema_description(body)
                    .unwrap_or_else(|| format!("Request body for {op_id}"));
                (self.properties.extract(body), Some(description))
            });
            models.request_body = Some(name);
        }

        for &(status, schema) in &op.success_responses {
            let name = model_name(op_id, "OutData");
            registry.register(&name, Some(op_id), || {
                let description = self
                    .schema_description(schema)
                    .unwrap_or_else(|| format!("Response body for {op_id} ({status})"));
                (self.properties.extract(schema), Some(description))
            });
            models.response_body.get_or_insert(name);

            let declared = self.properties.declared_properties(schema);
            if !self.heuristics.is_page_envelope(declared.keys().copied()) {
                continue;
            }
            models.paged_response = true;

            if let Some(items) = self.record_items(&declared) {
                let name = model_name(op_id, "RecordData");
                registry.register(&name, Some(op_id), || {
                    let description = self
                        .schema_description(items)
                        .unwrap_or_else(|| format!("Record item returned by {op_id}"));
                    (self.properties.extract(items), Some(description))
                });
                models.record.get_or_insert(name);
            }
        }

        models
    }

    /// Emit every component/definition schema whose `<Name>Data` model has
    /// not been produced yet.
    pub fn standalone_models(&mut self, registry: &mut ModelRegistry, spec: &'a OpenApiSpec) {
        for (name, schema) in spec.schema_table() {
            let model = model_name(name, "Data");
            if registry.contains(&model) {
                debug!("standalone model `{model}` shadowed by an earlier model");
                continue;
            }
            registry.register(&model, None, || {
                let description = self
                    .schema_description(schema)
                    .unwrap_or_else(|| format!("{name} entity model"));
                (self.properties.extract(schema), Some(description))
            });
        }
    }

    fn query_params_model(
        &mut self,
        registry: &mut ModelRegistry,
        op_id: &str,
        parameters: &[&'a Parameter],
    ) -> Option<String> {
        let query: Vec<&'a Parameter> = parameters
            .iter()
            .copied()
            .filter(|p| p.location == ParameterLocation::Query)
            .collect();
        if query.is_empty() {
            return None;
        }

        let name = model_name(op_id, "QueryParams");
        registry.register(&name, Some(op_id), || {
            let mut shape = SchemaShape::default();
            for param in query {
                shape
                    .properties
                    .insert(param.name.clone(), self.properties.parameter_property(param));
                if param.required && !shape.required.contains(&param.name) {
                    shape.required.push(param.name.clone());
                }
            }
            (shape, Some(format!("Query parameters for {op_id}")))
        });
        Some(name)
    }

    /// Items schema of the first array-typed record field of a page
    /// envelope, when those items are a named or object schema.
    fn record_items(
        &self,
        declared: &IndexMap<&'a str, &'a SchemaOrRef>,
    ) -> Option<&'a SchemaOrRef> {
        let resolver = self.properties.resolver();
        for field in self.heuristics.record_fields() {
            let Some(&node) = declared.get(field) else {
                continue;
            };
            let Ok(schema) = resolver.resolve_schema(node) else {
                continue;
            };
            if !schema.is_array() {
                continue;
            }
            let items = schema.items.as_deref()?;
            let schema_typed = match items {
                SchemaOrRef::Ref { .. } => true,
                SchemaOrRef::Schema(inline) => {
                    schema_property_type(inline) == PropertyType::Object
                }
            };
            return schema_typed.then_some(items);
        }
        None
    }

    fn schema_description(&self, node: &'a SchemaOrRef) -> Option<String> {
        self.properties
            .resolver()
            .resolve_schema(node)
            .ok()
            .and_then(|schema| schema.description.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::Property;
    use crate::parse::from_yaml;
    use crate::transform::SynthesisOptions;
    use crate::transform::operation_builder::OperationBuilder;

    const DOC: &str = r##"
openapi: 3.0.3
info: {title: Widgets, version: "1"}
paths:
  /widgets:
    get:
      operationId: listWidgets
      parameters:
        - {name: page, in: query, schema: {type: integer}}
        - {name: q, in: query, required: true, schema: {type: string}}
        - {name: X-Trace, in: header, schema: {type: string}}
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  data:
                    type: array
                    items: {$ref: '#/components/schemas/Widget'}
                  totalCount: {type: integer}
        '201':
          description: also ok
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Widget'}
    post:
      operationId: createWidget
      requestBody:
        content:
          application/json:
            schema: {$ref: '#/components/schemas/Widget'}
      responses:
        '201':
          description: created
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Widget'}
        '400':
          description: bad
          content:
            application/json:
              schema: {type: object, properties: {error: {type: string}}}
  /tags:
    get:
      operationId: listTags
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  data: {type: array, items: {type: string}}
                  hasNext: {type: boolean}
components:
  schemas:
    Widget:
      type: object
      description: A widget
      required: [id]
      properties:
        id: {type: string}
        size: {type: number}
    CreateWidgetInData:
      type: object
"##;

    fn collect(spec: &OpenApiSpec) -> (Vec<OperationModels>, ModelRegistry) {
        let options = SynthesisOptions::default();
        let mut builder = OperationBuilder::new(spec, &options);
        let mut extractor = ModelExtractor::new(RefResolver::new(spec), &options.heuristics);
        let mut registry = ModelRegistry::new();
        let mut produced = Vec::new();
        for (path, item) in &spec.paths {
            for (method, op) in item.operations() {
                let resolved = builder.resolve(path, item, method, op);
                produced.push(extractor.operation_models(&mut registry, &resolved));
            }
        }
        extractor.standalone_models(&mut registry, spec);
        (produced, registry)
    }

    #[test]
    fn test_operation_model_names() {
        let spec = from_yaml(DOC).unwrap();
        let (produced, _) = collect(&spec);

        assert_eq!(
            produced[0],
            OperationModels {
                query_params: Some("ListWidgetsQueryParams".to_string()),
                request_body: None,
                response_body: Some("ListWidgetsOutData".to_string()),
                record: Some("ListWidgetsRecordData".to_string()),
                paged_response: true,
            }
        );
        assert_eq!(produced[1].request_body.as_deref(), Some("CreateWidgetInData"));
        assert_eq!(produced[1].response_body.as_deref(), Some("CreateWidgetOutData"));
        assert!(!produced[1].paged_response);
    }

    #[test]
    fn test_primitive_records_are_not_models() {
        let spec = from_yaml(DOC).unwrap();
        let (produced, registry) = collect(&spec);
        assert!(produced[2].paged_response);
        assert_eq!(produced[2].record, None);
        assert!(!registry.contains("ListTagsRecordData"));
    }

    #[test]
    fn test_query_params_model_contents() {
        let spec = from_yaml(DOC).unwrap();
        let (_, registry) = collect(&spec);
        let models = registry.into_models().unwrap();
        let query = models
            .iter()
            .find(|m| m.model_name == "ListWidgetsQueryParams")
            .unwrap();

        let props = query.property_map().unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), ["page", "q"]);
        assert_eq!(props["page"], Property::new("page", PropertyType::Number));
        assert_eq!(query.required.as_deref(), Some(r#"["q"]"#));
        assert_eq!(query.description.as_deref(), Some("Query parameters for listWidgets"));
        assert_eq!(query.used_in_operations.as_deref(), Some("listWidgets"));
    }

    #[test]
    fn test_first_success_response_names_the_model() {
        let spec = from_yaml(DOC).unwrap();
        let (_, registry) = collect(&spec);
        let models = registry.into_models().unwrap();
        let out = models
            .iter()
            .find(|m| m.model_name == "ListWidgetsOutData")
            .unwrap();
        assert_eq!(
            out.property_map().unwrap().keys().collect::<Vec<_>>(),
            ["data", "totalCount"]
        );
        assert_eq!(
            out.description.as_deref(),
            Some("Response body for listWidgets (200)")
        );
    }

    #[test]
    fn test_record_model_uses_item_schema() {
        let spec = from_yaml(DOC).unwrap();
        let (_, registry) = collect(&spec);
        let models = registry.into_models().unwrap();
        let record = models
            .iter()
            .find(|m| m.model_name == "ListWidgetsRecordData")
            .unwrap();
        assert_eq!(
            record.property_map().unwrap().keys().collect::<Vec<_>>(),
            ["id", "size"]
        );
        assert_eq!(record.description.as_deref(), Some("A widget"));
        assert_eq!(record.required.as_deref(), Some(r#"["id"]"#));
    }

    #[test]
    fn test_standalone_models_and_shadowing() {
        let spec = from_yaml(DOC).unwrap();
        let (_, registry) = collect(&spec);
        let models = registry.into_models().unwrap();

        let widget = models.iter().find(|m| m.model_name == "WidgetData").unwrap();
        assert_eq!(widget.used_in_operations, None);
        assert_eq!(widget.description.as_deref(), Some("A widget"));

        // `CreateWidgetInData` + `Data` does not collide, so it is emitted too.
        let shadow = models
            .iter()
            .find(|m| m.model_name == "CreateWidgetInDataData")
            .unwrap();
        assert_eq!(
            shadow.description.as_deref(),
            Some("CreateWidgetInData entity model")
        );
    }

    #[test]
    fn test_sequences_follow_discovery_order() {
        let spec = from_yaml(DOC).unwrap();
        let (_, registry) = collect(&spec);
        let models = registry.into_models().unwrap();
        let names: Vec<&str> = models.iter().map(|m| m.model_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "ListWidgetsQueryParams",
                "ListWidgetsOutData",
                "ListWidgetsRecordData",
                "CreateWidgetInData",
                "CreateWidgetOutData",
                "ListTagsOutData",
                "WidgetData",
                "CreateWidgetInDataData",
            ]
        );
        let sequences: Vec<usize> = models.iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_reused_name_records_every_user() {
        let mut registry = ModelRegistry::new();
        assert!(registry.register("PetData", Some("listPets"), || {
            (SchemaShape::default(), None)
        }));
        assert!(!registry.register("PetData", Some("getPet"), || {
            panic!("shape must not be rebuilt")
        }));
        registry.register("PetData", Some("listPets"), || unreachable!());

        let models = registry.into_models().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].used_in_operations.as_deref(), Some("listPets,getPet"));
        assert_eq!(models[0].properties, "{}");
        assert_eq!(models[0].required, None);
    }
}
