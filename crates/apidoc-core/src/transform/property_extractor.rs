use indexmap::IndexMap;
use log::{debug, warn};

use crate::docs::{Property, PropertyType};
use crate::parse::parameter::{Parameter, ParameterShape};
use crate::parse::ref_resolve::{RefResolver, ref_name};
use crate::parse::schema::{Schema, SchemaOrRef};

use super::type_mapper::schema_property_type;

/// A schema flattened into its properties and required names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaShape {
    pub properties: IndexMap<String, Property>,
    pub required: Vec<String>,
}

impl SchemaShape {
    fn add_required<'s>(&mut self, names: impl IntoIterator<Item = &'s String>) {
        for name in names {
            if !self.required.contains(name) {
                self.required.push(name.clone());
            }
        }
    }
}

/// Outcome of stepping into a schema node.
enum Visit<'a> {
    /// Resolved and pushed onto the expansion stack; the caller pops it.
    Expand(&'a Schema),
    /// Already being expanded further up.
    Cycle { name: String, property_type: PropertyType },
    Unresolved,
}

/// Flattens schemas into `Property` maps, resolving `$ref`s and merging
/// `allOf` members as it descends. `oneOf`/`anyOf` are not represented.
///
/// Every schema being expanded sits on a stack; meeting one of them again
/// yields a property carrying `$ref: <name>` instead of a second expansion,
/// so self-referencing schemas terminate.
pub struct PropertyExtractor<'a> {
    resolver: RefResolver<'a>,
    stack: Vec<&'a Schema>,
}

impl<'a> PropertyExtractor<'a> {
    pub fn new(resolver: RefResolver<'a>) -> Self {
        Self {
            resolver,
            stack: Vec::new(),
        }
    }

    /// Flatten a (possibly unresolved) schema. Unresolvable references
    /// yield an empty shape.
    pub fn extract(&mut self, node: &'a SchemaOrRef) -> SchemaShape {
        match self.visit(node) {
            Visit::Expand(schema) => {
                let shape = self.flatten(schema);
                self.stack.pop();
                shape
            }
            Visit::Cycle { .. } | Visit::Unresolved => SchemaShape::default(),
        }
    }

    /// Convert one named schema node into a `Property`.
    pub fn property(&mut self, name: &str, node: &'a SchemaOrRef) -> Property {
        match self.visit(node) {
            Visit::Expand(schema) => {
                let property = self.expand_property(name, schema);
                self.stack.pop();
                property
            }
            Visit::Cycle {
                name: target,
                property_type,
            } => {
                let mut property = Property::new(name, property_type);
                property.reference = Some(target);
                property
            }
            Visit::Unresolved => Property::new(name, PropertyType::Any),
        }
    }

    /// Convert a parameter into a `Property`, reading its type from a
    /// `schema` sub-object, a `content` map, or Swagger 2.0 inline keywords.
    pub fn parameter_property(&mut self, param: &'a Parameter) -> Property {
        let mut property = match param.shape() {
            ParameterShape::Schema(node) | ParameterShape::Content(node) => {
                self.property(&param.name, node)
            }
            ParameterShape::Inline(schema) => {
                let mut property = Property::new(&param.name, schema_property_type(&schema));
                property.enum_values = enum_values(&schema);
                if let Some(items) = param.items.as_deref() {
                    property.items = Some(Box::new(self.property("items", items)));
                }
                property
            }
        };
        if param.description.is_some() {
            property.description = param.description.clone();
        }
        if param.example.is_some() {
            property.example = param.example.clone();
        }
        property
    }

    /// Top-level property nodes of a schema, own properties first and then
    /// those contributed by `allOf` members, later members winning.
    pub fn declared_properties(&mut self, node: &'a SchemaOrRef) -> IndexMap<&'a str, &'a SchemaOrRef> {
        let mut declared = IndexMap::new();
        if let Visit::Expand(schema) = self.visit(node) {
            for (name, prop) in &schema.properties {
                declared.insert(name.as_str(), prop);
            }
            for part in &schema.all_of {
                declared.extend(self.declared_properties(part));
            }
            self.stack.pop();
        }
        declared
    }

    pub fn resolver(&self) -> RefResolver<'a> {
        self.resolver
    }

    fn visit(&mut self, node: &'a SchemaOrRef) -> Visit<'a> {
        let schema = match self.resolver.resolve_schema(node) {
            Ok(schema) => schema,
            Err(err) => {
                warn!("{err}; documenting it as an empty schema");
                return Visit::Unresolved;
            }
        };

        if self.stack.iter().any(|seen| std::ptr::eq(*seen, schema)) {
            let name = match node {
                SchemaOrRef::Ref { ref_path } => ref_name(ref_path).to_string(),
                SchemaOrRef::Schema(inline) => inline.title.clone().unwrap_or_default(),
            };
            debug!("schema `{name}` is already being expanded; emitting a reference");
            return Visit::Cycle {
                name,
                property_type: schema_property_type(schema),
            };
        }

        self.stack.push(schema);
        Visit::Expand(schema)
    }

    fn flatten(&mut self, schema: &'a Schema) -> SchemaShape {
        let mut shape = SchemaShape::default();

        for (name, prop) in &schema.properties {
            let property = self.property(name, prop);
            shape.properties.insert(name.clone(), property);
        }
        shape.add_required(&schema.required);

        for part in &schema.all_of {
            let merged = self.extract(part);
            shape.properties.extend(merged.properties);
            shape.add_required(&merged.required);
        }

        shape
    }

    fn expand_property(&mut self, name: &str, schema: &'a Schema) -> Property {
        let property_type = schema_property_type(schema);
        let mut property = Property::new(name, property_type);
        property.description = schema.description.clone();
        property.enum_values = enum_values(schema);
        property.example = schema.example.clone();

        match property_type {
            PropertyType::Array => {
                if let Some(items) = schema.items.as_deref() {
                    property.items = Some(Box::new(self.property("items", items)));
                }
            }
            PropertyType::Object => {
                let shape = self.flatten(schema);
                if !shape.properties.is_empty() {
                    property.properties = Some(shape.properties);
                }
                if !shape.required.is_empty() {
                    property.required = Some(shape.required);
                }
            }
            _ => {}
        }

        property
    }
}

fn enum_values(schema: &Schema) -> Option<Vec<serde_json::Value>> {
    (!schema.enum_values.is_empty()).then(|| schema.enum_values.clone())
}
