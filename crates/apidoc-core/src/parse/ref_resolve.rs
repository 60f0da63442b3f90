use super::media_type::MediaType;
use super::operation::{Operation, PathItem};
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};
use super::schema::{Schema, SchemaOrRef};
use super::spec::OpenApiSpec;
use crate::error::ResolveError;

/// A node that is either an inline value or a `$ref` pointer to one.
trait RefNode {
    type Target;

    /// `Ok` with the inline value, or `Err` with the pointer text.
    fn split(&self) -> Result<&Self::Target, &str>;
}

impl RefNode for SchemaOrRef {
    type Target = Schema;

    fn split(&self) -> Result<&Schema, &str> {
        match self {
            SchemaOrRef::Schema(schema) => Ok(schema),
            SchemaOrRef::Ref { ref_path } => Err(ref_path),
        }
    }
}

impl RefNode for ParameterOrRef {
    type Target = Parameter;

    fn split(&self) -> Result<&Parameter, &str> {
        match self {
            ParameterOrRef::Parameter(param) => Ok(param),
            ParameterOrRef::Ref { ref_path } => Err(ref_path),
        }
    }
}

impl RefNode for RequestBodyOrRef {
    type Target = RequestBody;

    fn split(&self) -> Result<&RequestBody, &str> {
        match self {
            RequestBodyOrRef::RequestBody(body) => Ok(body),
            RequestBodyOrRef::Ref { ref_path } => Err(ref_path),
        }
    }
}

impl RefNode for ResponseOrRef {
    type Target = Response;

    fn split(&self) -> Result<&Response, &str> {
        match self {
            ResponseOrRef::Response(resp) => Ok(resp),
            ResponseOrRef::Ref { ref_path } => Err(ref_path),
        }
    }
}

/// Follows local `$ref` pointers (`#/components/schemas/Pet`,
/// `#/definitions/Pet/properties/owner`,
/// `#/paths/~1pets/get/responses/200/content/application~1json/schema`, ...)
/// one segment at a time from the document root.
///
/// Resolution is one level: the returned schema may itself contain
/// references in its properties, which callers resolve as they descend.
/// A pointer whose target is a bare alias (`Foo: {$ref: Bar}`) is followed
/// to `Bar`; alias loops are reported as [`ResolveError::CircularRef`].
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    spec: &'a OpenApiSpec,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self { spec }
    }

    pub fn resolve_schema(&self, node: &'a SchemaOrRef) -> Result<&'a Schema, ResolveError> {
        follow(node, |segments| self.lookup_schema(segments))
    }

    pub fn resolve_parameter(&self, node: &'a ParameterOrRef) -> Result<&'a Parameter, ResolveError> {
        follow(node, |segments| match segments {
            ["components", "parameters", name] => self
                .spec
                .components
                .as_ref()
                .and_then(|c| c.parameters.get(*name)),
            ["parameters", name] => self.spec.parameters.get(*name),
            ["paths", path, "parameters", index] => {
                self.spec.paths.get(*path)?.parameters.get(index.parse::<usize>().ok()?)
            }
            ["paths", path, method, "parameters", index] => self
                .operation(path, method)?
                .parameters
                .get(index.parse::<usize>().ok()?),
            _ => None,
        })
    }

    pub fn resolve_request_body(
        &self,
        node: &'a RequestBodyOrRef,
    ) -> Result<&'a RequestBody, ResolveError> {
        follow(node, |segments| match segments {
            ["components", "requestBodies", name] => self
                .spec
                .components
                .as_ref()
                .and_then(|c| c.request_bodies.get(*name)),
            ["paths", path, method, "requestBody"] => {
                self.operation(path, method)?.request_body.as_ref()
            }
            _ => None,
        })
    }

    pub fn resolve_response(&self, node: &'a ResponseOrRef) -> Result<&'a Response, ResolveError> {
        follow(node, |segments| match segments {
            ["components", "responses", name] => self
                .spec
                .components
                .as_ref()
                .and_then(|c| c.responses.get(*name)),
            ["responses", name] => self.spec.responses.get(*name),
            ["paths", path, method, "responses", status] => {
                self.operation(path, method)?.responses.get(*status)
            }
            _ => None,
        })
    }

    fn operation(&self, path: &str, method: &str) -> Option<&'a Operation> {
        operation_for(self.spec.paths.get(path)?, method)
    }

    fn lookup_schema(&self, segments: &[&str]) -> Option<&'a SchemaOrRef> {
        let components = || self.spec.components.as_ref();
        match segments {
            ["components", "schemas", name, rest @ ..] => {
                walk_schema(components()?.schemas.get(*name)?, rest)
            }
            ["components", "responses", name, rest @ ..] => {
                walk_response(components()?.responses.get(*name)?, rest)
            }
            ["components", "requestBodies", name, rest @ ..] => {
                walk_request_body(components()?.request_bodies.get(*name)?, rest)
            }
            ["components", "parameters", name, rest @ ..] => {
                walk_parameter(components()?.parameters.get(*name)?, rest)
            }
            ["definitions", name, rest @ ..] => walk_schema(self.spec.definitions.get(*name)?, rest),
            ["parameters", name, rest @ ..] => walk_parameter(self.spec.parameters.get(*name)?, rest),
            ["responses", name, rest @ ..] => walk_response(self.spec.responses.get(*name)?, rest),
            ["paths", path, rest @ ..] => walk_path_item(self.spec.paths.get(*path)?, rest),
            _ => None,
        }
    }
}

/// Any operation of a path item, including the undocumented verbs.
fn operation_for<'a>(item: &'a PathItem, method: &str) -> Option<&'a Operation> {
    match method {
        "get" => item.get.as_ref(),
        "post" => item.post.as_ref(),
        "put" => item.put.as_ref(),
        "patch" => item.patch.as_ref(),
        "delete" => item.delete.as_ref(),
        "options" => item.options.as_ref(),
        "head" => item.head.as_ref(),
        "trace" => item.trace.as_ref(),
        _ => None,
    }
}

// The walkers below stop at a `$ref` met mid-path, like a raw JSON pointer walk.

fn walk_path_item<'a>(item: &'a PathItem, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    match segments {
        ["parameters", index, rest @ ..] => {
            walk_parameter(item.parameters.get(index.parse::<usize>().ok()?)?, rest)
        }
        [method, rest @ ..] => walk_operation(operation_for(item, method)?, rest),
        [] => None,
    }
}

fn walk_operation<'a>(operation: &'a Operation, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    match segments {
        ["parameters", index, rest @ ..] => {
            walk_parameter(operation.parameters.get(index.parse::<usize>().ok()?)?, rest)
        }
        ["requestBody", rest @ ..] => walk_request_body(operation.request_body.as_ref()?, rest),
        ["responses", status, rest @ ..] => walk_response(operation.responses.get(*status)?, rest),
        _ => None,
    }
}

fn walk_parameter<'a>(node: &'a ParameterOrRef, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    let ParameterOrRef::Parameter(param) = node else {
        return None;
    };
    match segments {
        ["schema", rest @ ..] => walk_schema(param.schema.as_ref()?, rest),
        ["items", rest @ ..] => walk_schema(param.items.as_deref()?, rest),
        ["content", media, rest @ ..] => walk_media_type(param.content.get(*media)?, rest),
        _ => None,
    }
}

fn walk_request_body<'a>(node: &'a RequestBodyOrRef, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    let RequestBodyOrRef::RequestBody(body) = node else {
        return None;
    };
    match segments {
        ["content", media, rest @ ..] => walk_media_type(body.content.get(*media)?, rest),
        _ => None,
    }
}

fn walk_response<'a>(node: &'a ResponseOrRef, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    let ResponseOrRef::Response(response) = node else {
        return None;
    };
    match segments {
        ["content", media, rest @ ..] => walk_media_type(response.content.get(*media)?, rest),
        ["schema", rest @ ..] => walk_schema(response.schema.as_ref()?, rest),
        _ => None,
    }
}

fn walk_media_type<'a>(media_type: &'a MediaType, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    match segments {
        ["schema", rest @ ..] => walk_schema(media_type.schema.as_ref()?, rest),
        _ => None,
    }
}

/// Walk the remaining pointer segments through inline schema keywords.
fn walk_schema<'a>(root: &'a SchemaOrRef, segments: &[&str]) -> Option<&'a SchemaOrRef> {
    let mut node = root;
    let mut segments = segments.iter();
    while let Some(segment) = segments.next() {
        let SchemaOrRef::Schema(schema) = node else {
            return None;
        };
        node = match *segment {
            "properties" => schema.properties.get(*segments.next()?)?,
            "items" => schema.items.as_deref()?,
            "allOf" => schema.all_of.get(segments.next()?.parse::<usize>().ok()?)?,
            "oneOf" => schema.one_of.get(segments.next()?.parse::<usize>().ok()?)?,
            "anyOf" => schema.any_of.get(segments.next()?.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

fn follow<'a, N, F>(node: &'a N, lookup: F) -> Result<&'a N::Target, ResolveError>
where
    N: RefNode,
    F: Fn(&[&str]) -> Option<&'a N>,
{
    let mut current = node;
    let mut visited: Vec<&'a str> = Vec::new();
    loop {
        match current.split() {
            Ok(target) => return Ok(target),
            Err(ref_path) => {
                if visited.contains(&ref_path) {
                    return Err(ResolveError::CircularRef(ref_path.to_string()));
                }
                visited.push(ref_path);
                let owned = pointer_segments(ref_path)?;
                let segments: Vec<&str> = owned.iter().map(String::as_str).collect();
                current = lookup(&segments)
                    .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))?;
            }
        }
    }
}

/// Split a local JSON pointer (`#/a/b~1c`) into unescaped segments.
fn pointer_segments(ref_path: &str) -> Result<Vec<String>, ResolveError> {
    let pointer = ref_path
        .strip_prefix('#')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    Ok(pointer
        .split('/')
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect())
}

/// The last segment of a pointer, e.g. `Pet` for `#/components/schemas/Pet`.
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}
