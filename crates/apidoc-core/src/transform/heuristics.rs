use crate::parse::operation::SecurityRequirement;

use super::name_normalizer::singularize;

/// Query parameter names that mark an operation as paginated.
pub const DEFAULT_PAGINATION_PARAMS: &[&str] =
    &["page", "offset", "limit", "size", "pageSize", "pageNumber"];

/// Response fields that mark a response body as a page envelope.
pub const DEFAULT_PAGINATION_FIELDS: &[&str] = &[
    "totalCount",
    "totalPages",
    "page",
    "pageSize",
    "hasNext",
    "hasPrevious",
];

/// Envelope fields searched, in order, for the array of records.
pub const DEFAULT_RECORD_FIELDS: &[&str] = &["data", "records", "items", "results"];

/// Best-effort classification of operations from their declared inputs.
/// Name matching is ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Heuristics {
    pub pagination_params: Vec<String>,
    pub pagination_fields: Vec<String>,
    pub record_fields: Vec<String>,
    /// Operations without their own `security` key inherit the
    /// document-level requirements.
    pub inherit_global_security: bool,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            pagination_params: to_owned(DEFAULT_PAGINATION_PARAMS),
            pagination_fields: to_owned(DEFAULT_PAGINATION_FIELDS),
            record_fields: to_owned(DEFAULT_RECORD_FIELDS),
            inherit_global_security: false,
        }
    }
}

impl Heuristics {
    /// Paginated if a parameter or a success-response field has a pagination name.
    pub fn is_paginated<'n>(
        &self,
        param_names: impl IntoIterator<Item = &'n str>,
        response_fields: impl IntoIterator<Item = &'n str>,
    ) -> bool {
        param_names
            .into_iter()
            .any(|name| matches_any(&self.pagination_params, name))
            || self.is_page_envelope(response_fields)
    }

    /// Whether a response body's top-level fields describe a page.
    pub fn is_page_envelope<'n>(&self, fields: impl IntoIterator<Item = &'n str>) -> bool {
        fields
            .into_iter()
            .any(|name| matches_any(&self.pagination_fields, name))
    }

    pub fn record_fields(&self) -> impl Iterator<Item = &str> {
        self.record_fields.iter().map(String::as_str)
    }

    /// True iff the effective security requirement list is non-empty.
    pub fn requires_auth(
        &self,
        operation: Option<&[SecurityRequirement]>,
        document: Option<&[SecurityRequirement]>,
    ) -> bool {
        let effective = match operation {
            Some(requirements) => Some(requirements),
            None if self.inherit_global_security => document,
            None => None,
        };
        effective.is_some_and(|requirements| !requirements.is_empty())
    }
}

/// Verb used in generated purpose sentences.
pub fn action_verb(method: &str) -> &'static str {
    match method.to_ascii_uppercase().as_str() {
        "GET" => "Retrieve",
        "POST" => "Create",
        "PUT" => "Update",
        "PATCH" => "Modify",
        "DELETE" => "Remove",
        _ => "Process",
    }
}

/// Human-readable purpose of an operation: its description, else its
/// summary framed by the tag, else a sentence built from method and tag.
pub fn business_purpose(
    method: &str,
    tag: &str,
    summary: Option<&str>,
    description: Option<&str>,
) -> String {
    if let Some(description) = non_blank(description) {
        return description.to_string();
    }
    if let Some(summary) = non_blank(summary) {
        return format!("{summary} - Used for {tag} management in the application");
    }
    format!("{} {} data", action_verb(method), singularize(tag))
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn matches_any(candidates: &[String], name: &str) -> bool {
    candidates.iter().any(|c| c.eq_ignore_ascii_case(name))
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
