use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase};

use crate::docs::{HttpMethod, NormalizedName};

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        kebab_case: sanitized.to_kebab_case(),
        camel_case: sanitized.to_lower_camel_case(),
        pascal_case: sanitized.to_pascal_case(),
    }
}

/// `PascalCase(base) + suffix`, e.g. `getItems` + `QueryParams` → `GetItemsQueryParams`.
pub fn model_name(base: &str, suffix: &str) -> String {
    format!("{}{}", normalize_name(base).pascal_case, suffix)
}

/// Derive a camelCase operationId from HTTP method + path for operations
/// that declare none. Each `{param}` segment reads as `By<Param>`.
///
/// Examples:
/// - `GET /items` → `getItems`
/// - `GET /users/{id}` → `getUsersById`
/// - `DELETE /users/{userId}/posts/{postId}` → `deleteUsersByUserIdPostsByPostId`
pub fn synthesize_operation_id(method: HttpMethod, path: &str) -> String {
    let mut raw = method.as_str().to_lowercase();

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        raw.push('_');
        match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => {
                raw.push_str("by_");
                raw.push_str(param);
            }
            None => raw.push_str(seg),
        }
    }

    normalize_name(&raw).camel_case
}

/// Naive singularization: strips trailing 's' if present.
pub fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let n = normalize_name("listModels");
        assert_eq!(n.pascal_case, "ListModels");
        assert_eq!(n.camel_case, "listModels");
        assert_eq!(n.kebab_case, "list-models");
    }

    #[test]
    fn test_kebab_input() {
        let n = normalize_name("pet-store");
        assert_eq!(n.pascal_case, "PetStore");
        assert_eq!(n.camel_case, "petStore");
        assert_eq!(n.kebab_case, "pet-store");
    }

    #[test]
    fn test_special_chars() {
        let n = normalize_name("application/json");
        assert_eq!(n.pascal_case, "ApplicationJson");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(normalize_name("{}").original, "{}");
        assert_eq!(normalize_name("{}").camel_case, "unnamed");
    }

    #[test]
    fn test_model_name() {
        assert_eq!(model_name("getItems", "QueryParams"), "GetItemsQueryParams");
        assert_eq!(model_name("pet_status", "Data"), "PetStatusData");
    }

    #[test]
    fn test_operation_id_collection() {
        assert_eq!(synthesize_operation_id(HttpMethod::Get, "/items"), "getItems");
    }

    #[test]
    fn test_operation_id_by_param() {
        assert_eq!(
            synthesize_operation_id(HttpMethod::Get, "/users/{id}"),
            "getUsersById"
        );
    }

    #[test]
    fn test_operation_id_nested_params() {
        assert_eq!(
            synthesize_operation_id(HttpMethod::Delete, "/users/{userId}/posts/{postId}"),
            "deleteUsersByUserIdPostsByPostId"
        );
    }

    #[test]
    fn test_operation_id_dashed_segments() {
        assert_eq!(
            synthesize_operation_id(HttpMethod::Post, "/pet-store/orders"),
            "postPetStoreOrders"
        );
    }

    #[test]
    fn test_operation_id_root() {
        assert_eq!(synthesize_operation_id(HttpMethod::Get, "/"), "get");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("pets"), "pet");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("store"), "store");
    }
}
