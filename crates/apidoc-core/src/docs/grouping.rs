use indexmap::IndexMap;

use super::records::ApiDocumentation;
use super::types::NormalizedName;
use crate::transform::name_normalizer::normalize_name;

/// API records sharing a tag, used by per-tag renderers.
#[derive(Debug, Clone)]
pub struct TagGroup {
    pub name: NormalizedName,
    pub api_indices: Vec<usize>, // indices into Documentation.apis
}

/// Group API records by tag, in order of first appearance.
pub fn group_by_tag(apis: &[ApiDocumentation]) -> Vec<TagGroup> {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();

    for (i, api) in apis.iter().enumerate() {
        groups.entry(api.tag.as_str()).or_default().push(i);
    }

    groups
        .into_iter()
        .map(|(tag, indices)| TagGroup {
            name: normalize_name(tag),
            api_indices: indices,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::HttpMethod;

    fn api(tag: &str, operation_id: &str) -> ApiDocumentation {
        ApiDocumentation {
            sequence: 0,
            endpoint: "/".to_string(),
            method: HttpMethod::Get,
            tag: tag.to_string(),
            operation_id: operation_id.to_string(),
            summary: String::new(),
            path_params: None,
            query_params_model: None,
            request_body_model: None,
            response_body_model: None,
            is_paginated: false,
            requires_auth: false,
            business_purpose: None,
        }
    }

    #[test]
    fn test_group_by_tag_keeps_first_seen_order() {
        let apis = vec![
            api("pets", "listPets"),
            api("store", "getInventory"),
            api("pets", "getPet"),
        ];
        let groups = group_by_tag(&apis);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name.original, "pets");
        assert_eq!(groups[0].api_indices, vec![0, 2]);
        assert_eq!(groups[1].name.pascal_case, "Store");
        assert_eq!(groups[1].api_indices, vec![1]);
    }
}
