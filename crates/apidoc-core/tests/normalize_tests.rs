use apidoc_core::docs::HttpMethod;
use apidoc_core::transform::name_normalizer::{
    model_name, normalize_name, singularize, synthesize_operation_id,
};

#[test]
fn test_camel_case_input() {
    let n = normalize_name("listWidgets");
    assert_eq!(n.pascal_case, "ListWidgets");
    assert_eq!(n.camel_case, "listWidgets");
    assert_eq!(n.kebab_case, "list-widgets");
}

#[test]
fn test_snake_case_input() {
    let n = normalize_name("pet_owner");
    assert_eq!(n.pascal_case, "PetOwner");
    assert_eq!(n.camel_case, "petOwner");
}

#[test]
fn test_path_like_input() {
    let n = normalize_name("/pets/{petId}");
    assert_eq!(n.pascal_case, "PetsPetId");
}

#[test]
fn test_model_names() {
    assert_eq!(model_name("getItems", "QueryParams"), "GetItemsQueryParams");
    assert_eq!(model_name("create-widget", "InData"), "CreateWidgetInData");
    assert_eq!(model_name("Pet", "Data"), "PetData");
}

#[test]
fn test_synthesized_operation_ids() {
    assert_eq!(synthesize_operation_id(HttpMethod::Get, "/items"), "getItems");
    assert_eq!(
        synthesize_operation_id(HttpMethod::Get, "/users/{id}"),
        "getUsersById"
    );
    assert_eq!(
        synthesize_operation_id(HttpMethod::Patch, "/orgs/{orgId}/members"),
        "patchOrgsByOrgIdMembers"
    );
    // Deterministic
    assert_eq!(
        synthesize_operation_id(HttpMethod::Put, "/a/{b}"),
        synthesize_operation_id(HttpMethod::Put, "/a/{b}")
    );
}

#[test]
fn test_singularize_tags() {
    assert_eq!(singularize("widgets"), "widget");
    assert_eq!(singularize("inventories"), "inventory");
    assert_eq!(singularize("address"), "address");
    assert_eq!(singularize("default"), "default");
}
