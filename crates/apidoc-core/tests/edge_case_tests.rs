use apidoc_core::docs::{DocumentationDefect, ModelDocumentation};
use apidoc_core::parse;
use apidoc_core::{Documentation, synthesize};

const EDGE_CASES: &str = include_str!("fixtures/edge-cases-3.1.yaml");

fn edge_cases() -> Documentation {
    let spec = parse::from_yaml(EDGE_CASES).unwrap();
    synthesize(&spec).unwrap()
}

fn model<'d>(docs: &'d Documentation, name: &str) -> &'d ModelDocumentation {
    docs.models
        .iter()
        .find(|m| m.model_name == name)
        .unwrap_or_else(|| panic!("should have model {name}"))
}

#[test]
fn self_referencing_schema_terminates() {
    let docs = edge_cases();
    insta::assert_snapshot!(
        model(&docs, "NodeData").properties,
        @r#"{"value":{"name":"value","type":"string"},"children":{"name":"children","type":"array","items":{"name":"items","type":"object","$ref":"Node"}}}"#
    );
    insta::assert_snapshot!(
        model(&docs, "EmployeeData").properties,
        @r#"{"name":{"name":"name","type":"string"},"manager":{"name":"manager","type":"object","$ref":"Employee"}}"#
    );
    assert_eq!(
        model(&docs, "GetTreeOutData").properties,
        model(&docs, "NodeData").properties
    );
}

#[test]
fn alias_schema_expands_its_target() {
    let docs = edge_cases();
    let alias = model(&docs, "AliasData");
    assert_eq!(alias.properties, model(&docs, "NodeData").properties);
    assert_eq!(alias.description.as_deref(), Some("Alias entity model"));
}

#[test]
fn alias_loops_degrade_to_empty_models() {
    let docs = edge_cases();
    assert_eq!(model(&docs, "LoopAData").properties, "{}");
    assert_eq!(model(&docs, "LoopBData").properties, "{}");
}

#[test]
fn one_of_is_not_flattened() {
    let docs = edge_cases();
    assert_eq!(model(&docs, "ChoiceData").properties, "{}");
}

#[test]
fn unresolvable_request_body_yields_empty_model() {
    let docs = edge_cases();
    let post = &docs.apis[2];
    assert_eq!(post.request_body_model.as_deref(), Some("GetTreeInData"));
    // Only `text/plain` is declared for the response
    assert_eq!(post.response_body_model, None);

    let body = model(&docs, "GetTreeInData");
    assert_eq!(body.properties, "{}");
    assert_eq!(body.required, None);
}

#[test]
fn synthesized_ids_do_not_collide() {
    let docs = edge_cases();
    let ids: Vec<&str> = docs.apis.iter().map(|a| a.operation_id.as_str()).collect();
    assert_eq!(
        ids,
        ["getTree", "getNodesById", "getTree", "getItems", "getItems2"]
    );

    let by_id = &docs.apis[1];
    insta::assert_snapshot!(
        by_id.path_params.as_deref().unwrap(),
        @r#"{"id":{"type":"string","required":true}}"#
    );
}

#[test]
fn declared_duplicates_are_reported() {
    let docs = edge_cases();
    assert_eq!(
        docs.integrity_defects(),
        [DocumentationDefect::DuplicateOperationId("getTree".to_string())]
    );
    assert_eq!(
        model(&docs, "GetTreeInData").used_in_operations.as_deref(),
        Some("getTree")
    );
}

#[test]
fn model_sequence_is_discovery_order() {
    let docs = edge_cases();
    let names: Vec<(usize, &str)> = docs
        .models
        .iter()
        .map(|m| (m.sequence, m.model_name.as_str()))
        .collect();
    assert_eq!(
        names,
        [
            (1, "GetTreeOutData"),
            (2, "GetNodesByIdOutData"),
            (3, "GetTreeInData"),
            (4, "NodeData"),
            (5, "EmployeeData"),
            (6, "AliasData"),
            (7, "LoopAData"),
            (8, "LoopBData"),
            (9, "ChoiceData"),
        ]
    );
}
