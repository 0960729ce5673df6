use soc_core::parse;
use soc_core::parse::operation::HttpMethod;
use soc_core::parse::content::{RequestBodyOrRef, ResponseOrRef};
use soc_core::parse::schema::SchemaOrRef;

const SAMPLE_SERV: &str = include_str!("fixtures/sample-serv.yaml");
const VALIDATION_CASES: &str = include_str!("fixtures/validation-test-cases.yaml");

#[test]
fn parse_sample_serv_yaml() {
    let spec = parse::from_yaml(SAMPLE_SERV).expect("should parse sample-serv.yaml");
    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.info.title, "Sample Service");
    assert_eq!(spec.servers[0].url, "https://api.example.com/v1");
    assert_eq!(spec.paths.len(), 4);

    let pets = spec.paths.get("/pets").expect("should have /pets");
    let methods: Vec<_> = pets.operations.keys().copied().collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);

    let post = pets.operation(HttpMethod::Post).expect("should have POST");
    assert!(matches!(post.request_body, Some(RequestBodyOrRef::Ref { .. })));
    assert!(matches!(
        post.responses.get("default"),
        Some(ResponseOrRef::Ref { .. })
    ));
}

#[test]
fn parse_components_schemas() {
    let spec = parse::from_yaml(SAMPLE_SERV).unwrap();
    let names: Vec<_> = spec.schemas().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Pet", "Pets", "Category", "Error"]);

    let pet = spec.components.as_ref().unwrap().schemas["Pet"]
        .as_schema()
        .expect("inline Pet");
    assert!(pet.is_required("id"));
    assert!(!pet.is_required("tag"));
    match &pet.properties["status"] {
        SchemaOrRef::Schema(status) => assert_eq!(status.enum_values.len(), 3),
        _ => panic!("expected inline schema for status"),
    }
}

#[test]
fn parse_keeps_property_order() {
    let spec = parse::from_yaml(VALIDATION_CASES).unwrap();
    let case = spec.components.as_ref().unwrap().schemas["CaseSensitiveTest"]
        .as_schema()
        .unwrap();
    let keys: Vec<_> = case.properties.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["DEFAULT", "Default", "name", "pet"]);
}

#[test]
fn parse_json_document() {
    let json = r#"{
        "openapi": "3.1.0",
        "info": {"title": "Json", "version": "1"},
        "paths": {"/ping": {"get": {"responses": {"204": {"description": "pong"}}}}}
    }"#;
    let spec = parse::from_json(json).expect("should parse JSON");
    assert_eq!(spec.openapi, "3.1.0");
    assert!(spec.paths["/ping"].operation(HttpMethod::Get).is_some());
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
openapi: "2.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    let result = parse::from_yaml(yaml);
    assert!(result.is_err());
}
