use hookgen_core::error::ParseError;
use hookgen_core::parse;

const CATALOG: &str = include_str!("fixtures/catalog.yaml");
const DEFECTS: &str = include_str!("fixtures/defects.yaml");

#[test]
fn parse_catalog_yaml() {
    let spec = parse::from_yaml(CATALOG).expect("should parse catalog.yaml");
    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.info.title, "Catalog");
    assert_eq!(spec.paths.len(), 4);

    let components = spec.components.as_ref().expect("should have components");
    assert_eq!(components.schemas.len(), 4);
    assert_eq!(components.parameters.len(), 1);
    assert_eq!(components.request_bodies.len(), 1);
    assert_eq!(components.responses.len(), 1);
}

#[test]
fn method_entries_stay_raw() {
    let spec = parse::from_yaml(CATALOG).unwrap();
    let products = &spec.paths["/products"];
    assert_eq!(products["get"]["operationId"], "listProducts");
    assert_eq!(products["post"]["responses"]["400"]["$ref"], "#/components/responses/BadRequest");
}

#[test]
fn malformed_entries_do_not_reject_the_document() {
    let spec = parse::from_yaml(DEFECTS).expect("defects are reported later, not here");
    assert_eq!(spec.servers.len(), 1);
    assert_eq!(spec.paths.len(), 4);
}

#[test]
fn parse_json_document() {
    let json = r#"{
        "openapi": "3.1.0",
        "info": { "title": "Tiny", "version": "1" },
        "paths": { "/ping": { "get": { "responses": { "204": { "description": "pong" } } } } }
    }"#;
    let spec = parse::from_json(json).unwrap();
    assert_eq!(spec.info.title, "Tiny");
    assert!(spec.components.is_none());
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
    let err = parse::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0.0"));
}

#[test]
fn parse_garbage() {
    assert!(matches!(parse::from_yaml("openapi: [\n"), Err(ParseError::Yaml(_))));
    assert!(matches!(parse::from_json("{"), Err(ParseError::Json(_))));
}
