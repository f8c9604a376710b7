use hookgen_core::diagnostic::{DiagnosticKind, Severity};
use hookgen_core::ir::{
    HttpMethod, ParameterLocation, PrimitiveKind, Shape, StatusCode, group_by_resource,
};
use hookgen_core::parse;
use hookgen_core::transform::{NamingOptions, check_unique, derive_names, normalize};

const CATALOG: &str = include_str!("fixtures/catalog.yaml");
const DEFECTS: &str = include_str!("fixtures/defects.yaml");

fn catalog() -> hookgen_core::ir::ApiModel {
    let spec = parse::from_yaml(CATALOG).unwrap();
    let (api, diags) = normalize(&spec);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    api
}

#[test]
fn operations_keep_document_order() {
    let api = catalog();
    let routes: Vec<String> = api.operations.iter().map(|op| op.route_key()).collect();
    assert_eq!(
        routes,
        vec![
            "GET /products",
            "POST /products",
            "GET /products/{id}",
            "PUT /products/{id}",
            "DELETE /products/{id}",
            "GET /categories",
            "DELETE /cart",
        ]
    );
    assert_eq!(api.queries().count(), 3);
    assert_eq!(api.mutations().count(), 4);
}

#[test]
fn optional_query_parameters_need_no_input() {
    let api = catalog();
    let list = &api.operations[0];
    assert!(!list.has_required_input);
    let names: Vec<_> = list.query_params().map(|p| p.original_name.as_str()).collect();
    assert_eq!(names, vec!["page", "limit"]);
    assert!(list.parameters.iter().all(|p| !p.required));
    assert_eq!(
        list.success().unwrap().body,
        Some(Shape::Array(Box::new(Shape::Reference("Product".to_string()))))
    );
}

#[test]
fn path_level_parameters_and_component_references() {
    let api = catalog();
    let put = &api.operations[3];
    assert_eq!(put.method, HttpMethod::Put);
    assert!(put.has_required_input);
    assert_eq!(put.parameters.len(), 1);
    assert_eq!(put.parameters[0].location, ParameterLocation::Path);
    assert!(put.parameters[0].required);

    let body = put.request_body.as_ref().expect("body from requestBodies");
    assert_eq!(body.content_type, "application/json");
    assert_eq!(body.shape, Shape::Reference("NewProduct".to_string()));

    let create = &api.operations[1];
    let bad_request = &create.responses[1];
    assert_eq!(bad_request.status, StatusCode::Code(400));
    assert_eq!(bad_request.body, Some(Shape::Reference("Error".to_string())));
    assert_eq!(bad_request.description.as_deref(), Some("Invalid input"));
}

#[test]
fn responses_keep_declared_order_and_empty_bodies() {
    let api = catalog();
    let get = &api.operations[2];
    let statuses: Vec<String> = get.responses.iter().map(|r| r.status.to_string()).collect();
    assert_eq!(statuses, vec!["200", "401", "404"]);
    assert_eq!(get.primary_success, Some(0));
    assert!(!get.responses[2].has_body());

    let clear = &api.operations[6];
    assert!(clear.parameters.is_empty());
    assert!(!clear.has_required_input);
    assert_eq!(clear.responses[0].status, StatusCode::Code(204));
    assert!(!clear.responses[0].has_body());
    assert_eq!(clear.responses[1].status, StatusCode::Default);
    assert_eq!(clear.primary_success, Some(0));
}

#[test]
fn self_referencing_category() {
    let api = catalog();
    let category = api.registry.get("Category").unwrap();
    match &category.shape {
        Shape::Object(obj) => {
            let parent = obj.fields.iter().find(|f| f.name == "parent").unwrap();
            assert!(parent.optional);
            assert_eq!(parent.shape, Shape::Reference("Category".to_string()));
        }
        other => panic!("expected object, got {other:?}"),
    }

    let product = api.registry.get("Product").unwrap();
    assert_eq!(product.description.as_deref(), Some("An item for sale."));
    assert_eq!(
        api.registry.reachable_from(&Shape::Reference("Product".to_string())),
        vec!["Product", "Category"]
    );
}

#[test]
fn normalization_is_deterministic() {
    let spec = parse::from_yaml(DEFECTS).unwrap();
    let (a, diags_a) = normalize(&spec);
    let (b, diags_b) = normalize(&spec);
    assert_eq!(a.operations, b.operations);
    assert_eq!(a.registry, b.registry);
    assert_eq!(diags_a, diags_b);
}

#[test]
fn defects_are_reported_and_the_rest_survives() {
    let spec = parse::from_yaml(DEFECTS).unwrap();
    let (api, diags) = normalize(&spec);

    let routes: Vec<String> = api.operations.iter().map(|op| op.route_key()).collect();
    assert_eq!(
        routes,
        vec![
            "GET /orders",
            "GET /orders/{orderId}/lines/{lineId}",
            "GET /nodes",
        ]
    );

    let at = |kind: DiagnosticKind| -> Vec<String> {
        diags
            .iter()
            .filter(|d| d.kind == kind)
            .flat_map(|d| d.locations.clone())
            .collect()
    };

    let defects = at(DiagnosticKind::SpecDefect);
    assert!(defects.contains(&"paths./orders.post".to_string()));
    assert!(defects.contains(&"paths./empty".to_string()));

    assert_eq!(
        at(DiagnosticKind::AmbiguousSuccess),
        vec!["paths./orders.get.responses.206"]
    );

    let unresolved = at(DiagnosticKind::UnresolvedReference);
    assert!(unresolved.contains(&"paths./orders/{orderId}/lines/{lineId}.patch.requestBody".to_string()));
    assert!(unresolved.iter().any(|l| l.ends_with("responses.200.content.application/json.schema")));

    let unsupported = at(DiagnosticKind::Unsupported);
    assert!(unsupported.contains(&"servers".to_string()));
    assert!(unsupported.contains(&"paths./orders.head".to_string()));
    assert!(unsupported.contains(&"paths./orders.get".to_string()));
    assert!(diags
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Unsupported)
        .all(|d| d.severity == Severity::Info));
}

#[test]
fn path_parameters_are_forced_and_synthesized() {
    let spec = parse::from_yaml(DEFECTS).unwrap();
    let (api, diags) = normalize(&spec);
    let line = &api.operations[1];

    let params: Vec<_> = line
        .path_params()
        .map(|p| (p.original_name.as_str(), p.required, p.shape.clone()))
        .collect();
    assert_eq!(
        params,
        vec![
            ("orderId", true, Shape::Primitive(PrimitiveKind::Integer)),
            ("lineId", true, Shape::Primitive(PrimitiveKind::String)),
        ]
    );
    assert!(line.has_required_input);
    assert_eq!(line.success().unwrap().body, Some(Shape::Opaque));

    let warnings = diags
        .iter()
        .filter(|d| d.severity == Severity::Warning && d.locations == [line.source.clone()])
        .count();
    assert_eq!(warnings, 2);
}

#[test]
fn orders_query_keeps_only_the_query_parameter() {
    let spec = parse::from_yaml(DEFECTS).unwrap();
    let (api, _) = normalize(&spec);
    let orders = &api.operations[0];
    assert_eq!(orders.parameters.len(), 1);
    assert_eq!(orders.parameters[0].original_name, "status");
    assert!(orders.has_required_input);
    assert_eq!(
        orders.parameters[0].shape,
        Shape::Reference("OrderStatus".to_string())
    );
}

#[test]
fn mutually_recursive_nodes_terminate() {
    let spec = parse::from_yaml(DEFECTS).unwrap();
    let (api, _) = normalize(&spec);
    let nodes = &api.operations[2];
    let body = nodes.success().unwrap().body.clone().unwrap();
    assert_eq!(api.registry.reachable_from(&body), vec!["NodeA", "NodeB"]);
}

#[test]
fn catalog_names_are_unique_and_consistent() {
    let api = catalog();
    let options = NamingOptions::default();
    let families: Vec<_> = api
        .operations
        .iter()
        .map(|op| (derive_names(op, &options), op.source.as_str()))
        .collect();

    check_unique(
        "catalog",
        families.iter().map(|(n, src)| (n.operation.as_str(), *src)),
    )
    .unwrap();

    let get = &families[2].0;
    let put = &families[3].0;
    assert_eq!(get.base, "ProductsId");
    assert_eq!(put.base, "ProductsId");
    for (g, p) in [
        (&get.operation, &put.operation),
        (&get.args_type, &put.args_type),
        (&get.variables_type, &put.variables_type),
        (&get.query_key, &put.query_key),
        (&get.mutation_options, &put.mutation_options),
    ] {
        assert_eq!(g.replacen("Get", "Put", 1), *p);
    }
}

#[test]
fn resources_group_by_first_segment() {
    let api = catalog();
    let groups = group_by_resource(&api.operations);
    let names: Vec<_> = groups.iter().map(|g| g.file_stem()).collect();
    assert_eq!(names, vec!["products", "categories", "cart"]);
    assert_eq!(groups[0].operation_indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn segments_with_the_same_stem_share_a_group() {
    let spec = parse::from_yaml(
        r#"
openapi: "3.0.3"
info: { title: Stems, version: "1" }
paths:
  /pet-store:
    get:
      responses: { "204": { description: ok } }
  /products:
    get:
      responses: { "204": { description: ok } }
  /pet_store/{id}:
    delete:
      parameters:
        - { name: id, in: path, required: true, schema: { type: string } }
      responses: { "204": { description: ok } }
  /Products/featured:
    get:
      responses: { "204": { description: ok } }
"#,
    )
    .unwrap();
    let (api, _) = normalize(&spec);
    let groups = group_by_resource(&api.operations);

    let stems: Vec<_> = groups.iter().map(|g| g.file_stem()).collect();
    assert_eq!(stems, vec!["petStore", "products"]);
    assert_eq!(groups[0].name.original, "pet-store");
    assert_eq!(groups[0].operation_indices, vec![0, 2]);
    assert_eq!(groups[1].operation_indices, vec![1, 3]);
}
