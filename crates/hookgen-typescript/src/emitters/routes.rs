use minijinja::{Value, context};

use hookgen_core::GeneratedFile;
use hookgen_core::ir::{ApiModel, NamedShape, Operation, Response, Shape, ShapeRegistry};

use super::template_env;
use crate::error::RenderError;
use crate::type_mapper::{property_key, shape_to_ts, status_literal, ts_string};

/// Emit the aggregate route-type module: every named shape, then the
/// `Routes` interface keyed by path template and method.
pub fn emit_routes(api: &ApiModel, file_name: &str) -> Result<GeneratedFile, RenderError> {
    let env = template_env("routes.ts.j2", include_str!("../../templates/routes.ts.j2"))?;
    let tmpl = env.get_template("routes.ts.j2")?;

    let declarations: Vec<Value> = api
        .registry
        .iter()
        .map(|named| declaration_ctx(named, &api.registry))
        .collect();

    let routes: Vec<Value> = api
        .paths()
        .into_iter()
        .map(|path| {
            let methods: Vec<Value> = api
                .operations
                .iter()
                .filter(|op| op.path == path)
                .map(|op| operation_ctx(op, &api.registry))
                .collect();
            context! {
                key => ts_string(path),
                methods => methods,
            }
        })
        .collect();

    let content = tmpl.render(context! {
        title => api.info.title.clone(),
        version => api.info.version.clone(),
        declarations => declarations,
        routes => routes,
    })?;

    log::debug!(
        "rendered {} with {} declarations and {} routes",
        file_name,
        api.registry.len(),
        api.paths().len()
    );

    Ok(GeneratedFile {
        path: file_name.to_string(),
        content,
    })
}

/// Objects with declared fields and no open value shape become interfaces;
/// everything else becomes a type alias.
fn declaration_ctx(named: &NamedShape, registry: &ShapeRegistry) -> Value {
    match &named.shape {
        Shape::Object(obj) if !obj.fields.is_empty() && obj.additional.is_none() => {
            let fields: Vec<Value> = obj
                .fields
                .iter()
                .map(|f| {
                    let member = format!(
                        "{}{}{}: {}",
                        if f.read_only { "readonly " } else { "" },
                        property_key(&f.name),
                        if f.optional { "?" } else { "" },
                        shape_to_ts(&f.shape, registry)
                    );
                    context! {
                        member => member,
                        description => f.description.clone(),
                    }
                })
                .collect();
            context! {
                name => named.type_name.clone(),
                description => named.description.clone(),
                fields => Some(fields),
            }
        }
        shape => context! {
            name => named.type_name.clone(),
            description => named.description.clone(),
            fields => None::<Vec<Value>>,
            type => shape_to_ts(shape, registry),
        },
    }
}

fn operation_ctx(op: &Operation, registry: &ShapeRegistry) -> Value {
    context! {
        method => op.method.as_lower(),
        doc => op.summary.clone().or_else(|| op.description.clone()),
        deprecated => op.deprecated,
        params => params_type(op, registry),
        body => body_type(op, registry),
        responses => responses_block(&op.responses, registry),
        success => success_type(op, registry),
    }
}

/// Path and query parameters as one flat object keyed by wire name.
pub fn params_type(op: &Operation, registry: &ShapeRegistry) -> String {
    if op.parameters.is_empty() {
        return "Record<string, never>".to_string();
    }
    let members: Vec<String> = op
        .parameters
        .iter()
        .map(|p| {
            format!(
                "{}{}: {}",
                property_key(&p.original_name),
                if p.required { "" } else { "?" },
                shape_to_ts(&p.shape, registry)
            )
        })
        .collect();
    format!("{{ {} }}", members.join("; "))
}

pub fn body_type(op: &Operation, registry: &ShapeRegistry) -> String {
    match &op.request_body {
        Some(body) if body.required => shape_to_ts(&body.shape, registry),
        Some(body) => format!("{} | undefined", shape_to_ts(&body.shape, registry)),
        None => "undefined".to_string(),
    }
}

/// One arm per declared response, as a single-line union. Arms without a
/// body are kept with `hasBody: false` so a switch over `status` stays
/// exhaustive.
pub fn responses_type(responses: &[Response], registry: &ShapeRegistry) -> String {
    if responses.is_empty() {
        return "never".to_string();
    }
    responses
        .iter()
        .map(|r| response_arm(r, registry))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// The same union laid out one arm per line, following `responses:`.
fn responses_block(responses: &[Response], registry: &ShapeRegistry) -> String {
    if responses.is_empty() {
        return " never".to_string();
    }
    responses
        .iter()
        .map(|r| format!("\n        | {}", response_arm(r, registry)))
        .collect()
}

pub fn response_arm(response: &Response, registry: &ShapeRegistry) -> String {
    let status = status_literal(response.status);
    match (&response.body, &response.content_type) {
        (Some(body), content_type) => format!(
            "{{ status: {status}; hasBody: true; contentType: {}; body: {} }}",
            ts_string(content_type.as_deref().unwrap_or("application/json")),
            shape_to_ts(body, registry)
        ),
        (None, _) => format!("{{ status: {status}; hasBody: false; body?: undefined }}"),
    }
}

/// Body type of the primary success response.
pub fn success_type(op: &Operation, registry: &ShapeRegistry) -> String {
    match op.success() {
        Some(Response {
            body: Some(body), ..
        }) => shape_to_ts(body, registry),
        Some(_) => "undefined".to_string(),
        None => "unknown".to_string(),
    }
}
