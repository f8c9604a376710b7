use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
use crate::ir::{
    ApiInfo, ApiModel, HttpMethod, Operation, Parameter, ParameterLocation, PrimitiveKind,
    RequestBody, Response, Shape, ShapeRegistry, StatusCode,
};
use crate::parse::RefOr;
use crate::parse::operation::{self, MediaType, PathItem, preferred_media_type};
use crate::parse::parameter::{self, ParameterLocation as RawLocation};
use crate::parse::parse_ref_name;
use crate::parse::spec::OpenApiSpec;

use super::naming::normalize_name;

/// Longest `$ref` chain followed through `components` before giving up.
const MAX_REF_HOPS: usize = 8;

/// Normalize a parsed document into the generator model.
///
/// Never fails: every defect is reported as a diagnostic and the affected
/// entry is skipped or degraded, while the rest of the document is kept.
pub fn normalize(spec: &OpenApiSpec) -> (ApiModel, Vec<Diagnostic>) {
    let mut diags = Diagnostics::new();
    let registry = ShapeRegistry::build(spec.schemas(), &mut diags);

    if !spec.servers.is_empty() {
        diags.push(Diagnostic::info(
            DiagnosticKind::Unsupported,
            "servers",
            "servers are ignored; the client base path comes from configuration",
        ));
    }

    let (operations, op_diags) = normalize_operations(spec, &registry);
    diags.extend(op_diags);

    let model = ApiModel {
        info: ApiInfo {
            title: spec.info.title.clone(),
            description: spec.info.description.clone(),
            version: spec.info.version.clone(),
        },
        registry,
        operations,
    };
    (model, diags.into_vec())
}

/// Normalize every path and method against an already built registry.
pub fn normalize_operations(
    spec: &OpenApiSpec,
    registry: &ShapeRegistry,
) -> (Vec<Operation>, Vec<Diagnostic>) {
    let mut normalizer = Normalizer {
        spec,
        registry,
        diags: Diagnostics::new(),
    };
    let mut operations = Vec::new();

    for (path, raw) in &spec.paths {
        normalizer.path(path, raw, &mut operations);
    }

    log::debug!(
        "normalized {} operations across {} paths",
        operations.len(),
        spec.paths.len()
    );
    (operations, normalizer.diags.into_vec())
}

struct Normalizer<'a> {
    spec: &'a OpenApiSpec,
    registry: &'a ShapeRegistry,
    diags: Diagnostics,
}

impl<'a> Normalizer<'a> {
    fn path(&mut self, path: &str, raw: &Value, out: &mut Vec<Operation>) {
        let location = format!("paths.{path}");
        if !path.starts_with('/') {
            self.diags.push(Diagnostic::spec_defect(
                &location,
                "path template must start with `/`; path skipped",
            ));
            return;
        }

        let item: PathItem = match serde_json::from_value(raw.clone()) {
            Ok(item) => item,
            Err(e) => {
                self.diags.push(Diagnostic::spec_defect(
                    &location,
                    format!("path item could not be decoded: {e}"),
                ));
                return;
            }
        };

        let shared: Vec<parameter::Parameter> = item
            .parameters
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                self.follow(p, "parameters", &format!("{location}.parameters[{i}]"))
            })
            .collect();

        let mut methods = 0;
        for (key, raw_op) in &item.entries {
            if let Some(method) = HttpMethod::from_key(key) {
                methods += 1;
                if let Some(op) = self.operation(path, method, &item, raw_op, &shared) {
                    out.push(op);
                }
            } else if matches!(key.as_str(), "head" | "options" | "trace") {
                methods += 1;
                self.diags.push(Diagnostic::info(
                    DiagnosticKind::Unsupported,
                    format!("{location}.{key}"),
                    format!("{} operations are not bound", key.to_uppercase()),
                ));
            } else if key == "servers" || key == "$ref" {
                self.diags.push(Diagnostic::info(
                    DiagnosticKind::Unsupported,
                    format!("{location}.{key}"),
                    format!("path item `{key}` is ignored"),
                ));
            } else if !key.starts_with("x-") {
                self.diags.push(Diagnostic::warning(
                    DiagnosticKind::SpecDefect,
                    format!("{location}.{key}"),
                    format!("unknown path item key `{key}` ignored"),
                ));
            }
        }

        if methods == 0 {
            self.diags
                .push(Diagnostic::spec_defect(&location, "path declares no methods"));
        }
    }

    fn operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        item: &PathItem,
        raw: &Value,
        shared: &[parameter::Parameter],
    ) -> Option<Operation> {
        let source = format!("paths.{path}.{}", method.as_lower());
        let op: operation::Operation = match serde_json::from_value(raw.clone()) {
            Ok(op) => op,
            Err(e) => {
                self.diags.push(Diagnostic::spec_defect(
                    &source,
                    format!("operation could not be decoded: {e}; operation skipped"),
                ));
                return None;
            }
        };

        let mut own = Vec::with_capacity(op.parameters.len());
        for (i, p) in op.parameters.iter().enumerate() {
            own.push(self.follow(p, "parameters", &format!("{source}.parameters[{i}]"))?);
        }
        let merged = merge_parameters(shared, own);
        let parameters = self.parameters(path, &merged, &source);

        let request_body = match &op.request_body {
            Some(body) => Some(self.request_body(body, &source)?),
            None => None,
        };

        let responses = self.responses(&op.responses, &source);
        let primary_success = self.primary_success(&responses, &source);

        let has_required_input =
            parameters.iter().any(|p| p.required) || request_body.is_some();

        Some(Operation {
            path: path.to_string(),
            method,
            operation_id: op.operation_id,
            summary: op.summary.or_else(|| item.summary.clone()),
            description: op.description.or_else(|| item.description.clone()),
            tags: op.tags,
            deprecated: op.deprecated.unwrap_or(false),
            parameters,
            request_body,
            responses,
            primary_success,
            has_required_input,
            source,
        })
    }

    /// Path parameters in template order, then query parameters as declared.
    fn parameters(
        &mut self,
        path: &str,
        merged: &[parameter::Parameter],
        source: &str,
    ) -> Vec<Parameter> {
        let placeholders = template_params(path);
        let mut out = Vec::new();

        for name in &placeholders {
            let declared = merged
                .iter()
                .find(|p| p.location == RawLocation::Path && p.name == *name);
            match declared {
                Some(p) => {
                    if !p.required {
                        self.diags.push(Diagnostic::warning(
                            DiagnosticKind::SpecDefect,
                            source,
                            format!("path parameter `{name}` is not marked required; treating it as required"),
                        ));
                    }
                    out.push(self.parameter(p, ParameterLocation::Path, true, source));
                }
                None => {
                    self.diags.push(Diagnostic::warning(
                        DiagnosticKind::SpecDefect,
                        source,
                        format!("path parameter `{name}` is not declared; assuming a required string"),
                    ));
                    out.push(Parameter {
                        name: normalize_name(name),
                        original_name: name.to_string(),
                        location: ParameterLocation::Path,
                        required: true,
                        shape: Shape::Primitive(PrimitiveKind::String),
                        description: None,
                    });
                }
            }
        }

        for p in merged {
            match p.location {
                RawLocation::Path if !placeholders.contains(&p.name.as_str()) => {
                    self.diags.push(Diagnostic::warning(
                        DiagnosticKind::SpecDefect,
                        source,
                        format!("path parameter `{}` does not appear in the template; ignored", p.name),
                    ));
                }
                RawLocation::Path => {}
                RawLocation::Query => {
                    out.push(self.parameter(p, ParameterLocation::Query, p.required, source));
                }
                RawLocation::Header | RawLocation::Cookie => {
                    self.diags.push(Diagnostic::info(
                        DiagnosticKind::Unsupported,
                        source,
                        format!("{} parameter `{}` ignored", p.location.as_str(), p.name),
                    ));
                }
            }
        }
        out
    }

    fn parameter(
        &mut self,
        p: &parameter::Parameter,
        location: ParameterLocation,
        required: bool,
        source: &str,
    ) -> Parameter {
        let shape = match &p.schema {
            Some(schema) => self.registry.resolve(
                schema,
                &format!("{source}.parameters.{}", p.name),
                &mut self.diags,
            ),
            None => Shape::Opaque,
        };
        Parameter {
            name: normalize_name(&p.name),
            original_name: p.name.clone(),
            location,
            required,
            shape,
            description: p.description.clone(),
        }
    }

    fn request_body(
        &mut self,
        body: &RefOr<operation::RequestBody>,
        source: &str,
    ) -> Option<RequestBody> {
        let location = format!("{source}.requestBody");
        let body = self.follow(body, "requestBodies", &location)?;
        let Some((content_type, media)) = preferred_media_type(&body.content) else {
            self.diags.push(Diagnostic::spec_defect(
                &location,
                "request body declares no content; operation skipped",
            ));
            return None;
        };
        let shape = self.media_shape(media, &format!("{location}.content.{content_type}"));
        Some(RequestBody {
            shape,
            content_type: content_type.clone(),
            required: body.required,
            description: body.description.clone(),
        })
    }

    fn responses(
        &mut self,
        declared: &IndexMap<String, RefOr<operation::Response>>,
        source: &str,
    ) -> Vec<Response> {
        if declared.is_empty() {
            self.diags.push(Diagnostic::warning(
                DiagnosticKind::SpecDefect,
                source,
                "operation declares no responses",
            ));
        }

        let mut out = Vec::with_capacity(declared.len());
        for (key, raw) in declared {
            let location = format!("{source}.responses.{key}");
            let Some(status) = StatusCode::parse(key) else {
                self.diags.push(Diagnostic::warning(
                    DiagnosticKind::SpecDefect,
                    &location,
                    format!("`{key}` is not a status code; response skipped"),
                ));
                continue;
            };
            let Some(resp) = self.follow(raw, "responses", &location) else {
                continue;
            };
            let (body, content_type) = match preferred_media_type(&resp.content) {
                Some((ct, media)) => (
                    Some(self.media_shape(media, &format!("{location}.content.{ct}"))),
                    Some(ct.clone()),
                ),
                None => (None, None),
            };
            out.push(Response {
                status,
                body,
                content_type,
                description: resp.description.clone(),
            });
        }
        out
    }

    /// First declared 2xx wins; every further 2xx is reported.
    fn primary_success(&mut self, responses: &[Response], source: &str) -> Option<usize> {
        let mut successes = responses
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status.is_success());
        let (primary, chosen) = successes.next()?;
        for (_, extra) in successes {
            self.diags.push(Diagnostic::warning(
                DiagnosticKind::AmbiguousSuccess,
                format!("{source}.responses.{}", extra.status),
                format!(
                    "additional success response {}; {} is used as the primary success",
                    extra.status, chosen.status
                ),
            ));
        }
        Some(primary)
    }

    fn media_shape(&mut self, media: &MediaType, location: &str) -> Shape {
        match &media.schema {
            Some(schema) => self
                .registry
                .resolve(schema, &format!("{location}.schema"), &mut self.diags),
            None => Shape::Opaque,
        }
    }

    /// Follow a `$ref` into `components.{section}`, returning the decoded
    /// target. Dangling, undecodable or overlong chains are reported and
    /// yield `None`.
    fn follow<T>(&mut self, item: &RefOr<T>, section: &str, location: &str) -> Option<T>
    where
        T: DeserializeOwned + Clone,
    {
        let mut ref_path = match item {
            RefOr::Item(value) => return Some(value.clone()),
            RefOr::Ref { ref_path } => ref_path.clone(),
        };

        for _ in 0..MAX_REF_HOPS {
            let Some(raw) = parse_ref_name(&ref_path, section).and_then(|n| self.component(section, n))
            else {
                self.diags.push(Diagnostic::new(
                    Severity::Error,
                    DiagnosticKind::UnresolvedReference,
                    format!("reference `{ref_path}` does not resolve; entry skipped"),
                    location,
                ));
                return None;
            };
            match serde_json::from_value::<RefOr<T>>(raw.clone()) {
                Ok(RefOr::Item(value)) => return Some(value),
                Ok(RefOr::Ref { ref_path: next }) => ref_path = next,
                Err(e) => {
                    self.diags.push(Diagnostic::spec_defect(
                        location,
                        format!("`{ref_path}` could not be decoded: {e}; entry skipped"),
                    ));
                    return None;
                }
            }
        }

        self.diags.push(Diagnostic::spec_defect(
            location,
            format!("reference chain through `{ref_path}` is too long; entry skipped"),
        ));
        None
    }

    fn component(&self, section: &str, name: &str) -> Option<&'a Value> {
        let components = self.spec.components.as_ref()?;
        match section {
            "parameters" => components.parameters.get(name),
            "requestBodies" => components.request_bodies.get(name),
            "responses" => components.responses.get(name),
            _ => None,
        }
    }
}

/// Operation-level parameters replace path-level ones with the same name
/// and location, keeping the path-level position.
fn merge_parameters(
    shared: &[parameter::Parameter],
    own: Vec<parameter::Parameter>,
) -> Vec<parameter::Parameter> {
    let mut merged = shared.to_vec();
    for p in own {
        match merged
            .iter_mut()
            .find(|m| m.name == p.name && m.location == p.location)
        {
            Some(existing) => *existing = p,
            None => merged.push(p),
        }
    }
    merged
}

/// Placeholder names in a path template, in order of appearance.
/// e.g. "/files/{dir}/{name}.json" → ["dir", "name"]
pub fn template_params(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
        rest = &rest[start + len + 1..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_params() {
        assert_eq!(template_params("/products/{id}"), vec!["id"]);
        assert_eq!(
            template_params("/files/{dir}/{name}.json"),
            vec!["dir", "name"]
        );
        assert!(template_params("/health").is_empty());
        assert!(template_params("/broken/{id").is_empty());
    }

    #[test]
    fn test_merge_keeps_path_level_position() {
        let p = |name: &str, location, description: &str| parameter::Parameter {
            name: name.to_string(),
            location,
            description: Some(description.to_string()),
            required: false,
            schema: None,
        };
        let merged = merge_parameters(
            &[
                p("limit", RawLocation::Query, "shared"),
                p("id", RawLocation::Path, "shared"),
            ],
            vec![
                p("limit", RawLocation::Query, "own"),
                p("limit", RawLocation::Header, "own"),
            ],
        );
        let seen: Vec<_> = merged
            .iter()
            .map(|m| (m.name.as_str(), m.location, m.description.as_deref()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("limit", RawLocation::Query, Some("own")),
                ("id", RawLocation::Path, Some("shared")),
                ("limit", RawLocation::Header, Some("own")),
            ]
        );
    }
}
