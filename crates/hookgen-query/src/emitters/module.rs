use std::collections::{BTreeMap, BTreeSet};

use minijinja::{Environment, context};

use hookgen_core::GeneratedFile;
use hookgen_core::config::GeneratorConfig;
use hookgen_core::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use hookgen_core::ir::{ApiModel, ResourceGroup};
use hookgen_core::transform::{check_unique, derive_names};
use hookgen_typescript::RenderError;
use hookgen_typescript::type_mapper::ts_string;

use super::operation::{OperationBinding, emit_operation};
use crate::flavor::FlavorConfig;

/// Emit `{flavor}/{group}.ts` for one resource group.
///
/// Returns `None` when nothing in the group applies to the flavor, or when two
/// operations would export the same identifier; the collision is recorded in
/// `diags` and the module is left out rather than emitted broken.
pub fn emit_module(
    env: &Environment<'_>,
    api: &ApiModel,
    group: &ResourceGroup,
    flavor: &FlavorConfig,
    config: &GeneratorConfig,
    diags: &mut Diagnostics,
) -> Result<Option<GeneratedFile>, RenderError> {
    let path = format!("{}/{}.ts", flavor.dir(), group.file_stem());

    let mut bindings = Vec::with_capacity(group.operation_indices.len());
    for &index in &group.operation_indices {
        let op = &api.operations[index];
        let (supported, kind) = if op.method.is_query() {
            (flavor.supports_query, "query")
        } else {
            (flavor.supports_mutation, "mutation")
        };
        if !supported {
            diags.push(Diagnostic::info(
                DiagnosticKind::Unsupported,
                op.source.clone(),
                format!("{} has no {kind} primitive; no binding emitted", flavor.id),
            ));
            continue;
        }
        let names = derive_names(op, &config.naming);
        bindings.push(emit_operation(env, op, &names, flavor)?);
    }

    if bindings.is_empty() {
        return Ok(None);
    }

    let exported = bindings.iter().flat_map(|b| {
        b.exports
            .iter()
            .map(move |name| (name.as_str(), b.source.as_str()))
    });
    if let Err(err) = check_unique(&path, exported) {
        log::warn!("{err}");
        diags.push(Diagnostic::from(&err));
        return Ok(None);
    }

    let tmpl = env.get_template("bindings.ts.j2")?;
    let content = tmpl.render(context! {
        flavor => flavor.id.as_str(),
        imports => import_lines(&bindings, config),
        blocks => bindings.iter().map(|b| b.code.as_str()).collect::<Vec<_>>(),
    })?;

    log::debug!("rendered {path} with {} operations", bindings.len());

    Ok(Some(GeneratedFile { path, content }))
}

#[derive(Debug, Default)]
struct ModuleImports {
    default: Option<&'static str>,
    values: BTreeSet<&'static str>,
    types: BTreeSet<&'static str>,
}

/// Library imports sorted by module, then the client, then the route types.
fn import_lines(bindings: &[OperationBinding], config: &GeneratorConfig) -> Vec<String> {
    let mut libraries: BTreeMap<&'static str, ModuleImports> = BTreeMap::new();
    let mut client: BTreeSet<&'static str> = BTreeSet::from(["client"]);
    let mut routes: BTreeSet<&'static str> = BTreeSet::new();

    for binding in bindings {
        for value in &binding.values {
            let entry = libraries.entry(value.module).or_default();
            if value.default_export {
                entry.default = Some(value.name);
            } else {
                entry.values.insert(value.name);
            }
        }
        for ty in &binding.types {
            libraries.entry(ty.module).or_default().types.insert(ty.name);
        }
        routes.extend(binding.route_helpers.iter().copied());
        if binding.uses_build_url {
            client.insert("buildUrl");
        }
    }

    let mut lines = Vec::new();
    for (module, imports) in &libraries {
        let module = ts_string(module);
        let named = braced(&imports.values);
        match (imports.default, named) {
            (Some(default), Some(named)) => {
                lines.push(format!("import {default}, {named} from {module};"))
            }
            (Some(default), None) => lines.push(format!("import {default} from {module};")),
            (None, Some(named)) => lines.push(format!("import {named} from {module};")),
            (None, None) => {}
        }
        if let Some(types) = braced(&imports.types) {
            lines.push(format!("import type {types} from {module};"));
        }
    }
    if let Some(named) = braced(&client) {
        lines.push(format!(
            "import {named} from {};",
            ts_string(&config.client_import())
        ));
    }
    if let Some(types) = braced(&routes) {
        lines.push(format!(
            "import type {types} from {};",
            ts_string(&config.routes_import())
        ));
    }
    lines
}

fn braced(names: &BTreeSet<&'static str>) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let joined: Vec<&str> = names.iter().copied().collect();
    Some(format!("{{ {} }}", joined.join(", ")))
}
