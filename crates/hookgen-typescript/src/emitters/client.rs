use minijinja::context;

use hookgen_core::GeneratedFile;
use hookgen_core::config::GeneratorConfig;

use super::template_env;
use crate::error::RenderError;
use crate::type_mapper::ts_string;

/// Emit the client factory bound to the route types. Independent of the
/// document: only the base path and module names vary.
pub fn emit_client(config: &GeneratorConfig) -> Result<GeneratedFile, RenderError> {
    let env = template_env("client.ts.j2", include_str!("../../templates/client.ts.j2"))?;
    let tmpl = env.get_template("client.ts.j2")?;

    let content = tmpl.render(context! {
        routes_import => config.routes_import_from_client(),
        base_path => ts_string(&config.base_path),
    })?;

    Ok(GeneratedFile {
        path: config.client_file.clone(),
        content,
    })
}
