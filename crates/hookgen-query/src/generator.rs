use hookgen_core::config::GeneratorConfig;
use hookgen_core::diagnostic::Diagnostics;
use hookgen_core::ir::{ApiModel, group_by_resource};
use hookgen_core::{CodeGenerator, GenerationReport};
use hookgen_typescript::RenderError;

use crate::emitters;
use crate::flavor::flavor;

/// Emits one binding module per configured flavor and resource group.
///
/// Modules import the route types and client produced by
/// [`hookgen_typescript::TypeScriptGenerator`] and nothing else generated.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryGenerator;

impl CodeGenerator for QueryGenerator {
    type Error = RenderError;

    fn generate(
        &self,
        api: &ApiModel,
        config: &GeneratorConfig,
    ) -> Result<GenerationReport, RenderError> {
        let env = emitters::binding_env()?;
        let groups = group_by_resource(&api.operations);
        let mut diags = Diagnostics::new();
        let mut files = Vec::new();

        for &id in &config.flavors {
            let flavor = flavor(id);
            let before = files.len();
            for group in &groups {
                if let Some(file) =
                    emitters::module::emit_module(&env, api, group, flavor, config, &mut diags)?
                {
                    files.push(file);
                }
            }
            log::info!("{id}: {} modules", files.len() - before);
        }

        Ok(GenerationReport {
            files,
            diagnostics: diags.into_vec(),
        })
    }
}
