use hookgen_core::config::GeneratorConfig;
use hookgen_core::ir::ApiModel;
use hookgen_core::{CodeGenerator, GenerationReport};

use crate::emitters;
use crate::error::RenderError;

/// Emits the whole-document modules: route types and the client factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptGenerator;

impl CodeGenerator for TypeScriptGenerator {
    type Error = RenderError;

    fn generate(
        &self,
        api: &ApiModel,
        config: &GeneratorConfig,
    ) -> Result<GenerationReport, RenderError> {
        let files = vec![
            emitters::routes::emit_routes(api, &config.routes_file)?,
            emitters::client::emit_client(config)?,
        ];
        Ok(GenerationReport {
            files,
            diagnostics: Vec::new(),
        })
    }
}
