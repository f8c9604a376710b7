pub mod config;
pub mod diagnostic;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

use diagnostic::Diagnostic;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory, `/`-separated.
    pub path: String,
    pub content: String,
}

/// Files a generator produced plus everything it had to report. A file that
/// could not be produced is absent from `files` and explained in `diagnostics`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub files: Vec<GeneratedFile>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn merge(&mut self, other: GenerationReport) {
        self.files.extend(other.files);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Trait for code generators that produce files from the normalized model.
pub trait CodeGenerator {
    type Error: std::error::Error;
    fn generate(
        &self,
        api: &ir::ApiModel,
        config: &config::GeneratorConfig,
    ) -> Result<GenerationReport, Self::Error>;
}
