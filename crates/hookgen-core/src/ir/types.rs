use std::fmt;

use super::operations::Operation;
use super::shapes::ShapeRegistry;

/// The normalized, generator-ready view of an OpenAPI document.
#[derive(Debug, Clone, Default)]
pub struct ApiModel {
    pub info: ApiInfo,
    pub registry: ShapeRegistry,
    /// Operations in document order: paths as declared, then methods as declared.
    pub operations: Vec<Operation>,
}

/// API metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

impl ApiModel {
    pub fn queries(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.method.is_query())
    }

    pub fn mutations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| !op.method.is_query())
    }

    /// Distinct paths in first-seen order.
    pub fn paths(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for op in &self.operations {
            if !out.contains(&op.path.as_str()) {
                out.push(&op.path);
            }
        }
        out
    }
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
