use indexmap::IndexMap;

use super::operations::Operation;
use super::types::NormalizedName;
use crate::transform::naming::normalize_name;

/// Operations sharing a first static path segment. One binding module is
/// emitted per group and flavor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub name: NormalizedName,
    /// Indices into `ApiModel::operations`.
    pub operation_indices: Vec<usize>,
}

impl ResourceGroup {
    /// File stem for the group's module, e.g. `pet-store` → `petStore`.
    pub fn file_stem(&self) -> &str {
        &self.name.camel_case
    }
}

/// Group operations by resource, in first-seen order.
///
/// Segments that normalize to the same file stem (`/pet-store`, `/pet_store`,
/// `/PetStore`) share one group, named after the first segment seen.
pub fn group_by_resource(operations: &[Operation]) -> Vec<ResourceGroup> {
    let mut groups: IndexMap<String, ResourceGroup> = IndexMap::new();

    for (i, op) in operations.iter().enumerate() {
        let name = normalize_name(&resource_of(&op.path));
        groups
            .entry(name.camel_case.clone())
            .or_insert_with(|| ResourceGroup {
                name,
                operation_indices: Vec::new(),
            })
            .operation_indices
            .push(i);
    }

    groups.into_values().collect()
}

/// The first static path segment, or `default`.
/// e.g. "/pets/{petId}" → "pets", "/{tenant}/users" → "users"
pub fn resource_of(path: &str) -> String {
    path.split('/')
        .find(|s| !s.is_empty() && !s.starts_with('{'))
        .unwrap_or("default")
        .to_string()
}
