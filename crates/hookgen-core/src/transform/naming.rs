use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::NameCollisionError;
use crate::ir::{NormalizedName, Operation};

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
    }
}

/// User overrides applied while deriving names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingOptions {
    /// Prepended to every `Base`.
    pub prefix: String,
    /// Replacement `Base` keyed by operationId or by `METHOD /path`.
    pub aliases: IndexMap<String, String>,
}

/// Every identifier generated for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameFamily {
    pub base: String,
    pub verb: &'static str,
    /// `{Verb}{Base}`
    pub operation: String,
    pub query_key: String,
    pub mutation_key: String,
    pub query_options: String,
    pub mutation_options: String,
    pub query_overrides: String,
    pub mutation_overrides: String,
    pub args_type: String,
    pub variables_type: String,
}

impl NameFamily {
    /// The exported hook or primitive wrapper, e.g. `useGetProductsId`.
    pub fn wrapper(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.operation)
    }
}

/// Derive the name family for an operation.
///
/// `GET /products/{id}` → base `ProductsId`, operation `GetProductsId`,
/// `getGetProductsIdQueryKey`, `GetProductsIdArgs`, ...
pub fn derive_names(op: &Operation, options: &NamingOptions) -> NameFamily {
    let aliased = op
        .operation_id
        .as_deref()
        .and_then(|id| options.aliases.get(id))
        .or_else(|| options.aliases.get(&op.route_key()));

    let base = match aliased {
        Some(alias) => alias.to_pascal_case(),
        None => path_base(&op.path),
    };
    let base = format!("{}{base}", options.prefix.to_pascal_case());
    let verb = op.method.verb();
    let operation = format!("{verb}{base}");

    NameFamily {
        query_key: format!("get{operation}QueryKey"),
        mutation_key: format!("get{operation}MutationKey"),
        query_options: format!("get{operation}QueryOptions"),
        mutation_options: format!("get{operation}MutationOptions"),
        query_overrides: format!("{operation}QueryOverrides"),
        mutation_overrides: format!("{operation}MutationOverrides"),
        args_type: format!("{operation}Args"),
        variables_type: format!("{operation}Variables"),
        base,
        verb,
        operation,
    }
}

/// PascalCase every path segment, parameters included, and concatenate.
/// e.g. "/products/{id}" → "ProductsId", "/" → "Root"
pub fn path_base(path: &str) -> String {
    let base: String = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|seg| {
            seg.trim_start_matches('{')
                .trim_end_matches('}')
                .to_pascal_case()
        })
        .collect();

    if base.is_empty() {
        "Root".to_string()
    } else {
        base
    }
}

/// Fail on the first name derived twice within `file`. Entries are
/// `(name, source location)` pairs.
pub fn check_unique<'a>(
    file: &str,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), NameCollisionError> {
    let mut seen: IndexMap<&str, &str> = IndexMap::new();
    for (name, source) in entries {
        if let Some(first) = seen.insert(name, source) {
            return Err(NameCollisionError {
                file: file.to_string(),
                name: name.to_string(),
                first: first.to_string(),
                second: source.to_string(),
            });
        }
    }
    Ok(())
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

/// True for names usable as a TypeScript identifier as-is.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::HttpMethod;

    fn op(method: HttpMethod, path: &str) -> Operation {
        Operation {
            path: path.to_string(),
            method,
            operation_id: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
            primary_success: None,
            has_required_input: false,
            source: format!("paths.{path}.{}", method.as_lower()),
        }
    }

    #[test]
    fn test_simple_name() {
        let n = normalize_name("listModels");
        assert_eq!(n.pascal_case, "ListModels");
        assert_eq!(n.camel_case, "listModels");
        assert_eq!(n.snake_case, "list_models");
    }

    #[test]
    fn test_kebab_case() {
        let n = normalize_name("pet-store");
        assert_eq!(n.pascal_case, "PetStore");
        assert_eq!(n.camel_case, "petStore");
    }

    #[test]
    fn test_special_chars() {
        let n = normalize_name("application/json");
        assert_eq!(n.pascal_case, "ApplicationJson");
    }

    #[test]
    fn test_path_base() {
        assert_eq!(path_base("/products/{id}"), "ProductsId");
        assert_eq!(path_base("/users/{user_id}/order-items"), "UsersUserIdOrderItems");
        assert_eq!(path_base("/"), "Root");
    }

    #[test]
    fn test_same_path_differs_only_by_verb() {
        let options = NamingOptions::default();
        let get = derive_names(&op(HttpMethod::Get, "/products/{id}"), &options);
        let put = derive_names(&op(HttpMethod::Put, "/products/{id}"), &options);

        assert_eq!(get.base, "ProductsId");
        assert_eq!(put.base, "ProductsId");
        assert_eq!(get.operation, "GetProductsId");
        assert_eq!(put.operation, "PutProductsId");
        assert_eq!(get.query_key, "getGetProductsIdQueryKey");
        assert_eq!(put.mutation_key, "getPutProductsIdMutationKey");
        assert_eq!(get.wrapper("use"), "useGetProductsId");
        assert_eq!(put.wrapper("create"), "createPutProductsId");
    }

    #[test]
    fn test_alias_and_prefix() {
        let mut options = NamingOptions {
            prefix: "shop".to_string(),
            aliases: IndexMap::new(),
        };
        options
            .aliases
            .insert("GET /products/{id}".to_string(), "product".to_string());

        let names = derive_names(&op(HttpMethod::Get, "/products/{id}"), &options);
        assert_eq!(names.base, "ShopProduct");
        assert_eq!(names.operation, "GetShopProduct");

        let mut with_id = op(HttpMethod::Get, "/items");
        with_id.operation_id = Some("listItems".to_string());
        options
            .aliases
            .insert("listItems".to_string(), "allItems".to_string());
        assert_eq!(derive_names(&with_id, &options).base, "ShopAllItems");
    }

    #[test]
    fn test_check_unique_reports_both_locations() {
        let err = check_unique(
            "react-query/pets.ts",
            [
                ("GetPets", "paths./pets.get"),
                ("PostPets", "paths./pets.post"),
                ("GetPets", "paths./Pets.get"),
            ],
        )
        .unwrap_err();
        assert_eq!(err.name, "GetPets");
        assert_eq!(err.first, "paths./pets.get");
        assert_eq!(err.second, "paths./Pets.get");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("petId"));
        assert!(is_identifier("_x$"));
        assert!(!is_identifier("pet-id"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
    }
}
