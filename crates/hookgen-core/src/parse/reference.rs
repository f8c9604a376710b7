use serde::Deserialize;

/// Either a `$ref` pointer or an inline value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Item(T),
}

/// Extract the component name from a local pointer such as
/// `#/components/schemas/Foo`. Returns `None` for pointers into any other
/// section or for external references.
pub fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Option<&'a str> {
    let stripped = ref_path.strip_prefix("#/components/")?;
    let (section, name) = stripped.split_once('/')?;
    if section != expected_section || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref_name() {
        assert_eq!(
            parse_ref_name("#/components/schemas/Pet", "schemas"),
            Some("Pet")
        );
        assert_eq!(parse_ref_name("#/components/schemas/Pet", "parameters"), None);
        assert_eq!(parse_ref_name("other.yaml#/Pet", "schemas"), None);
        assert_eq!(parse_ref_name("#/components/schemas/", "schemas"), None);
        assert_eq!(parse_ref_name("#/components/schemas/A/b", "schemas"), None);
    }

    #[test]
    fn test_ref_or_prefers_ref() {
        let value = serde_json::json!({ "$ref": "#/components/schemas/Pet", "description": "x" });
        let parsed: RefOr<serde_json::Value> = serde_json::from_value(value).unwrap();
        assert_eq!(
            parsed,
            RefOr::Ref {
                ref_path: "#/components/schemas/Pet".to_string()
            }
        );
    }
}
