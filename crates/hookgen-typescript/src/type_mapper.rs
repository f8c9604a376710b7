use hookgen_core::ir::{EnumLiteral, ObjectShape, PrimitiveKind, Shape, ShapeRegistry, StatusCode};
use hookgen_core::transform::naming::is_identifier;

/// Map a `Shape` to its TypeScript type string representation. References
/// render as the registered type name, so cyclic schemas stay finite.
pub fn shape_to_ts(shape: &Shape, registry: &ShapeRegistry) -> String {
    match shape {
        Shape::Primitive(kind) => primitive_to_ts(*kind).to_string(),
        Shape::Reference(name) => registry
            .type_name(name)
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string()),
        Shape::Opaque => "unknown".to_string(),
        Shape::Array(inner) => format!("{}[]", wrapped(inner, registry)),
        Shape::Map(value) => format!("Record<string, {}>", shape_to_ts(value, registry)),
        Shape::Enum(literals) => literals
            .iter()
            .map(literal_to_ts)
            .collect::<Vec<_>>()
            .join(" | "),
        Shape::Union(variants) => variants
            .iter()
            .map(|v| shape_to_ts(v, registry))
            .collect::<Vec<_>>()
            .join(" | "),
        Shape::Intersection(parts) => parts
            .iter()
            .map(|p| wrapped(p, registry))
            .collect::<Vec<_>>()
            .join(" & "),
        Shape::Object(obj) => object_to_ts(obj, registry),
    }
}

pub fn primitive_to_ts(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String | PrimitiveKind::DateTime => "string",
        PrimitiveKind::Number | PrimitiveKind::Integer => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Null => "null",
        PrimitiveKind::Binary => "Blob",
    }
}

pub fn literal_to_ts(literal: &EnumLiteral) -> String {
    match literal {
        EnumLiteral::String(s) => ts_string(s),
        EnumLiteral::Number(n) => n.clone(),
        EnumLiteral::Bool(b) => b.to_string(),
        EnumLiteral::Null => "null".to_string(),
    }
}

/// Inline object literal type. Declared fields and an open value shape
/// combine as an intersection so the index signature cannot conflict.
fn object_to_ts(obj: &ObjectShape, registry: &ShapeRegistry) -> String {
    let fields = if obj.fields.is_empty() {
        None
    } else {
        let members: Vec<String> = obj
            .fields
            .iter()
            .map(|f| {
                format!(
                    "{}{}{}: {}",
                    if f.read_only { "readonly " } else { "" },
                    property_key(&f.name),
                    if f.optional { "?" } else { "" },
                    shape_to_ts(&f.shape, registry)
                )
            })
            .collect();
        Some(format!("{{ {} }}", members.join("; ")))
    };
    let additional = obj
        .additional
        .as_ref()
        .map(|v| format!("Record<string, {}>", shape_to_ts(v, registry)));

    match (fields, additional) {
        (Some(f), Some(a)) => format!("{f} & {a}"),
        (Some(f), None) => f,
        (None, Some(a)) => a,
        (None, None) => "Record<string, never>".to_string(),
    }
}

/// Parenthesize compound types used as array elements or intersection members.
fn wrapped(shape: &Shape, registry: &ShapeRegistry) -> String {
    let ts = shape_to_ts(shape, registry);
    let compound = match shape {
        Shape::Union(v) | Shape::Intersection(v) => v.len() > 1,
        Shape::Enum(v) => v.len() > 1,
        Shape::Object(obj) => !obj.fields.is_empty() && obj.additional.is_some(),
        _ => false,
    };
    if compound { format!("({ts})") } else { ts }
}

/// An object key, quoted when it is not a plain identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        ts_string(name)
    }
}

/// A double-quoted TypeScript string literal.
pub fn ts_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// The literal type of a response status: `200`, `"2XX"` or `"default"`.
pub fn status_literal(status: StatusCode) -> String {
    match status {
        StatusCode::Code(code) => code.to_string(),
        other => ts_string(&other.to_string()),
    }
}
