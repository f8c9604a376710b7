use std::collections::HashSet;

use serde_json::Value;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{
    EnumLiteral, NamedShape, ObjectField, ObjectShape, PrimitiveKind, Shape, ShapeId,
    ShapeRegistry,
};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};
use crate::parse::{RefOr, parse_ref_name};

use super::naming::normalize_name;

/// Helper types declared next to the component types in the routes module.
/// Schemas normalizing to one of these are renamed.
pub const ROUTE_HELPER_NAMES: [&str; 9] = [
    "Routes",
    "RoutePath",
    "RouteMethod",
    "RouteEntry",
    "RouteParams",
    "RouteBody",
    "RouteResponse",
    "RouteSuccess",
    "RouteInput",
];

impl ShapeRegistry {
    /// Build the registry from the document's named schemas.
    ///
    /// Pass 1 registers every name before anything is resolved, so pass 2 can
    /// turn any reference, forward or cyclic, into [`Shape::Reference`].
    pub fn build<'a>(
        schemas: impl IntoIterator<Item = (&'a String, &'a Value)>,
        diags: &mut Diagnostics,
    ) -> Self {
        let schemas: Vec<(&String, &Value)> = schemas.into_iter().collect();
        let mut registry = ShapeRegistry::default();
        let mut taken: HashSet<String> =
            ROUTE_HELPER_NAMES.iter().map(|n| n.to_string()).collect();

        for (name, _) in &schemas {
            let type_name = unique_type_name(name, &mut taken, diags);
            registry
                .index
                .insert((*name).clone(), ShapeId(registry.entries.len()));
            registry.entries.push(NamedShape {
                name: (*name).clone(),
                type_name,
                description: None,
                shape: Shape::Opaque,
            });
        }

        for (i, (name, raw)) in schemas.iter().enumerate() {
            let location = format!("components.schemas.{name}");
            let (description, shape) = match serde_json::from_value::<SchemaOrRef>((*raw).clone())
            {
                Ok(fragment) => {
                    let description = match &fragment {
                        RefOr::Item(schema) => schema.description.clone(),
                        RefOr::Ref { .. } => None,
                    };
                    (description, registry.resolve(&fragment, &location, diags))
                }
                Err(e) => {
                    diags.push(Diagnostic::spec_defect(
                        &location,
                        format!("schema could not be decoded: {e}"),
                    ));
                    (None, Shape::Opaque)
                }
            };
            registry.entries[i].description = description;
            registry.entries[i].shape = shape;
        }

        registry.break_alias_cycles(diags);

        log::debug!("resolved {} named schemas", registry.len());
        registry
    }

    /// Degrade every schema whose chain of plain aliases leads back to itself.
    /// Such a chain names no structure and cannot be written as a type alias.
    fn break_alias_cycles(&mut self, diags: &mut Diagnostics) {
        let mut cyclic = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut current = &entry.shape;
            while let Shape::Reference(target) = current {
                if *target == entry.name {
                    cyclic.push(i);
                    break;
                }
                if !seen.insert(target.as_str()) {
                    break;
                }
                match self.get(target) {
                    Some(next) => current = &next.shape,
                    None => break,
                }
            }
        }

        for i in cyclic {
            let entry = &self.entries[i];
            let message = match &entry.shape {
                Shape::Reference(target) if *target == entry.name => {
                    "schema is an alias of itself; using an opaque shape".to_string()
                }
                Shape::Reference(target) => format!(
                    "schema aliases `{target}`, which leads back to it; using an opaque shape"
                ),
                _ => continue,
            };
            diags.push(Diagnostic::spec_defect(
                format!("components.schemas.{}", entry.name),
                message,
            ));
            self.entries[i].shape = Shape::Opaque;
        }
    }

    /// Resolve a schema fragment against the registry. References to named
    /// schemas are never followed, only recorded, so this always terminates.
    pub fn resolve(&self, fragment: &SchemaOrRef, location: &str, diags: &mut Diagnostics) -> Shape {
        match fragment {
            RefOr::Ref { ref_path } => self.resolve_ref(ref_path, location, diags),
            RefOr::Item(schema) => self.resolve_schema(schema, location, diags),
        }
    }

    /// Decode and resolve a raw JSON fragment. Undecodable input is a
    /// `SpecDefect` and resolves to `Opaque`.
    pub fn resolve_value(&self, raw: &Value, location: &str, diags: &mut Diagnostics) -> Shape {
        match serde_json::from_value::<SchemaOrRef>(raw.clone()) {
            Ok(fragment) => self.resolve(&fragment, location, diags),
            Err(e) => {
                diags.push(Diagnostic::spec_defect(
                    location,
                    format!("schema could not be decoded: {e}"),
                ));
                Shape::Opaque
            }
        }
    }

    fn resolve_ref(&self, ref_path: &str, location: &str, diags: &mut Diagnostics) -> Shape {
        match parse_ref_name(ref_path, "schemas") {
            Some(name) if self.contains(name) => Shape::Reference(name.to_string()),
            _ => {
                diags.push(Diagnostic::unresolved_reference(location, ref_path));
                Shape::Opaque
            }
        }
    }

    fn resolve_schema(&self, schema: &Schema, location: &str, diags: &mut Diagnostics) -> Shape {
        let shape = self.structural(schema, location, diags);
        if schema.nullable == Some(true) {
            shape.nullable()
        } else {
            shape
        }
    }

    fn structural(&self, schema: &Schema, location: &str, diags: &mut Diagnostics) -> Shape {
        if !schema.one_of.is_empty() {
            return self.union_of(&schema.one_of, &format!("{location}.oneOf"), diags);
        }
        if !schema.any_of.is_empty() {
            return self.union_of(&schema.any_of, &format!("{location}.anyOf"), diags);
        }
        if !schema.all_of.is_empty() {
            return self.all_of(schema, location, diags);
        }
        if !schema.enum_values.is_empty() {
            return enum_shape(&schema.enum_values);
        }
        if let Some(value) = &schema.const_value {
            return enum_shape(std::slice::from_ref(value));
        }

        match &schema.schema_type {
            Some(TypeSet::Single(t)) => self.by_type(*t, schema, location, diags),
            Some(TypeSet::Multiple(types)) => {
                let has_null = types.contains(&SchemaType::Null);
                let mut variants: Vec<Shape> = types
                    .iter()
                    .filter(|t| **t != SchemaType::Null)
                    .map(|t| self.by_type(*t, schema, location, diags))
                    .collect();
                let shape = match variants.len() {
                    0 => Shape::Primitive(PrimitiveKind::Null),
                    1 => variants.remove(0),
                    _ => Shape::Union(variants),
                };
                if has_null { shape.nullable() } else { shape }
            }
            None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
                self.object(schema, location, diags)
            }
            None if schema.items.is_some() => self.by_type(SchemaType::Array, schema, location, diags),
            None => Shape::Opaque,
        }
    }

    fn by_type(
        &self,
        t: SchemaType,
        schema: &Schema,
        location: &str,
        diags: &mut Diagnostics,
    ) -> Shape {
        match t {
            SchemaType::String => match schema.format.as_deref() {
                Some("date-time" | "date") => Shape::Primitive(PrimitiveKind::DateTime),
                Some("binary") => Shape::Primitive(PrimitiveKind::Binary),
                _ => Shape::Primitive(PrimitiveKind::String),
            },
            SchemaType::Number => Shape::Primitive(PrimitiveKind::Number),
            SchemaType::Integer => Shape::Primitive(PrimitiveKind::Integer),
            SchemaType::Boolean => Shape::Primitive(PrimitiveKind::Boolean),
            SchemaType::Null => Shape::Primitive(PrimitiveKind::Null),
            SchemaType::Array => {
                let element = match &schema.items {
                    Some(items) => self.resolve(items, &format!("{location}.items"), diags),
                    None => Shape::Opaque,
                };
                Shape::Array(Box::new(element))
            }
            SchemaType::Object => self.object(schema, location, diags),
        }
    }

    fn object(&self, schema: &Schema, location: &str, diags: &mut Diagnostics) -> Shape {
        let fields: Vec<ObjectField> = schema
            .properties
            .iter()
            .map(|(name, prop)| {
                let (description, read_only) = match prop {
                    RefOr::Item(s) => (s.description.clone(), s.read_only.unwrap_or(false)),
                    RefOr::Ref { .. } => (None, false),
                };
                ObjectField {
                    name: name.clone(),
                    shape: self.resolve(prop, &format!("{location}.properties.{name}"), diags),
                    optional: !schema.required.contains(name),
                    description,
                    read_only,
                }
            })
            .collect();

        let additional = match &schema.additional_properties {
            Some(AdditionalProperties::Schema(s)) => Some(Box::new(self.resolve(
                s,
                &format!("{location}.additionalProperties"),
                diags,
            ))),
            Some(AdditionalProperties::Bool(true)) => Some(Box::new(Shape::Opaque)),
            Some(AdditionalProperties::Bool(false)) => None,
            // A bare `type: object` is an open map.
            None if fields.is_empty() => Some(Box::new(Shape::Opaque)),
            None => None,
        };

        match additional {
            Some(value) if fields.is_empty() => Shape::Map(value),
            additional => Shape::Object(ObjectShape { fields, additional }),
        }
    }

    fn union_of(&self, members: &[SchemaOrRef], location: &str, diags: &mut Diagnostics) -> Shape {
        let mut variants: Vec<Shape> = Vec::new();
        for (i, member) in members.iter().enumerate() {
            let shape = self.resolve(member, &format!("{location}[{i}]"), diags);
            if !variants.contains(&shape) {
                variants.push(shape);
            }
        }
        if variants.iter().any(Shape::is_opaque) {
            return Shape::Opaque;
        }
        match variants.len() {
            1 => variants.remove(0),
            _ => Shape::Union(variants),
        }
    }

    /// Inline object members merge into one object; anything else becomes an
    /// intersection. Sibling `properties` count as one more inline member.
    fn all_of(&self, schema: &Schema, location: &str, diags: &mut Diagnostics) -> Shape {
        let mut members: Vec<Shape> = Vec::new();
        for (i, member) in schema.all_of.iter().enumerate() {
            match self.resolve(member, &format!("{location}.allOf[{i}]"), diags) {
                Shape::Opaque => {}
                Shape::Intersection(nested) => members.extend(nested),
                shape => members.push(shape),
            }
        }
        if !schema.properties.is_empty() {
            members.push(self.object(schema, location, diags));
        }

        let mut merged: Option<ObjectShape> = None;
        let mut rest: Vec<Shape> = Vec::new();
        for member in members {
            match (member, merged.as_mut()) {
                (Shape::Object(obj), Some(acc)) => merge_object(acc, obj),
                (Shape::Object(obj), None) => merged = Some(obj),
                (other, _) => rest.push(other),
            }
        }

        let mut parts: Vec<Shape> = rest;
        if let Some(obj) = merged {
            parts.push(Shape::Object(obj));
        }
        match parts.len() {
            0 => Shape::Opaque,
            1 => parts.remove(0),
            _ => Shape::Intersection(parts),
        }
    }
}

fn merge_object(acc: &mut ObjectShape, next: ObjectShape) {
    for field in next.fields {
        match acc.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => acc.fields.push(field),
        }
    }
    if next.additional.is_some() {
        acc.additional = next.additional;
    }
}

fn enum_shape(values: &[Value]) -> Shape {
    let literals: Vec<EnumLiteral> = values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(EnumLiteral::String(s.clone())),
            Value::Number(n) => Some(EnumLiteral::Number(n.to_string())),
            Value::Bool(b) => Some(EnumLiteral::Bool(*b)),
            Value::Null => Some(EnumLiteral::Null),
            Value::Array(_) | Value::Object(_) => None,
        })
        .collect();
    if literals.is_empty() {
        Shape::Opaque
    } else {
        Shape::Enum(literals)
    }
}

/// PascalCase identifier for a schema, suffixed when two document names
/// normalize to the same identifier.
fn unique_type_name(name: &str, taken: &mut HashSet<String>, diags: &mut Diagnostics) -> String {
    let base = normalize_name(name).pascal_case;
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}{n}");
        n += 1;
    }
    if candidate != base {
        diags.push(Diagnostic::warning(
            DiagnosticKind::NameCollision,
            format!("components.schemas.{name}"),
            format!("type name `{base}` is already taken; using `{candidate}`"),
        ));
    }
    taken.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde_json::json;

    use super::*;

    fn registry(schemas: Value) -> (ShapeRegistry, Diagnostics) {
        let map: IndexMap<String, Value> = serde_json::from_value(schemas).unwrap();
        let mut diags = Diagnostics::new();
        let registry = ShapeRegistry::build(&map, &mut diags);
        (registry, diags)
    }

    fn field<'a>(shape: &'a Shape, name: &str) -> &'a ObjectField {
        match shape {
            Shape::Object(obj) => obj.fields.iter().find(|f| f.name == name).unwrap(),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_stays_a_reference() {
        let (reg, diags) = registry(json!({
            "Category": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string" },
                    "parent": { "$ref": "#/components/schemas/Category" }
                }
            }
        }));
        assert!(diags.is_empty());
        let category = reg.get("Category").unwrap();
        let parent = field(&category.shape, "parent");
        assert!(parent.optional);
        assert_eq!(parent.shape, Shape::Reference("Category".to_string()));
        assert_eq!(reg.reachable_from(&category.shape), vec!["Category"]);
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let (reg, diags) = registry(json!({
            "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
        }));
        assert!(diags.is_empty());
        let root = Shape::Reference("A".to_string());
        assert_eq!(reg.reachable_from(&root), vec!["A", "B"]);
    }

    #[test]
    fn test_dangling_reference_is_opaque_with_diagnostic() {
        let (reg, diags) = registry(json!({
            "Order": { "type": "object", "properties": { "pet": { "$ref": "#/components/schemas/Pet" } } }
        }));
        let order = reg.get("Order").unwrap();
        assert_eq!(field(&order.shape, "pet").shape, Shape::Opaque);
        let d: Vec<_> = diags.of_kind(DiagnosticKind::UnresolvedReference).collect();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].locations, vec!["components.schemas.Order.properties.pet"]);
    }

    #[test]
    fn test_optional_and_nullable_are_distinct() {
        let (reg, _) = registry(json!({
            "User": {
                "type": "object",
                "required": ["nickname"],
                "properties": {
                    "nickname": { "type": "string", "nullable": true },
                    "email": { "type": ["string", "null"] },
                    "age": { "type": "integer" }
                }
            }
        }));
        let user = &reg.get("User").unwrap().shape;
        let nullable_string = Shape::Union(vec![
            Shape::Primitive(PrimitiveKind::String),
            Shape::Primitive(PrimitiveKind::Null),
        ]);

        let nickname = field(user, "nickname");
        assert!(!nickname.optional);
        assert_eq!(nickname.shape, nullable_string);

        let email = field(user, "email");
        assert!(email.optional);
        assert_eq!(email.shape, nullable_string);

        let age = field(user, "age");
        assert!(age.optional);
        assert_eq!(age.shape, Shape::Primitive(PrimitiveKind::Integer));
    }

    #[test]
    fn test_unstructured_fragment_is_opaque() {
        let (reg, _) = registry(json!({ "Anything": { "description": "free-form" } }));
        let any = reg.get("Anything").unwrap();
        assert_eq!(any.shape, Shape::Opaque);
        assert_eq!(any.description.as_deref(), Some("free-form"));
    }

    #[test]
    fn test_all_of_merges_inline_and_keeps_references() {
        let (reg, _) = registry(json!({
            "Base": { "type": "object", "properties": { "id": { "type": "string" } } },
            "Merged": {
                "allOf": [
                    { "type": "object", "properties": { "a": { "type": "string" } } },
                    { "type": "object", "properties": { "b": { "type": "number" } } }
                ]
            },
            "Extended": {
                "allOf": [
                    { "$ref": "#/components/schemas/Base" },
                    { "type": "object", "properties": { "extra": { "type": "boolean" } } }
                ]
            }
        }));

        match &reg.get("Merged").unwrap().shape {
            Shape::Object(obj) => {
                let names: Vec<_> = obj.fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("expected object, got {other:?}"),
        }

        match &reg.get("Extended").unwrap().shape {
            Shape::Intersection(parts) => {
                assert_eq!(parts[0], Shape::Reference("Base".to_string()));
                assert!(matches!(parts[1], Shape::Object(_)));
            }
            other => panic!("expected intersection, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_and_map() {
        let (reg, _) = registry(json!({
            "Status": { "type": "string", "enum": ["available", "sold"] },
            "Counts": { "type": "object", "additionalProperties": { "type": "integer" } }
        }));
        assert_eq!(
            reg.get("Status").unwrap().shape,
            Shape::Enum(vec![
                EnumLiteral::String("available".to_string()),
                EnumLiteral::String("sold".to_string()),
            ])
        );
        assert_eq!(
            reg.get("Counts").unwrap().shape,
            Shape::Map(Box::new(Shape::Primitive(PrimitiveKind::Integer)))
        );
    }

    #[test]
    fn test_undecodable_schema_is_reported_and_others_survive() {
        let (reg, diags) = registry(json!({
            "Broken": { "type": "banana" },
            "Fine": { "type": "string" }
        }));
        assert_eq!(reg.get("Broken").unwrap().shape, Shape::Opaque);
        assert_eq!(
            reg.get("Fine").unwrap().shape,
            Shape::Primitive(PrimitiveKind::String)
        );
        assert_eq!(diags.of_kind(DiagnosticKind::SpecDefect).count(), 1);
    }

    #[test]
    fn test_alias_cycle_is_opaque_with_diagnostic() {
        let (reg, diags) = registry(json!({
            "A": { "$ref": "#/components/schemas/B" },
            "B": { "$ref": "#/components/schemas/A" },
            "C": { "$ref": "#/components/schemas/A" },
            "Loop": { "$ref": "#/components/schemas/Loop" }
        }));
        assert_eq!(reg.get("A").unwrap().shape, Shape::Opaque);
        assert_eq!(reg.get("B").unwrap().shape, Shape::Opaque);
        assert_eq!(reg.get("Loop").unwrap().shape, Shape::Opaque);
        assert_eq!(
            reg.get("C").unwrap().shape,
            Shape::Reference("A".to_string())
        );

        let defects: Vec<_> = diags.of_kind(DiagnosticKind::SpecDefect).collect();
        let locations: Vec<_> = defects.iter().map(|d| d.locations[0].as_str()).collect();
        assert_eq!(
            locations,
            vec![
                "components.schemas.A",
                "components.schemas.B",
                "components.schemas.Loop"
            ]
        );
        assert!(defects[0].message.contains("`B`"));
    }

    #[test]
    fn test_alias_chain_without_cycle_is_kept() {
        let (reg, diags) = registry(json!({
            "Id": { "$ref": "#/components/schemas/Uuid" },
            "Uuid": { "type": "string", "format": "uuid" }
        }));
        assert!(diags.is_empty());
        assert_eq!(
            reg.get("Id").unwrap().shape,
            Shape::Reference("Uuid".to_string())
        );
    }

    #[test]
    fn test_route_helper_names_are_reserved() {
        let (reg, diags) = registry(json!({
            "Routes": { "type": "object" },
            "route_input": { "type": "string" },
            "Route": { "type": "string" }
        }));
        assert_eq!(reg.type_name("Routes"), Some("Routes2"));
        assert_eq!(reg.type_name("route_input"), Some("RouteInput2"));
        assert_eq!(reg.type_name("Route"), Some("Route"));
        assert_eq!(diags.of_kind(DiagnosticKind::NameCollision).count(), 2);
    }

    #[test]
    fn test_type_name_clash_gets_suffix() {
        let (reg, diags) = registry(json!({
            "pet": { "type": "string" },
            "Pet": { "type": "string" }
        }));
        assert_eq!(reg.type_name("pet"), Some("Pet"));
        assert_eq!(reg.type_name("Pet"), Some("Pet2"));
        assert_eq!(diags.of_kind(DiagnosticKind::NameCollision).count(), 1);
    }
}
