use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

/// Scalar kinds a schema can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    DateTime,
    Binary,
}

/// A literal value admitted by an enum or const schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumLiteral {
    String(String),
    /// Kept in its source spelling so literals compare exactly.
    Number(String),
    Bool(bool),
    Null,
}

/// The resolved structural type of a schema fragment.
///
/// Named component schemas are never embedded by value; they are always
/// reached through [`Shape::Reference`], so every walk over a shape is finite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Primitive(PrimitiveKind),
    Object(ObjectShape),
    Array(Box<Shape>),
    Union(Vec<Shape>),
    /// `allOf` members that cannot be merged into one object.
    Intersection(Vec<Shape>),
    Enum(Vec<EnumLiteral>),
    Map(Box<Shape>),
    /// A named component schema, by its document name.
    Reference(String),
    Opaque,
}

/// An object with fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObjectShape {
    pub fields: Vec<ObjectField>,
    /// Value shape for keys beyond the declared fields.
    pub additional: Option<Box<Shape>>,
}

/// One object member. `optional` records absence; a nullable value is a
/// union with `Null` in `shape`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectField {
    pub name: String,
    pub shape: Shape,
    pub optional: bool,
    pub description: Option<String>,
    pub read_only: bool,
}

impl Shape {
    pub fn is_opaque(&self) -> bool {
        matches!(self, Shape::Opaque)
    }

    /// Wrap in a union with `null`, flattening an existing union.
    pub fn nullable(self) -> Shape {
        match self {
            Shape::Union(mut variants) => {
                if !variants.contains(&Shape::Primitive(PrimitiveKind::Null)) {
                    variants.push(Shape::Primitive(PrimitiveKind::Null));
                }
                Shape::Union(variants)
            }
            Shape::Primitive(PrimitiveKind::Null) | Shape::Opaque => self,
            other => Shape::Union(vec![other, Shape::Primitive(PrimitiveKind::Null)]),
        }
    }

    /// Names of components referenced directly by this shape, in first-seen order.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Shape::Reference(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Shape::Array(inner) | Shape::Map(inner) => inner.collect_references(out),
            Shape::Union(variants) | Shape::Intersection(variants) => {
                for v in variants {
                    v.collect_references(out);
                }
            }
            Shape::Object(obj) => {
                for f in &obj.fields {
                    f.shape.collect_references(out);
                }
                if let Some(additional) = &obj.additional {
                    additional.collect_references(out);
                }
            }
            Shape::Primitive(_) | Shape::Enum(_) | Shape::Opaque => {}
        }
    }
}

/// Index of an entry in the [`ShapeRegistry`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) usize);

/// A named component schema after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedShape {
    /// Name as written in the document.
    pub name: String,
    /// Unique PascalCase identifier used in generated code.
    pub type_name: String,
    pub description: Option<String>,
    pub shape: Shape,
}

/// Arena of every named component schema, indexed by document name.
///
/// Built once by [`ShapeRegistry::build`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeRegistry {
    pub(crate) entries: Vec<NamedShape>,
    pub(crate) index: IndexMap<String, ShapeId>,
}

impl ShapeRegistry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<ShapeId> {
        self.index.get(name).copied()
    }

    pub fn entry(&self, id: ShapeId) -> &NamedShape {
        &self.entries[id.0]
    }

    pub fn get(&self, name: &str) -> Option<&NamedShape> {
        self.id_of(name).map(|id| self.entry(id))
    }

    /// The generated identifier for a document name.
    pub fn type_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|n| n.type_name.as_str())
    }

    /// Entries in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, NamedShape> {
        self.entries.iter()
    }

    /// Every named schema transitively reachable from `root`, breadth-first.
    /// Each name is visited once, so cyclic graphs terminate.
    pub fn reachable_from<'a>(&'a self, root: &'a Shape) -> Vec<&'a str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<&str> = root.references().into_iter().collect();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            order.push(name);
            if let Some(entry) = self.get(name) {
                queue.extend(entry.shape.references());
            }
        }
        order
    }
}
