//! Diagnostics collected while resolving, normalizing and emitting.
//!
//! Nothing in the pipeline aborts on a single bad operation or schema; every
//! detected defect lands here and is returned next to whatever could still be
//! generated.

use std::fmt;

use crate::error::NameCollisionError;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Something was skipped or degraded.
    Error,
    /// Generation proceeded with an assumption worth reviewing.
    Warning,
    /// Informational note about ignored input.
    Info,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// The class of defect a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed or missing path, method, parameter or schema fragment.
    SpecDefect,
    /// Two operations derive the same identifier within one file.
    NameCollision,
    /// A schema reference that names no registered component.
    UnresolvedReference,
    /// More than one 2xx response; the first declared one is used.
    AmbiguousSuccess,
    /// Valid input the generator deliberately ignores.
    Unsupported,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::SpecDefect => "spec-defect",
            DiagnosticKind::NameCollision => "name-collision",
            DiagnosticKind::UnresolvedReference => "unresolved-reference",
            DiagnosticKind::AmbiguousSuccess => "ambiguous-success",
            DiagnosticKind::Unsupported => "unsupported",
        }
    }
}

/// A single reported defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Document locations such as `paths./pets.get`; collisions carry two.
    pub locations: Vec<String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            locations: vec![location.into()],
        }
    }

    /// A skipped operation, path or schema.
    pub fn spec_defect(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, DiagnosticKind::SpecDefect, message, location)
    }

    /// A reference that degraded to an opaque shape.
    pub fn unresolved_reference(location: impl Into<String>, reference: &str) -> Self {
        Self::new(
            Severity::Error,
            DiagnosticKind::UnresolvedReference,
            format!("reference `{reference}` does not resolve; using an opaque shape"),
            location,
        )
    }

    pub fn warning(
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, kind, message, location)
    }

    pub fn info(
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Info, kind, message, location)
    }
}

impl From<&NameCollisionError> for Diagnostic {
    fn from(err: &NameCollisionError) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::NameCollision,
            message: format!("{err}; {} was not generated", err.file),
            locations: vec![err.first.clone(), err.second.clone()],
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.kind.as_str(), self.message)?;
        if !self.locations.is_empty() {
            write!(f, " (at {})", self.locations.join(", "))?;
        }
        Ok(())
    }
}

/// An append-only collection of diagnostics in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        for d in other {
            self.push(d);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.severity.is_error()).count()
    }

    /// Diagnostics of a given kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(items: Vec<Diagnostic>) -> Self {
        Self { items }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
