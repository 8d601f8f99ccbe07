//! # Diagnostics & Reporter
//!
//! A [`Diagnostic`] is one path-qualified violation. Its severity is fixed
//! by its [`ViolationKind`]:
//!
//! | Severity  | Kinds |
//! |-----------|-------|
//! | `Fatal`   | `UnknownType`, `TypeMismatch`, `MissingDiscriminator`, `UnknownVariant`, `RecursionLimitExceeded` |
//! | `Error`   | `MissingRequiredField`, scalar and arity constraint kinds, conditional rule kinds |
//! | `Warning` | `UnknownField` |
//!
//! Only `UnknownType` on the requested root aborts a validation; every
//! other Fatal is local to the subtree it was found in.
//!
//! The [`Reporter`] is an append-only sink owned by one validation call.

use std::fmt;

use serde::{Deserialize, Serialize};
use stackcheck_core::DocumentPath;

/// How much a diagnostic matters. Ordered `Warning < Error < Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; never affects the exit code.
    Warning,
    /// The document violates its schema.
    Error,
    /// The document could not be checked against its schema at this point.
    Fatal,
}

impl Severity {
    /// Lowercase label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of violations the validator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The requested type identifier is not in the catalog.
    UnknownType,
    /// The value's shape does not match the schema's.
    TypeMismatch,
    /// A union's discriminator field is absent or not a literal string.
    MissingDiscriminator,
    /// A union's discriminator names no known variant.
    UnknownVariant,
    /// Descent went deeper than the configured maximum.
    RecursionLimitExceeded,
    /// A required field is absent.
    MissingRequiredField,
    /// A literal does not fully match the field pattern.
    PatternMismatch,
    /// A string is shorter or longer than allowed.
    LengthOutOfRange,
    /// A number is outside its inclusive bounds.
    ValueOutOfRange,
    /// A literal is not in the allowed set.
    NotAnAllowedValue,
    /// A sequence has too few or too many items.
    ArityOutOfRange,
    /// More than one field of an exclusive group is present.
    MutualExclusionViolated,
    /// None of a required group of fields is present.
    RequireAtLeastOneViolated,
    /// A field required by a sibling's value is absent.
    ConditionalRequirementViolated,
    /// A field is present that the schema does not declare.
    UnknownField,
}

impl ViolationKind {
    /// The fixed severity of this kind.
    pub fn severity(self) -> Severity {
        match self {
            Self::UnknownType
            | Self::TypeMismatch
            | Self::MissingDiscriminator
            | Self::UnknownVariant
            | Self::RecursionLimitExceeded => Severity::Fatal,
            Self::UnknownField => Severity::Warning,
            Self::MissingRequiredField
            | Self::PatternMismatch
            | Self::LengthOutOfRange
            | Self::ValueOutOfRange
            | Self::NotAnAllowedValue
            | Self::ArityOutOfRange
            | Self::MutualExclusionViolated
            | Self::RequireAtLeastOneViolated
            | Self::ConditionalRequirementViolated => Severity::Error,
        }
    }

    /// Variant name as it appears in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownType => "UnknownType",
            Self::TypeMismatch => "TypeMismatch",
            Self::MissingDiscriminator => "MissingDiscriminator",
            Self::UnknownVariant => "UnknownVariant",
            Self::RecursionLimitExceeded => "RecursionLimitExceeded",
            Self::MissingRequiredField => "MissingRequiredField",
            Self::PatternMismatch => "PatternMismatch",
            Self::LengthOutOfRange => "LengthOutOfRange",
            Self::ValueOutOfRange => "ValueOutOfRange",
            Self::NotAnAllowedValue => "NotAnAllowedValue",
            Self::ArityOutOfRange => "ArityOutOfRange",
            Self::MutualExclusionViolated => "MutualExclusionViolated",
            Self::RequireAtLeastOneViolated => "RequireAtLeastOneViolated",
            Self::ConditionalRequirementViolated => "ConditionalRequirementViolated",
            Self::UnknownField => "UnknownField",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Location in the document.
    pub path: DocumentPath,
    /// What went wrong.
    pub kind: ViolationKind,
    /// Human-readable detail naming expected vs actual.
    pub message: String,
    /// Always `kind.severity()`.
    pub severity: Severity,
}

impl Diagnostic {
    /// A diagnostic with the severity implied by `kind`.
    pub fn new(path: DocumentPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            severity: kind.severity(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}: {}", self.severity, self.kind, self.path, self.message)
    }
}

/// Diagnostic counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Fatal diagnostics.
    pub fatal: usize,
    /// Error diagnostics.
    pub errors: usize,
    /// Warning diagnostics.
    pub warnings: usize,
}

impl Summary {
    /// Count the diagnostics in `diagnostics`.
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        diagnostics.iter().fold(Self::default(), |mut acc, d| {
            match d.severity {
                Severity::Fatal => acc.fatal += 1,
                Severity::Error => acc.errors += 1,
                Severity::Warning => acc.warnings += 1,
            }
            acc
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fatal, {} {}, {} {}",
            self.fatal,
            self.errors,
            if self.errors == 1 { "error" } else { "errors" },
            self.warnings,
            if self.warnings == 1 { "warning" } else { "warnings" },
        )
    }
}

/// Append-only diagnostic sink for one validation call.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    /// An empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Shorthand for `add(Diagnostic::new(..))`.
    pub fn report(&mut self, path: DocumentPath, kind: ViolationKind, message: impl Into<String>) {
        self.add(Diagnostic::new(path, kind, message));
    }

    /// Everything recorded, in the order recorded.
    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when any diagnostic is Fatal.
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Fatal)
    }

    /// True when any diagnostic is an Error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Counts per severity.
    pub fn summary(&self) -> Summary {
        Summary::of(&self.diagnostics)
    }

    /// Consume the reporter.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Extend<Diagnostic> for Reporter {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}
