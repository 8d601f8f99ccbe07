//! # Document Value Model
//!
//! The polymorphic representation of one position in a template. Every
//! field value is exactly one of:
//!
//! - a literal scalar (string, number, or boolean, kept as its raw text),
//! - a literal sequence,
//! - a literal mapping (entries kept in document order for diagnostics),
//! - a deferred reference whose result is unknown until deployment.
//!
//! ## Equality
//!
//! `Value` implements [`PartialEq`] but deliberately not [`Eq`]: two
//! deferred references are never equal, even when their tokens match,
//! because independently authored references need not resolve to the same
//! value. Equality is used by enum membership and `RequiredIf` rules.

use serde::{Deserialize, Serialize};

/// The literal kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// UTF-8 text.
    String,
    /// Integer or floating point number, kept as its source text.
    Number,
    /// `true` or `false`.
    Boolean,
}

impl ScalarKind {
    /// Lowercase name used in diagnostic messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a document tree.
#[derive(Debug, Clone)]
pub enum Value {
    /// A literal scalar.
    Scalar {
        /// Which literal kind the raw text represents.
        kind: ScalarKind,
        /// The literal as written (numbers and booleans included).
        raw: String,
    },
    /// An ordered list of values.
    Sequence(Vec<Value>),
    /// Key/value entries in document order.
    Mapping(Vec<(String, Value)>),
    /// A value computed at deployment time; the token identifies the
    /// reference for messages only.
    DeferredReference(String),
}

impl Value {
    /// Build a string scalar.
    pub fn string(raw: impl Into<String>) -> Self {
        Self::Scalar {
            kind: ScalarKind::String,
            raw: raw.into(),
        }
    }

    /// Build a number scalar from its textual form.
    pub fn number(raw: impl Into<String>) -> Self {
        Self::Scalar {
            kind: ScalarKind::Number,
            raw: raw.into(),
        }
    }

    /// Build a boolean scalar.
    pub fn boolean(value: bool) -> Self {
        Self::Scalar {
            kind: ScalarKind::Boolean,
            raw: value.to_string(),
        }
    }

    /// Build a mapping from `(key, value)` pairs, preserving their order.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a deferred reference.
    pub fn deferred(token: impl Into<String>) -> Self {
        Self::DeferredReference(token.into())
    }

    /// True for the `DeferredReference` variant.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::DeferredReference(_))
    }

    /// Returns `(kind, raw)` for a scalar, `None` otherwise.
    pub fn as_scalar(&self) -> Option<(ScalarKind, &str)> {
        match self {
            Self::Scalar { kind, raw } => Some((*kind, raw.as_str())),
            _ => None,
        }
    }

    /// Returns the text of a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar {
                kind: ScalarKind::String,
                raw,
            } => Some(raw.as_str()),
            _ => None,
        }
    }

    /// Returns the sequence items.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping entries.
    pub fn as_mapping(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping entry by key. The first entry wins when a key repeats.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up a sequence element by index.
    pub fn index(&self, i: usize) -> Option<&Value> {
        self.as_sequence()?.get(i)
    }

    /// Shape name used in diagnostic messages (`expected mapping, found string`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar { kind, .. } => kind.as_str(),
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::DeferredReference(_) => "deferred reference",
        }
    }

    /// Parse the raw text of a number scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar {
                kind: ScalarKind::Number,
                raw,
            } => raw.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Scalar { kind: ka, raw: ra },
                Self::Scalar { kind: kb, raw: rb },
            ) => {
                if ka != kb {
                    return false;
                }
                if *ka == ScalarKind::Number {
                    if let (Ok(a), Ok(b)) = (ra.trim().parse::<f64>(), rb.trim().parse::<f64>()) {
                        return a == b;
                    }
                }
                ra == rb
            }
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter().any(|(k2, v2)| k == k2 && v == v2)
                    })
            }
            // Deferred references never compare equal.
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar {
                kind: ScalarKind::String,
                raw,
            } => write!(f, "{raw:?}"),
            Self::Scalar { raw, .. } => f.write_str(raw),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
            Self::DeferredReference(token) => write!(f, "<{token}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality_same_kind() {
        assert_eq!(Value::string("a"), Value::string("a"));
        assert_ne!(Value::string("a"), Value::string("b"));
        assert_eq!(Value::boolean(true), Value::boolean(true));
    }

    #[test]
    fn test_scalar_equality_differs_across_kinds() {
        assert_ne!(Value::string("1"), Value::number("1"));
        assert_ne!(Value::string("true"), Value::boolean(true));
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(Value::number("1"), Value::number("1.0"));
        assert_ne!(Value::number("1"), Value::number("2"));
    }

    #[test]
    fn test_deferred_never_equal() {
        let a = Value::deferred("Ref:\"Param\"");
        let b = Value::deferred("Ref:\"Param\"");
        assert_ne!(a, b);
        assert_ne!(a, a.clone());
        assert_ne!(a, Value::string("Param"));
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a = Value::mapping([("x", Value::number("1")), ("y", Value::string("a"))]);
        let b = Value::mapping([("y", Value::string("a")), ("x", Value::number("1"))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mapping_containing_deferred_is_unequal() {
        let a = Value::mapping([("x", Value::deferred("Ref:\"P\""))]);
        assert_ne!(a, a.clone());
    }

    #[test]
    fn test_accessors() {
        let v = Value::mapping([
            ("Key", Value::string("Name")),
            ("Items", Value::Sequence(vec![Value::number("3")])),
        ]);
        assert_eq!(v.get("Key").and_then(Value::as_str), Some("Name"));
        assert!(v.get("Missing").is_none());
        let items = v.get("Items").unwrap();
        assert_eq!(items.index(0).and_then(Value::as_f64), Some(3.0));
        assert!(items.index(1).is_none());
        assert_eq!(v.kind_name(), "mapping");
        assert_eq!(Value::deferred("t").kind_name(), "deferred reference");
    }

    #[test]
    fn test_display() {
        let v = Value::mapping([("a", Value::Sequence(vec![Value::string("x"), Value::boolean(false)]))]);
        assert_eq!(v.to_string(), r#"{"a": ["x", false]}"#);
        assert_eq!(Value::deferred("Ref:\"P\"").to_string(), "<Ref:\"P\">");
    }
}
