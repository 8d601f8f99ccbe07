//! # Schema Model
//!
//! The shape expected at one position of a document. Schemas are plain
//! data: the validator in `stackcheck-validate` interprets them, so a
//! catalog of thousands of types needs no generated code.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use stackcheck_core::{ScalarKind, TypeIdentifier, Value};

/// Field name a union reads its discriminator from unless told otherwise.
pub const DEFAULT_DISCRIMINATOR: &str = "Type";

/// Describes the shape expected at one position in a document tree.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// A literal string, number, or boolean with optional constraints.
    Scalar(ScalarSchema),
    /// A mapping with a declared field table.
    Object(ObjectSchema),
    /// A sequence of homogeneous items.
    Array(ArraySchema),
    /// A mapping whose concrete shape is chosen by a discriminator literal.
    Union(UnionSchema),
    /// The root schema of another catalog entry.
    Reference(TypeIdentifier),
}

impl SchemaNode {
    /// Short name used in listings and messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(s) => s.kind.to_string(),
            Self::Object(_) => "object".to_string(),
            Self::Array(a) => format!("array<{}>", a.items.describe()),
            Self::Union(u) => format!("union on {}", u.discriminator),
            Self::Reference(id) => id.to_string(),
        }
    }
}

impl From<ScalarSchema> for SchemaNode {
    fn from(s: ScalarSchema) -> Self {
        Self::Scalar(s)
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(s: ObjectSchema) -> Self {
        Self::Object(s)
    }
}

impl From<ArraySchema> for SchemaNode {
    fn from(s: ArraySchema) -> Self {
        Self::Array(s)
    }
}

impl From<UnionSchema> for SchemaNode {
    fn from(s: UnionSchema) -> Self {
        Self::Union(s)
    }
}

// ─── Scalars ────────────────────────────────────────────────────────

/// A regular expression that must match the whole literal.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` anchored at both ends.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, regex })
    }

    /// The pattern as written in the schema source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the whole of `text` matches.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Constraints on a literal scalar.
#[derive(Debug, Clone)]
pub struct ScalarSchema {
    /// Required literal kind.
    pub kind: ScalarKind,
    /// Full-match pattern applied to the raw literal text.
    pub pattern: Option<Pattern>,
    /// Minimum string length in characters.
    pub min_length: Option<usize>,
    /// Maximum string length in characters.
    pub max_length: Option<usize>,
    /// Inclusive numeric lower bound.
    pub min_value: Option<f64>,
    /// Inclusive numeric upper bound.
    pub max_value: Option<f64>,
    /// Permitted literals; empty means unrestricted.
    pub allowed_values: Vec<Value>,
}

impl ScalarSchema {
    /// An unconstrained scalar of the given kind.
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            pattern: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            allowed_values: Vec::new(),
        }
    }

    /// An unconstrained string.
    pub fn string() -> Self {
        Self::new(ScalarKind::String)
    }

    /// An unconstrained number.
    pub fn number() -> Self {
        Self::new(ScalarKind::Number)
    }

    /// An unconstrained boolean.
    pub fn boolean() -> Self {
        Self::new(ScalarKind::Boolean)
    }

    /// Add a full-match pattern.
    pub fn with_pattern(mut self, source: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Pattern::new(source)?);
        Ok(self)
    }

    /// Bound the string length.
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Bound the numeric value.
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Restrict to an enumeration of literals.
    pub fn with_allowed(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed_values = values.into_iter().collect();
        self
    }
}

// ─── Objects ────────────────────────────────────────────────────────

/// How a deployed resource reacts when a property changes.
///
/// Catalog metadata only; validation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateBehavior {
    /// Updated in place.
    Mutable,
    /// Replaces the resource.
    Immutable,
    /// Depends on which other properties change.
    Conditional,
}

impl std::fmt::Display for UpdateBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Mutable => "mutable",
            Self::Immutable => "immutable",
            Self::Conditional => "conditional",
        })
    }
}

/// One entry in an object's field table.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Expected shape of the field's value.
    pub schema: SchemaNode,
    /// Whether the field must be present.
    pub required: bool,
    /// Whether a deferred reference is acceptable in place of a literal.
    pub allows_deferred: bool,
    /// Update-behavior metadata from the catalog.
    pub update_behavior: Option<UpdateBehavior>,
    /// Free-text documentation from the catalog.
    pub documentation: Option<String>,
}

impl FieldSpec {
    /// A required field accepting deferred references.
    pub fn required(schema: impl Into<SchemaNode>) -> Self {
        Self {
            schema: schema.into(),
            required: true,
            allows_deferred: true,
            update_behavior: None,
            documentation: None,
        }
    }

    /// An optional field accepting deferred references.
    pub fn optional(schema: impl Into<SchemaNode>) -> Self {
        Self {
            required: false,
            ..Self::required(schema)
        }
    }

    /// Require the value to be a literal.
    pub fn literal_only(mut self) -> Self {
        self.allows_deferred = false;
        self
    }
}

/// A cross-field constraint the field table cannot express.
#[derive(Debug, Clone)]
pub enum ConditionalRule {
    /// At most one of these fields may be present.
    MutuallyExclusive(Vec<String>),
    /// At least one of these fields must be present.
    RequireAtLeastOne(Vec<String>),
    /// `target` is required when `when` holds the literal `equals`.
    RequiredIf {
        /// The conditionally required field.
        target: String,
        /// The field whose value is tested.
        when: String,
        /// The literal that triggers the requirement.
        equals: Value,
    },
}

impl ConditionalRule {
    /// Every field name the rule mentions.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::MutuallyExclusive(names) | Self::RequireAtLeastOne(names) => {
                names.iter().map(String::as_str).collect()
            }
            Self::RequiredIf { target, when, .. } => vec![target.as_str(), when.as_str()],
        }
    }
}

/// A mapping with a declared field table.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    /// Fields in declaration order.
    pub fields: IndexMap<String, FieldSpec>,
    /// Cross-field rules evaluated after the field table.
    pub rules: Vec<ConditionalRule>,
}

impl ObjectSchema {
    /// An object with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field (builder style).
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Attach a conditional rule (builder style).
    pub fn rule(mut self, rule: ConditionalRule) -> Self {
        self.rules.push(rule);
        self
    }
}

// ─── Arrays ─────────────────────────────────────────────────────────

/// A sequence with an item schema and cardinality bounds.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    /// Schema applied to every element.
    pub items: Box<SchemaNode>,
    /// Minimum element count.
    pub min_items: Option<usize>,
    /// Maximum element count.
    pub max_items: Option<usize>,
}

impl ArraySchema {
    /// An unbounded array of `items`.
    pub fn of(items: impl Into<SchemaNode>) -> Self {
        Self {
            items: Box::new(items.into()),
            min_items: None,
            max_items: None,
        }
    }

    /// Bound the element count.
    pub fn with_items(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_items = min;
        self.max_items = max;
        self
    }
}

// ─── Unions ─────────────────────────────────────────────────────────

/// A mapping whose shape is picked by the literal in `discriminator`.
#[derive(Debug, Clone)]
pub struct UnionSchema {
    /// Field holding the discriminator literal.
    pub discriminator: String,
    /// `(discriminator value, variant schema)` in declaration order.
    pub variants: Vec<(String, SchemaNode)>,
}

impl UnionSchema {
    /// An empty union discriminated on [`DEFAULT_DISCRIMINATOR`].
    pub fn new() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            variants: Vec::new(),
        }
    }

    /// Add a variant (builder style).
    pub fn variant(mut self, value: impl Into<String>, schema: impl Into<SchemaNode>) -> Self {
        self.variants.push((value.into(), schema.into()));
        self
    }

    /// The variant selected by `value`.
    pub fn find(&self, value: &str) -> Option<&SchemaNode> {
        self.variants
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, schema)| schema)
    }
}

impl Default for UnionSchema {
    fn default() -> Self {
        Self::new()
    }
}
