//! # Schema Load Errors
//!
//! Load-time failures. Any of these stops catalog construction: a process
//! must never begin validating against a catalog that failed to load.
//! `location` fields are dotted paths inside a type definition
//! (`fields.Tags.items.fields.Key`).

use thiserror::Error;

/// Error building or loading a schema catalog.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema source could not be read.
    #[error("io error reading '{path}': {source}")]
    Io {
        /// File or directory being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A schema source is not valid JSON/YAML or does not match the
    /// schema source format.
    #[error("cannot parse schema source '{source_name}': {reason}")]
    Parse {
        /// File name or label of the source.
        source_name: String,
        /// Parser message.
        reason: String,
    },

    /// A node definition is structurally invalid.
    #[error("malformed schema for '{type_id}' at {location}: {reason}")]
    Malformed {
        /// Type being defined.
        type_id: String,
        /// Position inside the definition.
        location: String,
        /// What is wrong.
        reason: String,
    },

    /// A pattern failed to compile.
    #[error("invalid pattern for '{type_id}' at {location}: {pattern}: {reason}")]
    InvalidPattern {
        /// Type being defined.
        type_id: String,
        /// Position inside the definition.
        location: String,
        /// Pattern source.
        pattern: String,
        /// Regex compiler message.
        reason: String,
    },

    /// The same type identifier was declared twice.
    #[error("type '{type_id}' is declared more than once")]
    DuplicateType {
        /// The repeated identifier.
        type_id: String,
    },

    /// A catalog root is not an object or union schema.
    #[error("root schema of '{type_id}' must be an object or union, found {found}")]
    InvalidRoot {
        /// Offending type.
        type_id: String,
        /// What the root actually is.
        found: String,
    },

    /// A reference names a type that is not in the catalog.
    #[error("'{type_id}' at {location} references unknown type '{target}'")]
    DanglingReference {
        /// Type holding the reference.
        type_id: String,
        /// Position of the reference.
        location: String,
        /// The missing target.
        target: String,
    },

    /// A conditional rule names a field the object does not declare.
    #[error("rule in '{type_id}' at {location} names undeclared field '{field}'")]
    UnknownRuleField {
        /// Type holding the rule.
        type_id: String,
        /// Position of the object.
        location: String,
        /// The undeclared field.
        field: String,
    },

    /// Two union variants share a discriminator value.
    #[error("union in '{type_id}' at {location} declares variant '{value}' twice")]
    DuplicateVariant {
        /// Type holding the union.
        type_id: String,
        /// Position of the union.
        location: String,
        /// Repeated discriminator value.
        value: String,
    },

    /// A lower bound exceeds its upper bound.
    #[error("'{type_id}' at {location}: {what} minimum {min} exceeds maximum {max}")]
    InvalidBounds {
        /// Type holding the bounds.
        type_id: String,
        /// Position of the bounded node.
        location: String,
        /// Which bound pair (`length`, `value`, `items`).
        what: &'static str,
        /// Lower bound as text.
        min: String,
        /// Upper bound as text.
        max: String,
    },

    /// A numeric bound is NaN or infinite.
    #[error("'{type_id}' at {location}: {bound} must be a finite number, found {value}")]
    NonFiniteBound {
        /// Type holding the bound.
        type_id: String,
        /// Position of the bounded node.
        location: String,
        /// `min_value` or `max_value`.
        bound: &'static str,
        /// The bound as text.
        value: String,
    },

    /// A schema directory held no type definitions.
    #[error("no schema types found in '{path}'")]
    EmptyCatalog {
        /// The directory searched.
        path: String,
    },
}
