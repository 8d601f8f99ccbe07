//! # Error Types
//!
//! Errors raised while adapting an already-parsed document tree into the
//! [`Value`](crate::Value) model. Schema violations are never errors: they
//! are reported as diagnostics by `stackcheck-validate`.

use thiserror::Error;

use crate::path::DocumentPath;

/// Error converting a parsed JSON/YAML tree into a `Value`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// `null` appeared where absence cannot be expressed (document root or
    /// sequence element).
    #[error("null value at {path} cannot be represented; omit the entry instead")]
    NullValue {
        /// Where the null appeared.
        path: DocumentPath,
    },

    /// A YAML mapping key was neither a string nor a scalar with a
    /// canonical string form.
    #[error("unsupported mapping key at {path}: {key}")]
    UnsupportedKey {
        /// The mapping holding the key.
        path: DocumentPath,
        /// Debug rendering of the key.
        key: String,
    },

    /// A number could not be represented.
    #[error("unsupported number at {path}: {raw}")]
    UnsupportedNumber {
        /// Where the number appeared.
        path: DocumentPath,
        /// The number as text.
        raw: String,
    },
}
