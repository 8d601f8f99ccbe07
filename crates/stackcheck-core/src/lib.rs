//! # stackcheck-core — Foundational Types for stackcheck
//!
//! This crate is the leaf of the stackcheck crate graph. It defines the
//! document-side vocabulary every other crate speaks: the polymorphic
//! [`Value`] tree a template is validated as, the [`DocumentPath`] used to
//! locate diagnostics, and the [`TypeIdentifier`] newtype naming catalog
//! entries.
//!
//! ## Key Design Principles
//!
//! 1. **No null variant.** A `Value` is exactly one of scalar, sequence,
//!    mapping, or deferred reference. Absence is a missing mapping entry.
//!
//! 2. **Deferred references are opaque.** A value produced by an intrinsic
//!    function (`Ref`, `Fn::GetAtt`, ...) is carried as a token and never
//!    compares equal to anything, itself included.
//!
//! 3. **Parsing lives elsewhere.** The [`document`] adapters accept trees
//!    already decoded by `serde_json` or `serde_yaml`; this crate never
//!    reads raw bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `stackcheck-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod identity;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use document::{from_json, from_yaml, DeferredMarkers};
pub use error::CoreError;
pub use identity::TypeIdentifier;
pub use path::{DocumentPath, PathSegment};
pub use value::{ScalarKind, Value};
