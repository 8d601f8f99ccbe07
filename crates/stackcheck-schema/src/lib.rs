//! # stackcheck-schema — Schema Model & Catalog
//!
//! In-memory description of what a template is allowed to contain, and the
//! catalog that maps each resource or property type name to it.
//!
//! ## Schema Model (`model`)
//!
//! One reusable [`SchemaNode`] structure describes every type: scalar
//! constraints, object field tables with [`ConditionalRule`]s, arrays with
//! cardinality bounds, discriminated unions, and named references to other
//! catalog entries. References are how nested and self-referential property
//! types are expressed without cyclic ownership.
//!
//! ## Catalog (`catalog`, `handle`)
//!
//! [`SchemaCatalog`] is immutable once built. [`CatalogBuilder::build`]
//! rejects malformed catalogs (dangling references, rules naming undeclared
//! fields, inverted bounds) so a process never starts with one.
//! [`CatalogHandle`] swaps whole catalogs atomically; validations already
//! running keep the snapshot they started with.
//!
//! ## Ingestion (`loader`)
//!
//! Reads JSON/YAML schema sources from a directory. Every failure is a
//! [`SchemaError`]: invalid regexes, unknown keys, duplicate types.
//!
//! ## Crate Policy
//!
//! - Depends only on `stackcheck-core` internally.
//! - No mutation of a built catalog, ever. Updates build a new one.

pub mod catalog;
pub mod error;
pub mod handle;
pub mod loader;
pub mod model;

pub use catalog::{CatalogBuilder, SchemaCatalog};
pub use error::SchemaError;
pub use handle::CatalogHandle;
pub use loader::{load_dir, CatalogLoader, SourceFormat};
pub use model::{
    ArraySchema, ConditionalRule, FieldSpec, ObjectSchema, Pattern, ScalarSchema, SchemaNode,
    UnionSchema, UpdateBehavior, DEFAULT_DISCRIMINATOR,
};
