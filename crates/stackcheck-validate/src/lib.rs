//! # stackcheck-validate — Validation Engine
//!
//! Walks a document [`Value`](stackcheck_core::Value) tree against a
//! schema from a [`SchemaCatalog`](stackcheck_schema::SchemaCatalog) and
//! returns every violation found, as path-qualified [`Diagnostic`]s.
//!
//! ## Entry points
//!
//! - [`validate`] / [`validate_with`]: one document against one type.
//! - [`validate_template`]: every entry of a template's `Resources`
//!   mapping, each against the type named by its `Type` field.
//! - [`render`] / [`exit_code`]: turn a finished list into text or JSON,
//!   and into a process exit code.
//!
//! ## Guarantees
//!
//! Validation is a pure, synchronous function of its inputs: no I/O, no
//! logging, no shared mutable state. Any number of validations may share
//! one catalog across threads. Output order is a stable pre-order
//! traversal, so reports are diffable across runs.
//!
//! ## Crate Policy
//!
//! - Schema violations are data ([`Diagnostic`]), never `Err`.
//! - No `unsafe` code. No `.unwrap()` outside tests.

pub mod render;
pub mod report;
pub mod rules;
pub mod validator;

pub use render::{exit_code, render, Format, RenderError};
pub use report::{Diagnostic, Reporter, Severity, Summary, ViolationKind};
pub use validator::{validate, validate_template, validate_with, ValidateOptions, DEFAULT_MAX_DEPTH};
