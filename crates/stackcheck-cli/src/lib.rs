//! # stackcheck-cli — Command-Line Interface
//!
//! Thin clap front end over the stackcheck library crates.
//!
//! ## Subcommands
//!
//! - `validate` — validate templates or typed documents
//! - `types` — list catalog type identifiers
//! - `describe` — print one type's field table and rules
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `stackcheck-schema` and `stackcheck-validate`;
//!   no validation logic lives here.
//! - Reports go to stdout, logs to stderr.

pub mod catalog;
pub mod config;
pub mod validate;
