//! # Catalog Subcommands
//!
//! `stackcheck types` lists every type identifier in the catalog.
//! `stackcheck describe <TYPE>` prints a type's field table and rules.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use stackcheck_schema::{load_dir, ConditionalRule, SchemaCatalog, SchemaNode};

use crate::config::CliConfig;

/// Arguments for `stackcheck types`.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Directory of schema sources.
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,
}

/// Arguments for `stackcheck describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Type identifier to describe.
    #[arg(value_name = "TYPE")]
    pub type_id: String,

    /// Directory of schema sources.
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,
}

fn load(flag: Option<&std::path::Path>, config: &CliConfig) -> Result<SchemaCatalog> {
    let dir = config.schema_dir(flag);
    load_dir(&dir).with_context(|| format!("failed to load schema catalog from {}", dir.display()))
}

/// Execute `stackcheck types`.
pub fn run_types(args: &TypesArgs, config: &CliConfig) -> Result<u8> {
    let catalog = load(args.schemas.as_deref(), config)?;
    for name in catalog.type_names() {
        println!("{name}");
    }
    Ok(0)
}

/// Execute `stackcheck describe`.
pub fn run_describe(args: &DescribeArgs, config: &CliConfig) -> Result<u8> {
    let catalog = load(args.schemas.as_deref(), config)?;
    let Some(text) = describe(&catalog, &args.type_id) else {
        bail!("type '{}' is not in the schema catalog", args.type_id);
    };
    println!("{text}");
    Ok(0)
}

/// Human-readable description of one catalog entry.
pub fn describe(catalog: &SchemaCatalog, type_id: &str) -> Option<String> {
    let mut out = String::new();
    let _ = writeln!(out, "{type_id}");
    match catalog.get(type_id)? {
        SchemaNode::Object(object) => {
            let width = object.fields.keys().map(|k| k.chars().count()).max().unwrap_or(0);
            for (name, spec) in &object.fields {
                let required = if spec.required { "required" } else { "optional" };
                let update = spec
                    .update_behavior
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let literal = if spec.allows_deferred { "" } else { "  literal-only" };
                let _ = writeln!(
                    out,
                    "  {name:<width$}  {required:<8}  {:<24}  {update}{literal}",
                    spec.schema.describe()
                );
            }
            for rule in &object.rules {
                let _ = writeln!(out, "  rule: {}", describe_rule(rule));
            }
        }
        SchemaNode::Union(union) => {
            let _ = writeln!(out, "  union on {}", union.discriminator);
            for (value, variant) in &union.variants {
                let _ = writeln!(out, "  {value} => {}", variant.describe());
            }
        }
        other => {
            let _ = writeln!(out, "  {}", other.describe());
        }
    }
    Some(out.trim_end().to_string())
}

fn describe_rule(rule: &ConditionalRule) -> String {
    match rule {
        ConditionalRule::MutuallyExclusive(names) => format!("at most one of {}", names.join(", ")),
        ConditionalRule::RequireAtLeastOne(names) => format!("at least one of {}", names.join(", ")),
        ConditionalRule::RequiredIf { target, when, equals } => {
            format!("{target} required when {when} = {equals}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackcheck_schema::{CatalogLoader, SourceFormat};

    fn catalog() -> SchemaCatalog {
        let mut loader = CatalogLoader::new();
        loader
            .add_source(
                "inline.yaml",
                r#"
types:
  "Demo::Thing":
    type: object
    fields:
      Type: { type: string, required: true, allows_deferred: false }
      Size: { type: number, update_behavior: immutable }
      Tags: { type: array, items: { ref: "Demo::Thing.Tag" } }
    rules:
      - require_at_least_one: [Size, Tags]
  "Demo::Thing.Tag":
    type: object
    fields:
      Key: { type: string, required: true }
  "Demo::Any":
    type: union
    variants:
      "Demo::Thing": { ref: "Demo::Thing" }
"#,
                SourceFormat::Yaml,
            )
            .unwrap();
        loader.finish().unwrap()
    }

    #[test]
    fn test_describe_object() {
        let text = describe(&catalog(), "Demo::Thing").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Demo::Thing");
        assert!(lines[1].contains("Type") && lines[1].contains("required") && lines[1].contains("literal-only"));
        assert!(lines[2].contains("number") && lines[2].contains("immutable"));
        assert!(lines[3].contains("array<Demo::Thing.Tag>"));
        assert_eq!(lines[4], "  rule: at least one of Size, Tags");
    }

    #[test]
    fn test_describe_union() {
        let text = describe(&catalog(), "Demo::Any").unwrap();
        assert!(text.contains("union on Type"));
        assert!(text.contains("Demo::Thing => Demo::Thing"));
    }

    #[test]
    fn test_describe_unknown() {
        assert!(describe(&catalog(), "Demo::Nope").is_none());
    }
}
