//! # Validate Subcommand
//!
//! `stackcheck validate <FILES>...` parses each file (`.yaml`/`.yml` as
//! YAML, anything else as JSON), validates it against the catalog, and
//! prints one report per file in input order.
//!
//! Without `--type` each file is treated as a template and every entry of
//! its `Resources` mapping is validated against the type named by its
//! `Type` field. With `--type` the whole file is one document of that type.
//!
//! Files are validated in parallel against one shared catalog. The exit
//! code is the worst over all files: 0 clean, 1 errors, 2 fatal
//! diagnostics or a file that could not be read or parsed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use stackcheck_core::{from_json, from_yaml, DeferredMarkers, Value};
use stackcheck_schema::{load_dir, SchemaCatalog};
use stackcheck_validate::{
    exit_code, render, validate_template, validate_with, Diagnostic, Format, ValidateOptions,
};

use crate::config::CliConfig;

/// Exit code for a file that could not be read or parsed.
const UNREADABLE: u8 = 2;

/// Arguments for the `stackcheck validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template or document files to validate.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Validate each file as a single document of this type instead of as
    /// a template.
    #[arg(long = "type", value_name = "TYPE")]
    pub type_id: Option<String>,

    /// Directory of schema sources.
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,

    /// Report format: text or json.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Maximum nesting depth before validation of a subtree stops.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Do not report fields the schema does not declare.
    #[arg(long)]
    pub no_unknown_fields: bool,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileReport {
    /// The file as given on the command line.
    pub path: PathBuf,
    /// Diagnostics, or why the file could not be checked.
    pub outcome: Result<Vec<Diagnostic>, String>,
}

impl FileReport {
    /// Exit code contribution of this file.
    pub fn exit_code(&self) -> u8 {
        match &self.outcome {
            Ok(diagnostics) => exit_code(diagnostics),
            Err(_) => UNREADABLE,
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let schema_dir = config.schema_dir(args.schemas.as_deref());
    let format = config.format(args.format);
    let options = config.options(args.max_depth, args.no_unknown_fields);

    let catalog = load_dir(&schema_dir)
        .with_context(|| format!("failed to load schema catalog from {}", schema_dir.display()))?;

    tracing::info!(
        files = args.files.len(),
        types = catalog.len(),
        max_depth = options.max_depth,
        "validating"
    );

    let reports = check_files(&args.files, &catalog, args.type_id.as_deref(), &options);
    println!("{}", render_reports(&reports, format)?);

    Ok(reports.iter().map(FileReport::exit_code).max().unwrap_or(0))
}

/// Validate `files` in parallel. Reports come back in input order.
pub fn check_files(
    files: &[PathBuf],
    catalog: &SchemaCatalog,
    type_id: Option<&str>,
    options: &ValidateOptions,
) -> Vec<FileReport> {
    files
        .par_iter()
        .map(|path| {
            let outcome = read_document(path)
                .map(|document| match type_id {
                    Some(type_id) => validate_with(&document, type_id, catalog, options),
                    None => validate_template(&document, catalog, options),
                })
                .map_err(|e| format!("{e:#}"));
            match &outcome {
                Ok(diagnostics) => {
                    tracing::debug!(file = %path.display(), diagnostics = diagnostics.len(), "checked")
                }
                Err(reason) => tracing::warn!(file = %path.display(), %reason, "cannot check file"),
            }
            FileReport {
                path: path.clone(),
                outcome,
            }
        })
        .collect()
}

/// Read a file and convert it to a [`Value`] tree.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let markers = DeferredMarkers::default();
    let is_yaml = matches!(path.extension().and_then(|e| e.to_str()), Some("yaml") | Some("yml"));
    let value = if is_yaml {
        let tree: serde_yaml::Value =
            serde_yaml::from_str(&content).with_context(|| format!("invalid YAML in {}", path.display()))?;
        from_yaml(&tree, &markers)
    } else {
        let tree: serde_json::Value =
            serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))?;
        from_json(&tree, &markers)
    };
    value.with_context(|| format!("unsupported document structure in {}", path.display()))
}

/// Render all file reports.
///
/// Text output is one section per file headed by the file name. JSON
/// output is an object keyed by file name; each value is the diagnostic
/// array, or `{"error": ...}` for a file that could not be checked.
pub fn render_reports(reports: &[FileReport], format: Format) -> Result<String> {
    match format {
        Format::Text => {
            let mut sections = Vec::with_capacity(reports.len());
            for report in reports {
                let body = match &report.outcome {
                    Ok(diagnostics) => render(diagnostics, Format::Text)?,
                    Err(reason) => format!("fatal: {reason}"),
                };
                sections.push(format!("{}:\n{body}", report.path.display()));
            }
            Ok(sections.join("\n\n"))
        }
        Format::Json => {
            let mut out = serde_json::Map::new();
            for report in reports {
                let entry = match &report.outcome {
                    Ok(diagnostics) => serde_json::to_value(diagnostics)?,
                    Err(reason) => serde_json::json!({ "error": reason }),
                };
                out.insert(report.path.display().to_string(), entry);
            }
            Ok(serde_json::to_string_pretty(&serde_json::Value::Object(out))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackcheck_validate::ViolationKind;

    const SCHEMA: &str = r#"
types:
  "Demo::Thing":
    type: object
    fields:
      Type: { type: string, required: true }
      Name: { type: string, required: true, pattern: "[a-z]+" }
"#;

    fn catalog() -> SchemaCatalog {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("demo.yaml"), SCHEMA).unwrap();
        load_dir(dir.path()).unwrap()
    }

    #[test]
    fn test_read_document_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("t.yml");
        std::fs::write(&yaml, "Name: !Ref P\n").unwrap();
        let json = dir.path().join("t.template");
        std::fs::write(&json, r#"{"Name": "x"}"#).unwrap();

        assert!(read_document(&yaml).unwrap().get("Name").unwrap().is_deferred());
        assert_eq!(read_document(&json).unwrap().get("Name"), Some(&Value::string("x")));
    }

    #[test]
    fn test_check_files_keeps_input_order_and_codes() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        std::fs::write(&good, "Resources:\n  A: { Type: \"Demo::Thing\", Name: ok }\n").unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"Resources": {"A": {"Type": "Demo::Thing", "Name": "NO"}}}"#).unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let missing = dir.path().join("missing.yaml");

        let files = vec![good.clone(), bad.clone(), broken.clone(), missing.clone()];
        let reports = check_files(&files, &catalog(), None, &ValidateOptions::default());

        let paths: Vec<&PathBuf> = reports.iter().map(|r| &r.path).collect();
        assert_eq!(paths, [&good, &bad, &broken, &missing]);
        let codes: Vec<u8> = reports.iter().map(FileReport::exit_code).collect();
        assert_eq!(codes, [0, 1, 2, 2]);

        let bad_diags = reports[1].outcome.as_ref().unwrap();
        assert_eq!(bad_diags[0].kind, ViolationKind::PatternMismatch);
    }

    #[test]
    fn test_check_files_with_explicit_type() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.json");
        std::fs::write(&doc, r#"{"Type": "Demo::Thing"}"#).unwrap();
        let reports = check_files(&[doc], &catalog(), Some("Demo::Thing"), &ValidateOptions::default());
        let diags = reports[0].outcome.as_ref().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ViolationKind::MissingRequiredField);
    }

    #[test]
    fn test_render_reports_json_shape() {
        let reports = vec![
            FileReport {
                path: PathBuf::from("a.yaml"),
                outcome: Ok(Vec::new()),
            },
            FileReport {
                path: PathBuf::from("b.yaml"),
                outcome: Err("cannot read b.yaml".to_string()),
            },
        ];
        let out = render_reports(&reports, Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["a.yaml"], serde_json::json!([]));
        assert_eq!(parsed["b.yaml"]["error"], "cannot read b.yaml");

        let text = render_reports(&reports, Format::Text).unwrap();
        assert_eq!(text, "a.yaml:\nno diagnostics\n\nb.yaml:\nfatal: cannot read b.yaml");
    }
}
