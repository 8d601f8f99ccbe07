//! # Schema Source Ingestion
//!
//! Loads schema sources from JSON or YAML into a verified [`SchemaCatalog`].
//! Each source is a document of the form:
//!
//! ```yaml
//! types:
//!   "AWS::EC2::Instance.Tag":
//!     type: object
//!     fields:
//!       Key:   { type: string, required: true, pattern: "^[a-zA-Z_][a-zA-Z_0-9-]*$", min_length: 1, max_length: 255 }
//!       Value: { type: string, required: true, min_length: 1, max_length: 255 }
//! ```
//!
//! A node is either `type: string|number|boolean|array|object|union` or
//! `ref: <type identifier>`. Unknown keys are rejected, patterns are
//! compiled here, and the result goes through [`CatalogBuilder::build`], so
//! every malformed input fails before any validation can run.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use stackcheck_core::document::json_scalar_kind;
use stackcheck_core::{from_json, DeferredMarkers, ScalarKind, TypeIdentifier, Value};

use crate::catalog::{CatalogBuilder, SchemaCatalog};
use crate::error::SchemaError;
use crate::model::{
    ArraySchema, ConditionalRule, FieldSpec, ObjectSchema, Pattern, ScalarSchema, SchemaNode,
    UnionSchema, UpdateBehavior, DEFAULT_DISCRIMINATOR,
};

/// Serialization format of a schema source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `*.json`
    Json,
    /// `*.yaml` / `*.yml`
    Yaml,
}

impl SourceFormat {
    /// Format implied by a file extension, if it is a schema source at all.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

// ─── Source format ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceDocument {
    types: IndexMap<String, NodeDef>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Union,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeDef {
    #[serde(rename = "type")]
    node_type: Option<NodeType>,
    #[serde(rename = "ref")]
    reference: Option<String>,

    // Field table entry.
    required: Option<bool>,
    allows_deferred: Option<bool>,
    update_behavior: Option<UpdateBehavior>,
    documentation: Option<String>,

    // Scalars.
    pattern: Option<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    allowed_values: Option<Vec<serde_json::Value>>,

    // Arrays.
    items: Option<Box<NodeDef>>,
    min_items: Option<usize>,
    max_items: Option<usize>,

    // Objects.
    fields: Option<IndexMap<String, NodeDef>>,
    // `- mutually_exclusive: [A, B]` is a single-key map, not a YAML tag.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    rules: Option<Vec<RuleDef>>,

    // Unions.
    discriminator: Option<String>,
    variants: Option<IndexMap<String, NodeDef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum RuleDef {
    MutuallyExclusive(Vec<String>),
    RequireAtLeastOne(Vec<String>),
    RequiredIf {
        target: String,
        when: String,
        equals: serde_json::Value,
    },
}

// ─── Loader ─────────────────────────────────────────────────────────

/// Accumulates schema sources into one catalog.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    builder: CatalogBuilder,
    sources: usize,
}

impl CatalogLoader {
    /// An empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one source and add its types.
    pub fn add_source(
        &mut self,
        source_name: &str,
        content: &str,
        format: SourceFormat,
    ) -> Result<&mut Self, SchemaError> {
        let parse_error = |reason: String| SchemaError::Parse {
            source_name: source_name.to_string(),
            reason,
        };
        let document: SourceDocument = match format {
            SourceFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        };

        let count = document.types.len();
        for (type_id, def) in document.types {
            let node = Lower { type_id: &type_id }.bare_node(&def, &mut Vec::new(), "a type root")?;
            self.builder.insert(TypeIdentifier::new(type_id.clone()), node)?;
        }
        self.sources += 1;
        tracing::debug!(source = source_name, types = count, "loaded schema source");
        Ok(self)
    }

    /// Read a file and add its types; the format comes from the extension.
    pub fn add_file(&mut self, path: &Path) -> Result<&mut Self, SchemaError> {
        let format = SourceFormat::from_path(path).ok_or_else(|| SchemaError::Parse {
            source_name: path.display().to_string(),
            reason: "unrecognised extension; expected .json, .yaml or .yml".to_string(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.add_source(&path.display().to_string(), &content, format)
    }

    /// Verify and freeze the catalog.
    pub fn finish(self) -> Result<SchemaCatalog, SchemaError> {
        let catalog = self.builder.build()?;
        tracing::info!(
            sources = self.sources,
            types = catalog.len(),
            "schema catalog built"
        );
        Ok(catalog)
    }
}

/// Load every `*.json`, `*.yaml` and `*.yml` file in `dir` (non-recursive,
/// in file-name order) into one catalog.
///
/// # Errors
///
/// Any unreadable or malformed source, and a directory with no types at
/// all, is an error.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<SchemaCatalog, SchemaError> {
    let dir = dir.as_ref();
    let io_error = |source| SchemaError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && SourceFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loader = CatalogLoader::new();
    for path in &paths {
        loader.add_file(path)?;
    }
    if loader.builder.is_empty() {
        return Err(SchemaError::EmptyCatalog {
            path: dir.display().to_string(),
        });
    }
    loader.finish()
}

// ─── Lowering: NodeDef → SchemaNode ─────────────────────────────────

struct Lower<'a> {
    type_id: &'a str,
}

impl Lower<'_> {
    fn malformed(&self, path: &[String], reason: impl Into<String>) -> SchemaError {
        SchemaError::Malformed {
            type_id: self.type_id.to_string(),
            location: location(path),
            reason: reason.into(),
        }
    }

    fn node(&self, def: &NodeDef, path: &mut Vec<String>) -> Result<SchemaNode, SchemaError> {
        match (&def.reference, def.node_type) {
            (Some(_), Some(_)) => Err(self.malformed(path, "`ref` and `type` are mutually exclusive")),
            (None, None) => Err(self.malformed(path, "node needs either `type` or `ref`")),
            (Some(target), None) => {
                self.reject_keys(def, path, &[], "a reference")?;
                Ok(SchemaNode::Reference(TypeIdentifier::new(target.clone())))
            }
            (None, Some(NodeType::String)) => self.scalar(def, ScalarKind::String, path),
            (None, Some(NodeType::Number)) => self.scalar(def, ScalarKind::Number, path),
            (None, Some(NodeType::Boolean)) => self.scalar(def, ScalarKind::Boolean, path),
            (None, Some(NodeType::Array)) => self.array(def, path),
            (None, Some(NodeType::Object)) => self.object(def, path),
            (None, Some(NodeType::Union)) => self.union(def, path),
        }
    }

    /// A node outside a field table: the field-entry keys mean nothing here.
    fn bare_node(&self, def: &NodeDef, path: &mut Vec<String>, what: &str) -> Result<SchemaNode, SchemaError> {
        let present = [
            ("required", def.required.is_some()),
            ("allows_deferred", def.allows_deferred.is_some()),
            ("update_behavior", def.update_behavior.is_some()),
            ("documentation", def.documentation.is_some()),
        ];
        if let Some((key, _)) = present.iter().find(|(_, is_set)| *is_set) {
            return Err(self.malformed(path, format!("`{key}` is only valid on a field entry, not on {what}")));
        }
        self.node(def, path)
    }

    /// Reject keys that do not belong to the node kind being built.
    fn reject_keys(
        &self,
        def: &NodeDef,
        path: &[String],
        allowed: &[&str],
        what: &str,
    ) -> Result<(), SchemaError> {
        let present = [
            ("pattern", def.pattern.is_some()),
            ("min_length", def.min_length.is_some()),
            ("max_length", def.max_length.is_some()),
            ("min_value", def.min_value.is_some()),
            ("max_value", def.max_value.is_some()),
            ("allowed_values", def.allowed_values.is_some()),
            ("items", def.items.is_some()),
            ("min_items", def.min_items.is_some()),
            ("max_items", def.max_items.is_some()),
            ("fields", def.fields.is_some()),
            ("rules", def.rules.is_some()),
            ("discriminator", def.discriminator.is_some()),
            ("variants", def.variants.is_some()),
        ];
        for (key, is_set) in present {
            if is_set && !allowed.contains(&key) {
                return Err(self.malformed(path, format!("`{key}` is not valid on {what}")));
            }
        }
        Ok(())
    }

    fn scalar(&self, def: &NodeDef, kind: ScalarKind, path: &[String]) -> Result<SchemaNode, SchemaError> {
        self.reject_keys(
            def,
            path,
            &["pattern", "min_length", "max_length", "min_value", "max_value", "allowed_values"],
            "a scalar",
        )?;

        let mut schema = ScalarSchema::new(kind)
            .with_length(def.min_length, def.max_length)
            .with_range(def.min_value, def.max_value);

        if let Some(source) = &def.pattern {
            schema.pattern = Some(Pattern::new(source.clone()).map_err(|e| SchemaError::InvalidPattern {
                type_id: self.type_id.to_string(),
                location: location(path),
                pattern: source.clone(),
                reason: e.to_string(),
            })?);
        }

        if let Some(values) = &def.allowed_values {
            let mut allowed = Vec::with_capacity(values.len());
            for literal in values {
                if json_scalar_kind(literal) != Some(kind) {
                    return Err(self.malformed(
                        path,
                        format!("allowed value {literal} is not a {kind} literal"),
                    ));
                }
                let value = from_json(literal, &DeferredMarkers::default())
                    .map_err(|e| self.malformed(path, e.to_string()))?;
                allowed.push(value);
            }
            schema.allowed_values = allowed;
        }

        Ok(SchemaNode::Scalar(schema))
    }

    fn array(&self, def: &NodeDef, path: &mut Vec<String>) -> Result<SchemaNode, SchemaError> {
        self.reject_keys(def, path, &["items", "min_items", "max_items"], "an array")?;
        let items = def
            .items
            .as_deref()
            .ok_or_else(|| self.malformed(path, "array needs `items`"))?;
        path.push("items".to_string());
        let items = self.bare_node(items, path, "array items");
        path.pop();
        Ok(ArraySchema::of(items?).with_items(def.min_items, def.max_items).into())
    }

    fn object(&self, def: &NodeDef, path: &mut Vec<String>) -> Result<SchemaNode, SchemaError> {
        self.reject_keys(def, path, &["fields", "rules"], "an object")?;
        let mut object = ObjectSchema::new();

        if let Some(fields) = &def.fields {
            for (name, field_def) in fields {
                path.push(format!("fields.{name}"));
                let spec = self.field(field_def, path);
                path.pop();
                object.fields.insert(name.clone(), spec?);
            }
        }

        for rule in def.rules.iter().flatten() {
            object.rules.push(self.rule(rule, path)?);
        }

        Ok(object.into())
    }

    fn field(&self, def: &NodeDef, path: &mut Vec<String>) -> Result<FieldSpec, SchemaError> {
        let schema = self.node(def, path)?;
        Ok(FieldSpec {
            schema,
            required: def.required.unwrap_or(false),
            allows_deferred: def.allows_deferred.unwrap_or(true),
            update_behavior: def.update_behavior,
            documentation: def.documentation.clone(),
        })
    }

    fn rule(&self, def: &RuleDef, path: &[String]) -> Result<ConditionalRule, SchemaError> {
        Ok(match def {
            RuleDef::MutuallyExclusive(names) => ConditionalRule::MutuallyExclusive(names.clone()),
            RuleDef::RequireAtLeastOne(names) => ConditionalRule::RequireAtLeastOne(names.clone()),
            RuleDef::RequiredIf { target, when, equals } => {
                if json_scalar_kind(equals).is_none() {
                    return Err(self.malformed(path, "`required_if.equals` must be a scalar literal"));
                }
                let equals: Value = from_json(equals, &DeferredMarkers::default())
                    .map_err(|e| self.malformed(path, e.to_string()))?;
                ConditionalRule::RequiredIf {
                    target: target.clone(),
                    when: when.clone(),
                    equals,
                }
            }
        })
    }

    fn union(&self, def: &NodeDef, path: &mut Vec<String>) -> Result<SchemaNode, SchemaError> {
        self.reject_keys(def, path, &["discriminator", "variants"], "a union")?;
        let variants = def
            .variants
            .as_ref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| self.malformed(path, "union needs at least one entry in `variants`"))?;

        let mut union = UnionSchema {
            discriminator: def
                .discriminator
                .clone()
                .unwrap_or_else(|| DEFAULT_DISCRIMINATOR.to_string()),
            variants: Vec::with_capacity(variants.len()),
        };
        for (value, variant_def) in variants {
            path.push(format!("variants.{value}"));
            let node = self.bare_node(variant_def, path, "a union variant");
            path.pop();
            let node = node?;
            if !matches!(node, SchemaNode::Object(_) | SchemaNode::Reference(_)) {
                return Err(self.malformed(path, format!("variant '{value}' must be an object or a `ref`")));
            }
            union.variants.push((value.clone(), node));
        }
        Ok(union.into())
    }
}

fn location(path: &[String]) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.join(".")
    }
}
