//! # Schema Catalog
//!
//! Maps each [`TypeIdentifier`] to its root [`SchemaNode`]. A catalog is
//! only obtainable through [`CatalogBuilder::build`], which verifies the
//! whole graph up front:
//!
//! - every root is an object or a union,
//! - every `Reference` names a declared type,
//! - every conditional rule names fields its object declares,
//! - union discriminator values are unique,
//! - every `min`/`max` pair is ordered.
//!
//! ## Thread Safety
//!
//! `SchemaCatalog` has no interior mutability and is `Send + Sync`; any
//! number of validations may read one concurrently.

use std::collections::{HashMap, HashSet};

use stackcheck_core::TypeIdentifier;

use crate::error::SchemaError;
use crate::model::{ConditionalRule, ObjectSchema, SchemaNode};

/// Upper bound on `Reference → Reference` hops followed by [`SchemaCatalog::resolve`].
const MAX_REFERENCE_HOPS: usize = 32;

/// Immutable lookup table from type identifier to root schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    types: HashMap<TypeIdentifier, SchemaNode>,
}

impl SchemaCatalog {
    /// Look up a root schema by type name.
    pub fn get(&self, type_id: &str) -> Option<&SchemaNode> {
        self.types.get(type_id)
    }

    /// True when `type_id` is declared.
    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All type identifiers, sorted.
    pub fn type_names(&self) -> Vec<&TypeIdentifier> {
        let mut names: Vec<&TypeIdentifier> = self.types.keys().collect();
        names.sort();
        names
    }

    /// Follow `Reference` nodes until a concrete schema is reached.
    ///
    /// Returns `None` for a dangling reference or a reference chain longer
    /// than the hop limit (a reference cycle with no concrete node).
    pub fn resolve<'a>(&'a self, mut node: &'a SchemaNode) -> Option<&'a SchemaNode> {
        for _ in 0..MAX_REFERENCE_HOPS {
            match node {
                SchemaNode::Reference(target) => node = self.types.get(target.as_str())?,
                concrete => return Some(concrete),
            }
        }
        None
    }
}

/// Accumulates type definitions and verifies them into a [`SchemaCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    types: HashMap<TypeIdentifier, SchemaNode>,
}

impl CatalogBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type. Declaring the same identifier twice is an error.
    pub fn insert(
        &mut self,
        type_id: impl Into<TypeIdentifier>,
        schema: impl Into<SchemaNode>,
    ) -> Result<&mut Self, SchemaError> {
        let type_id = type_id.into();
        if self.types.contains_key(&type_id) {
            return Err(SchemaError::DuplicateType {
                type_id: type_id.to_string(),
            });
        }
        self.types.insert(type_id, schema.into());
        Ok(self)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(
        mut self,
        type_id: impl Into<TypeIdentifier>,
        schema: impl Into<SchemaNode>,
    ) -> Result<Self, SchemaError> {
        self.insert(type_id, schema)?;
        Ok(self)
    }

    /// Number of types declared so far.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Verify every definition and freeze the catalog.
    pub fn build(self) -> Result<SchemaCatalog, SchemaError> {
        // Sorted so the first reported error is stable across runs.
        let mut ids: Vec<&TypeIdentifier> = self.types.keys().collect();
        ids.sort();

        for type_id in ids {
            let root = &self.types[type_id];
            match root {
                SchemaNode::Object(_) | SchemaNode::Union(_) => {}
                other => {
                    return Err(SchemaError::InvalidRoot {
                        type_id: type_id.to_string(),
                        found: other.describe(),
                    })
                }
            }
            let check = Check {
                types: &self.types,
                type_id: type_id.as_str(),
            };
            check.node(root, &mut Vec::new())?;
        }

        Ok(SchemaCatalog { types: self.types })
    }
}

struct Check<'a> {
    types: &'a HashMap<TypeIdentifier, SchemaNode>,
    type_id: &'a str,
}

impl Check<'_> {
    fn location(path: &[String]) -> String {
        if path.is_empty() {
            "(root)".to_string()
        } else {
            path.join(".")
        }
    }

    fn node(&self, node: &SchemaNode, path: &mut Vec<String>) -> Result<(), SchemaError> {
        match node {
            SchemaNode::Scalar(s) => {
                for (bound, value) in [("min_value", s.min_value), ("max_value", s.max_value)] {
                    if let Some(value) = value.filter(|v| !v.is_finite()) {
                        return Err(SchemaError::NonFiniteBound {
                            type_id: self.type_id.to_string(),
                            location: Self::location(path),
                            bound,
                            value: value.to_string(),
                        });
                    }
                }
                if let (Some(min), Some(max)) = (s.min_length, s.max_length) {
                    self.bounds(path, "length", min as f64, max as f64)?;
                }
                if let (Some(min), Some(max)) = (s.min_value, s.max_value) {
                    self.bounds(path, "value", min, max)?;
                }
                Ok(())
            }
            SchemaNode::Object(obj) => self.object(obj, path),
            SchemaNode::Array(arr) => {
                if let (Some(min), Some(max)) = (arr.min_items, arr.max_items) {
                    self.bounds(path, "items", min as f64, max as f64)?;
                }
                path.push("items".to_string());
                let result = self.node(&arr.items, path);
                path.pop();
                result
            }
            SchemaNode::Union(union) => {
                let mut seen = HashSet::new();
                for (value, variant) in &union.variants {
                    if !seen.insert(value.as_str()) {
                        return Err(SchemaError::DuplicateVariant {
                            type_id: self.type_id.to_string(),
                            location: Self::location(path),
                            value: value.clone(),
                        });
                    }
                    path.push(format!("variants.{value}"));
                    let result = self.node(variant, path);
                    path.pop();
                    result?;
                }
                Ok(())
            }
            SchemaNode::Reference(target) => {
                if self.types.contains_key(target.as_str()) {
                    Ok(())
                } else {
                    Err(SchemaError::DanglingReference {
                        type_id: self.type_id.to_string(),
                        location: Self::location(path),
                        target: target.to_string(),
                    })
                }
            }
        }
    }

    fn object(&self, obj: &ObjectSchema, path: &mut Vec<String>) -> Result<(), SchemaError> {
        for rule in &obj.rules {
            for field in rule.fields() {
                if !obj.fields.contains_key(field) {
                    return Err(SchemaError::UnknownRuleField {
                        type_id: self.type_id.to_string(),
                        location: Self::location(path),
                        field: field.to_string(),
                    });
                }
            }
            if let ConditionalRule::MutuallyExclusive(names) | ConditionalRule::RequireAtLeastOne(names) = rule {
                if names.is_empty() {
                    return Err(SchemaError::Malformed {
                        type_id: self.type_id.to_string(),
                        location: Self::location(path),
                        reason: "conditional rule names no fields".to_string(),
                    });
                }
            }
        }
        for (name, spec) in &obj.fields {
            path.push(format!("fields.{name}"));
            let result = self.node(&spec.schema, path);
            path.pop();
            result?;
        }
        Ok(())
    }

    fn bounds(&self, path: &[String], what: &'static str, min: f64, max: f64) -> Result<(), SchemaError> {
        if min > max {
            return Err(SchemaError::InvalidBounds {
                type_id: self.type_id.to_string(),
                location: Self::location(path),
                what,
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(())
    }
}
