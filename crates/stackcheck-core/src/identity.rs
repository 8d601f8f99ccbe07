//! # Type Identifiers
//!
//! Newtype over the fully qualified name of a catalog entry, such as
//! `AWS::EC2::Instance` for a resource or `AWS::EC2::Instance.Tag` for a
//! property type. Keeps catalog keys from being confused with field names
//! or discriminator literals.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Fully qualified resource or property type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIdentifier(String);

impl TypeIdentifier {
    /// Wrap a type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Access the inner name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The resource part of a property type name
    /// (`AWS::EC2::Instance` for `AWS::EC2::Instance.Tag`).
    pub fn resource_name(&self) -> &str {
        match self.0.split_once('.') {
            Some((resource, _)) => resource,
            None => &self.0,
        }
    }

    /// True when this names a property type rather than a resource.
    pub fn is_property_type(&self) -> bool {
        self.0.contains('.')
    }
}

impl std::fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeIdentifier {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeIdentifier {
    fn from(name: String) -> Self {
        Self(name)
    }
}
