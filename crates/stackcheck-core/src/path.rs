//! # Document Paths
//!
//! Locates a node inside a document tree as an ordered list of mapping keys
//! and sequence indices. Paths serialize as plain JSON arrays
//! (`["Resources", "Bucket", "Properties", "Tags", 0, "Key"]`) so rendered
//! reports stay machine-readable.

use serde::{Deserialize, Serialize};

/// One step from a parent node to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A mapping key.
    Field(String),
    /// A sequence index.
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A path from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentPath(Vec<PathSegment>);

impl DocumentPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A copy of this path extended by a field name.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.into()));
        Self(segments)
    }

    /// A copy of this path extended by a sequence index.
    pub fn push_index(&self, i: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(i));
        Self(segments)
    }

    /// The segments from the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final field name, if the path ends in one.
    pub fn last_field(&self) -> Option<&str> {
        match self.0.last() {
            Some(PathSegment::Field(name)) => Some(name),
            _ => None,
        }
    }
}

impl From<Vec<PathSegment>> for DocumentPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(DocumentPath::root().to_string(), "(root)");
    }

    #[test]
    fn test_nested_display() {
        let path = DocumentPath::root()
            .push_field("Resources")
            .push_field("Bucket")
            .push_field("Tags")
            .push_index(0)
            .push_field("Key");
        assert_eq!(path.to_string(), "Resources.Bucket.Tags[0].Key");
        assert_eq!(path.last_field(), Some("Key"));
    }

    #[test]
    fn test_push_does_not_mutate_parent() {
        let parent = DocumentPath::root().push_field("A");
        let child = parent.push_index(3);
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let path = DocumentPath::root().push_field("Tags").push_index(2);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["Tags",2]"#);
        let back: DocumentPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
