//! # Document Adapters
//!
//! Converts trees already decoded by `serde_json` or `serde_yaml` into the
//! [`Value`] model. Parsing raw bytes is the caller's job.
//!
//! ## Deferred references
//!
//! A mapping with exactly one key that is an intrinsic function name
//! (`Ref`, or any key starting with `Fn::` by default) becomes a
//! [`Value::DeferredReference`]. Its token is the function name followed by
//! the compact JSON of its argument, e.g. `Fn::GetAtt:["Db","Endpoint"]`.
//! In YAML, the short-form tags (`!Ref`, `!GetAtt`, `!Sub`, ...) are
//! recognised as well.
//!
//! ## Nulls
//!
//! A `null` mapping entry is dropped, since absence is how the value model
//! spells "no value". A `null` document root or sequence element has no
//! such spelling and is rejected with [`CoreError::NullValue`].

use crate::error::CoreError;
use crate::path::DocumentPath;
use crate::value::{ScalarKind, Value};

/// YAML short-form tags that denote intrinsic functions.
const YAML_INTRINSIC_TAGS: &[&str] = &[
    "Ref",
    "Base64",
    "Cidr",
    "FindInMap",
    "GetAtt",
    "GetAZs",
    "ImportValue",
    "Join",
    "Select",
    "Split",
    "Sub",
    "Transform",
    "If",
    "Equals",
    "And",
    "Or",
    "Not",
    "Length",
    "ToJsonString",
];

/// Which single-key mappings count as deferred references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredMarkers {
    /// Keys matched exactly.
    pub exact: Vec<String>,
    /// Keys matched by prefix.
    pub prefixes: Vec<String>,
}

impl Default for DeferredMarkers {
    fn default() -> Self {
        Self {
            exact: vec!["Ref".to_string()],
            prefixes: vec!["Fn::".to_string()],
        }
    }
}

impl DeferredMarkers {
    /// True when `key` names an intrinsic function.
    pub fn is_marker(&self, key: &str) -> bool {
        self.exact.iter().any(|k| k == key) || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// Convert a `serde_json::Value` tree.
pub fn from_json(json: &serde_json::Value, markers: &DeferredMarkers) -> Result<Value, CoreError> {
    json_node(json, markers, &DocumentPath::root())
}

fn json_node(
    json: &serde_json::Value,
    markers: &DeferredMarkers,
    path: &DocumentPath,
) -> Result<Value, CoreError> {
    use serde_json::Value as J;

    match json {
        J::Null => Err(CoreError::NullValue { path: path.clone() }),
        J::Bool(b) => Ok(Value::boolean(*b)),
        J::Number(n) => Ok(Value::number(n.to_string())),
        J::String(s) => Ok(Value::string(s.clone())),
        J::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(json_node(item, markers, &path.push_index(i))?);
            }
            Ok(Value::Sequence(out))
        }
        J::Object(map) => {
            if map.len() == 1 {
                if let Some((key, arg)) = map.iter().next() {
                    if markers.is_marker(key) {
                        return Ok(Value::DeferredReference(format!("{key}:{arg}")));
                    }
                }
            }
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                if value.is_null() {
                    continue;
                }
                entries.push((key.clone(), json_node(value, markers, &path.push_field(key.clone()))?));
            }
            Ok(Value::Mapping(entries))
        }
    }
}

/// Convert a `serde_yaml::Value` tree.
pub fn from_yaml(yaml: &serde_yaml::Value, markers: &DeferredMarkers) -> Result<Value, CoreError> {
    yaml_node(yaml, markers, &DocumentPath::root())
}

fn yaml_node(
    yaml: &serde_yaml::Value,
    markers: &DeferredMarkers,
    path: &DocumentPath,
) -> Result<Value, CoreError> {
    use serde_yaml::Value as Y;

    match yaml {
        Y::Null => Err(CoreError::NullValue { path: path.clone() }),
        Y::Bool(b) => Ok(Value::boolean(*b)),
        Y::Number(n) => {
            if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return Err(CoreError::UnsupportedNumber {
                        path: path.clone(),
                        raw: n.to_string(),
                    });
                }
            }
            Ok(Value::number(n.to_string()))
        }
        Y::String(s) => Ok(Value::string(s.clone())),
        Y::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(yaml_node(item, markers, &path.push_index(i))?);
            }
            Ok(Value::Sequence(out))
        }
        Y::Mapping(map) => {
            if map.len() == 1 {
                if let Some((Y::String(key), arg)) = map.iter().next() {
                    if markers.is_marker(key) {
                        return Ok(Value::DeferredReference(format!("{key}:{}", yaml_token(arg))));
                    }
                }
            }
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                let key = yaml_key(key, path)?;
                if value.is_null() {
                    continue;
                }
                let child = path.push_field(key.clone());
                entries.push((key, yaml_node(value, markers, &child)?));
            }
            Ok(Value::Mapping(entries))
        }
        Y::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let name = tag.trim_start_matches('!');
            if YAML_INTRINSIC_TAGS.contains(&name) {
                let function = if name == "Ref" {
                    "Ref".to_string()
                } else {
                    format!("Fn::{name}")
                };
                return Ok(Value::DeferredReference(format!(
                    "{function}:{}",
                    yaml_token(&tagged.value)
                )));
            }
            // Unknown tags carry no meaning for validation.
            yaml_node(&tagged.value, markers, path)
        }
    }
}

fn yaml_key(key: &serde_yaml::Value, path: &DocumentPath) -> Result<String, CoreError> {
    use serde_yaml::Value as Y;

    match key {
        Y::String(s) => Ok(s.clone()),
        Y::Number(n) => Ok(n.to_string()),
        Y::Bool(b) => Ok(b.to_string()),
        other => Err(CoreError::UnsupportedKey {
            path: path.clone(),
            key: format!("{other:?}"),
        }),
    }
}

/// Compact JSON rendering of an intrinsic argument, used only as a token.
fn yaml_token(arg: &serde_yaml::Value) -> String {
    serde_json::to_string(arg).unwrap_or_else(|_| format!("{arg:?}"))
}

/// The scalar kind a JSON literal maps to, if it is a scalar.
pub fn json_scalar_kind(json: &serde_json::Value) -> Option<ScalarKind> {
    match json {
        serde_json::Value::Bool(_) => Some(ScalarKind::Boolean),
        serde_json::Value::Number(_) => Some(ScalarKind::Number),
        serde_json::Value::String(_) => Some(ScalarKind::String),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(json: serde_json::Value) -> Value {
        from_json(&json, &DeferredMarkers::default()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(convert(json!("a")), Value::string("a"));
        assert_eq!(convert(json!(42)), Value::number("42"));
        assert_eq!(convert(json!(true)), Value::boolean(true));
    }

    #[test]
    fn test_ref_is_deferred() {
        let v = convert(json!({"Ref": "InstanceTypeParam"}));
        match v {
            Value::DeferredReference(token) => assert_eq!(token, r#"Ref:"InstanceTypeParam""#),
            other => panic!("expected deferred reference, got {other:?}"),
        }
    }

    #[test]
    fn test_fn_prefix_is_deferred() {
        let v = convert(json!({"Fn::GetAtt": ["Db", "Endpoint.Address"]}));
        assert!(v.is_deferred());
    }

    #[test]
    fn test_multi_key_mapping_with_ref_is_literal() {
        let v = convert(json!({"Ref": "A", "Other": 1}));
        assert!(matches!(v, Value::Mapping(ref e) if e.len() == 2));
    }

    #[test]
    fn test_mapping_preserves_document_order() {
        let v = convert(json!({"b": 1, "a": 2, "c": 3}));
        let keys: Vec<&str> = v.as_mapping().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_null_mapping_entry_is_absent() {
        let v = convert(json!({"Key": "k", "Value": null}));
        assert!(v.get("Value").is_none());
        assert!(v.get("Key").is_some());
    }

    #[test]
    fn test_null_in_sequence_is_error() {
        let err = from_json(&json!({"Tags": ["a", null]}), &DeferredMarkers::default()).unwrap_err();
        match err {
            CoreError::NullValue { path } => assert_eq!(path.to_string(), "Tags[1]"),
            other => panic!("expected NullValue, got {other}"),
        }
    }

    #[test]
    fn test_custom_markers() {
        let markers = DeferredMarkers {
            exact: vec!["$ref".to_string()],
            prefixes: Vec::new(),
        };
        let v = from_json(&json!({"$ref": "x"}), &markers).unwrap();
        assert!(v.is_deferred());
        let v = from_json(&json!({"Ref": "x"}), &markers).unwrap();
        assert!(!v.is_deferred());
    }

    #[test]
    fn test_yaml_short_form_tags() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r#"
Properties:
  ImageId: !Ref LatestAmi
  Name: !Sub "${AWS::StackName}-web"
  Count: 3
"#,
        )
        .unwrap();
        let v = from_yaml(&yaml, &DeferredMarkers::default()).unwrap();
        let props = v.get("Properties").unwrap();
        assert!(props.get("ImageId").unwrap().is_deferred());
        match props.get("Name").unwrap() {
            Value::DeferredReference(token) => assert!(token.starts_with("Fn::Sub:")),
            other => panic!("expected deferred, got {other:?}"),
        }
        assert_eq!(props.get("Count"), Some(&Value::number("3")));
    }

    #[test]
    fn test_yaml_long_form_and_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r#"
Ref: Something
"#,
        )
        .unwrap();
        assert!(from_yaml(&yaml, &DeferredMarkers::default()).unwrap().is_deferred());

        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes").unwrap();
        let v = from_yaml(&yaml, &DeferredMarkers::default()).unwrap();
        assert_eq!(v.get("1"), Some(&Value::string("one")));
        assert!(v.get("true").is_some());
    }

    #[test]
    fn test_json_scalar_kind() {
        assert_eq!(json_scalar_kind(&json!(1.5)), Some(ScalarKind::Number));
        assert_eq!(json_scalar_kind(&json!([1])), None);
    }
}
