//! # Validator
//!
//! Schema-directed recursive descent over a [`Value`] tree.
//!
//! ## Ordering
//!
//! Diagnostics come out in a stable pre-order: within an object, declared
//! fields in schema-declaration order (a missing field's diagnostic takes
//! the field's slot), then undeclared fields in document order, then the
//! object's conditional rules. Array elements are visited in index order.
//! Two calls with the same inputs produce the same list.
//!
//! ## Failure locality
//!
//! A Fatal diagnostic stops descent into the subtree it was found in and
//! nowhere else. Only an unknown root type ends the whole call.
//!
//! ## Deferred references
//!
//! A deferred reference in a position that allows one is accepted without
//! any constraint check. Presence checks at the parent level still see it
//! as a present field.

use stackcheck_core::{DocumentPath, ScalarKind, TypeIdentifier, Value};
use stackcheck_schema::{ArraySchema, ObjectSchema, ScalarSchema, SchemaCatalog, SchemaNode, UnionSchema};

use crate::report::{Diagnostic, Reporter, ViolationKind};
use crate::rules;

/// Default bound on descent depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Top-level template section holding resource declarations.
const RESOURCES: &str = "Resources";

/// Field every resource declaration is discriminated by.
const RESOURCE_TYPE: &str = "Type";

/// Tunables for one validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Deepest nesting level descended into before reporting
    /// `RecursionLimitExceeded`.
    pub max_depth: usize,
    /// Whether undeclared fields produce `UnknownField` warnings.
    pub report_unknown_fields: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            report_unknown_fields: true,
        }
    }
}

/// Validate `root` against the catalog entry `type_id` with default options.
pub fn validate(root: &Value, type_id: &str, catalog: &SchemaCatalog) -> Vec<Diagnostic> {
    validate_with(root, type_id, catalog, &ValidateOptions::default())
}

/// Validate `root` against the catalog entry `type_id`.
///
/// An unknown `type_id` yields exactly one `UnknownType` diagnostic.
pub fn validate_with(
    root: &Value,
    type_id: &str,
    catalog: &SchemaCatalog,
    options: &ValidateOptions,
) -> Vec<Diagnostic> {
    let Some(schema) = catalog.get(type_id) else {
        return vec![Diagnostic::new(
            DocumentPath::root(),
            ViolationKind::UnknownType,
            format!("type '{type_id}' is not in the schema catalog"),
        )];
    };
    let mut walker = Walker::new(catalog, options);
    walker.root(root, schema, &DocumentPath::root(), 0, &[]);
    walker.reporter.into_diagnostics()
}

/// Validate every declaration under a template's `Resources` mapping,
/// choosing each one's schema by its `Type` literal.
///
/// Each resource is validated independently: a resource with a missing or
/// unknown type is reported and skipped, and the others are still checked.
/// Sections other than `Resources` are not checked.
pub fn validate_template(root: &Value, catalog: &SchemaCatalog, options: &ValidateOptions) -> Vec<Diagnostic> {
    let mut walker = Walker::new(catalog, options);
    walker.template(root);
    walker.reporter.into_diagnostics()
}

struct Walker<'a> {
    catalog: &'a SchemaCatalog,
    options: &'a ValidateOptions,
    reporter: Reporter,
}

impl<'a> Walker<'a> {
    fn new(catalog: &'a SchemaCatalog, options: &'a ValidateOptions) -> Self {
        Self {
            catalog,
            options,
            reporter: Reporter::new(),
        }
    }

    fn mismatch(&mut self, path: &DocumentPath, expected: &str, found: &Value) {
        self.reporter.report(
            path.clone(),
            ViolationKind::TypeMismatch,
            format!("expected {expected}, found {}", found.kind_name()),
        );
    }

    // ─── Template mode ──────────────────────────────────────────────

    fn template(&mut self, root: &Value) {
        let root_path = DocumentPath::root();
        if root.as_mapping().is_none() {
            self.mismatch(&root_path, "mapping", root);
            return;
        }
        let resources_path = root_path.push_field(RESOURCES);
        let Some(resources) = root.get(RESOURCES) else {
            self.reporter.report(
                resources_path,
                ViolationKind::MissingRequiredField,
                format!("required field '{RESOURCES}' is missing"),
            );
            return;
        };
        let Some(entries) = resources.as_mapping() else {
            self.mismatch(&resources_path, "mapping", resources);
            return;
        };
        for (logical_id, resource) in entries {
            self.resource(resource, &resources_path.push_field(logical_id.as_str()));
        }
    }

    fn resource(&mut self, resource: &Value, path: &DocumentPath) {
        if resource.as_mapping().is_none() {
            self.mismatch(path, "mapping", resource);
            return;
        }
        let Some(type_value) = resource.get(RESOURCE_TYPE) else {
            self.reporter.report(
                path.clone(),
                ViolationKind::MissingDiscriminator,
                format!("discriminator field '{RESOURCE_TYPE}' is missing"),
            );
            return;
        };
        let type_path = path.push_field(RESOURCE_TYPE);
        let Some(type_name) = type_value.as_str() else {
            self.reporter.report(
                type_path,
                ViolationKind::MissingDiscriminator,
                format!(
                    "discriminator '{RESOURCE_TYPE}' must be a literal string, found {}",
                    type_value.kind_name()
                ),
            );
            return;
        };
        let type_id = TypeIdentifier::new(type_name);
        if type_id.is_property_type() {
            self.reporter.report(
                type_path,
                ViolationKind::UnknownVariant,
                format!(
                    "'{type_name}' is a property type of {}, not a resource type",
                    type_id.resource_name()
                ),
            );
            return;
        }
        let Some(schema) = self.catalog.get(type_name) else {
            self.reporter.report(
                type_path,
                ViolationKind::UnknownVariant,
                format!("'{type_name}' is not a resource type in the schema catalog"),
            );
            return;
        };
        // Depth 1: the resource sits one level below `Resources`.
        self.root(resource, schema, path, 1, &[RESOURCE_TYPE]);
    }

    // ─── Recursive descent ──────────────────────────────────────────

    /// Validate a mapping against a catalog root. Names in `implicit` count
    /// as declared fields of whichever object the root resolves to.
    fn root(&mut self, value: &Value, schema: &SchemaNode, path: &DocumentPath, depth: usize, implicit: &[&str]) {
        match schema {
            SchemaNode::Object(_) | SchemaNode::Union(_) if depth > self.options.max_depth => {
                self.depth_exceeded(path)
            }
            SchemaNode::Object(_) | SchemaNode::Union(_) if value.is_deferred() => {
                self.mismatch(path, "mapping", value)
            }
            SchemaNode::Object(object) => self.object(value, object, path, depth, implicit),
            SchemaNode::Union(union) => self.union(value, union, path, depth, implicit),
            other => self.node(value, other, path, false, depth),
        }
    }

    fn node(&mut self, value: &Value, schema: &SchemaNode, path: &DocumentPath, allows_deferred: bool, depth: usize) {
        if depth > self.options.max_depth {
            self.depth_exceeded(path);
            return;
        }
        if let Value::DeferredReference(token) = value {
            if !allows_deferred {
                self.reporter.report(
                    path.clone(),
                    ViolationKind::TypeMismatch,
                    format!("expected literal {}, found deferred reference {token}", schema.describe()),
                );
            }
            return;
        }
        match schema {
            SchemaNode::Scalar(scalar) => self.scalar(value, scalar, path),
            SchemaNode::Object(object) => self.object(value, object, path, depth, &[]),
            SchemaNode::Array(array) => self.array(value, array, path, allows_deferred, depth),
            SchemaNode::Union(union) => self.union(value, union, path, depth, &[]),
            SchemaNode::Reference(target) => match self.catalog.resolve(schema) {
                Some(resolved) => self.node(value, resolved, path, allows_deferred, depth),
                None => self.reporter.report(
                    path.clone(),
                    ViolationKind::UnknownType,
                    format!("type '{target}' is not in the schema catalog"),
                ),
            },
        }
    }

    fn depth_exceeded(&mut self, path: &DocumentPath) {
        self.reporter.report(
            path.clone(),
            ViolationKind::RecursionLimitExceeded,
            format!("nesting exceeds maximum depth {}", self.options.max_depth),
        );
    }

    fn scalar(&mut self, value: &Value, schema: &ScalarSchema, path: &DocumentPath) {
        let Some((kind, raw)) = value.as_scalar() else {
            self.mismatch(path, schema.kind.as_str(), value);
            return;
        };
        if kind != schema.kind {
            self.mismatch(path, schema.kind.as_str(), value);
            return;
        }

        if let Some(pattern) = &schema.pattern {
            if !pattern.is_full_match(raw) {
                self.reporter.report(
                    path.clone(),
                    ViolationKind::PatternMismatch,
                    format!("value {value} does not match pattern {}", pattern.as_str()),
                );
            }
        }

        if kind == ScalarKind::String {
            let length = raw.chars().count();
            if let Some(min) = schema.min_length.filter(|min| length < *min) {
                self.reporter.report(
                    path.clone(),
                    ViolationKind::LengthOutOfRange,
                    format!("length {length} is below minimum {min}"),
                );
            } else if let Some(max) = schema.max_length.filter(|max| length > *max) {
                self.reporter.report(
                    path.clone(),
                    ViolationKind::LengthOutOfRange,
                    format!("length {length} exceeds maximum {max}"),
                );
            }
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = schema.min_value.filter(|min| number < *min) {
                self.reporter.report(
                    path.clone(),
                    ViolationKind::ValueOutOfRange,
                    format!("value {raw} is below minimum {min}"),
                );
            } else if let Some(max) = schema.max_value.filter(|max| number > *max) {
                self.reporter.report(
                    path.clone(),
                    ViolationKind::ValueOutOfRange,
                    format!("value {raw} exceeds maximum {max}"),
                );
            }
        }

        if !schema.allowed_values.is_empty() && !schema.allowed_values.iter().any(|allowed| allowed == value) {
            let allowed: Vec<String> = schema.allowed_values.iter().map(Value::to_string).collect();
            self.reporter.report(
                path.clone(),
                ViolationKind::NotAnAllowedValue,
                format!("value {value} is not one of {}", allowed.join(", ")),
            );
        }
    }

    fn object(&mut self, value: &Value, schema: &ObjectSchema, path: &DocumentPath, depth: usize, implicit: &[&str]) {
        let Some(entries) = value.as_mapping() else {
            self.mismatch(path, "mapping", value);
            return;
        };

        for (name, spec) in &schema.fields {
            match value.get(name) {
                Some(child) => self.node(
                    child,
                    &spec.schema,
                    &path.push_field(name.as_str()),
                    spec.allows_deferred,
                    depth + 1,
                ),
                None if spec.required => self.reporter.report(
                    path.push_field(name.as_str()),
                    ViolationKind::MissingRequiredField,
                    format!("required field '{name}' is missing"),
                ),
                None => {}
            }
        }

        if self.options.report_unknown_fields {
            for (key, _) in entries {
                if !schema.fields.contains_key(key) && !implicit.contains(&key.as_str()) {
                    self.reporter.report(
                        path.push_field(key.as_str()),
                        ViolationKind::UnknownField,
                        format!("field '{key}' is not declared by the schema"),
                    );
                }
            }
        }

        self.reporter.extend(rules::evaluate(&schema.rules, entries, path));
    }

    fn array(&mut self, value: &Value, schema: &ArraySchema, path: &DocumentPath, allows_deferred: bool, depth: usize) {
        let Some(items) = value.as_sequence() else {
            self.mismatch(path, "sequence", value);
            return;
        };

        let count = items.len();
        if let Some(min) = schema.min_items.filter(|min| count < *min) {
            self.reporter.report(
                path.clone(),
                ViolationKind::ArityOutOfRange,
                format!("{count} items is below minimum {min}"),
            );
        } else if let Some(max) = schema.max_items.filter(|max| count > *max) {
            self.reporter.report(
                path.clone(),
                ViolationKind::ArityOutOfRange,
                format!("{count} items exceeds maximum {max}"),
            );
        }

        for (i, item) in items.iter().enumerate() {
            self.node(item, &schema.items, &path.push_index(i), allows_deferred, depth + 1);
        }
    }

    fn union(&mut self, value: &Value, schema: &UnionSchema, path: &DocumentPath, depth: usize, inherited: &[&str]) {
        if value.as_mapping().is_none() {
            self.mismatch(path, "mapping", value);
            return;
        }
        let discriminator = schema.discriminator.as_str();
        let Some(tag) = value.get(discriminator) else {
            self.reporter.report(
                path.clone(),
                ViolationKind::MissingDiscriminator,
                format!("discriminator field '{discriminator}' is missing"),
            );
            return;
        };
        let tag_path = path.push_field(discriminator);
        let Some(tag) = tag.as_str() else {
            self.reporter.report(
                tag_path,
                ViolationKind::MissingDiscriminator,
                format!(
                    "discriminator '{discriminator}' must be a literal string, found {}",
                    tag.kind_name()
                ),
            );
            return;
        };
        let Some(variant) = schema.find(tag) else {
            let known: Vec<&str> = schema.variants.iter().map(|(v, _)| v.as_str()).collect();
            self.reporter.report(
                tag_path,
                ViolationKind::UnknownVariant,
                format!("'{tag}' is not a known variant; expected one of {}", known.join(", ")),
            );
            return;
        };
        match self.catalog.resolve(variant) {
            Some(resolved) => {
                let mut implicit = inherited.to_vec();
                implicit.push(discriminator);
                self.root(value, resolved, path, depth + 1, &implicit)
            }
            None => self.reporter.report(
                path.clone(),
                ViolationKind::UnknownType,
                format!("variant '{tag}' refers to a type that is not in the schema catalog"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackcheck_schema::{CatalogBuilder, ConditionalRule, FieldSpec};

    fn tag() -> ObjectSchema {
        ObjectSchema::new()
            .field(
                "Key",
                FieldSpec::required(
                    ScalarSchema::string()
                        .with_pattern("^[a-zA-Z_][a-zA-Z_0-9-]*$")
                        .unwrap()
                        .with_length(Some(1), Some(255)),
                ),
            )
            .field(
                "Value",
                FieldSpec::required(ScalarSchema::string().with_length(Some(1), Some(255))),
            )
    }

    fn launch_template() -> ObjectSchema {
        let names = vec!["LaunchTemplateId".to_string(), "LaunchTemplateName".to_string()];
        ObjectSchema::new()
            .field("LaunchTemplateId", FieldSpec::optional(ScalarSchema::string()))
            .field("LaunchTemplateName", FieldSpec::optional(ScalarSchema::string()))
            .field("Version", FieldSpec::optional(ScalarSchema::string()))
            .rule(ConditionalRule::MutuallyExclusive(names.clone()))
            .rule(ConditionalRule::RequireAtLeastOne(names))
    }

    fn catalog() -> SchemaCatalog {
        let properties = ObjectSchema::new()
            .field("LaunchTemplate", FieldSpec::optional(SchemaNode::Reference("LaunchTemplate".into())))
            .field(
                "SecurityGroupIds",
                FieldSpec::optional(ArraySchema::of(ScalarSchema::string()).with_items(Some(1), Some(5))),
            )
            .field(
                "Tags",
                FieldSpec::optional(ArraySchema::of(SchemaNode::Reference("Tag".into()))),
            )
            .field(
                "Tenancy",
                FieldSpec::optional(ScalarSchema::string().with_allowed([
                    Value::string("default"),
                    Value::string("dedicated"),
                    Value::string("host"),
                ])),
            )
            .field("HostId", FieldSpec::optional(ScalarSchema::string()))
            .field(
                "CoreCount",
                FieldSpec::optional(ScalarSchema::number().with_range(Some(1.0), Some(192.0))),
            )
            .field("ImageId", FieldSpec::required(ScalarSchema::string()).literal_only())
            .rule(ConditionalRule::RequiredIf {
                target: "HostId".into(),
                when: "Tenancy".into(),
                equals: Value::string("host"),
            });
        let statement = ObjectSchema::new()
            .field("Name", FieldSpec::optional(ScalarSchema::string()))
            .field("Not", FieldSpec::optional(SchemaNode::Reference("Statement".into())));
        let variant_a = ObjectSchema::new()
            .field("Type", FieldSpec::required(ScalarSchema::string()))
            .field("Alpha", FieldSpec::required(ScalarSchema::string()));
        let variant_b = ObjectSchema::new().field("Beta", FieldSpec::required(ScalarSchema::number()));
        let union = UnionSchema::new().variant("A", variant_a).variant("B", variant_b);
        let resource = ObjectSchema::new()
            .field("Type", FieldSpec::required(ScalarSchema::string()).literal_only())
            .field("Properties", FieldSpec::required(SchemaNode::Reference("Properties".into())));

        CatalogBuilder::new()
            .with("Tag", tag())
            .and_then(|b| b.with("LaunchTemplate", launch_template()))
            .and_then(|b| b.with("Properties", properties))
            .and_then(|b| b.with("Statement", statement))
            .and_then(|b| b.with("AB", union))
            .and_then(|b| b.with("AWS::Test::Thing", resource))
            .and_then(|b| b.with("AWS::Test::Thing.Tag", tag()))
            .and_then(CatalogBuilder::build)
            .unwrap()
    }

    fn json(v: serde_json::Value) -> Value {
        stackcheck_core::from_json(&v, &Default::default()).unwrap()
    }

    fn kinds(diags: &[Diagnostic]) -> Vec<ViolationKind> {
        diags.iter().map(|d| d.kind).collect()
    }

    fn paths(diags: &[Diagnostic]) -> Vec<String> {
        diags.iter().map(|d| d.path.to_string()).collect()
    }

    #[test]
    fn test_tag_pattern_mismatch_only() {
        let diags = validate(&json(serde_json::json!({"Key": "1bad", "Value": "ok"})), "Tag", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::PatternMismatch]);
        assert_eq!(paths(&diags), ["Key"]);
    }

    #[test]
    fn test_valid_tag_is_clean() {
        let diags = validate(&json(serde_json::json!({"Key": "Name", "Value": "web"})), "Tag", &catalog());
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn test_launch_template_both_and_neither() {
        let c = catalog();
        let both = json(serde_json::json!({"LaunchTemplateId": "lt-1", "LaunchTemplateName": "web"}));
        assert_eq!(
            kinds(&validate(&both, "LaunchTemplate", &c)),
            [ViolationKind::MutualExclusionViolated]
        );
        let neither = json(serde_json::json!({"Version": "1"}));
        assert_eq!(
            kinds(&validate(&neither, "LaunchTemplate", &c)),
            [ViolationKind::RequireAtLeastOneViolated]
        );
    }

    #[test]
    fn test_empty_array_reports_arity_once() {
        let doc = json(serde_json::json!({"ImageId": "ami-1", "SecurityGroupIds": []}));
        let diags = validate(&doc, "Properties", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::ArityOutOfRange]);
        assert_eq!(paths(&diags), ["SecurityGroupIds"]);
    }

    #[test]
    fn test_unknown_type_is_single_fatal() {
        let diags = validate(&json(serde_json::json!({})), "Nope", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::UnknownType]);
        assert!(diags[0].path.is_root());
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let diags = validate(&json(serde_json::json!({})), "Tag", &catalog());
        assert_eq!(
            kinds(&diags),
            [ViolationKind::MissingRequiredField, ViolationKind::MissingRequiredField]
        );
        assert_eq!(paths(&diags), ["Key", "Value"]);
    }

    #[test]
    fn test_pattern_and_enum_are_independent() {
        let schema = ObjectSchema::new().field(
            "Mode",
            FieldSpec::optional(
                ScalarSchema::string()
                    .with_pattern("[a-z]+")
                    .unwrap()
                    .with_allowed([Value::string("on"), Value::string("off")]),
            ),
        );
        let c = CatalogBuilder::new().with("T", schema).unwrap().build().unwrap();
        let diags = validate(&json(serde_json::json!({"Mode": "MAYBE"})), "T", &c);
        assert_eq!(
            kinds(&diags),
            [ViolationKind::PatternMismatch, ViolationKind::NotAnAllowedValue]
        );
    }

    #[test]
    fn test_deferred_reference_exempts_constraints() {
        let c = catalog();
        let literal = json(serde_json::json!({"Key": "1bad", "Value": ""}));
        assert_eq!(validate(&literal, "Tag", &c).len(), 2);

        let deferred = json(serde_json::json!({"Key": {"Ref": "KeyParam"}, "Value": {"Fn::Sub": "${AWS::StackName}"}}));
        assert!(validate(&deferred, "Tag", &c).is_empty());
    }

    #[test]
    fn test_deferred_reference_does_not_satisfy_absence() {
        let doc = json(serde_json::json!({"Key": {"Ref": "KeyParam"}}));
        let diags = validate(&doc, "Tag", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::MissingRequiredField]);
        assert_eq!(paths(&diags), ["Value"]);
    }

    #[test]
    fn test_deferred_reference_rejected_when_literal_only() {
        let doc = json(serde_json::json!({"ImageId": {"Ref": "Ami"}}));
        let diags = validate(&doc, "Properties", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::TypeMismatch]);
        assert!(diags[0].message.contains("deferred reference"), "{}", diags[0].message);
    }

    #[test]
    fn test_deferred_root_is_type_mismatch() {
        let diags = validate(&Value::deferred("Ref:\"X\""), "Tag", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::TypeMismatch]);
    }

    #[test]
    fn test_deferred_reference_replaces_array_and_object() {
        let doc = json(serde_json::json!({
            "ImageId": "ami-1",
            "SecurityGroupIds": {"Ref": "Sgs"},
            "LaunchTemplate": {"Fn::If": ["UseId", {"LaunchTemplateId": "lt-1"}, {"Ref": "AWS::NoValue"}]},
            "Tags": [{"Key": "Name", "Value": "web"}, {"Fn::If": ["Prod", {"Key": "Env", "Value": "prod"}, {"Ref": "AWS::NoValue"}]}]
        }));
        let diags = validate(&doc, "Properties", &catalog());
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn test_literal_items_still_checked_next_to_deferred_items() {
        let doc = json(serde_json::json!({
            "ImageId": "ami-1",
            "SecurityGroupIds": ["sg-1", {"Ref": "Extra"}, 7]
        }));
        let diags = validate(&doc, "Properties", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::TypeMismatch]);
        assert_eq!(paths(&diags), ["SecurityGroupIds[2]"]);
    }

    #[test]
    fn test_type_mismatch_is_local() {
        let doc = json(serde_json::json!({
            "ImageId": "ami-1",
            "Tags": [{"Key": 7, "Value": "ok"}, "not-a-tag", {"Key": "Good", "Value": ""}],
            "CoreCount": 500
        }));
        let diags = validate(&doc, "Properties", &catalog());
        assert_eq!(
            kinds(&diags),
            [
                ViolationKind::TypeMismatch,
                ViolationKind::TypeMismatch,
                ViolationKind::LengthOutOfRange,
                ViolationKind::ValueOutOfRange,
            ]
        );
        assert_eq!(paths(&diags), ["Tags[0].Key", "Tags[1]", "Tags[2].Value", "CoreCount"]);
        assert_eq!(diags[0].message, "expected string, found number");
    }

    #[test]
    fn test_nested_reference_validated() {
        let doc = json(serde_json::json!({
            "ImageId": "ami-1",
            "LaunchTemplate": {"LaunchTemplateId": "a", "LaunchTemplateName": "b"}
        }));
        let diags = validate(&doc, "Properties", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::MutualExclusionViolated]);
        assert_eq!(paths(&diags), ["LaunchTemplate"]);
    }

    #[test]
    fn test_required_if_triggers() {
        let doc = json(serde_json::json!({"ImageId": "ami-1", "Tenancy": "host"}));
        let diags = validate(&doc, "Properties", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::ConditionalRequirementViolated]);
        assert_eq!(paths(&diags), ["HostId"]);
    }

    #[test]
    fn test_unknown_field_warning_after_declared_fields() {
        let doc = json(serde_json::json!({"Extra": 1, "Key": "Name"}));
        let diags = validate(&doc, "Tag", &catalog());
        assert_eq!(
            kinds(&diags),
            [ViolationKind::MissingRequiredField, ViolationKind::UnknownField]
        );
        assert_eq!(paths(&diags), ["Value", "Extra"]);

        let quiet = ValidateOptions {
            report_unknown_fields: false,
            ..ValidateOptions::default()
        };
        let diags = validate_with(&doc, "Tag", &catalog(), &quiet);
        assert_eq!(kinds(&diags), [ViolationKind::MissingRequiredField]);
    }

    #[test]
    fn test_union_selects_variant() {
        let c = catalog();
        let a = json(serde_json::json!({"Type": "A", "Alpha": "x"}));
        assert!(validate(&a, "AB", &c).is_empty());

        // Variant B does not declare `Type`; the discriminator is still accepted.
        let b = json(serde_json::json!({"Type": "B", "Alpha": "x"}));
        let diags = validate(&b, "AB", &c);
        assert_eq!(
            kinds(&diags),
            [ViolationKind::MissingRequiredField, ViolationKind::UnknownField]
        );
        assert_eq!(paths(&diags), ["Beta", "Alpha"]);
    }

    #[test]
    fn test_union_unknown_variant_only() {
        let doc = json(serde_json::json!({"Type": "C", "Alpha": 1, "Junk": true}));
        let diags = validate(&doc, "AB", &catalog());
        assert_eq!(kinds(&diags), [ViolationKind::UnknownVariant]);
        assert_eq!(paths(&diags), ["Type"]);
    }

    #[test]
    fn test_union_missing_discriminator() {
        let c = catalog();
        let diags = validate(&json(serde_json::json!({"Alpha": "x"})), "AB", &c);
        assert_eq!(kinds(&diags), [ViolationKind::MissingDiscriminator]);

        let diags = validate(&json(serde_json::json!({"Type": {"Ref": "T"}})), "AB", &c);
        assert_eq!(kinds(&diags), [ViolationKind::MissingDiscriminator]);
        assert_eq!(paths(&diags), ["Type"]);
    }

    #[test]
    fn test_recursion_limit_is_local() {
        let mut inner = serde_json::json!({"Name": "leaf"});
        for _ in 0..10 {
            inner = serde_json::json!({"Not": inner});
        }
        let doc = json(serde_json::json!({"Not": inner, "Name": 5}));
        let options = ValidateOptions {
            max_depth: 4,
            ..ValidateOptions::default()
        };
        let diags = validate_with(&doc, "Statement", &catalog(), &options);
        assert_eq!(
            kinds(&diags),
            [ViolationKind::TypeMismatch, ViolationKind::RecursionLimitExceeded]
        );
        assert_eq!(paths(&diags), ["Name", "Not.Not.Not.Not.Not"]);
    }

    #[test]
    fn test_template_mode() {
        let doc = json(serde_json::json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": {
                "Good": {"Type": "AWS::Test::Thing", "Properties": {"ImageId": "ami-1"}},
                "NoType": {"Properties": {}},
                "Unknown": {"Type": "AWS::Nope::Nothing"},
                "PropertyType": {"Type": "AWS::Test::Thing.Tag"},
                "Bad": {"Type": "AWS::Test::Thing", "Properties": {}}
            }
        }));
        let diags = validate_template(&doc, &catalog(), &ValidateOptions::default());
        assert_eq!(
            kinds(&diags),
            [
                ViolationKind::MissingDiscriminator,
                ViolationKind::UnknownVariant,
                ViolationKind::UnknownVariant,
                ViolationKind::MissingRequiredField,
            ]
        );
        assert_eq!(
            paths(&diags),
            [
                "Resources.NoType",
                "Resources.Unknown.Type",
                "Resources.PropertyType.Type",
                "Resources.Bad.Properties.ImageId",
            ]
        );
    }

    #[test]
    fn test_template_resource_with_union_root_keeps_type_implicit() {
        let plain = ObjectSchema::new().field("Size", FieldSpec::required(ScalarSchema::number()));
        let tagged = ObjectSchema::new().field("Label", FieldSpec::required(ScalarSchema::string()));
        let union = UnionSchema {
            discriminator: "Kind".to_string(),
            ..UnionSchema::new().variant("plain", plain).variant("tagged", tagged)
        };
        let c = CatalogBuilder::new().with("AWS::Test::Shape", union).unwrap().build().unwrap();
        let doc = json(serde_json::json!({
            "Resources": {
                "Ok": {"Type": "AWS::Test::Shape", "Kind": "plain", "Size": 3},
                "Extra": {"Type": "AWS::Test::Shape", "Kind": "tagged", "Label": "x", "Size": 3}
            }
        }));
        let diags = validate_template(&doc, &c, &ValidateOptions::default());
        assert_eq!(kinds(&diags), [ViolationKind::UnknownField]);
        assert_eq!(paths(&diags), ["Resources.Extra.Size"]);
    }

    #[test]
    fn test_template_property_type_names_its_resource() {
        let doc = json(serde_json::json!({"Resources": {"T": {"Type": "AWS::Test::Thing.Tag"}}}));
        let diags = validate_template(&doc, &catalog(), &ValidateOptions::default());
        assert_eq!(kinds(&diags), [ViolationKind::UnknownVariant]);
        assert!(diags[0].message.contains("property type of AWS::Test::Thing"), "{}", diags[0].message);
    }

    #[test]
    fn test_template_without_resources() {
        let c = catalog();
        let diags = validate_template(&json(serde_json::json!({})), &c, &ValidateOptions::default());
        assert_eq!(kinds(&diags), [ViolationKind::MissingRequiredField]);
        assert_eq!(paths(&diags), ["Resources"]);

        let diags = validate_template(
            &json(serde_json::json!({"Resources": []})),
            &c,
            &ValidateOptions::default(),
        );
        assert_eq!(kinds(&diags), [ViolationKind::TypeMismatch]);

        let diags = validate_template(&json(serde_json::json!([])), &c, &ValidateOptions::default());
        assert_eq!(kinds(&diags), [ViolationKind::TypeMismatch]);
        assert!(diags[0].path.is_root());
    }
}
