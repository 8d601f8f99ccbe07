//! # Conditional Rule Engine
//!
//! Evaluates the cross-field rules of one object level against the
//! mapping found there. Rules are independent: one rule's violation never
//! suppresses another.
//!
//! A rule that mentions a field currently holding a deferred reference is
//! skipped entirely. Whether such a rule holds depends on what the
//! reference resolves to at deployment, which is not known here.

use stackcheck_core::{DocumentPath, Value};
use stackcheck_schema::ConditionalRule;

use crate::report::{Diagnostic, ViolationKind};

/// Evaluate `rules` against `mapping`, the entries of the object at `path`.
///
/// Group rules report at `path`; `RequiredIf` reports at the missing
/// target field.
pub fn evaluate(rules: &[ConditionalRule], mapping: &[(String, Value)], path: &DocumentPath) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for rule in rules {
        if rule.fields().into_iter().any(|name| is_deferred(mapping, name)) {
            continue;
        }
        match rule {
            ConditionalRule::MutuallyExclusive(names) => {
                let present: Vec<&str> = names
                    .iter()
                    .map(String::as_str)
                    .filter(|name| lookup(mapping, name).is_some())
                    .collect();
                if present.len() > 1 {
                    out.push(Diagnostic::new(
                        path.clone(),
                        ViolationKind::MutualExclusionViolated,
                        format!(
                            "at most one of {} may be set, found {}",
                            names.join(", "),
                            present.join(", ")
                        ),
                    ));
                }
            }
            ConditionalRule::RequireAtLeastOne(names) => {
                if names.iter().all(|name| lookup(mapping, name).is_none()) {
                    out.push(Diagnostic::new(
                        path.clone(),
                        ViolationKind::RequireAtLeastOneViolated,
                        format!("at least one of {} is required", names.join(", ")),
                    ));
                }
            }
            ConditionalRule::RequiredIf { target, when, equals } => {
                let triggered = lookup(mapping, when).is_some_and(|v| v == equals);
                if triggered && lookup(mapping, target).is_none() {
                    out.push(Diagnostic::new(
                        path.push_field(target.as_str()),
                        ViolationKind::ConditionalRequirementViolated,
                        format!("field '{target}' is required when '{when}' is {equals}"),
                    ));
                }
            }
        }
    }
    out
}

fn lookup<'a>(mapping: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    mapping.iter().find(|(k, _)| k == name).map(|(_, v)| v)
}

fn is_deferred(mapping: &[(String, Value)], name: &str) -> bool {
    lookup(mapping, name).is_some_and(Value::is_deferred)
}
