//! Evaluation of a field's `conditional` visibility rule.

use serde_json::Value;
use tracing::trace;

use crate::data;
use crate::path;
use crate::types::{ConditionOperator, Conditional, FieldDef};

/// Whether a field should be shown for the given data document.
///
/// Fields without a rule are always visible. A `[*]` in the rule's target is
/// replaced by the field's own first index, so a rule on
/// `auto.vehicles[*].financed` read from `auto.vehicles[2].lienholder`
/// checks vehicle 2. A target that is absent from the data compares as null.
pub fn is_visible(field: &FieldDef, data: &Value) -> bool {
    let Some(rule) = &field.conditional else {
        return true;
    };
    let target = match path::first_index(&field.key) {
        Some(index) => path::with_index(&rule.field, index),
        None => rule.field.clone(),
    };
    let actual = data::lookup(data, &target).unwrap_or(&Value::Null);
    let visible = evaluate(rule, actual);
    trace!(key = %field.key, %target, visible, "evaluated visibility rule");
    visible
}

fn evaluate(rule: &Conditional, actual: &Value) -> bool {
    let expected = &rule.value;
    match rule.operator {
        ConditionOperator::Equals => loosely_equal(actual, expected),
        ConditionOperator::NotEquals => !loosely_equal(actual, expected),
        ConditionOperator::In => contains(expected, actual),
        ConditionOperator::NotIn => !contains(expected, actual),
        ConditionOperator::Exists => is_present(actual),
        ConditionOperator::NotExists => !is_present(actual),
        ConditionOperator::GreaterThan => {
            compare(actual, expected).is_some_and(|o| o == std::cmp::Ordering::Greater)
        }
        ConditionOperator::LessThan => {
            compare(actual, expected).is_some_and(|o| o == std::cmp::Ordering::Less)
        }
    }
}

/// Numbers compare by value regardless of integer/float representation.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn contains(set: &Value, actual: &Value) -> bool {
    match set {
        Value::Array(items) => items.iter().any(|item| loosely_equal(actual, item)),
        single => loosely_equal(actual, single),
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}
