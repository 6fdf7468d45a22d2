use serde_json::Value;
use tracing::warn;

use super::domain::{Condition, Operator, Resolved};

/// Evaluate one condition against the context. Never panics; unsupported operators and
/// type mismatches evaluate to false.
pub(crate) fn evaluate_condition(condition: &Condition, context: &Value) -> bool {
    let resolved = condition.field.resolve(context);
    let expected = &condition.value;

    match &condition.operator {
        Operator::Equals => present_and(resolved, |actual| strict_equals(actual, expected)),
        Operator::NotEquals => !present_and(resolved, |actual| strict_equals(actual, expected)),
        Operator::Contains => present_and(resolved, |actual| contains(actual, expected)),
        Operator::GreaterThan => compare(resolved, expected, |left, right| left > right),
        Operator::LessThan => compare(resolved, expected, |left, right| left < right),
        Operator::In => match (resolved, expected) {
            (Resolved::Present(actual), Value::Array(options)) => {
                options.iter().any(|option| strict_equals(option, actual))
            }
            _ => false,
        },
        Operator::NotIn => match (resolved, expected) {
            (Resolved::Present(actual), Value::Array(options)) => {
                !options.iter().any(|option| strict_equals(option, actual))
            }
            (Resolved::Absent, Value::Array(_)) => true,
            _ => false,
        },
        Operator::Unsupported(name) => {
            warn!(operator = %name, field = %condition.field, "unsupported rule operator");
            false
        }
    }
}

fn present_and(resolved: Resolved<'_>, check: impl FnOnce(&Value) -> bool) -> bool {
    match resolved {
        Resolved::Present(actual) => check(actual),
        Resolved::Absent => false,
    }
}

/// Scalar equality with numbers compared by value. Arrays and objects never compare equal.
fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

/// Case-insensitive substring for strings, element membership for arrays.
fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(haystack), Value::String(needle)) => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        (Value::Array(items), _) => items.iter().any(|item| strict_equals(item, expected)),
        _ => false,
    }
}

fn compare(resolved: Resolved<'_>, expected: &Value, order: impl Fn(f64, f64) -> bool) -> bool {
    let left = match resolved {
        Resolved::Present(actual) => to_number(actual),
        Resolved::Absent => f64::NAN,
    };
    let right = to_number(expected);
    // NaN on either side makes every ordering false.
    order(left, right)
}

/// Loose numeric coercion: null and empty strings are 0, booleans are 0/1, anything
/// unparseable is NaN.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}
