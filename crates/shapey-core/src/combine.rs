//! Type-dispatching combination of two values
//!
//! Numbers are summed, strings and arrays concatenated, and plain mappings
//! shallow-merged (the right side wins). Any other pairing, including a
//! mismatch of types or a `null` on either side, returns the left value.

use crate::value;
use serde_json::{Number, Value};

/// Combine two values of the same type, or return `a` when that makes no sense
pub fn combine(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => add_numbers(x, y).map_or_else(|| a.clone(), Value::Number),
        (Value::String(x), Value::String(y)) => {
            let mut joined = String::with_capacity(x.len() + y.len());
            joined.push_str(x);
            joined.push_str(y);
            Value::String(joined)
        }
        (Value::Array(x), Value::Array(y)) => {
            Value::Array(x.iter().chain(y.iter()).cloned().collect())
        }
        (Value::Object(x), Value::Object(y)) => Value::Object(value::merge(x, y)),
        _ => a.clone(),
    }
}

/// Partially applied [`combine`]: the returned closure awaits `b`
pub fn combine_with(a: Value) -> impl Fn(&Value) -> Value {
    move |b| combine(&a, b)
}

fn add_numbers(x: &Number, y: &Number) -> Option<Number> {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Some(Number::from(sum));
        }
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        if let Some(sum) = x.checked_add(y) {
            return Some(Number::from(sum));
        }
    }
    let sum = x.as_f64()? + y.as_f64()?;
    Number::from_f64(sum)
}
