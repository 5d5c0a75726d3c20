//! Lenient accessors over `serde_json::Value`.
//!
//! Every helper returns a default instead of failing when a key is missing or
//! carries an unexpected type, so a partially shaped payload still maps.

use serde_json::Value;

pub fn str_at(value: &Value, key: &str) -> String {
    opt_str_at(value, key).unwrap_or_default()
}

pub fn opt_str_at(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn i64_at(value: &Value, key: &str) -> i64 {
    opt_i64_at(value, key).unwrap_or(0)
}

pub fn opt_i64_at(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

pub fn f64_at(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn bool_at(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub fn array_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First string element of an array field.
pub fn first_str_at(value: &Value, key: &str) -> String {
    array_at(value, key)
        .first()
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// `value[outer][inner][tag]`, e.g. `ImageBlurHashes.Primary.<tag>`.
pub fn nested_str(value: &Value, outer: &str, inner: &str, tag: &str) -> String {
    if tag.is_empty() {
        return String::new();
    }
    value
        .get(outer)
        .and_then(|v| v.get(inner))
        .and_then(|v| v.get(tag))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
