//! Shared utility functions for JSON payload handling.
//!
//! ## JSON Extraction Helpers
//!
//! The statistics API encodes most numbers as strings (`"position": "1"`),
//! so the numeric helpers accept either representation:
//! - `json_string`, `json_string_or` - Extract strings
//! - `json_number_or` - Extract numbers from number or numeric-string fields
//! - `json_path` - Walk a nested object/array path
//!
//! ## Fallback Helpers
//!
//! - `with_fallback` - Explicit, logged degradation at the call site

use std::fmt::Display;

use serde_json::Value;

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Extract string from JSON value by key.
#[inline]
pub fn json_string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

#[inline]
pub fn json_string_or(value: &Value, key: &str, default: &str) -> String {
    json_string(value, key).unwrap_or_else(|| default.to_string())
}

/// Extract a number stored either as a JSON number or a numeric string.
pub fn json_number_or(value: &Value, key: &str, default: f64) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Walk a path of object keys; numeric segments index into arrays.
pub fn json_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| {
        match segment.parse::<usize>() {
            Ok(idx) if current.is_array() => current.get(idx),
            _ => current.get(*segment),
        }
    })
}

// =============================================================================
// Fallback Helpers
// =============================================================================

/// Substitute `fallback` for a failed result, logging why.
///
/// Call sites that tolerate a flaky upstream opt in explicitly with this helper
/// instead of the gateway swallowing errors.
pub fn with_fallback<T, E: Display>(result: Result<T, E>, fallback: T, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("{} failed, using fallback: {}", context, e);
            fallback
        }
    }
}
