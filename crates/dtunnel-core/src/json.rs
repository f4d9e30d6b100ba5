// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-effort JSON helpers for host payloads.
//
// Hosts hand structured data across the bridge as JSON text. Decoding is
// tolerant: anything that is not valid JSON text passes through untouched.

use serde_json::Value;

/// Decode a string payload into a structured value.
///
/// `null` stays `null`, non-strings are returned unchanged (already
/// structured), and a string that fails to decode is returned as-is.
/// Never fails.
pub fn safe_parse_json(value: &Value) -> Value {
    match value {
        Value::String(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        other => other.clone(),
    }
}

/// Encode a value as JSON text for a host-bound payload.
///
/// Absent and `null` inputs produce `null` rather than the text `"null"`.
pub fn to_json_string_or_null(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(v) => Value::String(v.to_string()),
    }
}

/// Host-language truthiness of an opaque value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
