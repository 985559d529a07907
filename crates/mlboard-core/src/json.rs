//! Alias-tolerant accessors for loosely typed server JSON.
//!
//! The backend names the same field differently across versions (a column
//! name may arrive as `name`, `columnName`, or `ColumnName`). Everything
//! crossing from raw JSON into typed models goes through these helpers,
//! which try each alias in a fixed priority order.

use serde_json::Value;

/// Returns the first present, non-null value among `keys`.
pub fn first_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = value.as_object()?;
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Coerces a scalar into its display string. Null reads as empty.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Looks up the first alias and coerces it to a non-empty display string.
pub fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    first_field(value, keys)
        .map(display_string)
        .filter(|s| !s.is_empty())
}

/// Numbers pass through, numeric strings are parsed, everything else is None.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Looks up the first alias and coerces it to a number.
pub fn number_field(value: &Value, keys: &[&str]) -> Option<f64> {
    first_field(value, keys).and_then(as_number)
}

/// Loose truthiness for marker fields like `is_target`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Reads an array of numbers; entries that are not numeric become NaN so
/// positions stay aligned with parallel arrays.
pub fn number_array(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| as_number(v).unwrap_or(f64::NAN))
                .collect()
        })
        .unwrap_or_default()
}

/// Reads an array of display strings.
pub fn string_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().map(display_string).collect())
        .unwrap_or_default()
}
