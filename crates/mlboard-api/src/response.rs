//! Server rejection surfacing.
//!
//! A failed response body is reduced to one display message, trying in
//! order: a structured `message` field, a flattened `errors` map, the raw
//! body text, and finally a generic fallback naming the status.

use mlboard_core::BoardError;
use serde_json::Value;

/// Builds the typed error for a non-success response.
pub fn rejection_error(status: u16, body: &str) -> BoardError {
    BoardError::Api {
        status: Some(status),
        message: rejection_message(status, body),
    }
}

/// Reduces a rejection body to its best display message.
pub fn rejection_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        if let Some(message) = parsed
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            return message.to_string();
        }
        if let Some(errors) = parsed.get("errors").and_then(Value::as_object) {
            let collected: Vec<String> = errors.values().flat_map(flatten_field_errors).collect();
            if !collected.is_empty() {
                return collected.join("\n");
            }
        }
        if let Some(text) = parsed.as_str().map(str::trim).filter(|t| !t.is_empty()) {
            return text.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    format!("Request failed with status {status}")
}

fn flatten_field_errors(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_wins() {
        let message = rejection_message(400, r#"{"message": "Dataset not found"}"#);
        assert_eq!(message, "Dataset not found");
    }

    #[test]
    fn field_errors_are_flattened() {
        let body = r#"{"errors": {"Password": ["Too short", "Needs a digit"], "Email": "Invalid"}}"#;
        let message = rejection_message(422, body);
        assert!(message.contains("Too short"));
        assert!(message.contains("Needs a digit"));
        assert!(message.contains("Invalid"));
    }

    #[test]
    fn raw_body_is_used_when_unstructured() {
        assert_eq!(rejection_message(500, "boom"), "boom");
        assert_eq!(rejection_message(400, r#""plain json string""#), "plain json string");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        assert_eq!(
            rejection_message(503, "  "),
            "Request failed with status 503"
        );
    }
}
