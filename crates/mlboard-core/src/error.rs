//! Error types for the MLBoard application.

use thiserror::Error;

/// A shared error type for the entire MLBoard application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Nothing here is fatal:
/// every view recovers through a manual reload or corrected input.
#[derive(Error, Debug, Clone)]
pub enum BoardError {
    /// Client-side validation error, reported next to the offending field
    /// when one is known.
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Server rejection. The message is the best available of a structured
    /// message field, flattened field errors, or the raw body.
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    /// A required precondition is absent (no auth token, no schema version,
    /// no selected model). The call is never issued.
    #[error("{0}")]
    MissingPrecondition(String),

    /// Authentication/session error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Client-side storage error (session file, upload cache)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoardError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a page-level validation error with no associated field.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a validation error attached to a named field.
    pub fn field_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates an Api error.
    pub fn api(status: impl Into<Option<u16>>, message: impl Into<String>) -> Self {
        Self::Api {
            status: status.into(),
            message: message.into(),
        }
    }

    /// Creates a MissingPrecondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::MissingPrecondition(message.into())
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a server rejection.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Check if this is a missing-precondition error.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingPrecondition(_))
    }

    /// Returns the field name for field-level validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BoardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for BoardError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BoardError>`.
pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_displays_message_only() {
        let err = BoardError::field_validation("email", "Email is required.");
        assert_eq!(err.to_string(), "Email is required.");
        assert_eq!(err.field(), Some("email"));
    }

    #[test]
    fn api_error_keeps_status() {
        let err = BoardError::api(422, "Upload rejected");
        assert!(err.is_api());
        assert_eq!(err.to_string(), "Upload rejected");
    }
}
