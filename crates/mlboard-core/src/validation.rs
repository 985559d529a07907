//! Client-side validation. Everything here runs before any network call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BoardError, Result};
use crate::session::RegisterPayload;

/// Uploads above this size are rejected before any network call.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted dataset file extensions.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".csv", ".json", ".xls", ".xlsx"];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-\s()]{7,}$").expect("phone regex"));

/// One registration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates a registration payload, returning one error per offending
/// field in form order. An empty result means the payload may be sent.
pub fn validate_registration(form: &RegisterPayload) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let user_name = form.user_name.trim();
    if user_name.is_empty() {
        errors.push(FieldError::new("userName", "Username is required."));
    } else if user_name.len() < 3 {
        errors.push(FieldError::new(
            "userName",
            "Username must be at least 3 characters.",
        ));
    }

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        errors.push(FieldError::new("fullName", "Full name is required."));
    } else if full_name.len() < 2 {
        errors.push(FieldError::new(
            "fullName",
            "Full name must be at least 2 characters.",
        ));
    }

    // Phone is optional, but must be plausible when present.
    if !form.phone_number1.trim().is_empty() && !PHONE_RE.is_match(&form.phone_number1) {
        errors.push(FieldError::new(
            "phoneNumber1",
            "Phone number must be at least 7 digits and contain only numbers, +, -, (), or spaces.",
        ));
    }

    if form.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required."));
    } else if !EMAIL_RE.is_match(&form.email) {
        errors.push(FieldError::new(
            "email",
            "Please enter a valid email address.",
        ));
    }

    if let Some(message) = password_error(&form.password) {
        errors.push(FieldError::new("password", message));
    }

    if form.confirm_password.is_empty() {
        errors.push(FieldError::new(
            "confirmPassword",
            "Please confirm your password.",
        ));
    } else if form.password != form.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match."));
    }

    errors
}

fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required.")
    } else if password.len() < 6 {
        Some("Password must be at least 6 characters.")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter.")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number.")
    } else {
        None
    }
}

/// Both login fields are required.
pub fn validate_login(user_name: &str, password: &str) -> Result<()> {
    if user_name.trim().is_empty() {
        return Err(BoardError::field_validation(
            "userName",
            "Username is required.",
        ));
    }
    if password.is_empty() {
        return Err(BoardError::field_validation(
            "password",
            "Password is required.",
        ));
    }
    Ok(())
}

/// Validates an upload candidate by name and size, before the file is read.
pub fn validate_upload_file(file_name: &str, size_bytes: u64) -> Result<()> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(BoardError::validation(format!(
            "File size must be 10 MB or less. Current size: {:.2} MB",
            size_bytes as f64 / 1024.0 / 1024.0
        )));
    }
    if file_name.chars().any(char::is_whitespace) {
        return Err(BoardError::validation(
            "Filename cannot contain whitespaces. Please rename your file.",
        ));
    }
    let lower = file_name.to_lowercase();
    if !SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(BoardError::validation(
            "File type not supported. Accepted formats: CSV, JSON, Excel (.xls, .xlsx)",
        ));
    }
    Ok(())
}

/// The target column must be provided before an upload is issued.
pub fn validate_target_column(target_column: &str) -> Result<()> {
    if target_column.trim().is_empty() {
        return Err(BoardError::validation(
            "Please provide the target column name.",
        ));
    }
    Ok(())
}
