//! Shared Error Types
//!
//! Validation failures detected while reading a request payload, before any
//! store or relationship logic runs.
//!
//! # Usage
//!
//! ```rust
//! use confab::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Email must contain '@'");
//! ```
use thiserror::Error;

/// Payload validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A field failed validation
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Require a non-blank string field
pub fn require_non_empty(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "must not be empty"));
    }
    Ok(())
}
