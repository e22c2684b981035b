//! Shared error definitions for recipe primitives.

use thiserror::Error;

/// Result alias for validation routines.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Caller input failed a domain rule.
///
/// The message is meant to be shown to the end user as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error carrying a display-ready message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A JSON value did not match a [`Schema`](crate::Schema).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("schema violation at `{path}`: {reason}")]
pub struct SchemaViolation {
    /// JSON path of the offending value (e.g. `$.recipes[0].name`).
    pub path: String,
    /// Description of the mismatch.
    pub reason: String,
}

impl SchemaViolation {
    /// Creates a violation for the supplied path.
    #[must_use]
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
