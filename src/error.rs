//! Application error types.
//!
//! One error kind per failure class the service distinguishes: NotFound,
//! Conflict, InvalidInput, Precondition, and Database for everything
//! infrastructural. The transport layer maps kinds to HTTP statuses; the
//! services never map or retry anything themselves.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned by every service operation.
///
/// All variants serialize to a structured JSON object.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// A referenced pull request, user, or team does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// The operation collides with existing state: a pull request id that
    /// already exists, or a reassignment with no eligible replacement.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A supplied value is not valid for the target, e.g. a reviewer id
    /// that is not assigned to the pull request being reassigned.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// The target is in a state that forbids the operation, e.g. mutating
    /// the reviewer set of a merged pull request.
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// Store connectivity or constraint failure. Opaque infrastructure
    /// error; not classified further.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },
}

impl AppError {
    /// Create a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    /// Create a not found error with the offending id.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with the field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a database error with operation context.
    pub fn database_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        Self::database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::conflict("pull request already exists");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Conflict\""));
        assert!(json.contains("pull request already exists"));
    }

    #[test]
    fn test_not_found_with_id() {
        let err = AppError::not_found_with_id("PullRequest", "PR-1");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"resource\":\"PullRequest\""));
        assert!(json.contains("\"id\":\"PR-1\""));
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::not_found("User");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::precondition("pull request is merged");
        assert_eq!(
            format!("{}", err),
            "Precondition failed: pull request is merged"
        );
    }
}
