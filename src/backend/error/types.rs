/**
 * Backend Error Types
 *
 * `BackendError` is the single error type returned by HTTP handlers. It wraps
 * the errors of each layer and decides the HTTP status for each of them.
 *
 * # Status Code Mapping
 *
 * | Source | Status |
 * |---|---|
 * | `HandlerError` | its own status |
 * | `RelationshipError::NotFound` | 404 |
 * | `RelationshipError::InvalidInput` | 400 |
 * | `RelationshipError::Conflict` | 409 |
 * | `RelationshipError::Persistence` / `PartialFailure` | 500 |
 * | `StoreError::Duplicate` | 409 |
 * | `StoreError::Unavailable` | 503 |
 * | `AuthError` (token problems) | 401 |
 * | `SharedError` | 400 |
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::AuthError;
use crate::backend::relationships::RelationshipError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use confab::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., forbidden action, malformed form)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Relationship manager error
    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    /// User or message store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Payload validation error
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Writing an uploaded file failed
    #[error("Upload failed: {0}")]
    Upload(#[from] std::io::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 403 for a caller acting on behalf of another user
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Relationship(err) => match err {
                RelationshipError::NotFound(_) => StatusCode::NOT_FOUND,
                RelationshipError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                RelationshipError::Conflict { .. } => StatusCode::CONFLICT,
                RelationshipError::Persistence(store) => store_status(store),
                RelationshipError::PartialFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(err) => store_status(err),
            Self::Auth(err) => err.status_code(),
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Database and I/O internals are not echoed to clients.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Relationship(RelationshipError::Persistence(store)) | Self::Store(store) => {
                store_message(store)
            }
            Self::Relationship(RelationshipError::PartialFailure { operation, compensated, .. }) => {
                if *compensated {
                    format!("{} failed part way and was rolled back", operation)
                } else {
                    format!("{} failed part way; relationship needs repair", operation)
                }
            }
            Self::Relationship(err) => err.to_string(),
            Self::Auth(err) => err.client_message(),
            Self::SharedError(err) => err.to_string(),
            Self::Upload(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Structured details for relationship errors
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Relationship(RelationshipError::Conflict { snapshot, .. }) => {
                serde_json::to_value(snapshot.as_ref()).ok()
            }
            Self::Relationship(RelationshipError::PartialFailure {
                operation,
                completed,
                failed,
                compensated,
                ..
            }) => Some(serde_json::json!({
                "operation": operation,
                "completed": completed,
                "failed": failed,
                "compensated": compensated,
            })),
            _ => None,
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        StoreError::Missing(_) => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::Database(_) => INTERNAL_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::relationships::{PairSnapshot, RelationshipOperation, SideMarkers};
    use uuid::Uuid;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_relationship_status_mapping() {
        let id = Uuid::new_v4();
        let snapshot = PairSnapshot::from_markers(id, Uuid::new_v4(), SideMarkers::FRIEND, SideMarkers::FRIEND);

        let not_found: BackendError = RelationshipError::NotFound(id).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: BackendError = RelationshipError::InvalidInput("self".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let conflict: BackendError = RelationshipError::conflict("Users are already friends", snapshot).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.message(), "Users are already friends");
        assert_eq!(conflict.details().unwrap()["state"]["state"], "friends");
    }

    #[test]
    fn test_partial_failure_details() {
        let completed = Uuid::new_v4();
        let failed = Uuid::new_v4();
        let error: BackendError = RelationshipError::PartialFailure {
            operation: RelationshipOperation::AcceptRequest,
            completed: vec![completed],
            failed,
            source: StoreError::Unavailable("down".into()),
            compensated: false,
        }
        .into();

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.message().contains("needs repair"));
        let details = error.details().unwrap();
        assert_eq!(details["operation"], "accept_request");
        assert_eq!(details["failed"], failed.to_string());
        assert_eq!(details["compensated"], false);
    }

    #[test]
    fn test_store_errors() {
        let duplicate: BackendError = StoreError::Duplicate { field: "email" }.into();
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let database: BackendError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(database.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(database.message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("field", "message").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
    }
}
