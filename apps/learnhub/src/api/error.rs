//! Error type for the HTTP layer.
//!
//! [`ApiError`] maps every failure a handler can hit onto a status code and
//! the `{ message, errors? }` body the client expects. Store failures are
//! logged here with their operation and key; the caller only ever sees the
//! generic message.

use super::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use learnhub_core::{HubError, ValidationErrors};

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No record matches the requested key.
    #[error("{0}")]
    NotFound(&'static str),

    /// The request body failed its insert schema.
    #[error("{message}")]
    Validation {
        message: String,
        errors: ValidationErrors,
    },

    /// A natural key (concept slug) is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The store failed. `message` is what the caller sees.
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        key: Option<String>,
        #[source]
        source: HubError,
    },
}

impl ApiError {
    /// Classify a store failure for the operation described by `message`.
    ///
    /// Duplicate natural keys become `Conflict`; everything else is
    /// `Internal`.
    pub fn store(message: &'static str, key: Option<String>, source: HubError) -> Self {
        match source {
            HubError::DuplicateKey { .. } => Self::Conflict(source.to_string()),
            source => Self::Internal {
                message,
                key,
                source,
            },
        }
    }

    /// The status code this error is answered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::NotFound(message) => ErrorResponse::new(message),
            Self::Validation { message, errors } => {
                ErrorResponse::with_errors(message, errors.into_errors())
            }
            Self::Conflict(message) => ErrorResponse::new(message),
            Self::Internal {
                message,
                key,
                source,
            } => {
                tracing::error!(
                    operation = message,
                    key = key.as_deref().unwrap_or("-"),
                    error = %source,
                    "store operation failed"
                );
                ErrorResponse::new(message)
            }
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_core::FieldError;

    #[test]
    fn duplicate_key_is_conflict() {
        let err = ApiError::store(
            "Failed to create concept",
            Some("x".to_string()),
            HubError::DuplicateKey {
                table: "concepts",
                field: "slug",
                value: "x".to_string(),
            },
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "concepts.slug 'x' already exists");
    }

    #[test]
    fn storage_failure_is_internal_and_opaque() {
        let err = ApiError::store(
            "Failed to fetch papers",
            None,
            HubError::Storage("disk on fire".to_string()),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::Validation {
            message: "Invalid paper data".to_string(),
            errors: ValidationErrors(vec![FieldError::invalid_json("EOF")]),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Paper not found").status(), StatusCode::NOT_FOUND);
    }
}
