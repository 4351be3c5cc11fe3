//! # API Request/Response Types
//!
//! JSON structures owned by the HTTP layer. Entity records themselves are
//! served exactly as `learnhub-core` serializes them.

use learnhub_core::{FieldError, StoreCounts};
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every non-2xx response.
///
/// `errors` is present only for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// Error without field details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    /// Validation error with itemized fields.
    pub fn with_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            errors: Some(errors),
        }
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub counts: StoreCounts,
}

impl HealthResponse {
    #[must_use]
    pub fn ok(counts: StoreCounts) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            counts,
        }
    }
}

// =============================================================================
// RELATED PAPERS QUERY
// =============================================================================

/// Query string of `GET /api/papers/related`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPapersQuery {
    /// Comma-separated concept tags.
    #[serde(default)]
    pub concepts: Option<String>,
}

impl RelatedPapersQuery {
    /// Non-empty, trimmed tags.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.concepts
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}
