//! Error types for the ChemVision API client.
//!
//! # Design
//! Every non-2xx response is folded into a single [`NormalizedError`] by the
//! normalizer, and reaches callers as `ApiError::Backend`. That is the only
//! "typed" failure: the other variants cover failures that never produced a
//! usable backend answer, and user-facing code shows a fixed message for them.

use serde_json::{Map, Value};
use thiserror::Error;

/// Message shown for any failure that is not a typed backend error.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// The uniform shape of a failed backend call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub message: String,
    pub error_code: String,
    pub correlation_id: String,
    pub status_code: u16,
    pub details: Option<Map<String, Value>>,
}

/// Errors returned by conversion operations and `ChemVisionClient` parsers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error(transparent)]
    Backend(NormalizedError),

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 2xx body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// The normalized backend error, when this is a typed failure.
    pub fn as_backend(&self) -> Option<&NormalizedError> {
        match self {
            ApiError::Backend(err) => Some(err),
            _ => None,
        }
    }

    /// Text safe to show an end user. Untyped failures never leak internals.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Backend(err) => &err.message,
            _ => UNEXPECTED_ERROR_MESSAGE,
        }
    }
}

impl From<NormalizedError> for ApiError {
    fn from(err: NormalizedError) -> Self {
        ApiError::Backend(err)
    }
}
