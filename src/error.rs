//! Error types for the memoization cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::storage::StorageError;

// == Cache Error Enum ==
/// Unified error type for cache stores, memoized calls and the admin API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in a cache store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Durable write or delete failed; the in-memory state keeps the mutation
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    /// Arguments or results could not be serialized
    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The wrapped operation itself failed; nothing was cached
    #[error("Operation failed: {0}")]
    Operation(#[source] anyhow::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) | CacheError::Operation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
