//! Error types for the medicine locator service
//!
//! Store failures are contained by the expiry sweep; API errors render as JSON.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures reported by a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (connectivity, auth handshake, transport)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer within the allotted time
    #[error("Store call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The store answered with a non-success status
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store answered with a body we could not decode
    #[error("Undecodable store response: {0}")]
    Decode(String),

    /// A record carries an expiry date that is not `YYYY-MM-DD`
    #[error("Malformed record {id}: unparseable expiry date '{value}'")]
    MalformedRecord { id: String, value: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

// == API Error Enum ==
/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(path) => (StatusCode::NOT_FOUND, format!("No route for {}", path)),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for record store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
