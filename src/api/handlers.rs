//! API Handlers
//!
//! HTTP request handlers for the bootstrap endpoints.

use std::sync::Arc;

use axum::{extract::State, http::Uri, Json};
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, RootResponse};
use crate::tasks::{LastSweep, SweepResult};

/// Application state shared across all handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Result of the most recent expiry sweep
    pub last_sweep: LastSweep,
}

impl AppState {
    /// Creates a new AppState with no sweep recorded yet.
    pub fn new() -> Self {
        Self {
            last_sweep: Arc::new(RwLock::new(None)),
        }
    }

    /// Stores the outcome of a sweep for the health endpoint.
    pub async fn record_sweep(&self, result: SweepResult) {
        *self.last_sweep.write().await = Some(result);
    }
}

/// Handler for GET /
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse::new())
}

/// Handler for GET /api/health
///
/// Includes the last sweep so a skipped sweep shows up in monitoring.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let last_sweep = state.last_sweep.read().await.clone();
    Json(HealthResponse::healthy(last_sweep))
}

/// Fallback for unmatched routes.
pub async fn not_found_handler(uri: Uri) -> Result<()> {
    Err(ApiError::NotFound(uri.path().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::error::StoreError;

    fn test_state() -> AppState {
        AppState::new()
    }

    #[tokio::test]
    async fn test_root_handler() {
        let response = root_handler().await;
        assert_eq!(response.health, "healthy");
        assert_eq!(response.docs, "/docs");
    }

    #[tokio::test]
    async fn test_health_handler_before_sweep() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert!(response.last_sweep.is_none());
    }

    #[tokio::test]
    async fn test_health_handler_reports_skipped_sweep() {
        let state = test_state();
        let cutoff = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        state
            .record_sweep(SweepResult::skipped(
                cutoff,
                &StoreError::Unavailable("dns failure".to_string()),
            ))
            .await;

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        let sweep = response.last_sweep.clone().unwrap();
        assert!(sweep.is_skipped());
    }

    #[tokio::test]
    async fn test_not_found_handler() {
        let result = not_found_handler(Uri::from_static("/api/nope")).await;
        assert!(matches!(result, Err(ApiError::NotFound(path)) if path == "/api/nope"));
    }
}
