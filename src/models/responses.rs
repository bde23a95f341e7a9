//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::tasks::SweepResult;

/// Human-readable service name.
pub const SERVICE_NAME: &str = "Emergency Medicine Locator";

/// Response body for the root endpoint (GET /)
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    /// Service banner
    pub message: String,
    /// API version
    pub version: String,
    /// Path of the API docs
    pub docs: String,
    /// Coarse health indicator
    pub health: String,
}

impl RootResponse {
    /// Creates the banner for this build.
    pub fn new() -> Self {
        Self {
            message: format!("{} API", SERVICE_NAME),
            version: env!("CARGO_PKG_VERSION").to_string(),
            docs: "/docs".to_string(),
            health: "healthy".to_string(),
        }
    }
}

impl Default for RootResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the health endpoint (GET /api/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Service name
    pub service: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Most recent expiry sweep, `null` until one has run
    pub last_sweep: Option<SweepResult>,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(last_sweep: Option<SweepResult>) -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            last_sweep,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_root_response_serialize() {
        let resp = RootResponse::new();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["message"], "Emergency Medicine Locator API");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["docs"], "/docs");
        assert_eq!(json["health"], "healthy");
    }

    #[test]
    fn test_health_response_without_sweep() {
        let resp = HealthResponse::healthy(None);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], SERVICE_NAME);
        assert!(json["timestamp"].is_string());
        assert!(json["last_sweep"].is_null());
    }

    #[test]
    fn test_health_response_with_sweep() {
        let cutoff = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let resp = HealthResponse::healthy(Some(SweepResult::completed(cutoff, Vec::new())));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["last_sweep"]["status"], "completed");
        assert_eq!(json["last_sweep"]["removed_count"], 0);
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
