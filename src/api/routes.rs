//! API Routes
//!
//! Configures the Axum router with the bootstrap endpoints and middleware.

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{health_handler, not_found_handler, root_handler, AppState};

/// Local development origins always allowed through CORS.
pub const DEV_ORIGINS: [&str; 6] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:5174",
    "http://127.0.0.1:3000",
];

/// Builds the CORS layer for `frontend_url` plus the dev origins.
///
/// Credentials are allowed, so methods and headers are mirrored from the
/// request rather than wildcarded.
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::with_capacity(DEV_ORIGINS.len() + 1);
    for origin in std::iter::once(frontend_url).chain(DEV_ORIGINS) {
        let origin = origin.trim_end_matches('/');
        match HeaderValue::from_str(origin) {
            Ok(value) if !origins.contains(&value) => origins.push(value),
            Ok(_) => {}
            Err(_) => warn!("Ignoring invalid CORS origin '{}'", origin),
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Service banner
/// - `GET /api/health` - Health check, including the last expiry sweep
///
/// # Middleware
/// - CORS: configured frontend plus local dev origins, with credentials
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState, frontend_url: &str) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(cors_layer(frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
