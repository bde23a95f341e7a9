//! API Module
//!
//! HTTP handlers and routing for the bootstrap surface.
//!
//! # Endpoints
//! - `GET /` - Service banner
//! - `GET /api/health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{cors_layer, create_router};
