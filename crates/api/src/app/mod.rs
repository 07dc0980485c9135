//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: catalog store + query processor behind one handle
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: error taxonomy and the JSON error responder

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router over a fresh seeded in-memory catalog.
pub fn build_app(config: ApiConfig) -> Router {
    build_app_with_services(config, services::AppServices::in_memory())
}

/// Build the router over caller-supplied services (e.g. a different store).
pub fn build_app_with_services(config: ApiConfig, services: services::AppServices) -> Router {
    let auth_state = middleware::AuthState::new(&config.api_key);

    // Layers listed outermost first.
    let pipeline = ServiceBuilder::new()
        .layer(axum::middleware::from_fn_with_state(
            config.run_mode,
            middleware::error_responder,
        ))
        .layer(axum::middleware::from_fn(middleware::request_logger))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ))
        .layer(Extension(Arc::new(services)));

    routes::router().layer(pipeline)
}
