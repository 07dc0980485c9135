use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for every endpoint (all of them sit behind the API key check).
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .nest("/products", products::router())
        .fallback(system::fallback)
}
