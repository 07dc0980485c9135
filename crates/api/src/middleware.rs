//! Request pipeline: error responder → logger → authenticator → payload validator.
//!
//! `error_responder`, `request_logger` and `authenticate` wrap every route;
//! `validate_product_payload` is attached only to the routes that take a product body.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use serde_json::{json, Map, Value as JsonValue};

use crate::app::errors::{render_bare_status, ApiError};
use crate::config::RunMode;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Upper bound on buffered product payloads.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Outermost layer: turns any [`ApiError`] produced further in into the final
/// JSON response, logging it exactly once. Error statuses the router emits by
/// itself (405 and the like) carry no `ApiError` and are re-rendered by status.
pub async fn error_responder(State(mode): State<RunMode>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut res = next.run(req).await;
    match res.extensions_mut().remove::<ApiError>() {
        Some(err) => {
            err.log(&method, &path);
            err.render(mode)
        }
        None if res.status().is_client_error() || res.status().is_server_error() => {
            tracing::warn!(
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                "request rejected by router"
            );
            render_bare_status(res)
        }
        None => res,
    }
}

pub async fn request_logger(req: Request, next: Next) -> Response {
    tracing::info!(
        method = %req.method(),
        path = %req.uri().path(),
        timestamp = %Utc::now().to_rfc3339(),
        "request received"
    );
    next.run(req).await
}

#[derive(Clone)]
pub struct AuthState {
    pub api_key: Arc<str>,
}

impl AuthState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
        }
    }
}

pub async fn authenticate(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = extract_api_key(req.headers()).is_some_and(|key| key == &*state.api_key);
    if !authorized {
        return Err(ApiError::authentication("Unauthorized"));
    }

    Ok(next.run(req).await)
}

fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER)?.to_str().ok()
}

/// Requires a complete product payload before the handler runs.
///
/// The body is buffered, checked, and re-attached unchanged.
pub async fn validate_product_payload(req: Request, next: Next) -> Result<Response, ApiError> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_PAYLOAD_BYTES)
        .await
        .map_err(|e| ApiError::validation("Request body could not be read").with_cause(e))?;

    let payload: JsonValue = serde_json::from_slice(&bytes).map_err(|e| {
        ApiError::validation_with(
            "Request body must be valid JSON",
            json!({ "body": "expected a JSON object" }),
        )
        .with_cause(e)
    })?;

    let problems = product_payload_problems(&payload);
    if !problems.is_empty() {
        return Err(ApiError::validation_with(
            "All fields are required",
            JsonValue::Object(problems),
        ));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Field name → expectation, for every field of `payload` that is missing or malformed.
///
/// Strings must be non-empty (whitespace counts as content) and `price` must be a
/// non-zero number. `inStock` only has to be a boolean, so `false` is accepted.
pub fn product_payload_problems(payload: &JsonValue) -> Map<String, JsonValue> {
    let mut problems = Map::new();
    let Some(fields) = payload.as_object() else {
        problems.insert("body".into(), "expected a JSON object".into());
        return problems;
    };

    for name in ["name", "description", "category"] {
        let ok = fields
            .get(name)
            .and_then(JsonValue::as_str)
            .is_some_and(|s| !s.is_empty());
        if !ok {
            problems.insert(name.into(), "required non-empty string".into());
        }
    }

    let price_ok = fields
        .get("price")
        .and_then(JsonValue::as_f64)
        .is_some_and(|price| price != 0.0);
    if !price_ok {
        problems.insert("price".into(), "required non-zero number".into());
    }

    if !fields.get("inStock").is_some_and(JsonValue::is_boolean) {
        problems.insert("inStock".into(), "required boolean (true or false)".into());
    }

    problems
}
