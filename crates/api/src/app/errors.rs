//! Error taxonomy and the single place where failures become HTTP responses.
//!
//! Handlers and middleware return [`ApiError`]. Its `IntoResponse` impl only stashes
//! the error in the response extensions; the outermost `error_responder` middleware
//! picks it up, logs it once and renders the JSON body (see [`ApiError::render`]).

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use storefront_core::DomainError;
use storefront_infra::StoreError;

use crate::app::services::ServiceError;
use crate::config::RunMode;

pub const REDACTED_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Authentication,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    details: Option<JsonValue>,
    /// Underlying failure, for operator logs only (never rendered).
    cause: Option<String>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn validation_with(message: impl Into<String>, details: JsonValue) -> Self {
        Self {
            details: Some(details),
            ..Self::new(ErrorKind::Validation, message)
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn with_cause(mut self, cause: impl core::fmt::Debug) -> Self {
        self.cause = Some(format!("{cause:?}"));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&JsonValue> {
        self.details.as_ref()
    }

    /// Operator-facing log line for a failed request.
    pub fn log(&self, method: &Method, path: &str) {
        let status = self.status().as_u16();
        let timestamp = Utc::now().to_rfc3339();
        let trace = format!("{method} {path}");
        let cause = self.cause.as_deref().unwrap_or("-");

        if self.status().is_server_error() {
            tracing::error!(status, kind = self.kind.as_str(), error_message = %self.message, %trace, %cause, %timestamp, "request failed");
        } else {
            tracing::warn!(status, kind = self.kind.as_str(), error_message = %self.message, %trace, %timestamp, "request rejected");
        }
    }

    /// Final JSON response: `{ "status": "error", "message", "details"? }`.
    pub fn render(&self, mode: RunMode) -> Response {
        let message = match self.kind {
            ErrorKind::Internal if mode.is_production() => REDACTED_MESSAGE,
            _ => self.message.as_str(),
        };

        let mut body = json!({
            "status": "error",
            "message": message,
        });
        if let Some(details) = &self.details {
            body["details"] = details.clone();
        }

        (self.status(), axum::Json(body)).into_response()
    }
}

/// Re-renders an error response the router produced on its own (405, extractor
/// rejections, ...) in the `{status, message}` shape, keyed on its status line.
///
/// Headers other than the body framing ones are kept, so `allow` survives a 405.
pub fn render_bare_status(res: Response) -> Response {
    let (mut parts, _) = res.into_parts();
    let message = parts.status.canonical_reason().unwrap_or("Error");
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);

    let mut rendered = (
        parts.status,
        axum::Json(json!({ "status": "error", "message": message })),
    )
        .into_response();
    rendered.headers_mut().extend(parts.headers);
    rendered
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut res = self.status().into_response();
        res.extensions_mut().insert(self);
        res
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message, details } => Self {
                details,
                ..Self::validation(message)
            },
            DomainError::NotFound(message) => Self::not_found(message),
            e @ (DomainError::InvalidId(_) | DomainError::Conflict(_)) => Self::validation(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(id) => Self::validation_with(
                format!("Product with id '{id}' already exists"),
                json!({ "id": "must be unique" }),
            ),
            e @ StoreError::Unavailable(_) => Self::internal(e.to_string()).with_cause(e),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}
