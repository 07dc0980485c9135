use crate::app::errors::ApiError;

pub async fn root() -> &'static str {
    "Hello World."
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}
