//! HTTP API: configuration, middleware pipeline, routing, and error responses.

pub mod app;
pub mod config;
pub mod middleware;
