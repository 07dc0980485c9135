use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};

use storefront_core::{Entity, ProductId};
use storefront_products::{CatalogStats, ListQuery, Paginated, Product};

use crate::app::dto::{CreateProductRequest, DeleteProductResponse, SearchQuery, UpdateProductRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::middleware::validate_product_payload;

/// `/search` and `/stats` are static segments, so they win over `/:id`.
pub fn router() -> Router {
    let validated = middleware::from_fn(validate_product_payload);

    Router::new()
        .route(
            "/",
            get(list_products).merge(post(create_product).route_layer(validated.clone())),
        )
        .route("/search", get(search_products))
        .route("/stats", get(product_stats))
        .route(
            "/:id",
            get(get_product)
                .delete(delete_product)
                .merge(put(update_product).route_layer(validated)),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    Ok(raw.parse::<ProductId>()?)
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::validation(e.body_text()).with_cause(e))
}

fn path_id(path: Result<Path<String>, PathRejection>) -> Result<ProductId, ApiError> {
    let Path(raw) = path.map_err(|e| ApiError::validation(e.body_text()).with_cause(e))?;
    parse_id(&raw)
}

/// Raw query pairs in request order; repeated keys are resolved by the caller.
type QueryPairs = Vec<(String, String)>;

fn query_pairs(query: Result<Query<QueryPairs>, QueryRejection>) -> Result<QueryPairs, ApiError> {
    query
        .map(|Query(v)| v)
        .map_err(|e| ApiError::validation(e.body_text()).with_cause(e))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Paginated<Product>>, ApiError> {
    let query = ListQuery::from_pairs(query_pairs(query)?);
    Ok(Json(services.list_products(&query)?))
}

pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let query = SearchQuery::from_pairs(query_pairs(query)?);
    Ok(Json(services.search_products(query.name.as_deref())?))
}

pub async fn product_stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<CatalogStats>, ApiError> {
    Ok(Json(services.stats()?))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = path_id(id)?;
    Ok(Json(services.get_product(&id)?))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let body = json_body(body)?;
    let id = body.id.as_deref().map(parse_id).transpose()?;

    let created = services.create_product(id, body.product)?;
    tracing::info!(product_id = %created.id(), "product created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = path_id(id)?;
    let draft = json_body(body)?;
    Ok(Json(services.update_product(&id, draft)?))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteProductResponse>, ApiError> {
    let id = path_id(id)?;
    let removed = services.delete_product(&id)?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(DeleteProductResponse::new(removed)))
}
