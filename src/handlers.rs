use axum::{
    body::Bytes,
    http::{HeaderMap, Method, Uri},
    Json,
};
use crate::{context::RequestContext, error::AppError};

/// Echoes the request back as JSON. Never fails.
///
/// Serves the wildcard route as well as the non-GET methods of the demo
/// routes, so the path is taken from the URI rather than a captured segment.
pub async fn echo(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<RequestContext> {
    Json(RequestContext::new(uri.path(), &method, &headers, &body))
}

pub async fn bad_request() -> Result<Json<()>, AppError> {
    Err(AppError::bad_request("Bad request demonstration"))
}

pub async fn unauthorized() -> Result<Json<()>, AppError> {
    Err(AppError::unauthorized("Unauthorized access demonstration"))
}

pub async fn forbidden() -> Result<Json<()>, AppError> {
    Err(AppError::forbidden("Forbidden access demonstration"))
}

pub async fn not_found() -> Result<Json<()>, AppError> {
    Err(AppError::not_found("Resource not found demonstration"))
}

pub async fn internal_server_error() -> Result<Json<()>, AppError> {
    Err(AppError::internal("Internal server error demonstration"))
}

pub async fn service_unavailable() -> Result<Json<()>, AppError> {
    Err(AppError::service_unavailable("Service unavailable demonstration"))
}
