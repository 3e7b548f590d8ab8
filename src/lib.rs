//! HTTP echo service with canned error endpoints.
//!
//! Every request passes through [`telemetry::request_pipeline`], which tags it
//! with a correlation ID, times it, writes one JSON access log line and turns
//! raised [`error::AppError`]s into `{"detail": ..}` responses.

pub mod config;
pub mod context;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod telemetry;

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;

pub use crate::{
    config::AppConfig,
    error::AppError,
    telemetry::{AccessLogger, LogRecord},
};

/// Builds the full application: demo error routes, the echo wildcard, CORS,
/// all wrapped in the request pipeline.
pub fn app(config: &AppConfig, logger: Arc<AccessLogger>) -> Router {
    let routes = Router::new()
        .route("/error/400", echo_other_methods(get(handlers::bad_request)))
        .route("/error/401", echo_other_methods(get(handlers::unauthorized)))
        .route("/error/403", echo_other_methods(get(handlers::forbidden)))
        .route("/error/404", echo_other_methods(get(handlers::not_found)))
        .route(
            "/error/500",
            echo_other_methods(get(handlers::internal_server_error)),
        )
        .route(
            "/error/503",
            echo_other_methods(get(handlers::service_unavailable)),
        )
        .route("/", echo_route())
        .route("/*path", echo_route());

    telemetry::with_pipeline(cors::with_cors(routes, config), logger)
}

/// GET (and HEAD, which axum serves from the GET handler) plus every other
/// echoed method.
fn echo_route() -> MethodRouter {
    echo_other_methods(get(handlers::echo))
}

/// The demo routes only claim GET; the remaining methods on those paths
/// still reach the echo handler.
fn echo_other_methods(route: MethodRouter) -> MethodRouter {
    route
        .post(handlers::echo)
        .put(handlers::echo)
        .delete(handlers::echo)
        .patch(handlers::echo)
        .options(handlers::echo)
}
