use crate::config::AppConfig;
use axum::{
    extract::Request,
    http::{header::ACCESS_CONTROL_REQUEST_METHOD, Method},
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Set on an `OPTIONS` request that is not a CORS preflight while it passes
/// through the CORS layer.
#[derive(Debug, Clone, Copy)]
struct PlainOptions;

/// Applies a permissive cross-origin policy to `router`.
///
/// Origins, methods and headers are mirrored from the request so credentials
/// stay allowed. Only an `OPTIONS` request carrying
/// `Access-Control-Request-Method` is answered as a preflight; any other
/// `OPTIONS` request reaches its route and gets the same CORS headers as a
/// simple request.
pub fn with_cors(router: Router, config: &AppConfig) -> Router {
    router
        .layer(from_fn(restore_plain_options))
        .layer(cors_layer(config))
        .layer(from_fn(shield_plain_options))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(config.cors_max_age)
}

fn is_preflight(req: &Request) -> bool {
    req.method() == Method::OPTIONS && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

// tower-http answers every OPTIONS request itself, so a plain one crosses the
// CORS layer disguised as GET and gets its method back on the other side.
async fn shield_plain_options(mut req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS && !is_preflight(&req) {
        req.extensions_mut().insert(PlainOptions);
        *req.method_mut() = Method::GET;
    }
    next.run(req).await
}

async fn restore_plain_options(mut req: Request, next: Next) -> Response {
    if req.extensions_mut().remove::<PlainOptions>().is_some() {
        *req.method_mut() = Method::OPTIONS;
    }
    next.run(req).await
}
