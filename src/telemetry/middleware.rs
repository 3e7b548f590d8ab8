use super::{new_correlation_id, AccessLogger, LogRecord};
use crate::{context::decode_path, error::AppError};
use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use futures::FutureExt;
use http::{HeaderName, HeaderValue, StatusCode};
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Instant};
use tracing::debug;

pub static X_PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");
pub static X_CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

/// Wraps every route of `router` in [`request_pipeline`].
pub fn with_pipeline(router: Router, logger: Arc<AccessLogger>) -> Router {
    router.layer(from_fn_with_state(logger, request_pipeline))
}

/// Correlation, timing, access logging and error translation for a single
/// request.
///
/// Successful responses get `X-Process-Time` and `X-Correlation-ID`.
/// A raised [`AppError`] is logged and its `{"detail": ..}` response is
/// passed on without the diagnostic headers. A handler panic is logged as a 500
/// and then resumed, leaving the connection to the server's own fault
/// handling.
pub async fn request_pipeline(
    State(logger): State<Arc<AccessLogger>>,
    req: Request,
    next: Next,
) -> Response {
    let correlation_id = new_correlation_id();
    let start = Instant::now();

    let method = req.method().to_string();
    let request_path = decode_path(req.uri().path()).into_owned();
    debug!(%correlation_id, %method, path = %request_path, "Received request");

    let outcome = AssertUnwindSafe(next.run(req)).catch_unwind().await;

    let mut record = LogRecord {
        correlation_id,
        request_path,
        method,
        status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        response_time: start.elapsed().as_secs_f64(),
        error: None,
    };

    match outcome {
        Ok(mut response) => match response.extensions_mut().remove::<AppError>() {
            Some(err) => {
                record.status_code = err.status().as_u16();
                record.error = Some(err.to_string());
                logger.emit(&record);
                response
            }
            None => {
                record.status_code = response.status().as_u16();
                logger.emit(&record);
                stamp_diagnostic_headers(&mut response, &record);
                response
            }
        },
        Err(panic) => {
            record.error = Some(panic_message(&*panic));
            logger.emit(&record);
            std::panic::resume_unwind(panic)
        }
    }
}

fn stamp_diagnostic_headers(response: &mut Response, record: &LogRecord) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&record.response_time.to_string()) {
        headers.insert(X_PROCESS_TIME.clone(), value);
    }
    if let Ok(value) = HeaderValue::from_str(&record.correlation_id) {
        headers.insert(X_CORRELATION_ID.clone(), value);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
