use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// A failure that carries the HTTP status it should be reported with.
///
/// Handlers return this when they mean to fail; the request pipeline
/// recognises it on the way out and logs the request as failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("{}: {detail}", .status.as_u16())]
    Http { status: StatusCode, detail: String },
}

impl AppError {
    /// Builds a classified error. Statuses outside 4xx/5xx are reported as 500.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        AppError::Http {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, detail)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Http { detail, .. } => detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail() }));
        let mut response = (self.status(), body).into_response();
        // Lets the pipeline tell a raised error apart from a handler that
        // merely returned a 4xx/5xx response.
        response.extensions_mut().insert(self);
        response
    }
}
