pub mod middleware;

pub use self::middleware::{request_pipeline, with_pipeline};

use serde::Serialize;
use tracing::Dispatch;
use tracing_subscriber::fmt::{time::ChronoLocal, MakeWriter};
use uuid::Uuid;

/// Local time, milliseconds after a comma.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// The per-request access log entry.
///
/// Exactly one of these is written for every request that enters the
/// pipeline. `error` is only set on the failure path and is left out of the
/// output entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub correlation_id: String,
    pub request_path: String,
    pub method: String,
    pub status_code: u16,
    /// Seconds spent inside the pipeline.
    pub response_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogRecord {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Structured JSON access logger.
///
/// Holds its own dispatcher instead of relying on the process-wide tracing
/// subscriber, so it can be handed to the pipeline explicitly and pointed at
/// any sink. Every record is rendered into one buffer and written with a
/// single `write_all`, so concurrent requests never interleave lines.
pub struct AccessLogger {
    service: String,
    dispatch: Dispatch,
}

impl AccessLogger {
    pub fn stdout(service: impl Into<String>) -> Self {
        Self::with_writer(service, std::io::stdout)
    }

    pub fn with_writer<W>(service: impl Into<String>, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_max_level(tracing::Level::INFO)
            .with_writer(make_writer)
            .finish();

        Self {
            service: service.into(),
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn emit(&self, record: &LogRecord) {
        tracing::dispatcher::with_default(&self.dispatch, || match &record.error {
            None => tracing::info!(
                service = %self.service,
                correlation_id = %record.correlation_id,
                request_path = %record.request_path,
                status_code = record.status_code,
                response_time = record.response_time,
                method = %record.method,
                "Request processed successfully"
            ),
            Some(error) => tracing::error!(
                service = %self.service,
                correlation_id = %record.correlation_id,
                request_path = %record.request_path,
                error = %error,
                status_code = record.status_code,
                response_time = record.response_time,
                method = %record.method,
                "Request processing failed"
            ),
        });
    }
}

impl std::fmt::Debug for AccessLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLogger")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}
