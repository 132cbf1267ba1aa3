use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self as tracing_fmt, time::UtcTime},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use employee_directory_core::ServiceResult;
use employee_directory_util::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] TryInitError),
    #[error("failed to install prometheus recorder: {0}")]
    Metrics(#[from] BuildError),
}

/// The process-wide recorder; installed at most once.
static RECORDER: Mutex<Option<PrometheusHandle>> = Mutex::new(None);
static STARTED_AT: OnceLock<Instant> = OnceLock::new();

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the global subscriber: human-readable events outside production,
/// one JSON object per line in production.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let events = tracing_fmt::layer()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339());
    let events = match config.environment {
        Environment::Production => events.json().boxed(),
        Environment::Development | Environment::Test => events.pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(events)
        .try_init()?;

    tracing::info!(
        stage = "telemetry",
        env = %config.environment.as_str(),
        version = BUILD_VERSION,
        "tracing initialized"
    );
    Ok(())
}

/// Returns the Prometheus handle, installing the recorder on first use.
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    let mut recorder = RECORDER.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = recorder.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_counter!(
        "api_requests_total",
        "Directory API requests by resource, operation and result"
    );
    describe_histogram!(
        "api_request_seconds",
        "Directory API request latency in seconds by resource and operation"
    );
    STARTED_AT.get_or_init(Instant::now);

    *recorder = Some(handle.clone());
    Ok(handle)
}

/// Records the outcome and latency of a service call made by an API handler.
pub fn record_outcome<T>(
    resource: &'static str,
    op: &'static str,
    result: &ServiceResult<T>,
    started: Instant,
) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.code(),
    };
    counter!("api_requests_total", "resource" => resource, "op" => op, "result" => outcome)
        .increment(1);
    histogram!("api_request_seconds", "resource" => resource, "op" => op)
        .record(started.elapsed().as_secs_f64());
}

/// Recorder output followed by the build and uptime gauges.
pub fn render_metrics(handle: &PrometheusHandle) -> String {
    let mut body = handle.render();
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    let uptime = STARTED_AT
        .get()
        .map(|start| start.elapsed().as_secs_f64())
        .unwrap_or_default();
    body.push_str(&format!(
        "# TYPE app_build_info gauge\napp_build_info{{version=\"{BUILD_VERSION}\"}} 1\n\
         # TYPE app_uptime_seconds gauge\napp_uptime_seconds {uptime}\n"
    ));
    body
}
