//! Logs request lifecycle events published by a simulated web host.
//!
//! Run with `RUST_LOG=trace` to also see every raw notification and the
//! ones the handler skips.

use hostwatch::{
    BoxError, DiagnosticHandler, DiagnosticSource, HandlerOptions, HostedService,
    LoggingObserver, Payload, RequestObserver, names,
};
use std::{fmt, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct RequestContext {
    trace_id: u64,
    method: &'static str,
    path: String,
}

#[derive(Debug)]
struct ServerError {
    status: u16,
    message: String,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

#[derive(Payload)]
struct BeginRequest {
    #[payload(rename = "HttpContext")]
    http_context: RequestContext,
    timestamp: Instant,
}

#[derive(Payload)]
struct EndRequest {
    #[payload(rename = "HttpContext")]
    http_context: RequestContext,
    timestamp: Instant,
}

#[derive(Payload)]
struct RequestFailed {
    #[payload(rename = "httpContext")]
    http_context: RequestContext,
    exception: ServerError,
}

struct AccessLog;

impl RequestObserver for AccessLog {
    type Context = RequestContext;
    type Exception = ServerError;

    fn on_request_start(&self, ctx: &RequestContext) {
        tracing::info!(trace_id = ctx.trace_id, method = ctx.method, path = %ctx.path, "request started");
    }

    fn on_request_stop(&self, ctx: &RequestContext) {
        tracing::info!(trace_id = ctx.trace_id, path = %ctx.path, "request finished");
    }

    fn on_request_exception(&self, ctx: &RequestContext, exception: &ServerError) {
        tracing::error!(trace_id = ctx.trace_id, path = %ctx.path, %exception, "request failed");
    }
}

fn context(trace_id: u64, method: &'static str, path: &str) -> RequestContext {
    RequestContext {
        trace_id,
        method,
        path: path.to_owned(),
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let source = DiagnosticSource::new("hosting");
    let _raw = source.subscribe(LoggingObserver);
    let handler = DiagnosticHandler::with_options(
        source.clone(),
        AccessLog,
        HandlerOptions::new().with_trace_ignored(true),
    );

    let shutdown = CancellationToken::new();
    handler.start(shutdown.clone()).await?;

    let started = Instant::now();
    source.write(
        names::REQUEST_START,
        &BeginRequest {
            http_context: context(1, "GET", "/health"),
            timestamp: started,
        },
    );
    source.write(
        names::REQUEST_STOP,
        &EndRequest {
            http_context: context(1, "GET", "/health"),
            timestamp: Instant::now(),
        },
    );

    source.write(
        names::REQUEST_START,
        &BeginRequest {
            http_context: context(2, "POST", "/orders"),
            timestamp: Instant::now(),
        },
    );
    source.write(
        names::DIAGNOSTICS_UNHANDLED_EXCEPTION,
        &RequestFailed {
            http_context: context(2, "POST", "/orders"),
            exception: ServerError {
                status: 500,
                message: "inventory service unavailable".into(),
            },
        },
    );

    // Not a hosting event.
    source.write("routing.endpoint_matched", &());

    handler.stop(shutdown).await?;
    tracing::info!(
        resolutions = handler.accessor_resolutions(),
        faults = handler.faults(),
        elapsed = ?started.elapsed(),
        "handler stopped"
    );

    Ok(())
}
