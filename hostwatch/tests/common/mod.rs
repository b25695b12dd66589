#![allow(dead_code)]

use hostwatch::{DiagnosticHandler, DiagnosticSource, Payload, testing::CallRecorder};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub id: u32,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerError {
    pub status: u16,
    pub message: String,
}

pub fn ctx(id: u32, path: &str) -> RequestContext {
    RequestContext {
        id,
        path: path.to_string(),
    }
}

pub fn server_error(status: u16, message: &str) -> ServerError {
    ServerError {
        status,
        message: message.to_string(),
    }
}

// ============================================================================
// Payload Shapes
// ============================================================================

#[derive(Payload)]
pub struct StartPayload {
    #[payload(rename = "HttpContext")]
    pub http_context: RequestContext,
    pub timestamp: u64,
}

#[derive(Payload)]
pub struct StopPayload {
    #[payload(rename = "HttpContext")]
    pub http_context: RequestContext,
    pub elapsed_ms: u64,
}

#[derive(Payload)]
pub struct ExceptionPayload {
    #[payload(rename = "httpContext")]
    pub http_context: RequestContext,
    pub exception: ServerError,
}

/// An exception payload whose publisher forgot the exception.
#[derive(Payload)]
pub struct ContextOnlyPayload {
    #[payload(rename = "httpContext")]
    pub http_context: RequestContext,
}

pub fn start(context: RequestContext) -> StartPayload {
    StartPayload {
        http_context: context,
        timestamp: 0,
    }
}

pub fn stop(context: RequestContext) -> StopPayload {
    StopPayload {
        http_context: context,
        elapsed_ms: 12,
    }
}

pub fn exception(context: RequestContext, error: ServerError) -> ExceptionPayload {
    ExceptionPayload {
        http_context: context,
        exception: error,
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub type Recorder = CallRecorder<RequestContext, ServerError>;
pub type Call = hostwatch::testing::Call<RequestContext, ServerError>;

/// A subscribed handler recording into the returned recorder.
pub fn subscribed(source: &DiagnosticSource) -> (DiagnosticHandler<Recorder>, Recorder) {
    init_tracing();
    let recorder = Recorder::new();
    let handler = DiagnosticHandler::new(source.clone(), recorder.clone());
    assert!(handler.subscribe());
    (handler, recorder)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
