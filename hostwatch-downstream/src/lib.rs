//! A minimal publisher built against the `hostwatch` facade only.
//!
//! Keeps `#[derive(hostwatch::Payload)]` honest for crates that never name
//! `hostwatch-core` in their manifest.

use hostwatch::{DiagnosticSource, names};

/// The request a host hands to its pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request path.
    pub path: String,
}

/// Published when a request enters the pipeline.
#[derive(hostwatch::Payload)]
pub struct RequestStart {
    /// The request.
    #[payload(rename = "HttpContext")]
    pub http_context: Request,
}

/// Published when the exception middleware handles a failure.
#[derive(hostwatch::Payload)]
pub struct RequestFailed {
    /// The request.
    #[payload(rename = "httpContext")]
    pub http_context: Request,
    /// What went wrong.
    pub exception: String,
}

/// Publish a start notification if anyone listens for it.
pub fn publish_start(source: &DiagnosticSource, path: &str) {
    if source.is_enabled(names::REQUEST_START) {
        source.write(
            names::REQUEST_START,
            &RequestStart {
                http_context: Request { path: path.into() },
            },
        );
    }
}
