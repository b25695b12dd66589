//! The hosting lifecycle events a [`DiagnosticHandler`] understands.
//!
//! Names and field names are matched exactly. Request start/stop payloads
//! publish `HttpContext`, while the exception payloads publish `httpContext`
//! and `exception`; the casing follows the publishers and is kept as is.
//!
//! [`DiagnosticHandler`]: crate::DiagnosticHandler

use std::fmt;

/// Event names recognized by the handler.
pub mod names {
    /// A request entered the hosting pipeline.
    pub const REQUEST_START: &str = "hosting.request.start";
    /// A request left the hosting pipeline.
    pub const REQUEST_STOP: &str = "hosting.request.stop";
    /// The hosting layer caught an exception nobody handled.
    pub const HOSTING_UNHANDLED_EXCEPTION: &str = "hosting.unhandled_exception";
    /// The exception middleware saw an unhandled exception.
    pub const DIAGNOSTICS_UNHANDLED_EXCEPTION: &str = "diagnostics.unhandled_exception";
    /// The exception middleware handled an exception.
    pub const DIAGNOSTICS_HANDLED_EXCEPTION: &str = "diagnostics.handled_exception";
}

/// Payload field names read by the handler.
pub mod fields {
    /// Request context on start/stop payloads.
    pub const HTTP_CONTEXT: &str = "HttpContext";
    /// Request context on exception payloads.
    pub const EXCEPTION_HTTP_CONTEXT: &str = "httpContext";
    /// The exception on exception payloads.
    pub const EXCEPTION: &str = "exception";
}

/// A recognized hosting notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostingEvent {
    /// `hosting.request.start`
    RequestStart,
    /// `hosting.request.stop`
    RequestStop,
    /// `hosting.unhandled_exception`
    HostingUnhandledException,
    /// `diagnostics.unhandled_exception`
    DiagnosticsUnhandledException,
    /// `diagnostics.handled_exception`
    DiagnosticsHandledException,
}

impl HostingEvent {
    /// Every recognized event.
    pub const ALL: [HostingEvent; 5] = [
        HostingEvent::RequestStart,
        HostingEvent::RequestStop,
        HostingEvent::HostingUnhandledException,
        HostingEvent::DiagnosticsUnhandledException,
        HostingEvent::DiagnosticsHandledException,
    ];

    /// Look an event up by its exact notification name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            names::REQUEST_START => Some(HostingEvent::RequestStart),
            names::REQUEST_STOP => Some(HostingEvent::RequestStop),
            names::HOSTING_UNHANDLED_EXCEPTION => Some(HostingEvent::HostingUnhandledException),
            names::DIAGNOSTICS_UNHANDLED_EXCEPTION => {
                Some(HostingEvent::DiagnosticsUnhandledException)
            }
            names::DIAGNOSTICS_HANDLED_EXCEPTION => Some(HostingEvent::DiagnosticsHandledException),
            _ => None,
        }
    }

    /// The notification name.
    pub const fn name(self) -> &'static str {
        match self {
            HostingEvent::RequestStart => names::REQUEST_START,
            HostingEvent::RequestStop => names::REQUEST_STOP,
            HostingEvent::HostingUnhandledException => names::HOSTING_UNHANDLED_EXCEPTION,
            HostingEvent::DiagnosticsUnhandledException => names::DIAGNOSTICS_UNHANDLED_EXCEPTION,
            HostingEvent::DiagnosticsHandledException => names::DIAGNOSTICS_HANDLED_EXCEPTION,
        }
    }

    /// Whether this event reports an exception.
    pub const fn is_exception(self) -> bool {
        !matches!(self, HostingEvent::RequestStart | HostingEvent::RequestStop)
    }

    /// Name of the field holding the request context.
    pub const fn context_field(self) -> &'static str {
        if self.is_exception() {
            fields::EXCEPTION_HTTP_CONTEXT
        } else {
            fields::HTTP_CONTEXT
        }
    }
}

impl fmt::Display for HostingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
