//! # hostwatch - Typed Request Lifecycle Observer
//!
//! `hostwatch` turns an untyped, name-keyed diagnostic notification stream into
//! strongly-typed request lifecycle callbacks.
//!
//! A web host publishes notifications such as `hosting.request.start` to a
//! [`DiagnosticSource`]. Their payloads are plain structs the observer never
//! names; each payload describes its fields through a [`Shape`]. A
//! [`DiagnosticHandler`] subscribes to the source, recognizes the hosting
//! events, pulls the request context (and exception) out of each payload via
//! cached [`FieldAccessor`]s, and calls your [`RequestObserver`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostwatch::{Callbacks, DiagnosticHandler, DiagnosticSource, Payload, names};
//!
//! #[derive(Payload)]
//! struct RequestStart {
//!     #[payload(rename = "HttpContext")]
//!     http_context: RequestContext,
//! }
//!
//! let source = DiagnosticSource::new("hosting");
//! let handler = DiagnosticHandler::new(
//!     source.clone(),
//!     Callbacks::<RequestContext, ServerError>::new()
//!         .with_request_start(|ctx| tracing::info!(path = %ctx.path, "request started")),
//! );
//! handler.subscribe();
//!
//! source.write(names::REQUEST_START, &RequestStart { http_context: ctx });
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Lets `#[derive(Payload)]` expand to `::hostwatch::...` inside this crate too.
extern crate self as hostwatch;

mod error;
mod event;
mod handler;
mod observer;
mod options;
mod service;

pub mod testing;

pub use error::{BoxError, DispatchError};
pub use event::{HostingEvent, fields, names};
pub use handler::{DiagnosticHandler, DispatchOutcome};
pub use observer::{Callbacks, RequestObserver};
pub use options::HandlerOptions;
pub use service::HostedService;

pub use hostwatch_core::{
    AccessError, DynObserver, FieldDef, FieldGetter, Notification, Observer, Payload, Shape,
};
pub use hostwatch_std::{
    AccessorCache, DiagnosticSource, FieldAccessor, Subscription,
    observers::{FilterObserver, LoggingObserver},
};

// `#[derive(Payload)]` reaches the core traits through this path when the
// deriving crate depends on `hostwatch` alone.
pub use hostwatch_core;

#[cfg(feature = "macros")]
pub use hostwatch_macros::Payload;

/// Prelude module - common imports for hostwatch.
///
/// # Usage
///
/// ```rust,ignore
/// use hostwatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Callbacks, DiagnosticHandler, DiagnosticSource, DispatchError, DispatchOutcome,
        HandlerOptions, HostedService, HostingEvent, Notification, Observer, Payload,
        RequestObserver, names,
    };
}
