//! Typed request lifecycle callbacks.
//!
//! Implement [`RequestObserver`] and override the callbacks you care about,
//! or build a [`Callbacks`] value from closures.

use crate::error::DispatchError;
use std::{any::Any, fmt, marker::PhantomData};

/// Receiver of typed request lifecycle events.
///
/// Every callback defaults to a no-op. Callbacks run synchronously on the
/// publishing thread and should return quickly. The context and exception
/// are borrowed from the payload for the duration of the call.
pub trait RequestObserver: Send + Sync + 'static {
    /// Type stored in the payload's request context field.
    type Context: Any;
    /// Type stored in the payload's exception field.
    type Exception: Any;

    /// A request entered the pipeline.
    fn on_request_start(&self, context: &Self::Context) {
        let _ = context;
    }

    /// A request left the pipeline.
    fn on_request_stop(&self, context: &Self::Context) {
        let _ = context;
    }

    /// A request failed, or its failure was handled by middleware.
    fn on_request_exception(&self, context: &Self::Context, exception: &Self::Exception) {
        let _ = (context, exception);
    }

    /// A recognized notification could not be delivered.
    fn on_dispatch_error(&self, error: &DispatchError) {
        tracing::warn!(event = error.event(), %error, "request event dropped");
    }
}

type ContextFn<C> = Box<dyn Fn(&C) + Send + Sync>;
type ExceptionFn<C, X> = Box<dyn Fn(&C, &X) + Send + Sync>;

/// A [`RequestObserver`] assembled from closures.
///
/// Unset callbacks are no-ops.
///
/// # Example
///
/// ```rust,ignore
/// let callbacks = Callbacks::<RequestContext, ServerError>::new()
///     .with_request_start(|ctx| tracing::info!(path = %ctx.path, "start"))
///     .with_request_exception(|ctx, err| tracing::error!(path = %ctx.path, %err, "failed"));
/// ```
pub struct Callbacks<C, X> {
    on_start: ContextFn<C>,
    on_stop: ContextFn<C>,
    on_exception: ExceptionFn<C, X>,
    _types: PhantomData<fn(&C, &X)>,
}

impl<C: Any, X: Any> Callbacks<C, X> {
    /// Create callbacks that do nothing.
    pub fn new() -> Self {
        Self {
            on_start: Box::new(|_: &C| {}),
            on_stop: Box::new(|_: &C| {}),
            on_exception: Box::new(|_: &C, _: &X| {}),
            _types: PhantomData,
        }
    }

    /// Set the request start callback.
    pub fn with_request_start(mut self, f: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.on_start = Box::new(f);
        self
    }

    /// Set the request stop callback.
    pub fn with_request_stop(mut self, f: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.on_stop = Box::new(f);
        self
    }

    /// Set the request exception callback.
    pub fn with_request_exception(mut self, f: impl Fn(&C, &X) + Send + Sync + 'static) -> Self {
        self.on_exception = Box::new(f);
        self
    }
}

impl<C: Any, X: Any> Default for Callbacks<C, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Any, X: Any> RequestObserver for Callbacks<C, X> {
    type Context = C;
    type Exception = X;

    fn on_request_start(&self, context: &C) {
        (self.on_start)(context)
    }

    fn on_request_stop(&self, context: &C) {
        (self.on_stop)(context)
    }

    fn on_request_exception(&self, context: &C, exception: &X) {
        (self.on_exception)(context, exception)
    }
}

impl<C, X> fmt::Debug for Callbacks<C, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}
