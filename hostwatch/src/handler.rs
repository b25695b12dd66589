//! # Diagnostic Handler
//!
//! Bridges a [`DiagnosticSource`] to a [`RequestObserver`].
//!
//! The handler subscribes one observer to the source. For every notification
//! it matches the name against [`HostingEvent`], reads the event's fields
//! through a per-handler [`AccessorCache`], and calls the typed callback.
//! Unrecognized names are dropped without error.
//!
//! # Lifecycle
//!
//! - [`subscribe`](DiagnosticHandler::subscribe) registers with the source;
//!   calling it again while subscribed does nothing.
//! - [`unsubscribe`](DiagnosticHandler::unsubscribe) releases the
//!   registration; it is a no-op when not subscribed. Once it returns no new
//!   callback starts, though one already running may finish.
//! - Dropping the handler unsubscribes.

use crate::{
    error::DispatchError,
    event::{HostingEvent, fields},
    observer::RequestObserver,
    options::HandlerOptions,
};
use hostwatch_core::{BoxError, Notification, Observer, Payload};
use hostwatch_std::{AccessorCache, DiagnosticSource, Subscription};
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// What happened to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The mapped callback ran.
    Delivered(HostingEvent),
    /// The name is not a hosting event.
    Ignored,
    /// The handler is not subscribed.
    Inactive,
}

struct HandlerCore<O> {
    observer: O,
    cache: AccessorCache,
    options: HandlerOptions,
    active: AtomicBool,
    faults: AtomicUsize,
}

impl<O: RequestObserver> HandlerCore<O> {
    fn dispatch(&self, notification: &Notification<'_>) -> Result<DispatchOutcome, DispatchError> {
        if !self.active.load(Ordering::Acquire) {
            return Ok(DispatchOutcome::Inactive);
        }

        let Some(event) = HostingEvent::from_name(notification.name()) else {
            if self.options.trace_ignored {
                tracing::trace!(event = notification.name(), "ignoring notification");
            }
            return Ok(DispatchOutcome::Ignored);
        };

        let payload = notification.payload();
        let context = self.extract::<O::Context>(event, payload, event.context_field())?;

        match event {
            HostingEvent::RequestStart => {
                self.invoke(event, || self.observer.on_request_start(context))?
            }
            HostingEvent::RequestStop => {
                self.invoke(event, || self.observer.on_request_stop(context))?
            }
            HostingEvent::HostingUnhandledException
            | HostingEvent::DiagnosticsUnhandledException
            | HostingEvent::DiagnosticsHandledException => {
                let exception = self.extract::<O::Exception>(event, payload, fields::EXCEPTION)?;
                self.invoke(event, || {
                    self.observer.on_request_exception(context, exception)
                })?
            }
        }

        tracing::trace!(event = event.name(), "request event dispatched");
        Ok(DispatchOutcome::Delivered(event))
    }

    fn extract<'p, T: Any>(
        &self,
        event: HostingEvent,
        payload: &'p dyn Payload,
        field: &'static str,
    ) -> Result<&'p T, DispatchError> {
        self.cache
            .accessor_for(payload, field)
            .and_then(|accessor| accessor.get_as::<T>(payload))
            .map_err(|source| DispatchError::Access {
                event: event.name(),
                source,
            })
    }

    fn invoke(&self, event: HostingEvent, callback: impl FnOnce()) -> Result<(), DispatchError> {
        if !self.options.isolate_callbacks {
            callback();
            return Ok(());
        }

        panic::catch_unwind(AssertUnwindSafe(callback)).map_err(|panic| {
            DispatchError::CallbackPanicked {
                event: event.name(),
                message: panic_message(panic.as_ref()),
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl<O: RequestObserver> Observer for HandlerCore<O> {
    fn on_next(&self, notification: &Notification<'_>) {
        if let Err(error) = self.dispatch(notification) {
            self.faults.fetch_add(1, Ordering::Relaxed);
            self.observer.on_dispatch_error(&error);
        }
    }

    fn on_error(&self, error: &BoxError) {
        tracing::warn!(%error, "diagnostic source reported an error");
    }

    fn on_completed(&self) {
        tracing::info!("diagnostic source completed, no further request events");
    }

    fn is_enabled(&self, name: &str) -> bool {
        HostingEvent::from_name(name).is_some()
    }
}

/// Typed adapter from a [`DiagnosticSource`] to a [`RequestObserver`].
///
/// # Example
///
/// ```rust,ignore
/// let source = DiagnosticSource::new("hosting");
/// let handler = DiagnosticHandler::new(
///     source.clone(),
///     Callbacks::<RequestContext, ServerError>::new()
///         .with_request_start(|ctx| println!("start {}", ctx.path)),
/// );
/// handler.subscribe();
///
/// source.write(names::REQUEST_START, &RequestStart { http_context: ctx });
/// ```
pub struct DiagnosticHandler<O: RequestObserver> {
    source: DiagnosticSource,
    core: Arc<HandlerCore<O>>,
    subscription: Mutex<Option<Subscription>>,
}

impl<O: RequestObserver> DiagnosticHandler<O> {
    /// Create a handler with default options. Nothing is delivered until
    /// [`subscribe`](Self::subscribe) is called.
    pub fn new(source: DiagnosticSource, observer: O) -> Self {
        Self::with_options(source, observer, HandlerOptions::default())
    }

    /// Create a handler with explicit options.
    pub fn with_options(source: DiagnosticSource, observer: O, options: HandlerOptions) -> Self {
        Self {
            source,
            core: Arc::new(HandlerCore {
                observer,
                cache: AccessorCache::new(),
                options,
                active: AtomicBool::new(false),
                faults: AtomicUsize::new(0),
            }),
            subscription: Mutex::new(None),
        }
    }

    // The slot only ever holds `Some` or `None`, so a poisoned lock is still usable.
    fn slot(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register with the source. Returns `false` if already subscribed.
    pub fn subscribe(&self) -> bool {
        let mut slot = self.slot();
        if slot.is_some() {
            tracing::debug!(source = self.source.name(), "handler already subscribed");
            return false;
        }

        self.core.active.store(true, Ordering::Release);
        *slot = Some(self.source.subscribe_dyn(self.core.clone()));
        tracing::debug!(source = self.source.name(), "handler subscribed");
        true
    }

    /// Release the registration. Returns `false` if not subscribed.
    pub fn unsubscribe(&self) -> bool {
        let mut slot = self.slot();
        self.core.active.store(false, Ordering::Release);

        match slot.take() {
            Some(subscription) => {
                subscription.unsubscribe();
                tracing::debug!(source = self.source.name(), "handler unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Whether the handler currently holds a subscription.
    pub fn is_subscribed(&self) -> bool {
        self.slot().is_some()
    }

    /// Dispatch one notification directly, bypassing the source.
    ///
    /// This is the same path the source drives, except that errors are
    /// returned to the caller instead of being reported to the observer.
    pub fn dispatch(
        &self,
        notification: &Notification<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.core.dispatch(notification)
    }

    /// The wrapped observer.
    pub fn observer(&self) -> &O {
        &self.core.observer
    }

    /// The source this handler subscribes to.
    pub fn source(&self) -> &DiagnosticSource {
        &self.source
    }

    /// The options this handler was built with.
    pub fn options(&self) -> HandlerOptions {
        self.core.options
    }

    /// Number of field lookups performed by the accessor cache.
    pub fn accessor_resolutions(&self) -> usize {
        self.core.cache.resolutions()
    }

    /// Number of dispatch errors reported so far.
    pub fn faults(&self) -> usize {
        self.core.faults.load(Ordering::Relaxed)
    }
}

impl<O: RequestObserver> Drop for DiagnosticHandler<O> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<O: RequestObserver> fmt::Debug for DiagnosticHandler<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticHandler")
            .field("source", &self.source.name())
            .field("subscribed", &self.is_subscribed())
            .field("options", &self.core.options)
            .field("cache", &self.core.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let from_str = panic::catch_unwind::<_, ()>(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(from_str.as_ref()), "boom");

        let from_string = panic::catch_unwind::<_, ()>(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(panic_message(from_string.as_ref()), "code 7");

        let other = panic::catch_unwind::<_, ()>(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
