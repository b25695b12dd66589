//! # Observer
//!
//! The receiving end of a notification source.
//!
//! Sources call observers synchronously on the publishing thread, and may do
//! so from several threads at once. Implementations must not block.

use crate::{error::BoxError, notification::Notification};
use std::sync::Arc;

/// A subscriber to a notification source.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Observer`",
    label = "missing `Observer` implementation",
    note = "Observers must implement `on_next` to receive notifications."
)]
pub trait Observer: Send + Sync + 'static {
    /// Called for every notification written to the source.
    fn on_next(&self, notification: &Notification<'_>);

    /// Called when the source itself reports a failure.
    fn on_error(&self, error: &BoxError) {
        let _ = error;
    }

    /// Called once when the source stops publishing.
    fn on_completed(&self) {}

    /// Whether this observer wants notifications with the given name.
    ///
    /// Producers consult this through the source before building a payload.
    /// Returning `false` is advisory: a source may still deliver the name.
    fn is_enabled(&self, name: &str) -> bool {
        let _ = name;
        true
    }
}

/// Shared, type-erased observer as stored by sources.
pub type DynObserver = Arc<dyn Observer>;

impl<O: Observer + ?Sized> Observer for Arc<O> {
    fn on_next(&self, notification: &Notification<'_>) {
        (**self).on_next(notification)
    }

    fn on_error(&self, error: &BoxError) {
        (**self).on_error(error)
    }

    fn on_completed(&self) {
        (**self).on_completed()
    }

    fn is_enabled(&self, name: &str) -> bool {
        (**self).is_enabled(name)
    }
}
