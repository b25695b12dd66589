//! Filter observer for name-based subscription.

use hostwatch_core::{BoxError, Notification, Observer};

/// An observer that only forwards notifications whose name passes a
/// predicate.
///
/// The predicate also answers `is_enabled`, so producers skip payloads the
/// inner observer would never see.
pub struct FilterObserver<O, F> {
    inner: O,
    predicate: F,
}

impl<O, F> FilterObserver<O, F> {
    /// Create a new filter observer.
    pub fn new(inner: O, predicate: F) -> Self {
        Self { inner, predicate }
    }

    /// The wrapped observer.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O, F> Observer for FilterObserver<O, F>
where
    O: Observer,
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    fn on_next(&self, notification: &Notification<'_>) {
        if (self.predicate)(notification.name()) {
            self.inner.on_next(notification);
        }
    }

    fn on_error(&self, error: &BoxError) {
        self.inner.on_error(error);
    }

    fn on_completed(&self) {
        self.inner.on_completed();
    }

    fn is_enabled(&self, name: &str) -> bool {
        (self.predicate)(name) && self.inner.is_enabled(name)
    }
}
