//! Logging observer for notification tracing.

use hostwatch_core::{BoxError, Notification, Observer};

/// An observer that logs every notification it receives.
///
/// Useful to see what a source publishes before writing a typed adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn on_next(&self, notification: &Notification<'_>) {
        tracing::debug!(
            event = notification.name(),
            payload = notification.shape().name(),
            "diagnostic notification"
        );
    }

    fn on_error(&self, error: &BoxError) {
        tracing::warn!(%error, "diagnostic source error");
    }

    fn on_completed(&self) {
        tracing::debug!("diagnostic source completed");
    }
}
