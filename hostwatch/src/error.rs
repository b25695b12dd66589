//! Dispatch errors.

use hostwatch_core::AccessError;
use thiserror::Error;

pub use hostwatch_core::BoxError;

/// Errors raised while turning a recognized notification into a callback.
///
/// None of these are fatal: the handler reports them through
/// [`RequestObserver::on_dispatch_error`] and keeps listening.
///
/// [`RequestObserver::on_dispatch_error`]: crate::RequestObserver::on_dispatch_error
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A required field was missing or had an unexpected type.
    #[error("`{event}` payload rejected: {source}")]
    Access {
        /// Name of the notification.
        event: &'static str,
        /// What went wrong reading the payload.
        source: AccessError,
    },

    /// A callback panicked while isolation was enabled.
    #[error("callback for `{event}` panicked: {message}")]
    CallbackPanicked {
        /// Name of the notification.
        event: &'static str,
        /// The panic message, if it was a string.
        message: String,
    },
}

impl DispatchError {
    /// Name of the notification that failed.
    pub fn event(&self) -> &'static str {
        match self {
            DispatchError::Access { event, .. } | DispatchError::CallbackPanicked { event, .. } => {
                *event
            }
        }
    }

    /// Returns `true` when a required payload field does not exist.
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, DispatchError::Access { source, .. } if source.is_field_not_found())
    }
}
