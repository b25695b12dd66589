//! Borrowed notifications.

use crate::payload::{Payload, Shape};
use std::fmt;

/// A named notification with a type-erased payload.
///
/// Both parts are borrowed from the publisher for the duration of a single
/// `write`; observers must copy out anything they want to keep.
#[derive(Clone, Copy)]
pub struct Notification<'a> {
    name: &'a str,
    payload: &'a dyn Payload,
}

impl<'a> Notification<'a> {
    /// Create a notification.
    pub fn new(name: &'a str, payload: &'a dyn Payload) -> Self {
        Self { name, payload }
    }

    /// The event name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The payload.
    pub fn payload(&self) -> &'a dyn Payload {
        self.payload
    }

    /// Shortcut for `self.payload().shape()`.
    pub fn shape(&self) -> &'static Shape {
        self.payload.shape()
    }
}

impl fmt::Debug for Notification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("payload", &self.payload.shape().name())
            .finish()
    }
}
