//! # hostwatch-core
//!
//! Core traits for the hostwatch diagnostic observer.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! payload producers that don't need the full `hostwatch-std` implementation.
//!
//! # Building Blocks
//!
//! ## Payloads ([`Payload`])
//!
//! Notifications carry payloads whose concrete type the receiver does not know
//! at compile time. Every payload describes itself through a static [`Shape`]:
//! a type name, a type identity and a table of named fields ([`FieldDef`]).
//! Receivers look fields up by name on the shape instead of naming the type.
//!
//! ## Notifications ([`Notification`])
//!
//! A borrowed `(name, payload)` pair. Notifications are consumed synchronously
//! and never outlive the `write` call that produced them.
//!
//! ## Observers ([`Observer`])
//!
//! The subscriber side of a notification source: `on_next` per notification,
//! plus `on_error` / `on_completed` signals from the source itself.
//!
//! # Error Types
//!
//! - [`AccessError`] - Field lookup and extraction errors
//! - [`BoxError`] - Type-erased errors reported by sources

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod notification;
mod observer;
mod payload;

// Re-exports
pub use error::{AccessError, BoxError};
pub use notification::Notification;
pub use observer::{DynObserver, Observer};
pub use payload::{FieldDef, FieldGetter, Payload, Shape};
