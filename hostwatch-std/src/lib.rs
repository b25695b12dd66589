//! # hostwatch-std
//!
//! Standard implementations for the hostwatch diagnostic observer.
//!
//! This crate provides:
//! - **Sources**: [`DiagnosticSource`], [`Subscription`]
//! - **Field access**: [`AccessorCache`], [`FieldAccessor`]
//! - **Standard observers**: Logging, Filter
//! - **Testing**: Recording and counting observers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use hostwatch_core;

// Modules
pub mod accessor;
pub mod observers;
pub mod source;
pub mod testing;

pub use accessor::{AccessorCache, FieldAccessor};
pub use source::{DiagnosticSource, Subscription};
