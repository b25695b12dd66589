//! Derive macros for hostwatch.
//!
//! - `#[derive(Payload)]` - Generates the static `Shape` for a payload struct

use proc_macro::TokenStream;

mod payload;

/// Derive macro for implementing `hostwatch_core::Payload`.
///
/// Every named field becomes a readable field of the generated shape, under
/// its Rust name unless renamed.
///
/// # Attributes
///
/// - `#[payload(rename = "HttpContext")]` on a field: publish it under another name
/// - `#[payload(skip)]` on a field: leave it out of the shape
/// - `#[payload(name = "...")]` on the struct: override the shape name
/// - `#[payload(crate = "path")]` on the struct: path to `hostwatch_core`.
///   Defaults to `::hostwatch::hostwatch_core` when the deriving crate depends
///   on `hostwatch`, otherwise to the `hostwatch-core` dependency.
///
/// Published field names must be unique.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Payload)]
/// struct RequestStart {
///     #[payload(rename = "HttpContext")]
///     http_context: RequestContext,
///     timestamp: u64,
/// }
/// ```
#[proc_macro_derive(Payload, attributes(payload))]
pub fn derive_payload(input: TokenStream) -> TokenStream {
    payload::derive_payload_impl(input)
}
