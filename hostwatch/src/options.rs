//! Handler configuration.

/// Options for a [`DiagnosticHandler`](crate::DiagnosticHandler).
///
/// # Example
/// ```
/// use hostwatch::HandlerOptions;
///
/// let options = HandlerOptions::new()
///     .with_isolate_callbacks(false)
///     .with_trace_ignored(true);
/// assert!(!options.isolate_callbacks);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerOptions {
    /// Catch panics from callbacks and report them as dispatch errors
    /// instead of unwinding into the publisher. Default `true`.
    pub isolate_callbacks: bool,
    /// Log unrecognized notification names at trace level. Default `false`.
    pub trace_ignored: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerOptions {
    /// Create the default options.
    pub const fn new() -> Self {
        Self {
            isolate_callbacks: true,
            trace_ignored: false,
        }
    }

    /// Set callback isolation.
    pub const fn with_isolate_callbacks(mut self, isolate: bool) -> Self {
        self.isolate_callbacks = isolate;
        self
    }

    /// Set tracing of ignored notifications.
    pub const fn with_trace_ignored(mut self, trace: bool) -> Self {
        self.trace_ignored = trace;
        self
    }
}
