//! Testing utilities.
//!
//! Re-exports the observers from `hostwatch-std` and adds [`CallRecorder`],
//! a [`RequestObserver`] that records every callback.

use crate::{error::DispatchError, observer::RequestObserver};
use std::{
    any::Any,
    sync::{Arc, Mutex},
};

pub use hostwatch_std::testing::{CountingObserver, RecordingObserver};

/// A callback received by a [`CallRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call<C, X> {
    /// `on_request_start`
    Start(C),
    /// `on_request_stop`
    Stop(C),
    /// `on_request_exception`
    Exception(C, X),
}

struct Record<C, X> {
    calls: Vec<Call<C, X>>,
    errors: Vec<String>,
}

/// A [`RequestObserver`] that clones and records every callback argument.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = CallRecorder::<String, String>::new();
/// let handler = DiagnosticHandler::new(source.clone(), recorder.clone());
/// handler.subscribe();
///
/// source.write(names::REQUEST_START, &start_payload);
///
/// assert_eq!(recorder.calls(), vec![Call::Start("ctx".into())]);
/// ```
pub struct CallRecorder<C, X> {
    record: Arc<Mutex<Record<C, X>>>,
}

impl<C, X> CallRecorder<C, X> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            record: Arc::new(Mutex::new(Record {
                calls: Vec::new(),
                errors: Vec::new(),
            })),
        }
    }

    /// Number of recorded callbacks.
    pub fn count(&self) -> usize {
        self.record.lock().unwrap().calls.len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut record = self.record.lock().unwrap();
        record.calls.clear();
        record.errors.clear();
    }

    /// Rendered dispatch errors reported to this observer.
    pub fn errors(&self) -> Vec<String> {
        self.record.lock().unwrap().errors.clone()
    }
}

impl<C: Clone, X: Clone> CallRecorder<C, X> {
    /// Recorded callbacks, in order.
    pub fn calls(&self) -> Vec<Call<C, X>> {
        self.record.lock().unwrap().calls.clone()
    }
}

impl<C, X> Default for CallRecorder<C, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, X> Clone for CallRecorder<C, X> {
    fn clone(&self) -> Self {
        Self {
            record: self.record.clone(),
        }
    }
}

impl<C, X> RequestObserver for CallRecorder<C, X>
where
    C: Any + Clone + Send,
    X: Any + Clone + Send,
{
    type Context = C;
    type Exception = X;

    fn on_request_start(&self, context: &C) {
        self.record
            .lock()
            .unwrap()
            .calls
            .push(Call::Start(context.clone()));
    }

    fn on_request_stop(&self, context: &C) {
        self.record
            .lock()
            .unwrap()
            .calls
            .push(Call::Stop(context.clone()));
    }

    fn on_request_exception(&self, context: &C, exception: &X) {
        self.record
            .lock()
            .unwrap()
            .calls
            .push(Call::Exception(context.clone(), exception.clone()));
    }

    fn on_dispatch_error(&self, error: &DispatchError) {
        self.record.lock().unwrap().errors.push(error.to_string());
    }
}
