//! Testing utilities for hostwatch.
//!
//! - [`RecordingObserver`]: An observer that records everything it receives
//! - [`CountingObserver`]: An observer that only counts notifications

use hostwatch_core::{BoxError, Notification, Observer};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Observer
// ============================================================================

#[derive(Default)]
struct Recorded {
    names: Vec<String>,
    errors: Vec<String>,
}

/// An observer that records notification names and source signals.
///
/// Clones share the same record, so keep one clone for assertions and
/// subscribe the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingObserver::new();
/// let _subscription = source.subscribe(recorder.clone());
///
/// source.write("ping", &());
///
/// assert_eq!(recorder.names(), vec!["ping"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingObserver {
    recorded: Arc<Mutex<Recorded>>,
    completions: Arc<AtomicUsize>,
    enabled: Option<Arc<[String]>>,
}

impl RecordingObserver {
    /// Create a recorder that accepts every name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder whose `is_enabled` accepts only `names`.
    pub fn only(names: &[&str]) -> Self {
        Self {
            enabled: Some(names.iter().map(|n| n.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Names of the received notifications, in delivery order.
    pub fn names(&self) -> Vec<String> {
        self.recorded.lock().unwrap().names.clone()
    }

    /// Number of received notifications.
    pub fn count(&self) -> usize {
        self.recorded.lock().unwrap().names.len()
    }

    /// Messages of the received source errors.
    pub fn errors(&self) -> Vec<String> {
        self.recorded.lock().unwrap().errors.clone()
    }

    /// Number of `on_completed` calls.
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.names.clear();
        recorded.errors.clear();
    }
}

impl Observer for RecordingObserver {
    fn on_next(&self, notification: &Notification<'_>) {
        self.recorded
            .lock()
            .unwrap()
            .names
            .push(notification.name().to_string());
    }

    fn on_error(&self, error: &BoxError) {
        self.recorded.lock().unwrap().errors.push(error.to_string());
    }

    fn on_completed(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }

    fn is_enabled(&self, name: &str) -> bool {
        match &self.enabled {
            Some(names) => names.iter().any(|n| n == name),
            None => true,
        }
    }
}

// ============================================================================
// Counting Observer
// ============================================================================

/// An observer that counts notifications without recording them.
///
/// Cheap enough for concurrency tests that publish from many threads.
#[derive(Clone, Default)]
pub struct CountingObserver {
    count: Arc<AtomicUsize>,
}

impl CountingObserver {
    /// Create a new counting observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Observer for CountingObserver {
    fn on_next(&self, _notification: &Notification<'_>) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
