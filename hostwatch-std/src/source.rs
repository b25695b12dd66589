//! Named notification sources.
//!
//! A [`DiagnosticSource`] is the publishing side: producers `write` named
//! payloads, and every subscribed [`Observer`] receives them synchronously on
//! the producer's thread. Subscribing returns a [`Subscription`] that removes
//! the observer again when released.

use hostwatch_core::{BoxError, DynObserver, Notification, Observer, Payload};
use std::{
    fmt,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

struct Subscriber {
    id: u64,
    observer: DynObserver,
}

struct SourceInner {
    name: String,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    completed: AtomicBool,
}

impl SourceInner {
    // Subscriber lists stay consistent even if an observer panicked while a
    // guard was held, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) -> bool {
        let mut subscribers = self.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        before != subscribers.len()
    }

    // `completed` only flips under the write guard, so a snapshot taken
    // after `complete` drained the list is always empty.
    fn snapshot(&self) -> Vec<DynObserver> {
        let subscribers = self.read();
        if self.is_completed() {
            return Vec::new();
        }
        subscribers.iter().map(|s| s.observer.clone()).collect()
    }

    fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}

/// A named publish/subscribe channel for diagnostic notifications.
///
/// Cloning is cheap and yields a handle to the same channel.
#[derive(Clone)]
pub struct DiagnosticSource {
    inner: Arc<SourceInner>,
}

impl DiagnosticSource {
    /// Create a source with no subscribers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SourceInner {
                name: name.into(),
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                completed: AtomicBool::new(false),
            }),
        }
    }

    /// The source name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Subscribe an observer.
    pub fn subscribe<O: Observer>(&self, observer: O) -> Subscription {
        self.subscribe_dyn(Arc::new(observer))
    }

    /// Subscribe an already shared observer.
    ///
    /// If the source has completed, the observer receives `on_completed`
    /// immediately and the returned subscription is inert.
    pub fn subscribe_dyn(&self, observer: DynObserver) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut subscribers = self.inner.write();
            if !self.inner.completed.load(Ordering::Acquire) {
                subscribers.push(Subscriber { id, observer });
                tracing::debug!(source = %self.inner.name, id, "observer subscribed");
                return Subscription {
                    id,
                    source: Arc::downgrade(&self.inner),
                };
            }
        }

        observer.on_completed();
        Subscription {
            id,
            source: Weak::new(),
        }
    }

    /// Whether any subscriber wants notifications named `name`.
    ///
    /// Producers use this to skip building payloads nobody listens to.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.inner.read().iter().any(|s| s.observer.is_enabled(name))
    }

    /// Deliver a notification to every current subscriber.
    ///
    /// Observers run on the calling thread, outside the subscriber lock. No
    /// observer is handed a notification once [`complete`](Self::complete)
    /// has started; a delivery already running on another thread may still
    /// overlap with `on_completed`.
    pub fn write(&self, name: &str, payload: &dyn Payload) {
        let notification = Notification::new(name, payload);
        for observer in self.inner.snapshot() {
            if self.inner.is_completed() {
                break;
            }
            observer.on_next(&notification);
        }
    }

    /// Report a failure of the source itself to every subscriber.
    ///
    /// Ignored after completion.
    pub fn report_error(&self, error: &BoxError) {
        for observer in self.inner.snapshot() {
            if self.inner.is_completed() {
                break;
            }
            observer.on_error(error);
        }
    }

    /// Stop publishing. Subscribers receive `on_completed` once and are
    /// dropped; later writes are ignored. Completing twice is a no-op.
    pub fn complete(&self) {
        let drained = {
            let mut subscribers = self.inner.write();
            if self.inner.completed.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut *subscribers)
        };

        tracing::info!(
            source = %self.inner.name,
            subscribers = drained.len(),
            "diagnostic source completed"
        );
        for subscriber in drained {
            subscriber.observer.on_completed();
        }
    }

    /// Whether [`complete`](Self::complete) has been called.
    pub fn is_completed(&self) -> bool {
        self.inner.is_completed()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().len()
    }
}

impl fmt::Debug for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSource")
            .field("name", &self.inner.name)
            .field("subscribers", &self.subscriber_count())
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// A live registration with a [`DiagnosticSource`].
///
/// Released exactly once: by [`unsubscribe`](Self::unsubscribe) or on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    source: Weak<SourceInner>,
}

impl Subscription {
    /// Identifier of this subscription within its source.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the observer is still registered.
    pub fn is_active(&self) -> bool {
        self.source
            .upgrade()
            .is_some_and(|inner| inner.read().iter().any(|s| s.id == self.id))
    }

    /// Remove the observer from its source.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.source.upgrade() {
            if inner.remove(self.id) {
                tracing::debug!(source = %inner.name, id = self.id, "observer unsubscribed");
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
