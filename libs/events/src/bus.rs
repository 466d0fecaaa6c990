//! Synchronous publish/subscribe bus.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

/// A registered event handler.
///
/// Handlers are compared by allocation, so keep the `Arc` you subscribed
/// with if you intend to unsubscribe later.
pub type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<P, F>(f: F) -> Handler<P>
where
    F: Fn(&P) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Many-to-many in-process event bus.
///
/// Publishing invokes every handler registered for the event name at the
/// time of the call, in registration order, on the caller's thread.
pub struct EventBus<P> {
    handlers: Mutex<HashMap<String, Vec<Handler<P>>>>,
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Handler<P>>>> {
        // A panicking handler never runs under the lock, so the map is intact.
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a handler for an event name.
    pub fn subscribe(&self, event_name: &str, handler: Handler<P>) {
        self.lock()
            .entry(event_name.to_string())
            .or_default()
            .push(handler);
        trace!(event = event_name, "handler subscribed");
    }

    /// Remove one registration of `handler` for `event_name`.
    ///
    /// Returns false when no matching registration exists.
    pub fn unsubscribe(&self, event_name: &str, handler: &Handler<P>) -> bool {
        let mut handlers = self.lock();
        let Some(list) = handlers.get_mut(event_name) else {
            return false;
        };

        let Some(pos) = list.iter().position(|h| Arc::ptr_eq(h, handler)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            handlers.remove(event_name);
        }
        trace!(event = event_name, "handler unsubscribed");
        true
    }

    /// Deliver `payload` to every current subscriber of `event_name`.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event_name: &str, payload: P) -> usize {
        // Snapshot so handlers can (un)subscribe while being dispatched.
        let snapshot: Vec<Handler<P>> = self.lock().get(event_name).cloned().unwrap_or_default();

        trace!(
            event = event_name,
            subscribers = snapshot.len(),
            "publishing event"
        );
        for h in &snapshot {
            h(&payload);
        }
        snapshot.len()
    }

    /// Number of handlers registered for an event name.
    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.lock().get(event_name).map_or(0, Vec::len)
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.lock();
        let mut names: Vec<_> = handlers.keys().cloned().collect();
        names.sort();
        f.debug_struct("EventBus").field("events", &names).finish()
    }
}
