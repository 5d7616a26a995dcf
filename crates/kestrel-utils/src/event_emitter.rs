//! Generic publish/subscribe helper
//!
//! Handlers are keyed by event name and run in registration order.
//! Emitting an event nobody listens to is a no-op.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked with the emitted payload
pub type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Handle returned by [`EventEmitter::subscribe`], used to unsubscribe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: String,
    id: u64,
}

impl Subscription {
    /// Event name this subscription listens to
    pub fn event(&self) -> &str {
        &self.event
    }
}

struct Registered<P> {
    id: u64,
    handler: Handler<P>,
    once: bool,
}

impl<P> Clone for Registered<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
            once: self.once,
        }
    }
}

pub struct EventEmitter<P> {
    handlers: Arc<RwLock<HashMap<String, Vec<Registered<P>>>>>,
    next_id: Arc<AtomicU64>,
}

impl<P> EventEmitter<P> {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a handler for `event`
    pub fn subscribe<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.register(event.into(), Arc::new(handler), false)
    }

    /// Register an already shared handler
    pub fn subscribe_handler(&self, event: impl Into<String>, handler: Handler<P>) -> Subscription {
        self.register(event.into(), handler, false)
    }

    /// Register a handler that is removed after its first delivery
    pub fn once<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.register(event.into(), Arc::new(handler), true)
    }

    fn register(&self, event: String, handler: Handler<P>, once: bool) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.handlers
            .write()
            .entry(event.clone())
            .or_default()
            .push(Registered { id, handler, once });

        tracing::trace!(event = %event, subscription = id, "Subscribed handler");

        Subscription { event, id }
    }

    /// Remove one handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut handlers = self.handlers.write();
        let Some(list) = handlers.get_mut(&subscription.event) else {
            return false;
        };

        let before = list.len();
        list.retain(|r| r.id != subscription.id);
        let removed = list.len() != before;

        if list.is_empty() {
            handlers.remove(&subscription.event);
        }

        removed
    }

    /// Invoke every handler subscribed to `event`, returning how many ran
    pub fn emit(&self, event: &str, payload: &P) -> usize {
        // Snapshot so handlers can (un)subscribe while we iterate
        let snapshot: Vec<Registered<P>> = match self.handlers.read().get(event) {
            Some(list) => list.clone(),
            None => return 0,
        };

        let once_ids: Vec<u64> = snapshot.iter().filter(|r| r.once).map(|r| r.id).collect();
        if !once_ids.is_empty() {
            let mut handlers = self.handlers.write();
            if let Some(list) = handlers.get_mut(event) {
                list.retain(|r| !once_ids.contains(&r.id));
                if list.is_empty() {
                    handlers.remove(event);
                }
            }
        }

        for registered in &snapshot {
            (registered.handler)(payload);
        }

        snapshot.len()
    }

    /// Number of handlers currently subscribed to `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.handlers.read().get(event).map_or(0, Vec::len)
    }

    /// Drop every handler for every event
    pub fn clear(&self) {
        self.handlers.write().clear();
    }
}

impl<P> Default for EventEmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for EventEmitter<P> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_in_registration_order() {
        let emitter = EventEmitter::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        emitter.subscribe("tick", move |n| first.lock().push(("first", *n)));
        let second = Arc::clone(&seen);
        emitter.subscribe("tick", move |n| second.lock().push(("second", *n)));

        assert_eq!(emitter.emit("tick", &7), 2);
        assert_eq!(*seen.lock(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let emitter = EventEmitter::<()>::new();
        assert_eq!(emitter.emit("nothing", &()), 0);
    }

    #[test]
    fn test_unsubscribe_removes_one_handler() {
        let emitter = EventEmitter::<()>::new();
        let count = Arc::new(AtomicU64::new(0));

        let a = Arc::clone(&count);
        let sub_a = emitter.subscribe("load", move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });
        let b = Arc::clone(&count);
        emitter.subscribe("load", move |_| {
            b.fetch_add(10, Ordering::SeqCst);
        });

        assert!(emitter.unsubscribe(&sub_a));
        assert!(!emitter.unsubscribe(&sub_a));
        assert_eq!(emitter.listener_count("load"), 1);

        emitter.emit("load", &());
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let emitter = EventEmitter::<()>::new();
        let count = Arc::new(AtomicU64::new(0));

        let c = Arc::clone(&count);
        emitter.once("ready", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit("ready", &());
        emitter.emit("ready", &());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.listener_count("ready"), 0);
    }

    #[test]
    fn test_handler_can_unsubscribe_itself() {
        let emitter = EventEmitter::<()>::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let inner_emitter = emitter.clone();
        let inner_slot = Arc::clone(&slot);
        let sub = emitter.subscribe("close", move |_| {
            if let Some(sub) = inner_slot.lock().take() {
                inner_emitter.unsubscribe(&sub);
            }
        });
        *slot.lock() = Some(sub);

        assert_eq!(emitter.emit("close", &()), 1);
        assert_eq!(emitter.listener_count("close"), 0);
    }

    #[test]
    fn test_events_are_isolated_by_name() {
        let emitter = EventEmitter::<()>::new();
        emitter.subscribe("a", |_| {});

        assert_eq!(emitter.emit("b", &()), 0);
        assert_eq!(emitter.listener_count("a"), 1);

        emitter.clear();
        assert_eq!(emitter.listener_count("a"), 0);
    }
}
