//! EventBus — synchronous dispatch with panic isolation per handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::types::PatternEvent;

type Handler = Arc<dyn Fn(&PatternEvent) + Send + Sync>;

/// Opaque token returned by `subscribe`; pass back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// Per-repository event bus.
///
/// Dispatch is synchronous on the mutating thread: the event fires after the
/// in-memory write completes and before the mutating call returns. A handler
/// that panics is caught and does not prevent later handlers from running.
pub struct EventBus {
    handlers: Mutex<Vec<(SubscriptionToken, Handler)>>,
    next_token: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Register a handler; returns a token for later removal.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&PatternEvent) + Send + Sync + 'static,
    {
        let token = SubscriptionToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.push((token, Arc::new(handler)));
        token
    }

    /// Remove a handler. Returns false when the token is unknown.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        let before = handlers.len();
        handlers.retain(|(t, _)| *t != token);
        handlers.len() < before
    }

    /// Number of live subscriptions.
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Emit an event to all handlers. Handler panics are caught and logged.
    pub fn emit(&self, event: &PatternEvent) {
        let handlers: Vec<Handler> = {
            let guard = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
            guard.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(event);
            }));
            if result.is_err() {
                tracing::warn!(event = event.name(), "event handler panicked; continuing");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn subscribe_emit_unsubscribe() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);

        let token = bus.subscribe(move |_| {
            seen2.fetch_add(1, Ordering::SeqCst);
        });
        bus.emit(&PatternEvent::Loaded { count: 1 });
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        assert!(bus.unsubscribe(token));
        assert!(!bus.unsubscribe(token));
        bus.emit(&PatternEvent::Loaded { count: 2 });
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_handler_does_not_block_others() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);

        bus.subscribe(|_| panic!("boom"));
        bus.subscribe(move |_| {
            seen2.fetch_add(1, Ordering::SeqCst);
        });
        bus.emit(&PatternEvent::Saved { count: 0 });
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
