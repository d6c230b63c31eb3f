//! Application event signal
//!
//! A listener registry that lets the HTTP layer announce session expiry
//! without depending on navigation or UI code.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppEvent {
    /// The backend rejected the session token; local session state is cleared.
    SessionExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    listeners: RwLock<HashMap<AppEvent, Vec<(ListenerId, Handler)>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<AppEvent, usize> = self
            .listeners
            .read()
            .map(|map| map.iter().map(|(k, v)| (*k, v.len())).collect())
            .unwrap_or_default();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `event`.
    pub fn on<F>(&self, event: AppEvent, handler: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners
            .entry(event)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut removed = false;
        for handlers in listeners.values_mut() {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            removed |= handlers.len() != before;
        }
        removed
    }

    /// Invoke every handler registered for `event`, in registration order.
    ///
    /// Handlers run outside the registry lock and may register or remove
    /// listeners themselves.
    pub fn emit(&self, event: AppEvent) {
        let handlers: Vec<Handler> = {
            let listeners = self
                .listeners
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            listeners
                .get(&event)
                .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };
        log::debug!("[Homestay] emit {:?} to {} listener(s)", event, handlers.len());
        for handler in handlers {
            handler();
        }
    }

    pub fn listener_count(&self, event: AppEvent) -> usize {
        self.listeners
            .read()
            .map(|map| map.get(&event).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}
