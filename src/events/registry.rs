use std::fmt;
use std::hash::Hash;

use ahash::AHashMap;

/// A broadcastable event that can be grouped by kind
pub trait Event {
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Token returned by [`EventRegistry::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Mapping from event kind to an ordered list of subscriber callbacks
pub struct EventRegistry<E: Event> {
    listeners: AHashMap<E::Kind, Vec<(ListenerId, Listener<E>)>>,
    next_id: u64,
    emitted: u64,
}

impl<E: Event> EventRegistry<E> {
    pub fn new() -> Self {
        Self {
            listeners: AHashMap::new(),
            next_id: 0,
            emitted: 0,
        }
    }

    /// Register a callback for one event kind
    pub fn subscribe<F>(&mut self, kind: E::Kind, listener: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a callback; unknown ids are ignored
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for listeners in self.listeners.values_mut() {
            if let Some(pos) = listeners.iter().position(|(lid, _)| *lid == id) {
                listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver an event to every listener of its kind, in registration order
    pub fn emit(&mut self, event: &E) {
        self.emitted += 1;
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Total number of broadcasts, including ones nobody listened to
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<E: Event> Default for EventRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(E::Kind, usize)> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (*kind, listeners.len()))
            .collect();
        f.debug_struct("EventRegistry")
            .field("listeners", &counts)
            .field("emitted", &self.emitted)
            .finish()
    }
}
