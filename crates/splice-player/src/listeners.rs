//! Listener bookkeeping for adapter implementations.

use crate::adapter::{EventListener, ListenerId, PlayerEventKind};

/// Registered listeners of one player.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(ListenerId, PlayerEventKind, EventListener)>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its id.
    pub fn add(&mut self, kind: PlayerEventKind, listener: EventListener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId::new(self.next_id);
        self.entries.push((id, kind, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Listeners for `kind`, cloned so they can be invoked without holding
    /// the owner's lock.
    pub fn listeners_for(&self, kind: PlayerEventKind) -> Vec<EventListener> {
        self.entries
            .iter()
            .filter(|(_, entry_kind, _)| *entry_kind == kind)
            .map(|(_, _, listener)| listener.clone())
            .collect()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_add_and_remove_are_paired() {
        let mut registry = ListenerRegistry::new();
        let paused = registry.add(PlayerEventKind::Paused, Arc::new(|_| {}));
        let ended = registry.add(PlayerEventKind::Ended, Arc::new(|_| {}));
        assert_ne!(paused, ended);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(paused));
        assert!(!registry.remove(paused));
        assert!(registry.remove(ended));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listeners_filtered_by_kind() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::new();
        let counter = hits.clone();
        registry.add(
            PlayerEventKind::Paused,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        registry.add(PlayerEventKind::CanPlay, Arc::new(|_| {}));

        for listener in registry.listeners_for(PlayerEventKind::Paused) {
            listener(PlayerEventKind::Paused);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(registry.listeners_for(PlayerEventKind::Ended).is_empty());
    }
}
