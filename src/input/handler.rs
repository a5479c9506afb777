use crate::{input::events::MapEvent, prelude::HashMap};
use std::collections::VecDeque;

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Dispatch all queued events to their listeners and return them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut manager = EventManager::new();
        let adds = Arc::new(AtomicUsize::new(0));
        let counter = adds.clone();
        manager.on("layeradd", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(MapEvent::LayerAdd {
            layer_id: "a".to_string(),
        });
        manager.emit(MapEvent::LayerRemove {
            layer_id: "a".to_string(),
        });
        assert_eq!(manager.pending_events(), 2);

        let events = manager.process_events();
        assert_eq!(events.len(), 2);
        assert_eq!(adds.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending_events(), 0);
    }
}
