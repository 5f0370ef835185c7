use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use kernel::interface::event::{DomainEvent, EventPublisher};

pub use self::log::*;

mod log;

type Subscriber<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// In-process publisher. Subscribers run synchronously, in the order they subscribed,
/// on the task that publishes.
pub struct EventEmitter<E> {
    subscribers: RwLock<HashMap<&'static str, Vec<Subscriber<E>>>>,
}

impl<E: DomainEvent> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    pub fn subscribe<F>(&self, name: &'static str, subscriber: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push(Arc::new(subscriber));
    }
}

impl<E: DomainEvent> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DomainEvent> EventPublisher<E> for EventEmitter<E> {
    fn publish(&self, event: E) {
        // released before calling out so subscribers may subscribe
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event.name())
            .cloned()
            .unwrap_or_default();
        tracing::debug!(
            "publishing {} to {} subscriber(s)",
            event.name(),
            subscribers.len()
        );
        for subscriber in subscribers {
            subscriber(&event);
        }
    }
}
