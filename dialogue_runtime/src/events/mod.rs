//! Event Dispatcher - broadcasts event node names to registered listeners.

use std::sync::Arc;
use tracing::debug;

use crate::blackboard::PropertyScope;

/// Receives every event fired by an event node.
///
/// Every listener sees every event; each one compares `event_name` itself and
/// ignores what it does not care about. Handlers run synchronously, and the
/// dialogue does not move past the event node until all of them return.
pub trait DialogueListener: Send + Sync {
    fn handle_event(&self, event_name: &str, properties: &mut PropertyScope<'_>);
}

/// Registered listeners, in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn DialogueListener>>,
}

fn same_listener(a: &Arc<dyn DialogueListener>, b: &Arc<dyn DialogueListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Returns `false` if it was already registered.
    pub fn register(&mut self, listener: Arc<dyn DialogueListener>) -> bool {
        if self.listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn deregister(&mut self, listener: Arc<dyn DialogueListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, &listener));
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invoke every listener with `event_name`, in registration order.
    pub fn dispatch(&self, event_name: &str, properties: &mut PropertyScope<'_>) {
        debug!(event = event_name, listeners = self.listeners.len(), "dispatching dialogue event");
        for listener in &self.listeners {
            listener.handle_event(event_name, properties);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener backed by a closure that sees every event.
pub struct FnListener<F> {
    handler: F,
}

impl<F> FnListener<F>
where
    F: Fn(&str, &mut PropertyScope<'_>) + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> DialogueListener for FnListener<F>
where
    F: Fn(&str, &mut PropertyScope<'_>) + Send + Sync,
{
    fn handle_event(&self, event_name: &str, properties: &mut PropertyScope<'_>) {
        (self.handler)(event_name, properties)
    }
}

/// Listener that only reacts to one event name.
pub struct NamedEvent<F> {
    name: String,
    handler: F,
}

impl<F> NamedEvent<F>
where
    F: Fn(&mut PropertyScope<'_>) + Send + Sync,
{
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> DialogueListener for NamedEvent<F>
where
    F: Fn(&mut PropertyScope<'_>) + Send + Sync,
{
    fn handle_event(&self, event_name: &str, properties: &mut PropertyScope<'_>) {
        if event_name == self.name {
            (self.handler)(properties)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::Blackboard;
    use dialogue_graph::{Graph, Property};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl DialogueListener for Recorder {
        fn handle_event(&self, event_name: &str, _properties: &mut PropertyScope<'_>) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, event_name));
        }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(Recorder { tag: "a", log: log.clone() }));
        dispatcher.register(Arc::new(Recorder { tag: "b", log: log.clone() }));

        let mut blackboard = Blackboard::new();
        dispatcher.dispatch("spawn", &mut PropertyScope::new(&mut blackboard));

        assert_eq!(*log.lock().unwrap(), vec!["a:spawn", "b:spawn"]);
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let listener: Arc<dyn DialogueListener> = Arc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();

        assert!(dispatcher.register(listener.clone()));
        assert!(!dispatcher.register(listener.clone()));
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn test_deregister() {
        let kept: Arc<dyn DialogueListener> = Arc::new(Recorder::default());
        let removed: Arc<dyn DialogueListener> = Arc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(kept.clone());
        dispatcher.register(removed.clone());

        assert!(dispatcher.deregister(removed.clone()));
        assert!(!dispatcher.deregister(removed));
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn test_named_event_filters() {
        let mut blackboard = Blackboard::new();
        blackboard.register(Graph::new("entry").with_property(Property::int("CUBE_COUNT", 0)));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(NamedEvent::new("spawn", |properties| {
            let count = properties.get_int("CUBE_COUNT").unwrap();
            properties.set("CUBE_COUNT", count + 1).unwrap();
        })));

        let mut scope = PropertyScope::new(&mut blackboard);
        dispatcher.dispatch("spawn", &mut scope);
        dispatcher.dispatch("despawn", &mut scope);
        dispatcher.dispatch("spawn", &mut scope);

        assert_eq!(blackboard.get_int("CUBE_COUNT"), Ok(2));
    }

    #[test]
    fn test_fn_listener_sees_every_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(FnListener::new(move |name: &str, _: &mut PropertyScope<'_>| {
            sink.lock().unwrap().push(name.to_string());
        })));

        let mut blackboard = Blackboard::new();
        let mut scope = PropertyScope::new(&mut blackboard);
        dispatcher.dispatch("one", &mut scope);
        dispatcher.dispatch("two", &mut scope);

        assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
    }
}
