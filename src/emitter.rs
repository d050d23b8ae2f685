//! Host-side event emitter owned by each element.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

pub type Callback = Rc<dyn Fn(&[Value])>;

/// Token identifying one registered callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Entry {
    subscription: Subscription,
    event: String,
    callback: Callback,
    once: bool,
}

#[derive(Default)]
pub struct EventEmitter {
    entries: RefCell<Vec<Entry>>,
    next: Cell<u64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: &str, callback: impl Fn(&[Value]) + 'static) -> Subscription {
        self.register(event, Rc::new(callback), false)
    }

    /// Register a callback removed after its first delivery.
    pub fn once(&self, event: &str, callback: impl Fn(&[Value]) + 'static) -> Subscription {
        self.register(event, Rc::new(callback), true)
    }

    pub fn off(&self, subscription: Subscription) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.subscription != subscription);
        entries.len() != before
    }

    /// Deliver `data` to every callback registered for `event`, in registration order.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, event: &str, data: &[Value]) -> usize {
        let callbacks: Vec<Callback> = {
            let mut entries = self.entries.borrow_mut();
            let matched: Vec<Callback> = entries
                .iter()
                .filter(|entry| entry.event == event)
                .map(|entry| Rc::clone(&entry.callback))
                .collect();
            entries.retain(|entry| !(entry.once && entry.event == event));
            matched
        };
        for callback in &callbacks {
            callback(data);
        }
        callbacks.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.event == event)
            .count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn register(&self, event: &str, callback: Callback, once: bool) -> Subscription {
        let subscription = Subscription(self.next.get());
        self.next.set(subscription.0 + 1);
        self.entries.borrow_mut().push(Entry {
            subscription,
            event: event.to_string(),
            callback,
            once,
        });
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_once_fires_a_single_time() {
        let emitter = EventEmitter::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        emitter.once("click", move |_| counter.set(counter.get() + 1));

        assert_eq!(emitter.emit("click", &[]), 1);
        assert_eq!(emitter.emit("click", &[]), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_off_removes_only_that_callback() {
        let emitter = EventEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let seen = Rc::clone(&seen);
            emitter.on("close", move |data| seen.borrow_mut().push(("first", data.to_vec())))
        };
        {
            let seen = Rc::clone(&seen);
            emitter.on("close", move |data| seen.borrow_mut().push(("second", data.to_vec())));
        }

        assert!(emitter.off(first));
        assert!(!emitter.off(first));
        emitter.emit("close", &[json!(true)]);
        assert_eq!(*seen.borrow(), vec![("second", vec![json!(true)])]);
    }

    #[test]
    fn test_callback_may_subscribe_during_emit() {
        let emitter = Rc::new(EventEmitter::new());
        let inner = Rc::clone(&emitter);
        emitter.on("focus", move |_| {
            inner.on("blur", |_| {});
        });
        emitter.emit("focus", &[]);
        assert_eq!(emitter.listener_count("blur"), 1);
    }
}
