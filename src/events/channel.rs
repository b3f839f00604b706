use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

struct Listeners<T> {
    callbacks: RefCell<BTreeMap<SubscriptionId, Callback<T>>>,
    next_id: Cell<SubscriptionId>,
}

/// Sending half of a [`Channel`].
pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Receiving half of a [`Channel`].
pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Handle returned by `subscribe`; drops the listener when `unsubscribe` is called.
pub struct Unsubscriber<T: std::fmt::Debug> {
    channel: Channel<T>,
    id: SubscriptionId,
}

impl<T: std::fmt::Debug> Unsubscriber<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn unsubscribe(self) -> bool {
        self.channel.unsubscribe(self.id)
    }
}

/// Single-threaded fan-out of events to subscribed callbacks, in subscription order.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<Listeners<T>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(Listeners {
                callbacks: RefCell::new(BTreeMap::new()),
                next_id: Cell::new(0),
            }),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));
        Unsubscriber {
            channel: self.clone(),
            id,
        }
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.callbacks.borrow_mut().remove(&id).is_some()
    }

    fn emit(&self, data: &T) {
        // listeners may subscribe or unsubscribe while being notified
        let snapshot: Vec<Callback<T>> = self
            .listeners
            .callbacks
            .borrow()
            .values()
            .cloned()
            .collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", snapshot.len(), data);
        for listener in snapshot {
            listener(data);
        }
    }

    fn listener_count(&self) -> usize {
        self.listeners.callbacks.borrow().len()
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: T) {
        self.channel.emit(&data);
    }

    pub fn has_listeners(&self) -> bool {
        self.channel.listener_count() > 0
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameEvent;

    #[test]
    fn test_listeners_receive_events_in_subscription_order() {
        let (emitter, observer) = Channel::<GameEvent>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = seen.clone();
        let _a = observer.subscribe(move |event| {
            if let GameEvent::MarkedCountChanged(count) = event {
                first.borrow_mut().push(("first", *count));
            }
        });
        let second = seen.clone();
        let _b = observer.subscribe(move |event| {
            if let GameEvent::MarkedCountChanged(count) = event {
                second.borrow_mut().push(("second", *count));
            }
        });

        emitter.emit(GameEvent::MarkedCountChanged(3));
        assert_eq!(*seen.borrow(), vec![("first", 3), ("second", 3)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let (emitter, observer) = Channel::<GameEvent>::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        let subscription = observer.subscribe(move |_| counter_clone.set(counter_clone.get() + 1));
        emitter.emit(GameEvent::MarkedCountChanged(1));
        assert!(emitter.has_listeners());

        assert!(subscription.unsubscribe());
        emitter.emit(GameEvent::MarkedCountChanged(2));
        assert_eq!(counter.get(), 1);
        assert!(!emitter.has_listeners());
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let (emitter, observer) = Channel::<GameEvent>::new();
        let counter = Rc::new(Cell::new(0));
        let observer_clone = observer.clone();
        let counter_clone = counter.clone();

        let _outer = observer.subscribe(move |_| {
            let inner_counter = counter_clone.clone();
            let _ = observer_clone.subscribe(move |_| inner_counter.set(inner_counter.get() + 1));
        });

        emitter.emit(GameEvent::MarkedCountChanged(1));
        assert_eq!(counter.get(), 0);
        emitter.emit(GameEvent::MarkedCountChanged(2));
        assert_eq!(counter.get(), 1);
    }
}
