//! Change-listener registration.
//!
//! Stores hold a [`ListenerRegistry`] and call [`ListenerRegistry::notify`]
//! after every mutation. Renderers register closures; anything that prefers a
//! channel can register a [`BusListener`] instead.

use crate::bus::EventBus;

/// Receives change notifications from a store.
pub trait ChangeListener<M> {
    fn on_change(&mut self, change: &M);
}

impl<M, F> ChangeListener<M> for F
where
    F: FnMut(&M),
{
    fn on_change(&mut self, change: &M) {
        self(change)
    }
}

/// Handle returned by [`ListenerRegistry::subscribe`], used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered set of listeners, invoked in registration order.
pub struct ListenerRegistry<M> {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn ChangeListener<M>>)>,
}

impl<M> ListenerRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: ChangeListener<M> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, change: &M) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_change(change);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<M> Default for ListenerRegistry<M> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<M> core::fmt::Debug for ListenerRegistry<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Republishes every change onto an [`EventBus`].
#[derive(Debug)]
pub struct BusListener<B> {
    bus: B,
}

impl<B> BusListener<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<M, B> ChangeListener<M> for BusListener<B>
where
    M: Clone,
    B: EventBus<M>,
{
    fn on_change(&mut self, change: &M) {
        if let Err(error) = self.bus.publish(change.clone()) {
            tracing::warn!(?error, "failed to forward change to event bus");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::bus::EventBus;
    use crate::in_memory_bus::InMemoryEventBus;

    #[test]
    fn listeners_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::<u32>::new();

        let first = seen.clone();
        registry.subscribe(move |v: &u32| first.borrow_mut().push(("first", *v)));
        let second = seen.clone();
        registry.subscribe(move |v: &u32| second.borrow_mut().push(("second", *v)));

        registry.notify(&5);

        assert_eq!(*seen.borrow(), vec![("first", 5), ("second", 5)]);
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = ListenerRegistry::<u32>::new();
        let c = count.clone();
        let id = registry.subscribe(move |_: &u32| *c.borrow_mut() += 1);

        registry.notify(&1);
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify(&2);

        assert_eq!(*count.borrow(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn bus_listener_forwards_to_subscribers() {
        let bus = Arc::new(InMemoryEventBus::<String>::new());
        let sub = bus.subscribe();
        let mut registry = ListenerRegistry::<String>::new();
        registry.subscribe(BusListener::new(bus.clone()));

        registry.notify(&"changed".to_string());

        assert_eq!(sub.try_recv().unwrap(), "changed");
    }
}
