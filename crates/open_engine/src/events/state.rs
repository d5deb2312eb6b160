//! Switchable event

use super::{Event, EventSource, Listener, ListenerRef};
use crate::core::EngineError;
use std::cell::Cell;

/// Immediate event that can be switched off
///
/// While off, notifications are dropped rather than delivered later.
/// New state events start switched on.
pub struct StateEvent<A: 'static> {
    inner: Event<A>,
    state: Cell<bool>,
}

impl<A: 'static> Default for StateEvent<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> StateEvent<A> {
    /// Create an event that is switched on
    pub fn new() -> Self {
        Self {
            inner: Event::new(),
            state: Cell::new(true),
        }
    }

    /// Resume delivering notifications
    pub fn on(&self) {
        self.state.set(true);
    }

    /// Drop notifications until switched on again
    pub fn off(&self) {
        self.state.set(false);
    }

    /// Flip the state
    pub fn toggle(&self) {
        self.state.set(!self.state.get());
    }

    /// Whether notifications are currently delivered
    pub fn state(&self) -> bool {
        self.state.get()
    }
}

impl<A: 'static> EventSource<A> for StateEvent<A> {
    fn attach_listener(&self, listener: ListenerRef<A>) {
        self.inner.attach_listener(listener);
    }

    fn detach_listener(&self, listener: &ListenerRef<A>) -> bool {
        self.inner.detach_listener(listener)
    }

    fn notify(&self, arg: A) -> Result<(), EngineError> {
        if !self.state.get() {
            return Ok(());
        }
        self.inner.notify(arg)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }
}

impl<A: Clone + 'static> Listener<A> for StateEvent<A> {
    fn handle(&mut self, arg: &A) -> Result<(), EngineError> {
        self.notify(arg.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FnListener;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_off_drops_notifications() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let event = StateEvent::<()>::new();
        let listener = Rc::new(RefCell::new(FnListener::new(move |_: &()| {
            counter.set(counter.get() + 1);
            Ok(())
        })));
        event.attach(&listener);
        assert!(event.state());

        event.notify(()).unwrap();
        event.off();
        event.notify(()).unwrap();
        assert_eq!(count.get(), 1);

        event.toggle();
        assert!(event.state());
        event.notify(()).unwrap();
        assert_eq!(count.get(), 2);
    }
}
