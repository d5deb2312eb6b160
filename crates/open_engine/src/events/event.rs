//! Immediate event

use super::{EventSource, Listener, ListenerList, ListenerRef};
use crate::core::EngineError;

/// Event that delivers each notification to its listeners immediately
pub struct Event<A: 'static> {
    listeners: ListenerList<A>,
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Event<A> {
    /// Create an event with no listeners
    pub fn new() -> Self {
        Self {
            listeners: ListenerList::default(),
        }
    }
}

impl<A: 'static> EventSource<A> for Event<A> {
    fn attach_listener(&self, listener: ListenerRef<A>) {
        self.listeners.attach(&listener);
    }

    fn detach_listener(&self, listener: &ListenerRef<A>) -> bool {
        self.listeners.detach(listener)
    }

    fn notify(&self, arg: A) -> Result<(), EngineError> {
        self.listeners.deliver(&arg)
    }

    fn size(&self) -> usize {
        self.listeners.size()
    }
}

impl<A: Clone + 'static> Listener<A> for Event<A> {
    fn handle(&mut self, arg: &A) -> Result<(), EngineError> {
        self.notify(arg.clone())
    }
}
