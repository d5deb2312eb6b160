//! Event/listener system
//!
//! Events deliver a typed argument to every attached [`Listener`] in
//! attachment order. Listeners are held non-owning: an event never keeps a
//! listener alive, and listeners that have been dropped are pruned on the
//! next delivery.
//!
//! - [`Event`] delivers immediately on `notify`
//! - [`QueuedEvent`] buffers arguments until `release`
//! - [`StateEvent`] drops notifications while switched off
//! - [`LockedQueuedEvent`] and [`LockedQueue`] can be fed from other threads
//!
//! Every event is itself a listener of its argument type, so events can be
//! chained into each other.

mod event;
mod locked;
mod queued;
mod state;

pub use event::Event;
pub use locked::{LockedQueue, LockedQueuedEvent};
pub use queued::QueuedEvent;
pub use state::StateEvent;

use crate::core::EngineError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receiver of event notifications
///
/// Returning an error stops the current delivery; listeners attached after
/// the failing one are not invoked and the error is returned from `notify`.
///
/// A listener is not re-entrant: if handling a notification triggers another
/// delivery to the same listener (directly or through chained events), that
/// inner delivery fails with [`EngineError::Listener`] instead of reaching
/// the listener a second time.
pub trait Listener<A> {
    /// Handle one notification
    fn handle(&mut self, arg: &A) -> Result<(), EngineError>;
}

/// Listener backed by a closure
///
/// ```rust
/// use open_engine::events::{Event, EventSource, FnListener};
/// use std::{cell::RefCell, rc::Rc};
///
/// let event = Event::<u32>::new();
/// let listener = Rc::new(RefCell::new(FnListener::new(|value: &u32| {
///     assert_eq!(*value, 7);
///     Ok(())
/// })));
/// event.attach(&listener);
/// event.notify(7).unwrap();
/// ```
pub struct FnListener<F> {
    callback: F,
}

impl<F> FnListener<F> {
    /// Wrap a closure as a listener
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<A, F> Listener<A> for FnListener<F>
where
    F: FnMut(&A) -> Result<(), EngineError>,
{
    fn handle(&mut self, arg: &A) -> Result<(), EngineError> {
        (self.callback)(arg)
    }
}

/// Shared-handle listener as stored by single-threaded events
pub type ListenerRef<A> = Rc<RefCell<dyn Listener<A>>>;

/// Common interface of the single-threaded events
pub trait EventSource<A: 'static> {
    /// Attach a type-erased listener at the end of the delivery order
    fn attach_listener(&self, listener: ListenerRef<A>);

    /// Detach the first attachment of `listener`; returns whether one was found
    fn detach_listener(&self, listener: &ListenerRef<A>) -> bool;

    /// Deliver (or buffer) a notification
    fn notify(&self, arg: A) -> Result<(), EngineError>;

    /// Number of live listeners
    fn size(&self) -> usize;

    /// Attach a listener
    fn attach<L: Listener<A> + 'static>(&self, listener: &Rc<RefCell<L>>)
    where
        Self: Sized,
    {
        let listener: ListenerRef<A> = listener.clone();
        self.attach_listener(listener);
    }

    /// Detach a listener previously attached with [`EventSource::attach`]
    fn detach<L: Listener<A> + 'static>(&self, listener: &Rc<RefCell<L>>) -> bool
    where
        Self: Sized,
    {
        let listener: ListenerRef<A> = listener.clone();
        self.detach_listener(&listener)
    }
}

/// Ordered, non-owning listener storage shared by the event types
pub(crate) struct ListenerList<A: 'static> {
    listeners: RefCell<Vec<Weak<RefCell<dyn Listener<A>>>>>,
}

impl<A: 'static> Default for ListenerList<A> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<A: 'static> ListenerList<A> {
    pub(crate) fn attach(&self, listener: &ListenerRef<A>) {
        self.listeners.borrow_mut().push(Rc::downgrade(listener));
    }

    pub(crate) fn detach(&self, listener: &ListenerRef<A>) -> bool {
        let target = Rc::as_ptr(listener).cast::<()>();
        let mut listeners = self.listeners.borrow_mut();
        match listeners
            .iter()
            .position(|weak| weak.as_ptr().cast::<()>() == target)
        {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.prune();
        self.listeners.borrow().len()
    }

    fn prune(&self) {
        self.listeners
            .borrow_mut()
            .retain(|weak| weak.strong_count() > 0);
    }

    /// Live listeners in attachment order, taken before delivery starts so
    /// listeners may attach or detach while being notified
    fn snapshot(&self) -> Vec<ListenerRef<A>> {
        self.prune();
        self.listeners
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    pub(crate) fn deliver(&self, arg: &A) -> Result<(), EngineError> {
        for listener in self.snapshot() {
            // A listener that re-triggers an event it is subscribed to is
            // still borrowed by the outer delivery.
            let Ok(mut guard) = listener.try_borrow_mut() else {
                log::warn!("Re-entrant delivery to a listener that is already handling an event");
                return Err(EngineError::Listener(
                    "re-entrant delivery to a listener that is already handling an event".to_string(),
                ));
            };
            guard.handle(arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every argument it receives into a shared log
    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Listener<u32> for Recorder {
        fn handle(&mut self, arg: &u32) -> Result<(), EngineError> {
            self.log.borrow_mut().push(format!("{}:{}", self.name, arg));
            Ok(())
        }
    }

    #[test]
    fn test_fn_listener_receives_argument() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let event = Event::<u32>::new();
        let listener = Rc::new(RefCell::new(FnListener::new(move |value: &u32| {
            sink.borrow_mut().push(*value);
            Ok(())
        })));
        event.attach(&listener);
        event.notify(3).unwrap();
        event.notify(4).unwrap();
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    /// Notifies the event it is attached to from inside its own handler
    struct Echo {
        event: Rc<Event<u32>>,
        calls: u32,
        inner: Option<Result<(), String>>,
    }

    impl Listener<u32> for Echo {
        fn handle(&mut self, arg: &u32) -> Result<(), EngineError> {
            self.calls += 1;
            if *arg == 1 {
                self.inner = Some(self.event.notify(2).map_err(|err| err.to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_reentrant_delivery_is_reported() {
        let event = Rc::new(Event::<u32>::new());
        let echo = Rc::new(RefCell::new(Echo {
            event: event.clone(),
            calls: 0,
            inner: None,
        }));
        event.attach(&echo);

        event.notify(1).unwrap();

        let echo = echo.borrow();
        assert_eq!(echo.calls, 1);
        assert!(matches!(echo.inner, Some(Err(_))));
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let event = Event::<u32>::new();
        {
            let listener = Rc::new(RefCell::new(Recorder { name: "a", log: log.clone() }));
            event.attach(&listener);
            assert_eq!(event.size(), 1);
        }
        assert_eq!(event.size(), 0);
        event.notify(1).unwrap();
        assert!(log.borrow().is_empty());
    }
}
