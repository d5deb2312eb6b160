//! Buffered event

use super::{EventSource, Listener, ListenerList, ListenerRef};
use crate::core::EngineError;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Event that buffers notifications until [`QueuedEvent::release`]
///
/// Arguments are owned by the queue until they are delivered.
pub struct QueuedEvent<A: 'static> {
    listeners: ListenerList<A>,
    queue: RefCell<VecDeque<A>>,
}

impl<A: 'static> Default for QueuedEvent<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> QueuedEvent<A> {
    /// Create an empty queued event
    pub fn new() -> Self {
        Self {
            listeners: ListenerList::default(),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    /// Number of buffered notifications
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Deliver every buffered argument to all listeners, oldest first
    ///
    /// Notifications queued while releasing are kept for the next release.
    /// If a listener fails, the undelivered arguments stay queued.
    pub fn release(&self) -> Result<(), EngineError> {
        let mut pending = std::mem::take(&mut *self.queue.borrow_mut());
        while let Some(arg) = pending.pop_front() {
            if let Err(err) = self.listeners.deliver(&arg) {
                let mut queue = self.queue.borrow_mut();
                while let Some(rest) = pending.pop_back() {
                    queue.push_front(rest);
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

impl<A: 'static> EventSource<A> for QueuedEvent<A> {
    fn attach_listener(&self, listener: ListenerRef<A>) {
        self.listeners.attach(&listener);
    }

    fn detach_listener(&self, listener: &ListenerRef<A>) -> bool {
        self.listeners.detach(listener)
    }

    fn notify(&self, arg: A) -> Result<(), EngineError> {
        self.queue.borrow_mut().push_back(arg);
        Ok(())
    }

    fn size(&self) -> usize {
        self.listeners.size()
    }
}

impl<A: Clone + 'static> Listener<A> for QueuedEvent<A> {
    fn handle(&mut self, arg: &A) -> Result<(), EngineError> {
        self.notify(arg.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FnListener;
    use std::rc::Rc;

    #[test]
    fn test_notifications_wait_for_release() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let event = QueuedEvent::<u32>::new();
        let listener = Rc::new(RefCell::new(FnListener::new(move |v: &u32| {
            sink.borrow_mut().push(*v);
            Ok(())
        })));
        event.attach(&listener);

        event.notify(1).unwrap();
        event.notify(2).unwrap();
        assert!(seen.borrow().is_empty());
        assert_eq!(event.queued(), 2);

        event.release().unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(event.queued(), 0);

        event.release().unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_release_delivers_each_argument_to_all_listeners_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let recorder = |name: &'static str| {
            let log = log.clone();
            Rc::new(RefCell::new(FnListener::new(move |v: &u32| -> Result<(), EngineError> {
                log.borrow_mut().push(format!("{}:{}", name, v));
                Ok(())
            })))
        };
        let a = recorder("a");
        let b = recorder("b");
        let event = QueuedEvent::<u32>::new();
        event.attach(&a);
        event.attach(&b);

        event.notify(1).unwrap();
        event.notify(2).unwrap();
        assert!(log.borrow().is_empty());
        event.release().unwrap();

        assert_eq!(*log.borrow(), vec!["a:1", "b:1", "a:2", "b:2"]);
    }

    #[test]
    fn test_failed_release_keeps_remaining_arguments() {
        let event = QueuedEvent::<u32>::new();
        let listener = Rc::new(RefCell::new(FnListener::new(|v: &u32| {
            if *v == 2 {
                Err(EngineError::Listener("two".to_string()))
            } else {
                Ok(())
            }
        })));
        event.attach(&listener);
        for v in 1..=4 {
            event.notify(v).unwrap();
        }

        assert!(event.release().is_err());
        // 1 and 2 were consumed; 3 and 4 are still waiting
        assert_eq!(event.queued(), 2);
    }
}
