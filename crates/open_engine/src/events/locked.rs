//! Thread-safe queued event and queue

use super::Listener;
use crate::core::EngineError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type SharedListener<A> = Arc<Mutex<dyn Listener<A> + Send>>;

struct LockedState<A> {
    listeners: Vec<Weak<Mutex<dyn Listener<A> + Send>>>,
    queue: VecDeque<A>,
}

/// Queued event whose listener list and queue are guarded by a mutex
///
/// Worker threads may `notify` concurrently; `release` is expected to run on
/// the thread that owns the listeners (usually the engine loop). The lock is
/// not held while listeners run, so a listener may notify the same event.
pub struct LockedQueuedEvent<A: Send + 'static> {
    state: Mutex<LockedState<A>>,
}

impl<A: Send + 'static> Default for LockedQueuedEvent<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Send + 'static> LockedQueuedEvent<A> {
    /// Create an empty event
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LockedState {
                listeners: Vec::new(),
                queue: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LockedState<A>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a listener at the end of the delivery order
    pub fn attach<L: Listener<A> + Send + 'static>(&self, listener: &Arc<Mutex<L>>) {
        let listener: SharedListener<A> = listener.clone();
        self.lock().listeners.push(Arc::downgrade(&listener));
    }

    /// Detach the first attachment of `listener`
    pub fn detach<L: Listener<A> + Send + 'static>(&self, listener: &Arc<Mutex<L>>) -> bool {
        let target = Arc::as_ptr(listener).cast::<()>();
        let mut state = self.lock();
        match state
            .listeners
            .iter()
            .position(|weak| weak.as_ptr().cast::<()>() == target)
        {
            Some(index) => {
                state.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Buffer a notification
    pub fn notify(&self, arg: A) {
        self.lock().queue.push_back(arg);
    }

    /// Number of live listeners
    pub fn size(&self) -> usize {
        let mut state = self.lock();
        state.listeners.retain(|weak| weak.strong_count() > 0);
        state.listeners.len()
    }

    /// Number of buffered notifications
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// Deliver every buffered argument to all listeners, oldest first
    ///
    /// Each argument reaches every listener before the next one is
    /// delivered. If a listener fails, the undelivered arguments are put back
    /// in front of anything notified meanwhile.
    pub fn release(&self) -> Result<(), EngineError> {
        let (mut pending, listeners) = {
            let mut state = self.lock();
            state.listeners.retain(|weak| weak.strong_count() > 0);
            let listeners: Vec<SharedListener<A>> =
                state.listeners.iter().filter_map(Weak::upgrade).collect();
            (std::mem::take(&mut state.queue), listeners)
        };

        while let Some(arg) = pending.pop_front() {
            let delivered = listeners.iter().try_for_each(|listener| {
                listener
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handle(&arg)
            });
            if let Err(err) = delivered {
                let mut state = self.lock();
                while let Some(rest) = pending.pop_back() {
                    state.queue.push_front(rest);
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

impl<A: Clone + Send + 'static> Listener<A> for LockedQueuedEvent<A> {
    fn handle(&mut self, arg: &A) -> Result<(), EngineError> {
        self.notify(arg.clone());
        Ok(())
    }
}

/// Mutex-guarded FIFO queue for handing values between threads
pub struct LockedQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for LockedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LockedQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a value
    pub fn put(&self, item: T) {
        self.lock().push_back(item);
    }

    /// Take the oldest value, if any
    pub fn get(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Whether the queue holds no values
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FnListener;
    use std::thread;

    #[test]
    fn test_locked_queue_is_fifo() {
        let queue = LockedQueue::new();
        assert!(queue.is_empty());
        queue.put(1);
        queue.put(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.get(), Some(1));
        assert_eq!(queue.get(), Some(2));
        assert_eq!(queue.get(), None);
    }

    #[test]
    fn test_notify_from_worker_threads() {
        let event = Arc::new(LockedQueuedEvent::<u32>::new());
        let total = Arc::new(Mutex::new(0u32));
        let sink = total.clone();
        let listener = Arc::new(Mutex::new(FnListener::new(move |v: &u32| {
            *sink.lock().unwrap() += *v;
            Ok(())
        })));
        event.attach(&listener);

        let workers: Vec<_> = (1..=4)
            .map(|v| {
                let event = event.clone();
                thread::spawn(move || event.notify(v))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(event.queued(), 4);
        assert_eq!(*total.lock().unwrap(), 0);
        event.release().unwrap();
        assert_eq!(*total.lock().unwrap(), 10);
        assert_eq!(event.queued(), 0);
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Mutex<impl Listener<u32> + Send>> {
        let log = log.clone();
        Arc::new(Mutex::new(FnListener::new(move |v: &u32| -> Result<(), EngineError> {
            log.lock().unwrap().push(format!("{}:{}", name, v));
            Ok(())
        })))
    }

    #[test]
    fn test_release_delivers_each_argument_to_all_listeners_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let event = LockedQueuedEvent::<u32>::new();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        event.attach(&a);
        event.attach(&b);

        event.notify(1);
        event.notify(2);
        event.release().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "a:2", "b:2"]);
    }

    #[test]
    fn test_failed_release_keeps_remaining_arguments() {
        let event = LockedQueuedEvent::<u32>::new();
        let listener = Arc::new(Mutex::new(FnListener::new(|v: &u32| {
            if *v == 2 {
                Err(EngineError::Listener("two".to_string()))
            } else {
                Ok(())
            }
        })));
        event.attach(&listener);
        for v in 1..=4 {
            event.notify(v);
        }

        assert!(event.release().is_err());
        // 1 and 2 were consumed; 3 and 4 are still waiting
        assert_eq!(event.queued(), 2);

        event.notify(5);
        let log = Arc::new(Mutex::new(Vec::new()));
        event.detach(&listener);
        let tail = recorder("t", &log);
        event.attach(&tail);
        event.release().unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["t:3", "t:4", "t:5"]);
    }

    #[test]
    fn test_detach_locked_listener() {
        let event = LockedQueuedEvent::<u32>::new();
        let listener = Arc::new(Mutex::new(FnListener::new(|_: &u32| Ok(()))));
        event.attach(&listener);
        assert_eq!(event.size(), 1);
        assert!(event.detach(&listener));
        assert_eq!(event.size(), 0);
    }
}
