//! Engine modules and their registry

use super::{DeinitializeEventArg, EngineError, EngineEvents, InitializeEventArg, ProcessEventArg};
use crate::events::{EventSource, Listener};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A participant in the engine lifecycle
///
/// Implement this trait for anything that should run once per frame:
/// renderers, input pollers, game logic. Register it with
/// [`Engine::add_module`](super::Engine::add_module); the engine only keeps
/// a weak reference, so dropping the last `Rc` unregisters the module.
pub trait Module {
    /// Name used in logs and for lookup
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once before the first frame
    fn initialize(&mut self, _arg: &InitializeEventArg) -> Result<(), EngineError> {
        Ok(())
    }

    /// Called once per frame
    fn process(&mut self, arg: &ProcessEventArg) -> Result<(), EngineError>;

    /// Called once after the last frame
    fn deinitialize(&mut self, _arg: &DeinitializeEventArg) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Forwards the three engine events to one module
struct ModuleHook {
    module: Weak<RefCell<dyn Module>>,
}

impl ModuleHook {
    fn with_module(
        &self,
        phase: &str,
        call: impl FnOnce(&mut dyn Module) -> Result<(), EngineError>,
    ) -> Result<(), EngineError> {
        let Some(shared) = self.module.upgrade() else {
            return Ok(());
        };
        let Ok(mut module) = shared.try_borrow_mut() else {
            log::warn!("Skipping {phase} for a module that is already borrowed");
            return Ok(());
        };
        call(&mut *module)
    }
}

impl Listener<InitializeEventArg> for ModuleHook {
    fn handle(&mut self, arg: &InitializeEventArg) -> Result<(), EngineError> {
        self.with_module("initialize", |module| module.initialize(arg))
    }
}

impl Listener<ProcessEventArg> for ModuleHook {
    fn handle(&mut self, arg: &ProcessEventArg) -> Result<(), EngineError> {
        self.with_module("process", |module| module.process(arg))
    }
}

impl Listener<DeinitializeEventArg> for ModuleHook {
    fn handle(&mut self, arg: &DeinitializeEventArg) -> Result<(), EngineError> {
        self.with_module("deinitialize", |module| module.deinitialize(arg))
    }
}

struct ModuleEntry {
    name: String,
    module: Weak<RefCell<dyn Module>>,
    hook: Rc<RefCell<ModuleHook>>,
}

impl ModuleEntry {
    fn is_alive(&self) -> bool {
        self.module.strong_count() > 0
    }
}

/// Registered modules, in registration order
///
/// Each module is attached to the engine events through a hook owned by the
/// registry. The registry never owns the module itself.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: RefCell<Vec<ModuleEntry>>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` and attach it to all three engine events
    pub fn add<M: Module + 'static>(&self, module: &Rc<RefCell<M>>, events: &EngineEvents) {
        let name = module.borrow().name().to_string();
        let module: Rc<RefCell<dyn Module>> = module.clone();
        let hook = Rc::new(RefCell::new(ModuleHook {
            module: Rc::downgrade(&module),
        }));
        events.initialize.attach(&hook);
        events.process.attach(&hook);
        events.deinitialize.attach(&hook);
        log::debug!("Registered module '{name}'");
        self.entries.borrow_mut().push(ModuleEntry {
            name,
            module: Rc::downgrade(&module),
            hook,
        });
    }

    /// Unregister `module`; returns whether it was registered
    pub fn remove<M: Module + 'static>(&self, module: &Rc<RefCell<M>>, events: &EngineEvents) -> bool {
        let target = Rc::as_ptr(module).cast::<()>();
        let entry = {
            let mut entries = self.entries.borrow_mut();
            let Some(index) = entries
                .iter()
                .position(|entry| entry.module.as_ptr().cast::<()>() == target)
            else {
                return false;
            };
            entries.remove(index)
        };
        Self::detach(&entry, events);
        log::debug!("Removed module '{}'", entry.name);
        true
    }

    fn detach(entry: &ModuleEntry, events: &EngineEvents) {
        events.initialize.detach(&entry.hook);
        events.process.detach(&entry.hook);
        events.deinitialize.detach(&entry.hook);
    }

    /// Drop entries whose module no longer exists
    pub fn prune(&self, events: &EngineEvents) {
        let dead: Vec<ModuleEntry> = {
            let mut entries = self.entries.borrow_mut();
            let (alive, dead): (Vec<_>, Vec<_>) = std::mem::take(&mut *entries)
                .into_iter()
                .partition(ModuleEntry::is_alive);
            *entries = alive;
            dead
        };
        for entry in &dead {
            Self::detach(entry, events);
            log::debug!("Module '{}' was dropped, unregistering", entry.name);
        }
    }

    /// Find a live module by name
    pub fn find(&self, name: &str) -> Option<Rc<RefCell<dyn Module>>> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.name == name)
            .find_map(|entry| entry.module.upgrade())
    }

    /// Names of the live modules in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.is_alive())
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Number of live modules
    pub fn len(&self) -> usize {
        self.entries.borrow().iter().filter(|entry| entry.is_alive()).count()
    }

    /// Whether no live module is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct Counter {
        frames: u32,
    }

    impl Module for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn process(&mut self, _arg: &ProcessEventArg) -> Result<(), EngineError> {
            self.frames += 1;
            Ok(())
        }
    }

    fn frame() -> ProcessEventArg {
        ProcessEventArg {
            start: Instant::now(),
            approx: 50,
            frame: 0,
        }
    }

    #[test]
    fn test_registered_module_receives_process() {
        let events = EngineEvents::default();
        let registry = ModuleRegistry::new();
        let counter = Rc::new(RefCell::new(Counter { frames: 0 }));
        registry.add(&counter, &events);

        events.process.notify(frame()).unwrap();
        events.process.notify(frame()).unwrap();
        assert_eq!(counter.borrow().frames, 2);
        assert_eq!(registry.names(), vec!["counter".to_string()]);
        assert!(registry.find("counter").is_some());
    }

    #[test]
    fn test_remove_module_detaches_hooks() {
        let events = EngineEvents::default();
        let registry = ModuleRegistry::new();
        let counter = Rc::new(RefCell::new(Counter { frames: 0 }));
        registry.add(&counter, &events);
        assert!(registry.remove(&counter, &events));
        assert!(!registry.remove(&counter, &events));

        events.process.notify(frame()).unwrap();
        assert_eq!(counter.borrow().frames, 0);
        assert_eq!(events.process.size(), 0);
    }

    #[test]
    fn test_dropped_module_is_pruned() {
        let events = EngineEvents::default();
        let registry = ModuleRegistry::new();
        let counter = Rc::new(RefCell::new(Counter { frames: 0 }));
        registry.add(&counter, &events);
        drop(counter);

        assert_eq!(registry.len(), 0);
        registry.prune(&events);
        assert!(registry.is_empty());
        assert_eq!(events.process.size(), 0);
        events.process.notify(frame()).unwrap();
    }
}
