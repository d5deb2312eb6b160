//! Engine driven one frame at a time by a host loop

use super::{
    DeinitializeEventArg, EngineError, EngineEvents, InitializeEventArg, Module, ModuleRegistry,
    ProcessEventArg,
};
use crate::config::EngineConfig;
use crate::events::EventSource;
use crate::foundation::time::{FrameTimeEstimator, Timer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickState {
    Idle,
    Running,
    Stopping,
}

/// Engine whose frames are pumped by the caller
///
/// Useful when another framework owns the main loop (a windowing toolkit,
/// a test harness). `stop` only requests shutdown; the next `tick` fires
/// `deinitialize` and returns `false`.
pub struct TickEngine {
    events: EngineEvents,
    modules: ModuleRegistry,
    config: EngineConfig,
    state: Cell<TickState>,
    frame: Cell<u64>,
    estimator: RefCell<FrameTimeEstimator>,
    timer: RefCell<Timer>,
}

impl Default for TickEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TickEngine {
    /// Create an idle engine
    pub fn new(config: EngineConfig) -> Self {
        let estimator = FrameTimeEstimator::new(config.initial_frame_estimate_ms);
        Self {
            events: EngineEvents::default(),
            modules: ModuleRegistry::new(),
            config,
            state: Cell::new(TickState::Idle),
            frame: Cell::new(0),
            estimator: RefCell::new(estimator),
            timer: RefCell::new(Timer::new()),
        }
    }

    /// Fire `initialize`; ignored with a warning if already started
    pub fn start(&self) -> Result<(), EngineError> {
        if self.state.get() != TickState::Idle {
            log::warn!("Ignoring start request - engine already running.");
            return Ok(());
        }
        self.state.set(TickState::Running);
        self.frame.set(0);
        self.estimator
            .borrow_mut()
            .reset(self.config.initial_frame_estimate_ms);
        self.timer.borrow_mut().reset();

        if let Err(err) = self.events.initialize.notify(InitializeEventArg) {
            self.state.set(TickState::Idle);
            return Err(err);
        }
        Ok(())
    }

    /// Run one frame
    ///
    /// Returns `Ok(true)` if a frame was processed and `Ok(false)` once the
    /// engine has shut down (or was never started).
    pub fn tick(&self) -> Result<bool, EngineError> {
        match self.state.get() {
            TickState::Idle => {
                log::warn!("Ignoring tick - engine not started");
                Ok(false)
            }
            TickState::Stopping => {
                self.state.set(TickState::Idle);
                self.events.deinitialize.notify(DeinitializeEventArg)?;
                log::info!("Engine shutdown complete after {} frames", self.frame.get());
                Ok(false)
            }
            TickState::Running => {
                self.process_frame()?;
                Ok(true)
            }
        }
    }

    fn process_frame(&self) -> Result<(), EngineError> {
        let frame = self.frame.get();
        self.modules.prune(&self.events);
        let arg = ProcessEventArg {
            start: self.timer.borrow().last_frame(),
            approx: self.estimator.borrow().approx(),
            frame,
        };
        if let Err(err) = self.events.process.notify(arg) {
            self.state.set(TickState::Idle);
            return Err(err);
        }

        let mut timer = self.timer.borrow_mut();
        timer.update();
        self.estimator.borrow_mut().record(timer.delta_millis());
        self.frame.set(frame + 1);
        Ok(())
    }

    /// Request shutdown; the next `tick` fires `deinitialize`
    pub fn stop(&self) {
        if self.state.get() == TickState::Running {
            log::info!("Engine shutdown requested");
            self.state.set(TickState::Stopping);
        }
    }

    /// Whether frames are being processed
    pub fn is_running(&self) -> bool {
        self.state.get() == TickState::Running
    }

    /// Frames processed since the last start
    pub fn frame_count(&self) -> u64 {
        self.frame.get()
    }

    /// Lifecycle events
    pub fn events(&self) -> &EngineEvents {
        &self.events
    }

    /// Register a module; only a weak reference is kept
    pub fn add_module<M: Module + 'static>(&self, module: &Rc<RefCell<M>>) {
        self.modules.add(module, &self.events);
    }

    /// Unregister a module
    pub fn remove_module<M: Module + 'static>(&self, module: &Rc<RefCell<M>>) -> bool {
        self.modules.remove(module, &self.events)
    }

    /// Registered modules
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Live module registered under `name`
    pub fn module(&self, name: &str) -> Option<Rc<RefCell<dyn Module>>> {
        self.modules.find(name)
    }

    /// Names of the live modules, in registration order
    pub fn module_names(&self) -> Vec<String> {
        self.modules.names()
    }

    /// Number of live modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        calls: Vec<&'static str>,
    }

    impl Module for Probe {
        fn initialize(&mut self, _arg: &InitializeEventArg) -> Result<(), EngineError> {
            self.calls.push("init");
            Ok(())
        }

        fn process(&mut self, _arg: &ProcessEventArg) -> Result<(), EngineError> {
            self.calls.push("process");
            Ok(())
        }

        fn deinitialize(&mut self, _arg: &DeinitializeEventArg) -> Result<(), EngineError> {
            self.calls.push("deinit");
            Ok(())
        }
    }

    #[test]
    fn test_tick_lifecycle() {
        let engine = TickEngine::default();
        let probe = Rc::new(RefCell::new(Probe::default()));
        engine.add_module(&probe);

        assert!(!engine.tick().unwrap());
        engine.start().unwrap();
        assert!(engine.tick().unwrap());
        assert!(engine.tick().unwrap());
        engine.stop();
        assert!(!engine.is_running());
        assert!(!engine.tick().unwrap());
        assert!(!engine.tick().unwrap());

        assert_eq!(
            probe.borrow().calls,
            vec!["init", "process", "process", "deinit"]
        );
        assert_eq!(engine.frame_count(), 2);
    }

    #[test]
    fn test_double_start_is_ignored() {
        let engine = TickEngine::default();
        let probe = Rc::new(RefCell::new(Probe::default()));
        engine.add_module(&probe);

        engine.start().unwrap();
        engine.start().unwrap();
        assert_eq!(probe.borrow().calls, vec!["init"]);
    }

    #[test]
    fn test_default_module_name_is_type_name() {
        let engine = TickEngine::default();
        let probe = Rc::new(RefCell::new(Probe::default()));
        engine.add_module(&probe);
        let names = engine.module_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("Probe"));
        assert!(engine.module(&names[0]).is_some());
        assert!(engine.module("Missing").is_none());
    }

    #[test]
    fn test_dropped_module_is_not_counted() {
        let engine = TickEngine::default();
        let probe = Rc::new(RefCell::new(Probe::default()));
        engine.add_module(&probe);
        assert_eq!(engine.module_count(), 1);

        drop(probe);
        assert_eq!(engine.module_count(), 0);
        assert!(engine.module_names().is_empty());
    }
}
