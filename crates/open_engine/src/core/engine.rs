//! Core engine implementation

use super::{EngineError, Module, ModuleRegistry};
use crate::config::EngineConfig;
use crate::events::{Event, EventSource};
use crate::foundation::time::{FrameTimeEstimator, Timer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// Argument of the initialize event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitializeEventArg;

/// Argument of the process event, fired once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessEventArg {
    /// When the frame started
    pub start: Instant,
    /// Average duration of the recent frames in milliseconds
    pub approx: u32,
    /// Zero-based frame number since the engine started
    pub frame: u64,
}

/// Argument of the deinitialize event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeinitializeEventArg;

/// The three lifecycle events shared by [`Engine`] and
/// [`TickEngine`](super::TickEngine)
#[derive(Default)]
pub struct EngineEvents {
    /// Fired once before the first frame
    pub initialize: Event<InitializeEventArg>,
    /// Fired once per frame
    pub process: Event<ProcessEventArg>,
    /// Fired once after the last frame
    pub deinitialize: Event<DeinitializeEventArg>,
}

/// Main engine struct
///
/// The engine owns the lifecycle events and runs a blocking loop that fires
/// `process` until [`Engine::stop`] is called. Listeners and modules may call
/// `stop` (or even `start`, which is then ignored) from inside a
/// notification, so every method takes `&self`.
pub struct Engine {
    events: EngineEvents,
    modules: ModuleRegistry,
    config: EngineConfig,
    running: Cell<bool>,
    frame: Cell<u64>,
    estimator: RefCell<FrameTimeEstimator>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Self {
        let estimator = FrameTimeEstimator::new(config.initial_frame_estimate_ms);
        Self {
            events: EngineEvents::default(),
            modules: ModuleRegistry::new(),
            config,
            running: Cell::new(false),
            frame: Cell::new(0),
            estimator: RefCell::new(estimator),
        }
    }

    /// Run the engine until [`Engine::stop`] is called
    ///
    /// Fires `initialize`, then `process` once per iteration, then
    /// `deinitialize`. Calling `start` while the engine is already running
    /// logs a warning and returns immediately. If a listener fails, the
    /// engine stops and the error is returned without firing `deinitialize`.
    pub fn start(&self) -> Result<(), EngineError> {
        if self.running.get() {
            log::warn!("Ignoring start request - engine already running.");
            return Ok(());
        }

        log::info!("Starting engine...");
        self.running.set(true);
        self.frame.set(0);
        self.estimator
            .borrow_mut()
            .reset(self.config.initial_frame_estimate_ms);

        let result = self.run();
        self.running.set(false);
        result?;

        log::info!("Engine shutdown complete after {} frames", self.frame.get());
        Ok(())
    }

    fn run(&self) -> Result<(), EngineError> {
        self.events.initialize.notify(InitializeEventArg)?;
        log::info!("Starting main loop...");
        self.main_loop()?;
        self.events.deinitialize.notify(DeinitializeEventArg)
    }

    fn main_loop(&self) -> Result<(), EngineError> {
        let mut timer = Timer::new();
        while self.running.get() {
            let frame = self.frame.get();
            if self.config.max_frames.is_some_and(|max| frame >= max) {
                log::info!("Reached configured frame limit ({frame}), stopping");
                self.running.set(false);
                break;
            }

            self.modules.prune(&self.events);
            let approx = self.estimator.borrow().approx();
            self.events.process.notify(ProcessEventArg {
                start: timer.last_frame(),
                approx,
                frame,
            })?;

            timer.update();
            self.estimator.borrow_mut().record(timer.delta_millis());
            self.frame.set(frame + 1);
        }
        Ok(())
    }

    /// Request engine shutdown; the loop exits before its next iteration
    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("Engine shutdown requested");
        }
    }

    /// Whether the main loop is active
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Frames processed by the current (or last) run
    pub fn frame_count(&self) -> u64 {
        self.frame.get()
    }

    /// Current rolling frame time estimate in milliseconds
    pub fn approx_frame_time(&self) -> u32 {
        self.estimator.borrow().approx()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lifecycle events, for attaching plain listeners
    pub fn events(&self) -> &EngineEvents {
        &self.events
    }

    /// Event fired once before the first frame
    pub fn initialize_event(&self) -> &Event<InitializeEventArg> {
        &self.events.initialize
    }

    /// Event fired once per frame
    pub fn process_event(&self) -> &Event<ProcessEventArg> {
        &self.events.process
    }

    /// Event fired once after the last frame
    pub fn deinitialize_event(&self) -> &Event<DeinitializeEventArg> {
        &self.events.deinitialize
    }

    /// Register a module; the engine keeps only a weak reference
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
