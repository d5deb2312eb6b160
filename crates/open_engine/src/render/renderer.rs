//! Renderer module

use super::{RenderBackend, RenderError, RenderingView};
use crate::core::{DeinitializeEventArg, EngineError, InitializeEventArg, Module, ProcessEventArg};
use crate::events::{Event, EventSource};
use crate::scene::SceneNode;

/// Argument of the renderer phase events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderingEventArg {
    /// Engine frame being rendered
    pub frame: u64,
    /// Average frame duration in milliseconds
    pub approx: u32,
}

impl From<&ProcessEventArg> for RenderingEventArg {
    fn from(arg: &ProcessEventArg) -> Self {
        Self {
            frame: arg.frame,
            approx: arg.approx,
        }
    }
}

/// Phase events of a renderer
#[derive(Default)]
pub struct RendererEvents {
    /// Fired once after the renderer has validated its scene
    pub initialize: Event<RenderingEventArg>,
    /// Fired every frame before any view is drawn
    pub pre_process: Event<RenderingEventArg>,
    /// Fired every frame after all views were drawn
    pub process: Event<RenderingEventArg>,
    /// Fired every frame after `process`
    pub post_process: Event<RenderingEventArg>,
    /// Fired once when the engine shuts down
    pub deinitialize: Event<RenderingEventArg>,
}

/// Engine module that draws a scene through its rendering views
///
/// Each frame runs `pre_process`, draws every view into the backend between
/// `begin_frame` and `end_frame`, then runs `process` and `post_process`.
pub struct Renderer<B: RenderBackend> {
    root: Option<SceneNode>,
    views: Vec<RenderingView>,
    backend: B,
    events: RendererEvents,
    frames: u64,
}

impl<B: RenderBackend> Renderer<B> {
    /// Renderer without a scene or views
    pub fn new(backend: B) -> Self {
        Self {
            root: None,
            views: Vec::new(),
            backend,
            events: RendererEvents::default(),
            frames: 0,
        }
    }

    /// Set the scene to draw
    pub fn set_scene_root(&mut self, root: SceneNode) {
        self.root = Some(root);
    }

    /// Scene being drawn
    pub fn scene_root(&self) -> Option<&SceneNode> {
        self.root.as_ref()
    }

    /// Draw the scene through another view as well
    pub fn add_rendering_view(&mut self, view: RenderingView) {
        self.views.push(view);
    }

    /// Views in draw order
    pub fn rendering_views(&self) -> &[RenderingView] {
        &self.views
    }

    /// Mutable views, e.g. to move a camera between frames
    pub fn rendering_views_mut(&mut self) -> &mut [RenderingView] {
        &mut self.views
    }

    /// Backend receiving the draw commands
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Phase events
    pub fn events(&self) -> &RendererEvents {
        &self.events
    }

    /// Number of frames drawn
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw one frame of `root` through every view
    pub fn render_frame(&mut self, arg: RenderingEventArg) -> Result<(), EngineError> {
        let root = self.root.clone().ok_or(RenderError::NoSceneRoot)?;

        self.events.pre_process.notify(arg)?;
        self.backend.begin_frame()?;
        for view in &self.views {
            view.render(&mut self.backend, &root)?;
        }
        self.backend.end_frame()?;
        self.frames += 1;
        self.events.process.notify(arg)?;
        self.events.post_process.notify(arg)
    }
}

impl<B: RenderBackend> Module for Renderer<B> {
    fn name(&self) -> &str {
        "Renderer"
    }

    fn initialize(&mut self, _arg: &InitializeEventArg) -> Result<(), EngineError> {
        if self.root.is_none() {
            log::error!("No scene root found.");
            return Err(RenderError::NoSceneRoot.into());
        }
        log::info!("Renderer initialized with {} rendering views", self.views.len());
        self.events.initialize.notify(RenderingEventArg::default())
    }

    fn process(&mut self, arg: &ProcessEventArg) -> Result<(), EngineError> {
        self.render_frame(arg.into())
    }

    fn deinitialize(&mut self, _arg: &DeinitializeEventArg) -> Result<(), EngineError> {
        log::info!("Renderer shutting down after {} frames", self.frames);
        self.events.deinitialize.notify(RenderingEventArg {
            frame: self.frames,
            approx: 0,
        })
    }
}
