//! # Rendering
//!
//! Turns a scene graph into a stream of backend-neutral draw commands.
//!
//! ## Architecture
//!
//! ```text
//! Renderer (engine module, phase events)
//!      ↓ per frame, per view
//! RenderingView (scene visitor, render state stack)
//!      ↓ DrawCommand
//! RenderBackend (CommandRecorder, or a real graphics API)
//! ```
//!
//! The renderer never talks to a graphics API directly: everything it wants
//! drawn goes through [`RenderBackend::submit`].

mod backend;
mod commands;
mod renderer;
mod rendering_view;

pub use backend::{BackendResult, CommandRecorder, RenderBackend};
pub use commands::{CommandBatch, DrawCommand, PolygonMode};
pub use renderer::{Renderer, RendererEvents, RenderingEventArg};
pub use rendering_view::{RenderingView, Viewport};

use crate::scene::SceneError;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The renderer was started without a scene to draw
    #[error("No scene root set")]
    NoSceneRoot,

    /// The backend rejected a command
    #[error("Backend error: {0}")]
    Backend(String),

    /// The scene traversal failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
