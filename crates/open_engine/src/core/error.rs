//! Engine-level errors

use crate::config::ConfigError;
use crate::render::RenderError;
use crate::resources::ResourceError;
use crate::scene::SceneError;
use thiserror::Error;

/// Engine-level errors
///
/// Listener and module failures surface as this type; subsystem errors are
/// wrapped so `?` works across layers.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A listener reported a failure
    #[error("Listener failed: {0}")]
    Listener(String),

    /// A module reported a failure
    #[error("Module '{module}' failed: {reason}")]
    Module {
        /// Name of the failing module
        module: String,
        /// What went wrong
        reason: String,
    },

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Resource error
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
