//! # Open Engine
//!
//! A component based 3D engine core built around a scene graph.
//!
//! ## Features
//!
//! - **Scene Graph**: Typed scene nodes with deferred structural changes
//! - **Visitors**: Double dispatch over node kinds, per-kind strategies
//! - **Events**: Immediate, queued, switchable and thread-fed events
//! - **Engine Loop**: Modules ticked once per frame with frame time estimates
//! - **Rendering View**: Scene traversal emitting backend draw commands
//! - **Resources**: Extension-keyed model plugins
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use open_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let config = EngineConfig {
//!         max_frames: Some(60),
//!         ..EngineConfig::default()
//!     };
//!     let mut setup = SimpleSetup::new(config)?;
//!
//!     let root = SceneNode::group();
//!     let transformation = SceneNode::new(Transformation::default());
//!     transformation.add_node(&setup.load_model("cube.prim")?)?;
//!     root.add_node(&transformation)?;
//!     setup.set_scene(root);
//!
//!     setup.run()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod events;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod resources;
pub mod scene;
pub mod setup;

pub use setup::SimpleSetup;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineConfig, RendererConfig},
        core::{Engine, EngineError, Module, ProcessEventArg, TickEngine},
        events::{Event, EventSource, FnListener, Listener},
        foundation::math::{Mat4, Quat, Vec3},
        geometry::{Face, FaceSet, Material, Mesh},
        render::{CommandRecorder, DrawCommand, RenderBackend, Renderer, RenderingView, Viewport},
        resources::{ModelResource, ResourceManager},
        scene::{
            DotVisitor, NodeKind, NodeType, RenderState, RenderStateOptions, SceneError,
            SceneNode, SceneNodeVisitor, SearchTool, StrategyVisitor, Transformation,
            VisitResult,
        },
        SimpleSetup,
    };
}
