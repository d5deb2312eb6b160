//! Draw commands emitted by rendering views
//!
//! Commands carry everything a backend needs: transforms are pushed as
//! matrices, state changes are explicit, and geometry is handed over by value
//! or through shared handles.

use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::{Face, Material, Mesh};
use crate::scene::{Blending, Light, NodeType};
use std::rc::Rc;

/// How polygons are rasterised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    /// Filled triangles
    Fill,
    /// Triangle outlines
    Line,
}

/// A single instruction for a render backend
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Start drawing a view; the model matrix stack is reset
    BeginView {
        /// Viewport width in pixels
        width: u32,
        /// Viewport height in pixels
        height: u32,
        /// World-to-view matrix
        view_matrix: Mat4,
    },

    /// Multiply the current model matrix by this one and push the result
    PushMatrix(Mat4),

    /// Restore the model matrix saved by the matching `PushMatrix`
    PopMatrix,

    /// Rasterisation mode for the following draws
    SetPolygonMode(PolygonMode),

    /// Whether back faces are culled for the following draws
    SetBackfaceCulling(bool),

    /// Enable blending with this function
    SetBlending(Blending),

    /// Return to the blending state in effect before the last `SetBlending`
    ResetBlending,

    /// Configure one light slot
    SetLight {
        /// Slot, counted per view in traversal order
        index: usize,
        /// Which light kind this is
        kind: NodeType,
        /// Light colors
        light: Light,
        /// Model matrix at the light node
        transform: Mat4,
    },

    /// Draw one triangle
    DrawFace {
        /// The triangle
        face: Face,
        /// Whether texturing is enabled
        textured: bool,
    },

    /// Draw an indexed mesh
    DrawMesh {
        /// Vertex data
        mesh: Rc<Mesh>,
        /// Surface description
        material: Rc<Material>,
        /// Whether texturing is enabled
        textured: bool,
    },

    /// Draw a debug line segment
    DrawLine {
        /// Start point
        from: Vec3,
        /// End point
        to: Vec3,
        /// RGB color
        color: Vec3,
    },
}

impl DrawCommand {
    /// Whether this command draws something, as opposed to changing state
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::DrawFace { .. } | Self::DrawMesh { .. } | Self::DrawLine { .. }
        )
    }
}

/// Batch of draw commands in submission order
#[derive(Debug, Clone, Default)]
pub struct CommandBatch {
    /// Commands to execute
    pub commands: Vec<DrawCommand>,
}

impl CommandBatch {
    /// Create a new empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Add a command to this batch
    pub fn add(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Get the number of commands in this batch
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all commands from this batch
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Commands in submission order
    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Number of commands that draw something
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }
}

impl<'a> IntoIterator for &'a CommandBatch {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
