//! Geometry data carried by scene nodes
//!
//! Pure data: triangles with per-vertex attributes ([`Face`], [`FaceSet`]),
//! indexed meshes ([`Mesh`]) and surface [`Material`]s. Nothing here knows
//! about a rendering backend.

mod face;
mod material;
mod mesh;

pub use face::{Face, FaceSet};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
