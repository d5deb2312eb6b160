//! Node kinds and their payloads
//!
//! The set of node kinds is closed: [`NodeKind`] carries the payload and
//! [`NodeType`] is the payload-free tag used for dispatch and lookups.

mod blending;
mod light;
mod property;
mod render_state;
mod shape;
mod transformation;

pub use blending::{BlendEquation, BlendFactor, Blending};
pub use light::{DirectionalLight, Light, PointLight, SpotLight};
pub use property::{Properties, PropertyValue};
pub use render_state::{RenderState, RenderStateOptions};
pub use shape::{Geometry, MeshInstance, ModelInstance};
pub use transformation::Transformation;

use std::fmt;

/// Tag identifying a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    /// Plain grouping node
    Scene,
    /// Local transformation of the subtree
    Transformation,
    /// Explicit triangle list
    Geometry,
    /// Shared indexed mesh with a material
    Mesh,
    /// Several meshes forming one model
    Model,
    /// Render option overrides for the subtree
    RenderState,
    /// Blend function for the subtree
    Blending,
    /// Light at infinity
    DirectionalLight,
    /// Omnidirectional positional light
    PointLight,
    /// Cone-shaped positional light
    SpotLight,
    /// Key/value annotations
    Property,
}

impl NodeType {
    /// Every node type, in declaration order
    pub const ALL: [Self; 11] = [
        Self::Scene,
        Self::Transformation,
        Self::Geometry,
        Self::Mesh,
        Self::Model,
        Self::RenderState,
        Self::Blending,
        Self::DirectionalLight,
        Self::PointLight,
        Self::SpotLight,
        Self::Property,
    ];

    /// Node class name, e.g. `TransformationNode`
    pub fn name(self) -> &'static str {
        match self {
            Self::Scene => "SceneNode",
            Self::Transformation => "TransformationNode",
            Self::Geometry => "GeometryNode",
            Self::Mesh => "MeshNode",
            Self::Model => "ModelNode",
            Self::RenderState => "RenderStateNode",
            Self::Blending => "BlendingNode",
            Self::DirectionalLight => "DirectionalLightNode",
            Self::PointLight => "PointLightNode",
            Self::SpotLight => "SpotLightNode",
            Self::Property => "PropertyNode",
        }
    }

    /// Whether this is one of the light kinds
    pub fn is_light(self) -> bool {
        matches!(
            self,
            Self::DirectionalLight | Self::PointLight | Self::SpotLight
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node kind together with its payload
///
/// Cloning follows each payload's policy: face sets and properties are
/// copied, meshes and materials are shared.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    /// Plain grouping node
    #[default]
    Scene,
    /// Local transformation of the subtree
    Transformation(Transformation),
    /// Explicit triangle list
    Geometry(Geometry),
    /// Shared indexed mesh with a material
    Mesh(MeshInstance),
    /// Several meshes forming one model
    Model(ModelInstance),
    /// Render option overrides for the subtree
    RenderState(RenderState),
    /// Blend function for the subtree
    Blending(Blending),
    /// Light at infinity
    DirectionalLight(DirectionalLight),
    /// Omnidirectional positional light
    PointLight(PointLight),
    /// Cone-shaped positional light
    SpotLight(SpotLight),
    /// Key/value annotations
    Property(Properties),
}

impl NodeKind {
    /// Tag of this kind
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Scene => NodeType::Scene,
            Self::Transformation(_) => NodeType::Transformation,
            Self::Geometry(_) => NodeType::Geometry,
            Self::Mesh(_) => NodeType::Mesh,
            Self::Model(_) => NodeType::Model,
            Self::RenderState(_) => NodeType::RenderState,
            Self::Blending(_) => NodeType::Blending,
            Self::DirectionalLight(_) => NodeType::DirectionalLight,
            Self::PointLight(_) => NodeType::PointLight,
            Self::SpotLight(_) => NodeType::SpotLight,
            Self::Property(_) => NodeType::Property,
        }
    }

    /// Light parameters shared by every light kind
    pub fn light(&self) -> Option<&Light> {
        match self {
            Self::DirectionalLight(l) => Some(&l.light),
            Self::PointLight(l) => Some(&l.light),
            Self::SpotLight(l) => Some(&l.light),
            _ => None,
        }
    }

    /// Mutable light parameters shared by every light kind
    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match self {
            Self::DirectionalLight(l) => Some(&mut l.light),
            Self::PointLight(l) => Some(&mut l.light),
            Self::SpotLight(l) => Some(&mut l.light),
            _ => None,
        }
    }
}

/// A payload type that belongs to exactly one [`NodeKind`] variant
pub trait NodePayload: Sized + Into<NodeKind> {
    /// Tag of the variant holding this payload
    const NODE_TYPE: NodeType;

    /// Borrow the payload if `kind` is the matching variant
    fn from_kind(kind: &NodeKind) -> Option<&Self>;

    /// Mutably borrow the payload if `kind` is the matching variant
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

macro_rules! node_payload {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for NodeKind {
                fn from(payload: $payload) -> Self {
                    Self::$variant(payload)
                }
            }

            impl NodePayload for $payload {
                const NODE_TYPE: NodeType = NodeType::$variant;

                fn from_kind(kind: &NodeKind) -> Option<&Self> {
                    match kind {
                        NodeKind::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                    match kind {
                        NodeKind::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }
        )*
    };
}

node_payload! {
    Transformation => Transformation,
    Geometry => Geometry,
    MeshInstance => Mesh,
    ModelInstance => Model,
    RenderState => RenderState,
    Blending => Blending,
    DirectionalLight => DirectionalLight,
    PointLight => PointLight,
    SpotLight => SpotLight,
    Properties => Property,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_conversion_sets_type() {
        let kind: NodeKind = Transformation::new().into();
        assert_eq!(kind.node_type(), NodeType::Transformation);
        assert!(Transformation::from_kind(&kind).is_some());
        assert!(Geometry::from_kind(&kind).is_none());
        assert_eq!(NodeKind::default().node_type(), NodeType::Scene);
    }

    #[test]
    fn test_lights_share_base_parameters() {
        let mut kind: NodeKind = SpotLight::default().into();
        kind.light_mut().unwrap().active = false;
        assert!(!kind.light().unwrap().active);
        assert!(kind.node_type().is_light());
        assert!(NodeKind::Scene.light().is_none());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(NodeType::Scene.to_string(), "SceneNode");
        assert_eq!(NodeType::Property.name(), "PropertyNode");
        assert_eq!(NodeType::ALL.len(), 11);
    }
}
