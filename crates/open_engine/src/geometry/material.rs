//! Surface material

use crate::foundation::math::Vec4;

/// Fixed-function style surface description
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Name for logs and lookups
    pub name: String,
    /// Ambient reflectance (RGBA)
    pub ambient: Vec4,
    /// Diffuse reflectance (RGBA)
    pub diffuse: Vec4,
    /// Specular reflectance (RGBA)
    pub specular: Vec4,
    /// Emitted color (RGBA)
    pub emission: Vec4,
    /// Specular exponent
    pub shininess: f32,
    /// Resource name of the diffuse texture, if any
    pub texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            texture: None,
        }
    }
}

impl Material {
    /// Named material with default reflectance
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: set the diffuse color
    pub fn with_diffuse(mut self, diffuse: Vec4) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Builder pattern: set the diffuse texture
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }
}
