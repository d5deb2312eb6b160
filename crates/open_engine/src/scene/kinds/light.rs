//! Light payloads
//!
//! Every light kind embeds the shared [`Light`] parameters.

use crate::foundation::math::Vec4;

/// Parameters common to every light
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Whether the light contributes to the scene
    pub active: bool,
    /// Ambient color (RGBA)
    pub ambient: Vec4,
    /// Diffuse color (RGBA)
    pub diffuse: Vec4,
    /// Specular color (RGBA)
    pub specular: Vec4,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            active: true,
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

/// Light at infinity shining along the node's -Z axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalLight {
    /// Shared light parameters
    pub light: Light,
}

/// Omnidirectional light at the node's origin
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Shared light parameters
    pub light: Light,
    /// Constant attenuation term
    pub constant_attenuation: f32,
    /// Linear attenuation term
    pub linear_attenuation: f32,
    /// Quadratic attenuation term
    pub quadratic_attenuation: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            light: Light::default(),
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
        }
    }
}

impl PointLight {
    /// Intensity factor at `distance` from the light
    pub fn attenuation_at(&self, distance: f32) -> f32 {
        attenuation(
            self.constant_attenuation,
            self.linear_attenuation,
            self.quadratic_attenuation,
            distance,
        )
    }
}

/// Cone light at the node's origin shining along its -Z axis
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    /// Shared light parameters
    pub light: Light,
    /// Constant attenuation term
    pub constant_attenuation: f32,
    /// Linear attenuation term
    pub linear_attenuation: f32,
    /// Quadratic attenuation term
    pub quadratic_attenuation: f32,
    /// Half-angle of the cone in degrees; 180 lights every direction
    pub cutoff: f32,
    /// Intensity falloff towards the cone edge
    pub exponent: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            light: Light::default(),
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
            cutoff: 180.0,
            exponent: 0.0,
        }
    }
}

impl SpotLight {
    /// Intensity factor at `distance` from the light, ignoring the cone
    pub fn attenuation_at(&self, distance: f32) -> f32 {
        attenuation(
            self.constant_attenuation,
            self.linear_attenuation,
            self.quadratic_attenuation,
            distance,
        )
    }
}

fn attenuation(constant: f32, linear: f32, quadratic: f32, distance: f32) -> f32 {
    let denominator = constant + linear * distance + quadratic * distance * distance;
    if denominator <= f32::EPSILON {
        1.0
    } else {
        1.0 / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_point_light_does_not_attenuate() {
        let light = PointLight::default();
        assert!(light.light.active);
        assert_relative_eq!(light.attenuation_at(10.0), 1.0);
    }

    #[test]
    fn test_quadratic_attenuation() {
        let light = SpotLight {
            constant_attenuation: 1.0,
            quadratic_attenuation: 1.0,
            ..SpotLight::default()
        };
        assert_relative_eq!(light.attenuation_at(3.0), 0.1);
        assert_relative_eq!(light.cutoff, 180.0);
    }
}
