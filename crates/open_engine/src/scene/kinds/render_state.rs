//! Render state payload

use bitflags::bitflags;

bitflags! {
    /// Render options a render state node can switch on or off
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderStateOptions: u32 {
        /// Texture mapping
        const TEXTURE        = 1 << 0;
        /// Shader programs
        const SHADER         = 1 << 1;
        /// Render back faces (culling off)
        const BACKFACE       = 1 << 2;
        /// Lighting calculations
        const LIGHTING       = 1 << 3;
        /// Depth testing
        const DEPTH_TEST     = 1 << 4;
        /// Wireframe polygons
        const WIREFRAME      = 1 << 5;
        /// Draw the vertex normals
        const SOFT_NORMAL    = 1 << 6;
        /// Draw the face normals
        const HARD_NORMAL    = 1 << 7;
        /// Generate normals automatically
        const AUTO_NORMAL    = 1 << 8;
        /// Draw the binormals
        const BINORMAL       = 1 << 9;
        /// Draw the tangents
        const TANGENT        = 1 << 10;
        /// Vertex colors drive the material
        const COLOR_MATERIAL = 1 << 11;
    }
}

/// Explicit option overrides for a subtree
///
/// An option is either enabled, disabled, or inherited from the enclosing
/// state; it is never both enabled and disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderState {
    enabled: RenderStateOptions,
    disabled: RenderStateOptions,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    /// State that inherits every option
    pub fn new() -> Self {
        Self {
            enabled: RenderStateOptions::empty(),
            disabled: RenderStateOptions::empty(),
        }
    }

    /// State enabling `options` and inheriting the rest
    pub fn enabling(options: RenderStateOptions) -> Self {
        let mut state = Self::new();
        state.enable(options);
        state
    }

    /// Explicitly enabled options
    pub fn enabled(&self) -> RenderStateOptions {
        self.enabled
    }

    /// Explicitly disabled options
    pub fn disabled(&self) -> RenderStateOptions {
        self.disabled
    }

    /// Enable `options`, overriding any earlier disable
    pub fn enable(&mut self, options: RenderStateOptions) {
        self.disabled.remove(options);
        self.enabled.insert(options);
    }

    /// Disable `options`, overriding any earlier enable
    pub fn disable(&mut self, options: RenderStateOptions) {
        self.enabled.remove(options);
        self.disabled.insert(options);
    }

    /// Stop overriding `options`
    pub fn inherit(&mut self, options: RenderStateOptions) {
        self.enabled.remove(options);
        self.disabled.remove(options);
    }

    /// Disable `options` if all of them are enabled, otherwise enable them
    pub fn toggle(&mut self, options: RenderStateOptions) {
        if self.is_enabled(options) {
            self.disable(options);
        } else {
            self.enable(options);
        }
    }

    /// Whether every option in `options` is explicitly enabled
    pub fn is_enabled(&self, options: RenderStateOptions) -> bool {
        self.enabled.contains(options)
    }

    /// Whether every option in `options` is explicitly disabled
    pub fn is_disabled(&self, options: RenderStateOptions) -> bool {
        self.disabled.contains(options)
    }

    /// Swap enabled and disabled options in place
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.enabled, &mut self.disabled);
    }

    /// Copy with enabled and disabled options swapped
    pub fn inverse(&self) -> Self {
        Self {
            enabled: self.disabled,
            disabled: self.enabled,
        }
    }

    /// Overrides present here but not in `other`
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            enabled: self.enabled - other.enabled,
            disabled: self.disabled - other.disabled,
        }
    }

    /// This state followed by `other`; `other` wins on conflicts
    pub fn combined(&self, other: &Self) -> Self {
        Self {
            enabled: (self.enabled - other.disabled) | other.enabled,
            disabled: (self.disabled - other.enabled) | other.disabled,
        }
    }

    /// Effective options when applied on top of `inherited`
    pub fn apply_to(&self, inherited: RenderStateOptions) -> RenderStateOptions {
        (inherited | self.enabled) - self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_and_disable_are_exclusive() {
        let mut state = RenderState::new();
        state.enable(RenderStateOptions::WIREFRAME | RenderStateOptions::LIGHTING);
        state.disable(RenderStateOptions::LIGHTING);
        assert!(state.is_enabled(RenderStateOptions::WIREFRAME));
        assert!(!state.is_enabled(RenderStateOptions::LIGHTING));
        assert!(state.is_disabled(RenderStateOptions::LIGHTING));

        state.inherit(RenderStateOptions::LIGHTING);
        assert!(!state.is_disabled(RenderStateOptions::LIGHTING));
        assert!(state.enabled().intersection(state.disabled()).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut state = RenderState::new();
        state.toggle(RenderStateOptions::TEXTURE);
        assert!(state.is_enabled(RenderStateOptions::TEXTURE));
        state.toggle(RenderStateOptions::TEXTURE);
        assert!(state.is_disabled(RenderStateOptions::TEXTURE));
    }

    #[test]
    fn test_inverse_and_difference() {
        let mut state = RenderState::enabling(RenderStateOptions::SHADER);
        state.disable(RenderStateOptions::BACKFACE);
        let inverse = state.inverse();
        assert!(inverse.is_enabled(RenderStateOptions::BACKFACE));
        assert!(inverse.is_disabled(RenderStateOptions::SHADER));

        let mut inverted = state;
        inverted.invert();
        assert_eq!(inverted, inverse);

        let other = RenderState::enabling(RenderStateOptions::SHADER);
        let diff = state.difference(&other);
        assert!(diff.enabled().is_empty());
        assert_eq!(diff.disabled(), RenderStateOptions::BACKFACE);
    }

    #[test]
    fn test_combined_prefers_later_state() {
        let base = RenderState::enabling(RenderStateOptions::LIGHTING);
        let mut overlay = RenderState::new();
        overlay.disable(RenderStateOptions::LIGHTING);
        let combined = base.combined(&overlay);
        assert!(combined.is_disabled(RenderStateOptions::LIGHTING));
        assert!(!combined.is_enabled(RenderStateOptions::LIGHTING));
    }

    #[test]
    fn test_apply_to_inherits_unset_options() {
        let mut state = RenderState::enabling(RenderStateOptions::WIREFRAME);
        state.disable(RenderStateOptions::TEXTURE);
        let inherited = RenderStateOptions::TEXTURE | RenderStateOptions::SHADER;
        assert_eq!(
            state.apply_to(inherited),
            RenderStateOptions::SHADER | RenderStateOptions::WIREFRAME
        );
    }
}
