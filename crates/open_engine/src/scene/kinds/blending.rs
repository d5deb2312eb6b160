//! Blending payload

/// Factor applied to the source or destination color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// (0, 0, 0, 0)
    Zero,
    /// (1, 1, 1, 1)
    One,
    /// Source color
    SrcColor,
    /// One minus source color
    OneMinusSrcColor,
    /// Destination color
    DstColor,
    /// One minus destination color
    OneMinusDstColor,
    /// Source alpha
    SrcAlpha,
    /// One minus source alpha
    OneMinusSrcAlpha,
    /// Destination alpha
    DstAlpha,
    /// One minus destination alpha
    OneMinusDstAlpha,
}

/// How the weighted source and destination are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    /// source + destination
    Add,
    /// source - destination
    Subtract,
    /// destination - source
    ReverseSubtract,
    /// Component-wise minimum
    Min,
    /// Component-wise maximum
    Max,
}

/// Blend function applied while drawing a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Blending {
    /// Source factor
    pub source: BlendFactor,
    /// Destination factor
    pub destination: BlendFactor,
    /// Combining equation
    pub equation: BlendEquation,
}

impl Default for Blending {
    /// Standard alpha blending
    fn default() -> Self {
        Self {
            source: BlendFactor::SrcAlpha,
            destination: BlendFactor::OneMinusSrcAlpha,
            equation: BlendEquation::Add,
        }
    }
}

impl Blending {
    /// Blend function from its parts
    pub fn new(source: BlendFactor, destination: BlendFactor, equation: BlendEquation) -> Self {
        Self {
            source,
            destination,
            equation,
        }
    }

    /// Additive blending, handy for particles and glows
    pub fn additive() -> Self {
        Self::new(BlendFactor::One, BlendFactor::One, BlendEquation::Add)
    }
}
