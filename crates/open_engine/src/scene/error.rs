//! Scene graph errors

use thiserror::Error;

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The node to attach is already attached elsewhere
    #[error("{node} already has a parent")]
    MultipleParents {
        /// Type name of the offending node
        node: &'static str,
    },

    /// The node to attach is the target itself or one of its ancestors
    #[error("Attaching {node} would create a cycle")]
    Cycle {
        /// Type name of the offending node
        node: &'static str,
    },

    /// A property value could not be converted
    #[error("Cannot convert property value '{value}' to {target}")]
    PropertyConversion {
        /// The value as text
        value: String,
        /// Requested type
        target: &'static str,
    },

    /// A visitor aborted the traversal
    #[error("Traversal aborted: {0}")]
    Traversal(String),
}
