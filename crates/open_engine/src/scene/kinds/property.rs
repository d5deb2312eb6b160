//! Property payload

use crate::scene::SceneError;
use std::collections::BTreeMap;
use std::fmt;

/// A single annotation value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Integer value
    Int(i32),
    /// Floating point value
    Float(f32),
    /// Text value
    Str(String),
}

impl PropertyValue {
    /// Integer view; floats are truncated, text is rejected
    pub fn as_int(&self) -> Result<i32, SceneError> {
        match self {
            Self::Int(v) => Ok(*v),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(v) => Ok(*v as i32),
            Self::Str(s) => Err(SceneError::PropertyConversion {
                value: s.clone(),
                target: "int",
            }),
        }
    }

    /// Float view; text is rejected
    pub fn as_float(&self) -> Result<f32, SceneError> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Ok(*v as f32),
            Self::Float(v) => Ok(*v),
            Self::Str(s) => Err(SceneError::PropertyConversion {
                value: s.clone(),
                target: "float",
            }),
        }
    }

    /// Text view of any value
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Strict comparison: the variant and the value must both match
    pub fn matches(&self, other: &Self) -> bool {
        self == other
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Ordered key/value annotations attached to a property node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, PropertyValue>,
}

impl Properties {
    /// No properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add one property
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or overwrite a property
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Whether `key` is present
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove and return a property
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    /// Whether `key` is present with exactly `value`
    pub fn matches(&self, key: &str, value: &PropertyValue) -> bool {
        self.get(key).is_some_and(|v| v.matches(value))
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no properties
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
