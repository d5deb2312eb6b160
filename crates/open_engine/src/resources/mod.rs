//! Model resources and the plugin-based resource manager
//!
//! A [`ResourceManager`] maps file names to [`ModelResource`]s through
//! extension-keyed [`ModelPlugin`]s. Created resources are cached by file
//! name, so asking twice for the same model returns the same handle. Loading
//! is explicit: a resource only yields a scene node after [`ModelResource::load`].
//!
//! File parsing lives in plugins. The crate ships [`PrimitiveModelPlugin`],
//! which builds cube and triangle geometry for `*.prim` names.

mod primitive;

pub use primitive::{Primitive, PrimitiveModelPlugin, PrimitiveResource};

use crate::scene::SceneNode;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Resource errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResourceError {
    /// No registered plugin accepts the file's extension
    #[error("No plugin accepts '{0}'")]
    NoPlugin(String),

    /// The resource was queried before being loaded
    #[error("Resource not loaded: {0}")]
    NotLoaded(String),

    /// The plugin failed to load the resource
    #[error("Failed to load resource: {0}")]
    Load(String),
}

/// Shared handle to a model resource
pub type ModelResourcePtr = Rc<RefCell<dyn ModelResource>>;

/// A model that can be turned into a scene subtree
pub trait ModelResource {
    /// Load the model data
    fn load(&mut self) -> Result<(), ResourceError>;

    /// Release the model data; loading again must be possible afterwards
    fn unload(&mut self);

    /// Root of the loaded model's subtree
    fn scene_node(&self) -> Result<SceneNode, ResourceError>;
}

/// Factory for model resources of some file format
pub trait ModelPlugin {
    /// Whether files with extension `ext` (without the dot) are handled
    fn accepts(&self, ext: &str) -> bool;

    /// Create an unloaded resource for `path`
    fn create(&self, path: &Path) -> Result<ModelResourcePtr, ResourceError>;
}

/// Plugin registry, search path list and model cache
#[derive(Default)]
pub struct ResourceManager {
    plugins: Vec<Box<dyn ModelPlugin>>,
    paths: VecDeque<PathBuf>,
    models: HashMap<String, ModelResourcePtr>,
}

impl ResourceManager {
    /// Empty manager with no plugins
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model plugin; earlier plugins take precedence
    pub fn add_plugin(&mut self, plugin: impl ModelPlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Search `dir` after the existing search paths
    pub fn append_path(&mut self, dir: impl Into<PathBuf>) {
        self.paths.push_back(dir.into());
    }

    /// Search `dir` before the existing search paths
    pub fn prepend_path(&mut self, dir: impl Into<PathBuf>) {
        self.paths.push_front(dir.into());
    }

    /// Whether `dir` is already a search path
    pub fn is_in_path(&self, dir: impl AsRef<Path>) -> bool {
        self.paths.iter().any(|p| p == dir.as_ref())
    }

    /// Locate `file` in the search paths
    ///
    /// When several directories contain the file the first one wins and the
    /// ambiguity is logged.
    pub fn find_file_in_path(&self, file: &str) -> Option<PathBuf> {
        let mut candidates = self
            .paths
            .iter()
            .map(|dir| dir.join(file))
            .filter(|candidate| candidate.exists());

        let first = candidates.next()?;
        let others: Vec<_> = candidates.collect();
        if !others.is_empty() {
            log::warn!(
                "Found more than one file matching '{}', using {} (also {:?})",
                file,
                first.display(),
                others
            );
        }
        Some(first)
    }

    /// Create (or fetch the cached) model resource for `file`
    ///
    /// The file is resolved through the search paths and used as given when
    /// no search path contains it. The plugin is chosen by extension.
    pub fn create(&mut self, file: &str) -> Result<ModelResourcePtr, ResourceError> {
        if let Some(model) = self.models.get(file) {
            return Ok(Rc::clone(model));
        }

        let path = self
            .find_file_in_path(file)
            .unwrap_or_else(|| PathBuf::from(file));
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let plugin = self
            .plugins
            .iter()
            .find(|plugin| plugin.accepts(&ext))
            .ok_or_else(|| ResourceError::NoPlugin(file.to_string()))?;

        let model = plugin.create(&path)?;
        log::debug!("Created model resource for {}", path.display());
        self.models.insert(file.to_string(), Rc::clone(&model));
        Ok(model)
    }

    /// Number of cached model resources
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Drop every cached model handle
    pub fn clear_cache(&mut self) {
        self.models.clear();
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("plugins", &self.plugins.len())
            .field("paths", &self.paths)
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}
