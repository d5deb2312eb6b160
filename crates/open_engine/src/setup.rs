//! Ready-made composition of engine, renderer, resources and scene

use crate::config::EngineConfig;
use crate::core::{Engine, EngineError, Module};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{CommandRecorder, Renderer, RenderingView};
use crate::resources::{PrimitiveModelPlugin, ResourceManager};
use crate::scene::SceneNode;
use nalgebra::Point3;
use std::cell::RefCell;
use std::rc::Rc;

/// Default camera position of the setup's rendering view
pub const DEFAULT_EYE: [f32; 3] = [0.0, 2.0, 10.0];

/// Engine, renderer, resource manager and scene root wired together
///
/// The renderer records its draw commands into a [`CommandRecorder`] and is
/// registered as an engine module. The scene root starts as an empty scene
/// node; replace it with [`SimpleSetup::set_scene`].
pub struct SimpleSetup {
    engine: Rc<Engine>,
    renderer: Rc<RefCell<Renderer<CommandRecorder>>>,
    resources: ResourceManager,
    scene: SceneNode,
}

impl SimpleSetup {
    /// Build the setup from `config`
    ///
    /// Fails when the renderer configuration names an unknown render option.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let mut view = RenderingView::from_config(&config.renderer)?;
        let eye = Point3::from(Vec3::from(DEFAULT_EYE));
        view.viewport_mut().view_matrix = Some(Mat4::look_at_rh(&eye, &Point3::origin(), &Vec3::y()));

        let scene = SceneNode::group();
        let mut renderer = Renderer::new(CommandRecorder::new());
        renderer.add_rendering_view(view);
        renderer.set_scene_root(scene.clone());
        let renderer = Rc::new(RefCell::new(renderer));

        let mut resources = ResourceManager::new();
        resources.add_plugin(PrimitiveModelPlugin);

        let engine = Rc::new(Engine::new(config));
        engine.add_module(&renderer);

        log::info!(
            "Simple setup ready: {} module(s), {} resource plugin(s)",
            engine.module_count(),
            resources.plugin_count()
        );

        Ok(Self {
            engine,
            renderer,
            resources,
            scene,
        })
    }

    /// The engine driving the setup
    pub fn engine(&self) -> &Rc<Engine> {
        &self.engine
    }

    /// The renderer module
    pub fn renderer(&self) -> &Rc<RefCell<Renderer<CommandRecorder>>> {
        &self.renderer
    }

    /// The resource manager
    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Mutable access to the resource manager
    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        &mut self.resources
    }

    /// Current scene root
    pub fn scene(&self) -> &SceneNode {
        &self.scene
    }

    /// Replace the scene root rendered every frame
    pub fn set_scene(&mut self, scene: SceneNode) {
        self.renderer.borrow_mut().set_scene_root(scene.clone());
        self.scene = scene;
    }

    /// Register an additional module with the engine
    ///
    /// The engine holds modules weakly; the caller keeps `module` alive.
    pub fn add_module<M: Module + 'static>(&self, module: &Rc<RefCell<M>>) {
        self.engine.add_module(module);
    }

    /// Create, load and return the scene node of the model named `file`
    pub fn load_model(&mut self, file: &str) -> Result<SceneNode, EngineError> {
        let model = self.resources.create(file)?;
        model.borrow_mut().load()?;
        let node = model.borrow().scene_node()?;
        Ok(node)
    }

    /// Run the engine until it is stopped or reaches its frame limit
    pub fn run(&self) -> Result<(), EngineError> {
        self.engine.start()
    }
}
