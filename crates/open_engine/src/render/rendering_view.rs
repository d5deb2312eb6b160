//! Scene traversal that emits draw commands

use super::{BackendResult, DrawCommand, PolygonMode, RenderBackend, RenderError};
use crate::config::{ConfigError, RendererConfig};
use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::Face;
use crate::scene::{
    Blending, DirectionalLight, Geometry, MeshInstance, ModelInstance, NodePayload, PointLight,
    RenderState, RenderStateOptions, SceneError, SceneNode, SceneNodeVisitor, SpotLight,
    Transformation, VisitResult,
};

/// Region of the output and the camera looking through it
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// World-to-view matrix; views without one are not drawn
    pub view_matrix: Option<Mat4>,
}

impl Viewport {
    /// Viewport of the given size without a camera
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            view_matrix: None,
        }
    }

    /// Builder pattern: set the view matrix
    pub fn with_view_matrix(mut self, view_matrix: Mat4) -> Self {
        self.view_matrix = Some(view_matrix);
        self
    }
}

/// Draws a scene into one viewport
///
/// Render state nodes override the options inherited from their ancestors;
/// the options at the root come from the view's base state.
#[derive(Debug, Clone)]
pub struct RenderingView {
    viewport: Viewport,
    base_options: RenderStateOptions,
}

impl RenderingView {
    /// View with texturing, shaders and back faces enabled
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            base_options: RenderStateOptions::TEXTURE
                | RenderStateOptions::SHADER
                | RenderStateOptions::BACKFACE,
        }
    }

    /// View sized and configured from renderer settings
    pub fn from_config(config: &RendererConfig) -> Result<Self, ConfigError> {
        let mut base_options = RenderStateOptions::empty();
        for name in &config.default_options {
            let option = RenderStateOptions::from_name(name).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "renderer.default_options".to_string(),
                    value: name.clone(),
                }
            })?;
            base_options |= option;
        }
        Ok(Self {
            viewport: Viewport::new(config.width, config.height),
            base_options,
        })
    }

    /// Viewport drawn by this view
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport, e.g. to move the camera
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Options in effect at the root of the scene
    pub fn base_options(&self) -> RenderStateOptions {
        self.base_options
    }

    /// Replace the options in effect at the root of the scene
    pub fn set_base_options(&mut self, options: RenderStateOptions) {
        self.base_options = options;
    }

    /// Emit the commands for `root` to `backend`
    ///
    /// Does nothing when the viewport has no view matrix.
    pub fn render(&self, backend: &mut dyn RenderBackend, root: &SceneNode) -> Result<(), RenderError> {
        let Some(view_matrix) = self.viewport.view_matrix else {
            log::debug!("Skipping view without a view matrix");
            return Ok(());
        };
        backend.submit(DrawCommand::BeginView {
            width: self.viewport.width,
            height: self.viewport.height,
            view_matrix,
        })?;

        let mut pass = RenderPass {
            backend,
            options: vec![self.base_options],
            matrices: vec![Mat4::identity()],
            lights: 0,
            failure: None,
        };
        let result = root.accept(&mut pass);
        if let Some(failure) = pass.failure.take() {
            return Err(failure);
        }
        result.map_err(RenderError::from)
    }
}

/// State of one traversal
struct RenderPass<'a> {
    backend: &'a mut dyn RenderBackend,
    options: Vec<RenderStateOptions>,
    matrices: Vec<Mat4>,
    lights: usize,
    failure: Option<RenderError>,
}

impl RenderPass<'_> {
    fn is_set(&self, option: RenderStateOptions) -> bool {
        self.options
            .last()
            .is_some_and(|options| options.contains(option))
    }

    fn model_matrix(&self) -> Mat4 {
        self.matrices.last().copied().unwrap_or_else(Mat4::identity)
    }

    fn submit(&mut self, command: DrawCommand) -> VisitResult {
        let result = self.backend.submit(command);
        self.forward(result)
    }

    /// Park a backend failure and abort the traversal
    fn forward(&mut self, result: BackendResult<()>) -> VisitResult {
        result.map_err(|err| {
            let reason = err.to_string();
            self.failure = Some(err);
            SceneError::Traversal(reason)
        })
    }

    fn apply_surface_state(&mut self) -> VisitResult {
        let mode = if self.is_set(RenderStateOptions::WIREFRAME) {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        };
        self.submit(DrawCommand::SetPolygonMode(mode))?;
        let culling = !self.is_set(RenderStateOptions::BACKFACE);
        self.submit(DrawCommand::SetBackfaceCulling(culling))
    }

    fn draw_face(&mut self, face: &Face) -> VisitResult {
        let textured = self.is_set(RenderStateOptions::TEXTURE);
        self.submit(DrawCommand::DrawFace {
            face: face.clone(),
            textured,
        })?;

        if self.is_set(RenderStateOptions::BINORMAL) {
            for vert in &face.vert {
                self.draw_line(*vert, face.binormal, Vec3::new(0.0, 1.0, 1.0))?;
            }
        }
        if self.is_set(RenderStateOptions::TANGENT) {
            for vert in &face.vert {
                self.draw_line(*vert, face.tangent, Vec3::new(1.0, 0.0, 0.0))?;
            }
        }
        if self.is_set(RenderStateOptions::SOFT_NORMAL) {
            for (vert, norm) in face.vert.iter().zip(&face.norm) {
                self.draw_line(*vert, *norm, Vec3::new(0.0, 1.0, 0.0))?;
            }
        }
        if self.is_set(RenderStateOptions::HARD_NORMAL) {
            self.draw_line(face.center(), face.hard_norm, Vec3::new(1.0, 0.0, 1.0))?;
        }
        Ok(())
    }

    fn draw_line(&mut self, from: Vec3, direction: Vec3, color: Vec3) -> VisitResult {
        self.submit(DrawCommand::DrawLine {
            from,
            to: from + direction,
            color,
        })
    }

    fn draw_mesh(&mut self, instance: &MeshInstance) -> VisitResult {
        let textured = self.is_set(RenderStateOptions::TEXTURE);
        self.submit(DrawCommand::DrawMesh {
            mesh: instance.mesh.clone(),
            material: instance.material.clone(),
            textured,
        })
    }

    fn set_light<T: NodePayload>(&mut self, node: &SceneNode) -> VisitResult {
        let light = node.kind().light().filter(|light| light.active).cloned();
        if let Some(light) = light {
            let command = DrawCommand::SetLight {
                index: self.lights,
                kind: T::NODE_TYPE,
                light,
                transform: self.model_matrix(),
            };
            self.lights += 1;
            self.submit(command)?;
        }
        node.visit_sub_nodes(self)
    }
}

impl SceneNodeVisitor for RenderPass<'_> {
    fn visit_render_state_node(&mut self, node: &SceneNode) -> VisitResult {
        let inherited = self
            .options
            .last()
            .copied()
            .unwrap_or(RenderStateOptions::empty());
        let state = node.payload::<RenderState>().map(|state| *state).unwrap_or_default();
        self.options.push(state.apply_to(inherited));
        let result = node.visit_sub_nodes(self);
        self.options.pop();
        result
    }

    fn visit_transformation_node(&mut self, node: &SceneNode) -> VisitResult {
        let local = node
            .payload::<Transformation>()
            .map_or_else(Mat4::identity, |t| t.matrix());
        self.submit(DrawCommand::PushMatrix(local))?;
        self.matrices.push(self.model_matrix() * local);
        let result = node.visit_sub_nodes(self);
        self.matrices.pop();
        result?;
        self.submit(DrawCommand::PopMatrix)
    }

    fn visit_geometry_node(&mut self, node: &SceneNode) -> VisitResult {
        self.apply_surface_state()?;
        let faces = node
            .payload::<Geometry>()
            .map(|geometry| geometry.faces.clone())
            .unwrap_or_default();
        for face in &faces {
            self.draw_face(face)?;
        }
        node.visit_sub_nodes(self)
    }

    fn visit_mesh_node(&mut self, node: &SceneNode) -> VisitResult {
        self.apply_surface_state()?;
        let instance = node.payload::<MeshInstance>().map(|m| MeshInstance::clone(&m));
        if let Some(instance) = instance {
            self.draw_mesh(&instance)?;
        }
        node.visit_sub_nodes(self)
    }

    fn visit_model_node(&mut self, node: &SceneNode) -> VisitResult {
        self.apply_surface_state()?;
        let parts = node
            .payload::<ModelInstance>()
            .map(|model| model.parts.clone())
            .unwrap_or_default();
        for part in &parts {
            self.draw_mesh(part)?;
        }
        node.visit_sub_nodes(self)
    }

    fn visit_blending_node(&mut self, node: &SceneNode) -> VisitResult {
        let blending = node.payload::<Blending>().map(|b| *b).unwrap_or_default();
        self.submit(DrawCommand::SetBlending(blending))?;
        node.visit_sub_nodes(self)?;
        self.submit(DrawCommand::ResetBlending)
    }

    fn visit_directional_light_node(&mut self, node: &SceneNode) -> VisitResult {
        self.set_light::<DirectionalLight>(node)
    }

    fn visit_point_light_node(&mut self, node: &SceneNode) -> VisitResult {
        self.set_light::<PointLight>(node)
    }

    fn visit_spot_light_node(&mut self, node: &SceneNode) -> VisitResult {
        self.set_light::<SpotLight>(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FaceSet, Material, Mesh};
    use crate::render::CommandRecorder;
    use std::rc::Rc;

    fn camera() -> Viewport {
        Viewport::new(320, 240).with_view_matrix(Mat4::identity())
    }

    fn triangle_node() -> SceneNode {
        let mut faces = FaceSet::new();
        faces.add(Face::new(Vec3::zeros(), Vec3::x(), Vec3::y()));
        SceneNode::new(Geometry::new(faces))
    }

    fn render(root: &SceneNode) -> Vec<DrawCommand> {
        let mut recorder = CommandRecorder::new();
        RenderingView::new(camera()).render(&mut recorder, root).unwrap();
        recorder.take().commands
    }

    #[test]
    fn test_view_without_camera_is_skipped() {
        let mut recorder = CommandRecorder::new();
        RenderingView::new(Viewport::new(1, 1))
            .render(&mut recorder, &triangle_node())
            .unwrap();
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn test_transformation_brackets_children() {
        let root = SceneNode::new(Transformation::new().with_position(Vec3::new(1.0, 2.0, 3.0)));
        root.add_node(&triangle_node()).unwrap();

        let commands = render(&root);
        assert!(matches!(commands[0], DrawCommand::BeginView { width: 320, height: 240, .. }));
        assert!(matches!(commands[1], DrawCommand::PushMatrix(m) if m[(0, 3)] == 1.0));
        assert!(matches!(commands[2], DrawCommand::SetPolygonMode(PolygonMode::Fill)));
        // back faces are rendered by default
        assert!(matches!(commands[3], DrawCommand::SetBackfaceCulling(false)));
        assert!(matches!(commands[4], DrawCommand::DrawFace { textured: true, .. }));
        assert!(matches!(commands[5], DrawCommand::PopMatrix));
        assert_eq!(commands.len(), 6);
    }

    #[test]
    fn test_render_state_is_scoped() {
        let root = SceneNode::group();
        let mut state = RenderState::new();
        state.enable(RenderStateOptions::WIREFRAME | RenderStateOptions::HARD_NORMAL);
        state.disable(RenderStateOptions::BACKFACE | RenderStateOptions::TEXTURE);
        let wire = SceneNode::new(state);
        wire.add_node(&triangle_node()).unwrap();
        root.add_node(&wire).unwrap();
        root.add_node(&triangle_node()).unwrap();

        let commands = render(&root);
        assert!(matches!(commands[1], DrawCommand::SetPolygonMode(PolygonMode::Line)));
        assert!(matches!(commands[2], DrawCommand::SetBackfaceCulling(true)));
        assert!(matches!(commands[3], DrawCommand::DrawFace { textured: false, .. }));
        assert!(matches!(commands[4], DrawCommand::DrawLine { .. }));
        // sibling outside the render state is back to the defaults
        assert!(matches!(commands[5], DrawCommand::SetPolygonMode(PolygonMode::Fill)));
        assert!(matches!(commands[7], DrawCommand::DrawFace { textured: true, .. }));
        assert_eq!(commands.len(), 8);
    }

    #[test]
    fn test_soft_normals_drawn_per_vertex() {
        let state = SceneNode::new(RenderState::enabling(RenderStateOptions::SOFT_NORMAL));
        state.add_node(&triangle_node()).unwrap();
        let lines = render(&state)
            .into_iter()
            .filter(|c| matches!(c, DrawCommand::DrawLine { .. }))
            .count();
        assert_eq!(lines, 3);
    }

    #[test]
    fn test_lights_blending_and_meshes() {
        let root = SceneNode::new(Blending::additive());
        let light = SceneNode::new(PointLight::default());
        let mut off = SpotLight::default();
        off.light.active = false;
        let inactive = SceneNode::new(off);
        let mesh = SceneNode::new(MeshInstance::new(
            Rc::new(Mesh::cube()),
            Rc::new(Material::default()),
        ));
        root.add_node(&light).unwrap();
        root.add_node(&inactive).unwrap();
        root.add_node(&mesh).unwrap();

        let commands = render(&root);
        assert!(matches!(commands[1], DrawCommand::SetBlending(b) if b == Blending::additive()));
        assert!(matches!(
            commands[2],
            DrawCommand::SetLight { index: 0, kind: crate::scene::NodeType::PointLight, .. }
        ));
        assert!(matches!(commands[5], DrawCommand::DrawMesh { .. }));
        assert!(matches!(commands.last(), Some(DrawCommand::ResetBlending)));
        assert_eq!(commands.len(), 7);
    }

    struct FailingBackend;

    impl RenderBackend for FailingBackend {
        fn submit(&mut self, command: DrawCommand) -> BackendResult<()> {
            if command.is_draw() {
                Err(RenderError::Backend("device lost".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let result = RenderingView::new(camera()).render(&mut FailingBackend, &triangle_node());
        assert_eq!(result, Err(RenderError::Backend("device lost".into())));
    }

    #[test]
    fn test_from_config() {
        let view = RenderingView::from_config(&RendererConfig::default()).unwrap();
        assert_eq!(view.base_options(), RenderingView::new(camera()).base_options());
        assert_eq!(view.viewport().width, 1280);

        let config = RendererConfig {
            default_options: vec!["SPARKLES".to_string()],
            ..RendererConfig::default()
        };
        assert!(matches!(
            RenderingView::from_config(&config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
