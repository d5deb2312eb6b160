//! Scene demo application
//!
//! Builds a small scene (a lit, spinning cube next to a wireframe triangle),
//! runs the engine for a bounded number of frames against the recording
//! backend and prints the scene graph in graphviz format.

use open_engine::foundation::logging;
use open_engine::prelude::*;
use open_engine::scene::{Blending, PointLight};
use std::cell::RefCell;
use std::rc::Rc;

const CONFIG_PATH: &str = "scene_demo.toml";
const DEFAULT_FRAMES: u64 = 120;

/// Radians per millisecond of the spinning cube
const SPIN_SPEED: f32 = 0.001;

/// Spins a transformation node a little every frame
struct Spinner {
    target: SceneNode,
}

impl Module for Spinner {
    fn name(&self) -> &str {
        "Spinner"
    }

    fn process(&mut self, arg: &ProcessEventArg) -> Result<(), EngineError> {
        let elapsed_ms = u16::try_from(arg.approx).map_or(f32::from(u16::MAX), f32::from);
        let angle = elapsed_ms * SPIN_SPEED;
        if let Some(mut transformation) = self.target.payload_mut::<Transformation>() {
            transformation.rotate(0.0, angle, 0.0);
        }
        Ok(())
    }
}

fn build_scene(setup: &mut SimpleSetup) -> Result<(SceneNode, SceneNode), EngineError> {
    let root = SceneNode::group();

    let light = SceneNode::new(PointLight::default());
    root.add_node(&light)?;

    let spin = SceneNode::new(Transformation::new());
    spin.add_node(&setup.load_model("cube.prim")?)?;
    light.add_node(&spin)?;

    let mut wireframe = RenderState::new();
    wireframe.enable(RenderStateOptions::WIREFRAME | RenderStateOptions::HARD_NORMAL);
    let state = SceneNode::new(wireframe);
    let offset = SceneNode::new(Transformation::new().with_position(Vec3::new(3.0, 0.0, 0.0)));
    let blend = SceneNode::new(Blending::default());
    blend.add_node(&setup.load_model("triangle.prim")?)?;
    offset.add_node(&blend)?;
    state.add_node(&offset)?;
    light.add_node(&state)?;

    Ok((root, spin))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load_or_default(CONFIG_PATH)?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting scene demo...");

    if config.max_frames.is_none() {
        config.max_frames = Some(DEFAULT_FRAMES);
    }

    let mut setup = SimpleSetup::new(config)?;
    let (root, spin) = build_scene(&mut setup)?;
    setup.set_scene(root.clone());

    let spinner = Rc::new(RefCell::new(Spinner { target: spin }));
    setup.add_module(&spinner);
    log::info!("Modules: {:?}", setup.engine().module_names());

    setup.run()?;

    let renderer = setup.renderer().borrow();
    let last_frame = renderer.backend().commands();
    log::info!(
        "Rendered {} frame(s); last frame: {} commands, {} draws, approx frame time {} ms",
        renderer.frames(),
        last_frame.len(),
        last_frame.draw_count(),
        setup.engine().approx_frame_time()
    );

    let mut dot = DotVisitor::named("scene");
    println!("{}", dot.to_dot(&root));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Instant;

    fn spin_once(approx: u32) -> Quat {
        let target = SceneNode::new(Transformation::new());
        let mut spinner = Spinner { target: target.clone() };
        let arg = ProcessEventArg {
            start: Instant::now(),
            approx,
            frame: 0,
        };
        spinner.process(&arg).unwrap();
        let rotation = target.payload::<Transformation>().unwrap().rotation();
        rotation
    }

    #[test]
    fn test_spin_follows_frame_time() {
        assert_relative_eq!(spin_once(500).angle(), 0.5, epsilon = 1e-5);
        assert_relative_eq!(spin_once(0).angle(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_spin_clamps_huge_frame_times() {
        let rotation = spin_once(u32::MAX);
        assert!(rotation.angle().is_finite());
        assert_relative_eq!(rotation.angle(), spin_once(u32::from(u16::MAX)).angle(), epsilon = 1e-5);
    }
}
