//! Shared host lifecycle and scene fixtures

use glam::Vec3;
use scenehost_engine::{
    CameraParams, Color, Component, ContextOptions, Engine, EngineError, EntityId, FillMode,
    LightParams, ResolutionMode, RuntimeContext, Surface,
};

pub const CAMERA_FOV: f32 = 75.0;
pub const CLEAR_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);
/// Euler angles of the directional light, in degrees
pub const LIGHT_ANGLES: Vec3 = Vec3::new(45.0, 0.0, 0.0);

/// Surface size props shared by both hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceProps {
    pub width: u32,
    pub height: u32,
}

impl SurfaceProps {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Lifecycle shared by the scene hosts
pub trait SceneComponent {
    fn name(&self) -> &'static str;

    /// Create the runtime context and build the scene. Mounting an already
    /// mounted host does nothing.
    fn mount(&mut self) -> Result<(), EngineError>;

    /// Destroy the runtime context. Unmounting an unmounted host does nothing.
    fn unmount(&mut self);

    fn context(&self) -> Option<&RuntimeContext>;

    fn context_mut(&mut self) -> Option<&mut RuntimeContext>;

    fn is_mounted(&self) -> bool {
        self.context().is_some()
    }

    /// Resize the surface of a mounted host in place
    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError>;
}

/// Context filling its window at automatic resolution
pub(crate) fn create_context(engine: &Engine, props: SurfaceProps) -> Result<RuntimeContext, EngineError> {
    engine.create_context(
        Surface::new(props.width, props.height),
        ContextOptions {
            fill_mode: FillMode::FillWindow,
            resolution: ResolutionMode::Auto,
        },
    )
}

pub(crate) fn add_camera(ctx: &mut RuntimeContext) -> Result<EntityId, EngineError> {
    let camera = ctx.create_entity("camera");
    ctx.add_component(
        camera,
        Component::Camera(CameraParams {
            fov: CAMERA_FOV,
            clear_color: CLEAR_COLOR,
            ..CameraParams::default()
        }),
    )?;
    ctx.add_child(ctx.root(), camera)?;
    ctx.scene_mut()
        .set_position(camera, CAMERA_POSITION.x, CAMERA_POSITION.y, CAMERA_POSITION.z)?;
    Ok(camera)
}

pub(crate) fn add_light(ctx: &mut RuntimeContext) -> Result<EntityId, EngineError> {
    let light = ctx.create_entity("light");
    ctx.add_component(light, Component::Light(LightParams::directional()))?;
    ctx.add_child(ctx.root(), light)?;
    ctx.scene_mut()
        .set_euler_angles(light, LIGHT_ANGLES.x, LIGHT_ANGLES.y, LIGHT_ANGLES.z)?;
    Ok(light)
}
