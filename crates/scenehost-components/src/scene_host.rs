//! Scene host showing a rotating box

use glam::Vec3;
use scenehost_engine::{
    Component, Engine, EngineError, EntityId, FrameSubscription, Material, Primitive,
    RuntimeContext,
};
use tracing::{debug, info, warn};

use crate::host::{add_camera, add_light, create_context, SceneComponent, SurfaceProps};

/// Rotation applied to the box for a frame lasting `dt` seconds, in degrees
pub fn spin_delta(dt: f32) -> Vec3 {
    Vec3::new(10.0 * dt, 20.0 * dt, 30.0 * dt)
}

struct MountedScene {
    context: RuntimeContext,
    cube: EntityId,
    spin: FrameSubscription,
}

/// Host for the demo scene: a lit box spinning in front of a fixed camera
pub struct SceneHost {
    engine: Engine,
    props: SurfaceProps,
    mounted: Option<MountedScene>,
}

impl SceneHost {
    pub fn new(engine: Engine, width: u32, height: u32) -> Self {
        Self {
            engine,
            props: SurfaceProps::new(width, height),
            mounted: None,
        }
    }

    pub fn props(&self) -> SurfaceProps {
        self.props
    }

    /// The spinning box entity while mounted
    pub fn cube(&self) -> Option<EntityId> {
        self.mounted.as_ref().map(|m| m.cube)
    }

    fn build(&self) -> Result<MountedScene, EngineError> {
        let mut context = create_context(&self.engine, self.props)?;

        let cube = context.create_entity("box");
        context.add_component(cube, Component::Shape { primitive: Primitive::Box })?;
        context.add_component(
            cube,
            Component::Render {
                primitive: Primitive::Box,
                material: Material::default(),
            },
        )?;
        context.add_child(context.root(), cube)?;

        add_camera(&mut context)?;
        add_light(&mut context)?;

        let spin = context.on_each_frame(move |scene, dt| {
            let delta = spin_delta(dt);
            if let Err(e) = scene.rotate_by(cube, delta.x, delta.y, delta.z) {
                warn!(entity = %cube, error = %e, "Failed to rotate box");
            }
        });

        context.run();
        Ok(MountedScene { context, cube, spin })
    }
}

impl SceneComponent for SceneHost {
    fn name(&self) -> &'static str {
        "scene-host"
    }

    fn mount(&mut self) -> Result<(), EngineError> {
        if self.mounted.is_some() {
            debug!("Scene host already mounted");
            return Ok(());
        }
        let mounted = self.build()?;
        info!(
            context = %mounted.context.id(),
            width = self.props.width,
            height = self.props.height,
            "Mounted scene host"
        );
        self.mounted = Some(mounted);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            let id = mounted.context.id();
            mounted.context.unsubscribe(mounted.spin);
            mounted.context.destroy();
            info!(context = %id, "Unmounted scene host");
        }
    }

    fn context(&self) -> Option<&RuntimeContext> {
        self.mounted.as_ref().map(|m| &m.context)
    }

    fn context_mut(&mut self) -> Option<&mut RuntimeContext> {
        self.mounted.as_mut().map(|m| &mut m.context)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.context.resize(width, height)?;
        }
        self.props = SurfaceProps::new(width, height);
        Ok(())
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenehost_engine::scene::euler_quat;
    use scenehost_engine::{ComponentKind, MemoryAssetSource, NullBackend};
    use std::sync::Arc;

    fn host(width: u32, height: u32) -> (SceneHost, NullBackend) {
        let backend = NullBackend::new();
        let engine = Engine::new(Arc::new(backend.clone()), Arc::new(MemoryAssetSource::new()));
        (SceneHost::new(engine, width, height), backend)
    }

    #[test]
    fn test_mount_builds_demo_scene() {
        let (mut host, backend) = host(800, 600);
        assert!(!host.is_mounted());
        host.mount().unwrap();

        assert_eq!(backend.stats().opened(), 1);
        let ctx = host.context().unwrap();
        let scene = ctx.scene();
        assert!(ctx.is_running());
        assert_eq!(scene.entities_with(ComponentKind::Render).len(), 1);
        assert_eq!(scene.entities_with(ComponentKind::Shape).len(), 1);
        assert_eq!(scene.entities_with(ComponentKind::Camera).len(), 1);
        assert_eq!(scene.entities_with(ComponentKind::Light).len(), 1);
        assert_eq!(scene.children(scene.root()).len(), 3);
        assert_eq!(ctx.frame_subscribers(), 1);

        let cube = host.cube().unwrap();
        match scene.component(cube, ComponentKind::Render) {
            Some(Component::Render { primitive, material }) => {
                assert_eq!(*primitive, Primitive::Box);
                assert!(material.is_opaque());
            }
            other => panic!("unexpected render component: {:?}", other),
        }
    }

    #[test]
    fn test_camera_and_light_placement() {
        let (mut host, _) = host(800, 600);
        host.mount().unwrap();
        let scene = host.context().unwrap().scene();

        let cameras = scene.entities_with(ComponentKind::Camera);
        assert_eq!(cameras.len(), 1);
        match scene.component(cameras[0], ComponentKind::Camera) {
            Some(Component::Camera(params)) => {
                assert_eq!(params.fov, 75.0);
                assert_eq!(params.clear_color, scenehost_engine::Color::rgb(0.1, 0.1, 0.1));
            }
            other => panic!("unexpected camera component: {:?}", other),
        }
        assert_eq!(
            scene.transform(cameras[0]).unwrap().position,
            Vec3::new(0.0, 0.0, 3.0)
        );

        let lights = scene.entities_with(ComponentKind::Light);
        assert_eq!(lights.len(), 1);
        let angles = scene.transform(lights[0]).unwrap().euler_angles();
        assert!(angles.abs_diff_eq(Vec3::new(45.0, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn test_surface_fills_window() {
        let (mut host, _) = host(800, 600);
        host.mount().unwrap();
        let surface = host.context().unwrap().surface();
        assert_eq!((surface.width, surface.height), (800, 600));
        assert_eq!(surface.fill_mode, scenehost_engine::FillMode::FillWindow);
        assert_eq!(surface.resolution, scenehost_engine::ResolutionMode::Auto);
    }

    #[test]
    fn test_spin_delta_scales_with_dt() {
        for dt in [0.0f32, 0.016, 0.5, 1.0, 12.5] {
            assert_eq!(spin_delta(dt), Vec3::new(10.0 * dt, 20.0 * dt, 30.0 * dt));
        }
    }

    #[test]
    fn test_frame_rotates_box() {
        let (mut host, _) = host(320, 240);
        host.mount().unwrap();
        let cube = host.cube().unwrap();
        let ctx = host.context_mut().unwrap();

        assert!(ctx.tick(0.5));
        let rotation = ctx.scene().transform(cube).unwrap().rotation;
        assert!(rotation.abs_diff_eq(euler_quat(5.0, 10.0, 15.0), 1e-5));
    }

    #[test]
    fn test_zero_dt_leaves_box_unrotated() {
        let (mut host, _) = host(320, 240);
        host.mount().unwrap();
        let cube = host.cube().unwrap();
        let ctx = host.context_mut().unwrap();
        ctx.tick(0.0);
        let rotation = ctx.scene().transform(cube).unwrap().rotation;
        assert!(rotation.abs_diff_eq(glam::Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_unmount_destroys_context_once() {
        let (mut host, backend) = host(800, 600);
        let stats = backend.stats();
        host.mount().unwrap();
        host.mount().unwrap();
        assert_eq!(stats.opened(), 1);

        host.unmount();
        assert!(!host.is_mounted());
        assert!(host.context_mut().is_none());
        assert_eq!(stats.released(), 1);

        host.unmount();
        drop(host);
        assert_eq!(stats.released(), 1);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn test_remount_creates_fresh_context() {
        let (mut host, backend) = host(800, 600);
        host.mount().unwrap();
        let first = host.context().unwrap().id();
        host.unmount();
        host.mount().unwrap();

        assert_ne!(host.context().unwrap().id(), first);
        assert_eq!(backend.stats().opened(), 2);
        assert_eq!(backend.stats().released(), 1);
        assert_eq!(host.context().unwrap().frame_index(), 0);
    }

    #[test]
    fn test_empty_surface_fails_to_mount() {
        let (mut host, backend) = host(0, 600);
        assert!(matches!(host.mount(), Err(EngineError::EmptySurface { .. })));
        assert!(!host.is_mounted());
        assert_eq!(backend.stats().live(), 0);
    }

    #[test]
    fn test_resize_while_mounted() {
        let (mut host, backend) = host(800, 600);
        host.mount().unwrap();
        host.resize(1024, 768).unwrap();
        assert_eq!(host.context().unwrap().surface().width, 1024);
        assert_eq!(host.props(), SurfaceProps::new(1024, 768));
        assert_eq!(backend.stats().resizes(), 1);
        assert!(host.resize(0, 768).is_err());
    }
}
