//! Scene host showing a model loaded from a URL

use scenehost_engine::{
    Asset, AssetError, AssetKind, Behavior, Component, ComponentKind, Engine, EngineError,
    EntityId, LoadId, LoadStatus, ModelComponent, OrbitCamera, OrbitCameraParams,
    RuntimeContext, Scene,
};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::host::{add_camera, add_light, create_context, SceneComponent, SurfaceProps};

/// Initial orbit of the camera around the model
pub const ORBIT: OrbitCameraParams = OrbitCameraParams {
    distance: 10.0,
    polar: 45.0,
    azimuth: 0.0,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSceneProps {
    pub width: u32,
    pub height: u32,
    pub model_url: String,
}

impl AssetSceneProps {
    pub fn new(width: u32, height: u32, model_url: impl Into<String>) -> Self {
        Self {
            width,
            height,
            model_url: model_url.into(),
        }
    }

    fn surface(&self) -> SurfaceProps {
        SurfaceProps::new(self.width, self.height)
    }
}

/// Model lifecycle of one mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    /// Never mounted
    Idle,
    /// Load issued, no result yet
    Loading,
    /// Model attached under the scene root
    Loaded(EntityId),
    /// Load failed; the scene stays without a model
    Failed(String),
    /// Host was unmounted
    Unmounted,
}

struct MountedAssetScene {
    context: RuntimeContext,
    camera: EntityId,
    light: EntityId,
    load: LoadId,
}

/// Host for a single model behind an orbit camera
pub struct AssetSceneHost {
    engine: Engine,
    props: AssetSceneProps,
    mounted: Option<MountedAssetScene>,
    was_mounted: bool,
}

impl AssetSceneHost {
    pub fn new(engine: Engine, props: AssetSceneProps) -> Self {
        Self {
            engine,
            props,
            mounted: None,
            was_mounted: false,
        }
    }

    pub fn props(&self) -> &AssetSceneProps {
        &self.props
    }

    pub fn model_url(&self) -> &str {
        &self.props.model_url
    }

    pub fn camera(&self) -> Option<EntityId> {
        self.mounted.as_ref().map(|m| m.camera)
    }

    pub fn light(&self) -> Option<EntityId> {
        self.mounted.as_ref().map(|m| m.light)
    }

    /// Load request of the current mount
    pub fn load(&self) -> Option<LoadId> {
        self.mounted.as_ref().map(|m| m.load)
    }

    /// Point the host at another model. A mounted host is torn down and
    /// rebuilt with a fresh context and load request.
    pub fn set_model_url(&mut self, model_url: impl Into<String>) -> Result<(), EngineError> {
        let model_url = model_url.into();
        if model_url == self.props.model_url {
            return Ok(());
        }
        info!(from = %self.props.model_url, to = %model_url, "Model URL changed");
        self.props.model_url = model_url;

        if self.mounted.is_some() {
            self.unmount();
            self.mount()?;
        }
        Ok(())
    }

    /// Model entity attached under the root, if the load succeeded
    pub fn model_entity(&self) -> Option<EntityId> {
        let scene = self.mounted.as_ref()?.context.scene();
        scene
            .children(scene.root())
            .iter()
            .copied()
            .find(|id| scene.component(*id, ComponentKind::Model).is_some())
    }

    pub fn state(&self) -> ModelState {
        let Some(mounted) = self.mounted.as_ref() else {
            return if self.was_mounted {
                ModelState::Unmounted
            } else {
                ModelState::Idle
            };
        };

        match mounted.context.load_status(mounted.load) {
            None | Some(LoadStatus::Pending) => ModelState::Loading,
            Some(LoadStatus::Loaded) => match self.model_entity() {
                Some(entity) => ModelState::Loaded(entity),
                None => ModelState::Failed("container did not yield a model".to_string()),
            },
            Some(LoadStatus::Failed(e)) => ModelState::Failed(e.to_string()),
            Some(LoadStatus::Cancelled) => ModelState::Unmounted,
        }
    }

    /// Wait for the current mount's load to finish and be applied
    pub async fn wait_for_model(&mut self) -> ModelState {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.context.wait_for_loads().await;
        }
        self.state()
    }

    fn build(&self) -> Result<MountedAssetScene, EngineError> {
        let mut context = create_context(&self.engine, self.props.surface())?;

        let camera = add_camera(&mut context)?;
        context.attach_behavior(camera, Behavior::OrbitCamera(OrbitCamera::new(ORBIT)?))?;
        let light = add_light(&mut context)?;

        let url = self.props.model_url.clone();
        let load = context.load_asset_from_url(&self.props.model_url, AssetKind::Container, move |scene, result| {
            match result {
                Ok(asset) => {
                    if let Err(e) = attach_model(scene, &url, &asset) {
                        error!(url = %url, error = %e, "Error attaching model");
                    }
                }
                Err(e) => error!(url = %url, error = %e, "Error loading model"),
            }
        })?;

        context.run();
        Ok(MountedAssetScene {
            context,
            camera,
            light,
            load,
        })
    }
}

fn attach_model(scene: &mut Scene, url: &str, asset: &Arc<Asset>) -> Result<EntityId, AssetError> {
    let container = asset
        .container()
        .ok_or_else(|| AssetError::Decode(format!("{} is not a container", url)))?;

    let entity = scene.create_entity("model");
    let model = Component::Model(ModelComponent {
        source: url.to_string(),
        resource: container.model.clone(),
    });
    scene
        .add_component(entity, model)
        .and_then(|_| scene.add_child(scene.root(), entity))
        .map_err(|e| AssetError::Decode(e.to_string()))?;

    info!(url = %url, entity = %entity, meshes = container.model.meshes.len(), "Attached model");
    Ok(entity)
}

impl SceneComponent for AssetSceneHost {
    fn name(&self) -> &'static str {
        "asset-scene-host"
    }

    fn mount(&mut self) -> Result<(), EngineError> {
        if self.mounted.is_some() {
            debug!("Asset scene host already mounted");
            return Ok(());
        }
        let mounted = self.build()?;
        info!(
            context = %mounted.context.id(),
            url = %self.props.model_url,
            width = self.props.width,
            height = self.props.height,
            "Mounted asset scene host"
        );
        self.mounted = Some(mounted);
        self.was_mounted = true;
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            let id = mounted.context.id();
            mounted.context.cancel_load(mounted.load);
            mounted.context.destroy();
            info!(context = %id, "Unmounted asset scene host");
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
        self.props.width = width;
        self.props.height = height;
        Ok(())
    }
}

impl Drop for AssetSceneHost {
    fn drop(&mut self) {
        self.unmount();
    }
}
