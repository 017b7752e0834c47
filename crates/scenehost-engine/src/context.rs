//! Runtime contexts and the engine that creates them
//!
//! A [`RuntimeContext`] is the live engine instance bound to one surface. It
//! owns the scene graph, the frame callbacks, the render target and every
//! in-flight asset load. Asset fetches run as tokio tasks; their results are
//! queued and applied on the caller's loop, either during [`RuntimeContext::tick`]
//! or from [`RuntimeContext::wait_for_loads`]. Destroying a context aborts
//! those tasks and drops their callbacks, so a late completion can never
//! reach a destroyed scene.

use futures_util::FutureExt;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::asset::{Asset, AssetKind, AssetSource, FileAssetSource, LoadId, LoadStatus};
use crate::backend::{FrameView, GraphicsBackend, NullBackend, RenderTarget};
use crate::behavior::{Behavior, InputEvent};
use crate::component::{Component, ComponentKind};
use crate::error::{AssetError, BehaviorError, EngineError};
use crate::frame::{FrameCallbacks, FrameSubscription};
use crate::scene::{EntityId, Scene, Transform};
use crate::surface::{FillMode, ResolutionMode, Surface};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a runtime context, used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// Surface behavior applied when a context is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextOptions {
    pub fill_mode: FillMode,
    pub resolution: ResolutionMode,
}

/// Factory for runtime contexts, carrying the injected collaborators
#[derive(Clone)]
pub struct Engine {
    backend: Arc<dyn GraphicsBackend>,
    assets: Arc<dyn AssetSource>,
}

impl Engine {
    pub fn new(backend: Arc<dyn GraphicsBackend>, assets: Arc<dyn AssetSource>) -> Self {
        Self { backend, assets }
    }

    /// Null backend reading assets from disk
    pub fn headless() -> Self {
        Self::new(Arc::new(NullBackend::new()), Arc::new(FileAssetSource::new()))
    }

    pub fn backend(&self) -> &Arc<dyn GraphicsBackend> {
        &self.backend
    }

    pub fn create_context(
        &self,
        mut surface: Surface,
        options: ContextOptions,
    ) -> Result<RuntimeContext, EngineError> {
        if surface.is_empty() {
            return Err(EngineError::EmptySurface {
                width: surface.width,
                height: surface.height,
            });
        }
        surface.fill_mode = options.fill_mode;
        surface.resolution = options.resolution;

        let target = self.backend.open(&surface)?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let id = ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed));

        info!(
            context = %id,
            backend = self.backend.name(),
            width = surface.width,
            height = surface.height,
            "Created runtime context"
        );

        Ok(RuntimeContext {
            id,
            surface,
            scene: Scene::new(),
            target,
            frames: FrameCallbacks::default(),
            assets: self.assets.clone(),
            registry: HashMap::new(),
            pending: HashMap::new(),
            statuses: HashMap::new(),
            completions_tx,
            completions_rx,
            next_load: 0,
            running: false,
            frame_index: 0,
            destroyed: false,
        })
    }
}

type LoadCallback = Box<dyn FnOnce(&mut Scene, Result<Arc<Asset>, AssetError>)>;

struct PendingLoad {
    url: String,
    callback: LoadCallback,
    task: JoinHandle<()>,
}

struct LoadCompletion {
    id: LoadId,
    result: Result<Asset, AssetError>,
}

/// Live engine instance bound to one surface
pub struct RuntimeContext {
    id: ContextId,
    surface: Surface,
    scene: Scene,
    target: Box<dyn RenderTarget>,
    frames: FrameCallbacks,
    assets: Arc<dyn AssetSource>,
    /// Loaded assets keyed by URL
    registry: HashMap<String, Arc<Asset>>,
    pending: HashMap<LoadId, PendingLoad>,
    statuses: HashMap<LoadId, LoadStatus>,
    completions_tx: mpsc::UnboundedSender<LoadCompletion>,
    completions_rx: mpsc::UnboundedReceiver<LoadCompletion>,
    next_load: u64,
    running: bool,
    frame_index: u64,
    destroyed: bool,
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("id", &self.id)
            .field("surface", &self.surface)
            .field("entities", &self.scene.entity_count())
            .field("pending_loads", &self.pending.len())
            .field("running", &self.running)
            .field("frame_index", &self.frame_index)
            .finish()
    }
}

impl RuntimeContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn root(&self) -> EntityId {
        self.scene.root()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of frames ticked so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn set_fill_mode(&mut self, mode: FillMode) {
        self.surface.fill_mode = mode;
        self.target.resize(&self.surface);
    }

    pub fn set_resolution(&mut self, mode: ResolutionMode) {
        self.surface.resolution = mode;
        self.target.resize(&self.surface);
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::EmptySurface { width, height });
        }
        self.surface.width = width;
        self.surface.height = height;
        self.target.resize(&self.surface);
        debug!(context = %self.id, width, height, "Resized surface");
        Ok(())
    }

    pub fn create_entity(&mut self, name: &str) -> EntityId {
        let id = self.scene.create_entity(name);
        debug!(context = %self.id, entity = %id, name, "Created entity");
        id
    }

    pub fn add_component(&mut self, id: EntityId, component: Component) -> Result<(), EngineError> {
        self.scene.add_component(id, component)
    }

    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EngineError> {
        self.scene.add_child(parent, child)
    }

    /// Validate and attach a behavior to the entity's script component
    pub fn attach_behavior(&mut self, id: EntityId, behavior: Behavior) -> Result<(), EngineError> {
        behavior.validate()?;
        if !self.scene.contains(id) {
            return Err(EngineError::UnknownEntity(id));
        }
        match &behavior {
            Behavior::OrbitCamera(_) => {
                if self.scene.component(id, ComponentKind::Camera).is_none() {
                    return Err(BehaviorError::MissingCamera(id).into());
                }
            }
        }

        if let Some(transform) = behavior.update() {
            self.scene.set_transform(id, transform)?;
        }
        debug!(context = %self.id, entity = %id, behavior = behavior.name(), "Attached behavior");

        if let Some(Component::Script(behaviors)) = self.scene.component_mut(id, ComponentKind::Script) {
            behaviors.push(behavior);
            return Ok(());
        }
        self.scene.add_component(id, Component::Script(vec![behavior]))
    }

    /// Forward pointer input to every attached behavior
    pub fn dispatch_input(&mut self, event: InputEvent) {
        for id in self.scene.entities_with(ComponentKind::Script) {
            if let Some(Component::Script(behaviors)) = self.scene.component_mut(id, ComponentKind::Script) {
                for behavior in behaviors.iter_mut() {
                    behavior.handle_input(event);
                }
            }
        }
    }

    /// Register a callback run once per tick with the frame's delta time in seconds
    pub fn on_each_frame<F>(&mut self, callback: F) -> FrameSubscription
    where
        F: FnMut(&mut Scene, f32) + 'static,
    {
        let subscription = self.frames.subscribe(Box::new(callback));
        debug!(context = %self.id, subscription = ?subscription, "Registered frame callback");
        subscription
    }

    /// Release a frame callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, subscription: FrameSubscription) -> bool {
        let removed = self.frames.unsubscribe(subscription);
        debug!(context = %self.id, subscription = ?subscription, removed, "Released frame callback");
        removed
    }

    pub fn frame_subscribers(&self) -> usize {
        self.frames.len()
    }

    /// Start the run loop. Ticks before this are ignored.
    pub fn run(&mut self) {
        if !self.running {
            self.running = true;
            info!(context = %self.id, "Started run loop");
        }
    }

    /// Advance one frame. Applies finished loads, runs frame callbacks and
    /// behaviors, then presents. Returns false when the loop is not running.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.drain_completions();
        self.frames.run(&mut self.scene, dt);
        self.run_behaviors();

        let camera = self.scene.entities_with(ComponentKind::Camera).into_iter().next();
        self.target.present(&FrameView {
            scene: &self.scene,
            camera,
            frame_index: self.frame_index,
            dt,
        });
        self.frame_index += 1;
        true
    }

    fn run_behaviors(&mut self) {
        let updates: Vec<(EntityId, Transform)> = self
            .scene
            .entities()
            .filter_map(|entity| match entity.component(ComponentKind::Script) {
                Some(Component::Script(behaviors)) => behaviors
                    .iter()
                    .filter_map(Behavior::update)
                    .last()
                    .map(|transform| (entity.id, transform)),
                _ => None,
            })
            .collect();

        for (id, transform) in updates {
            if let Err(e) = self.scene.set_transform(id, transform) {
                warn!(context = %self.id, entity = %id, error = %e, "Behavior update failed");
            }
        }
    }

    /// Fetch and decode an asset in the background. The callback runs on this
    /// context's loop once the result is applied, and never after the load
    /// is cancelled or the context destroyed.
    pub fn load_asset_from_url<F>(
        &mut self,
        url: &str,
        kind: AssetKind,
        callback: F,
    ) -> Result<LoadId, EngineError>
    where
        F: FnOnce(&mut Scene, Result<Arc<Asset>, AssetError>) + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let id = LoadId(self.next_load);
        self.next_load += 1;

        let fetch = self.assets.fetch(url);
        let completions = self.completions_tx.clone();
        let task_url = url.to_string();
        let task = runtime.spawn(async move {
            let load = async {
                let bytes = fetch.await?;
                Asset::decode(&task_url, kind, bytes)
            };
            // A panicking source still has to settle the load
            let result = match AssertUnwindSafe(load).catch_unwind().await {
                Ok(result) => result,
                Err(_) => Err(AssetError::Fetch {
                    url: task_url.clone(),
                    reason: "fetch task panicked".to_string(),
                }),
            };
            // Receiver is closed once the context is destroyed
            let _ = completions.send(LoadCompletion { id, result });
        });

        self.pending.insert(
            id,
            PendingLoad {
                url: url.to_string(),
                callback: Box::new(callback),
                task,
            },
        );
        self.statuses.insert(id, LoadStatus::Pending);
        info!(context = %self.id, load = %id, url = %url, kind = ?kind, "Loading asset");
        Ok(id)
    }

    /// Abort a pending load. Its callback is dropped without running.
    pub fn cancel_load(&mut self, id: LoadId) -> bool {
        match self.pending.remove(&id) {
            Some(pending) => {
                pending.task.abort();
                self.statuses.insert(id, LoadStatus::Cancelled);
                warn!(context = %self.id, load = %id, url = %pending.url, "Cancelled asset load");
                true
            }
            None => false,
        }
    }

    pub fn load_status(&self, id: LoadId) -> Option<&LoadStatus> {
        self.statuses.get(&id)
    }

    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Asset previously loaded from `url`
    pub fn asset(&self, url: &str) -> Option<Arc<Asset>> {
        self.registry.get(url).cloned()
    }

    /// Wait until every pending load has completed and been applied
    pub async fn wait_for_loads(&mut self) {
        while !self.pending.is_empty() {
            match self.completions_rx.recv().await {
                Some(completion) => self.complete(completion),
                None => break,
            }
        }
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.complete(completion);
        }
    }

    fn complete(&mut self, completion: LoadCompletion) {
        let id = completion.id;
        let Some(pending) = self.pending.remove(&id) else {
            debug!(context = %self.id, load = %id, "Dropping result of cancelled load");
            return;
        };

        let result = match completion.result {
            Ok(asset) => {
                let asset = Arc::new(asset);
                self.registry.insert(pending.url.clone(), asset.clone());
                self.statuses.insert(id, LoadStatus::Loaded);
                info!(context = %self.id, load = %id, url = %pending.url, "Asset loaded");
                Ok(asset)
            }
            Err(e) => {
                self.statuses.insert(id, LoadStatus::Failed(e.clone()));
                warn!(context = %self.id, load = %id, url = %pending.url, error = %e, "Asset load failed");
                Err(e)
            }
        };

        (pending.callback)(&mut self.scene, result);
    }

    /// Destroy the context, releasing its render target, frame callbacks,
    /// assets and in-flight loads.
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.running = false;

        let cancelled = self.pending.len();
        for (id, pending) in self.pending.drain() {
            pending.task.abort();
            self.statuses.insert(id, LoadStatus::Cancelled);
        }
        self.completions_rx.close();
        self.frames.clear();
        self.registry.clear();
        self.target.release();

        info!(
            context = %self.id,
            frames = self.frame_index,
            cancelled_loads = cancelled,
            "Destroyed runtime context"
        );
    }
}

impl Drop for RuntimeContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{FetchFuture, MemoryAssetSource};
    use crate::behavior::{OrbitCamera, OrbitCameraParams};
    use crate::component::CameraParams;
    use futures_util::future::{self, FutureExt};
    use glam::Vec3;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const MODEL: &str = r#"{"asset": {"version": "2.0"}, "scenes": [{"name": "Box"}], "meshes": [{}]}"#;

    /// Source whose fetches never finish
    struct StalledSource;

    impl AssetSource for StalledSource {
        fn fetch(&self, _url: &str) -> FetchFuture {
            future::pending().boxed()
        }
    }

    /// Source whose fetches panic
    struct PanickingSource;

    async fn explode(url: String) -> Result<Vec<u8>, AssetError> {
        panic!("source blew up fetching {}", url)
    }

    impl AssetSource for PanickingSource {
        fn fetch(&self, url: &str) -> FetchFuture {
            explode(url.to_string()).boxed()
        }
    }

    fn engine_with(assets: Arc<dyn AssetSource>) -> (Engine, NullBackend) {
        let backend = NullBackend::new();
        (Engine::new(Arc::new(backend.clone()), assets), backend)
    }

    fn memory_engine() -> (Engine, NullBackend) {
        engine_with(Arc::new(MemoryAssetSource::new().with_asset("mem://box.gltf", MODEL)))
    }

    #[test]
    fn test_create_and_destroy_pairing() {
        let (engine, backend) = memory_engine();
        let stats = backend.stats();

        let ctx = engine
            .create_context(Surface::new(800, 600), ContextOptions::default())
            .unwrap();
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.live(), 1);

        ctx.destroy();
        assert_eq!(stats.released(), 1);
        assert_eq!(stats.live(), 0);

        // Dropping without destroy releases as well
        let ctx = engine
            .create_context(Surface::new(800, 600), ContextOptions::default())
            .unwrap();
        drop(ctx);
        assert_eq!(stats.opened(), 2);
        assert_eq!(stats.released(), 2);
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        let (engine, backend) = memory_engine();
        let err = engine
            .create_context(Surface::new(0, 600), ContextOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptySurface { width: 0, height: 600 }));
        assert_eq!(backend.stats().opened(), 0);
    }

    #[test]
    fn test_options_apply_to_surface() {
        let (engine, backend) = memory_engine();
        let mut ctx = engine
            .create_context(
                Surface::new(320, 240),
                ContextOptions {
                    fill_mode: FillMode::FillWindow,
                    resolution: ResolutionMode::Auto,
                },
            )
            .unwrap();
        assert_eq!(ctx.surface().fill_mode, FillMode::FillWindow);
        assert_eq!(ctx.surface().resolution, ResolutionMode::Auto);

        ctx.resize(640, 480).unwrap();
        assert_eq!(ctx.surface().width, 640);
        assert!(ctx.resize(0, 480).is_err());
        assert_eq!(backend.stats().resizes(), 1);
    }

    #[test]
    fn test_tick_requires_run_and_passes_dt() {
        let (engine, backend) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = ctx.on_each_frame(move |_, dt| sink.borrow_mut().push(dt));

        assert!(!ctx.tick(0.5));
        assert!(seen.borrow().is_empty());

        ctx.run();
        assert!(ctx.tick(0.5));
        assert!(ctx.tick(-1.0));
        assert!(ctx.tick(f32::NAN));
        assert_eq!(*seen.borrow(), vec![0.5, 0.0, 0.0]);
        assert_eq!(backend.stats().frames(), 3);

        assert!(ctx.unsubscribe(sub));
        ctx.tick(0.5);
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(ctx.frame_index(), 4);
    }

    #[test]
    fn test_load_requires_runtime() {
        let (engine, _) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let result = ctx.load_asset_from_url("mem://box.gltf", AssetKind::Container, |_, _| {});
        assert!(matches!(result, Err(EngineError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_load_success_runs_callback_on_scene() {
        let (engine, _) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();

        let loaded = Rc::new(Cell::new(None));
        let slot = loaded.clone();
        let id = ctx
            .load_asset_from_url("mem://box.gltf", AssetKind::Container, move |scene, result| {
                let asset = result.unwrap();
                let entity = scene.create_entity("model");
                scene.add_child(scene.root(), entity).unwrap();
                assert_eq!(asset.container().unwrap().model.name.as_deref(), Some("Box"));
                slot.set(Some(entity));
            })
            .unwrap();
        assert_eq!(ctx.load_status(id), Some(&LoadStatus::Pending));

        ctx.wait_for_loads().await;
        assert_eq!(ctx.load_status(id), Some(&LoadStatus::Loaded));
        assert_eq!(ctx.pending_loads(), 0);
        let entity = loaded.get().unwrap();
        assert_eq!(ctx.scene().children(ctx.root()), &[entity]);
        assert!(ctx.asset("mem://box.gltf").is_some());
    }

    #[tokio::test]
    async fn test_load_failure_reports_error() {
        let (engine, _) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();

        let failed = Rc::new(Cell::new(false));
        let flag = failed.clone();
        let id = ctx
            .load_asset_from_url("mem://missing.glb", AssetKind::Container, move |_, result| {
                flag.set(result.is_err());
            })
            .unwrap();

        ctx.wait_for_loads().await;
        assert!(failed.get());
        assert!(matches!(ctx.load_status(id), Some(LoadStatus::Failed(AssetError::Fetch { .. }))));
        assert!(ctx.asset("mem://missing.glb").is_none());
    }

    #[tokio::test]
    async fn test_panicking_source_fails_the_load() {
        let (engine, _) = engine_with(Arc::new(PanickingSource));
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();

        let seen = Rc::new(RefCell::new(None));
        let slot = seen.clone();
        let id = ctx
            .load_asset_from_url("mem://boom.glb", AssetKind::Container, move |_, result| {
                *slot.borrow_mut() = Some(result.map(|_| ()));
            })
            .unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(2), ctx.wait_for_loads())
            .await
            .expect("load never settled");

        assert_eq!(ctx.pending_loads(), 0);
        assert!(matches!(ctx.load_status(id), Some(LoadStatus::Failed(AssetError::Fetch { .. }))));
        assert!(matches!(*seen.borrow(), Some(Err(AssetError::Fetch { .. }))));
    }

    #[tokio::test]
    async fn test_tick_settles_panicked_load() {
        let (engine, _) = engine_with(Arc::new(PanickingSource));
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let id = ctx
            .load_asset_from_url("mem://boom.glb", AssetKind::Binary, |_, _| {})
            .unwrap();
        ctx.run();

        for _ in 0..50 {
            if ctx.load_status(id).is_some_and(LoadStatus::is_finished) {
                break;
            }
            tokio::task::yield_now().await;
            ctx.tick(0.016);
        }
        assert!(matches!(ctx.load_status(id), Some(LoadStatus::Failed(_))));
    }

    #[tokio::test]
    async fn test_tick_applies_finished_loads() {
        let (engine, _) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        ctx.load_asset_from_url("mem://box.gltf", AssetKind::Container, move |_, _| flag.set(true))
            .unwrap();
        ctx.run();

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        ctx.tick(0.016);
        assert!(fired.get());
    }

    #[tokio::test]
    async fn test_cancelled_load_never_fires() {
        let (engine, _) = engine_with(Arc::new(StalledSource));
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let id = ctx
            .load_asset_from_url("mem://slow.glb", AssetKind::Container, move |_, _| flag.set(true))
            .unwrap();

        assert!(ctx.cancel_load(id));
        assert!(!ctx.cancel_load(id));
        assert_eq!(ctx.load_status(id), Some(&LoadStatus::Cancelled));

        ctx.wait_for_loads().await;
        ctx.run();
        ctx.tick(0.016);
        assert!(!fired.get());
    }

    #[tokio::test]
    async fn test_destroy_with_load_in_flight() {
        let (engine, backend) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        ctx.load_asset_from_url("mem://box.gltf", AssetKind::Container, move |_, _| flag.set(true))
            .unwrap();

        ctx.destroy();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!fired.get());
        assert_eq!(backend.stats().released(), 1);
    }

    #[test]
    fn test_orbit_behavior_requires_camera() {
        let (engine, _) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let params = OrbitCameraParams { distance: 10.0, polar: 45.0, azimuth: 0.0 };

        let plain = ctx.create_entity("plain");
        let err = ctx
            .attach_behavior(plain, Behavior::OrbitCamera(OrbitCamera::new(params).unwrap()))
            .unwrap_err();
        assert!(matches!(err, EngineError::Behavior(BehaviorError::MissingCamera(_))));

        let camera = ctx.create_entity("camera");
        ctx.add_component(camera, Component::Camera(CameraParams::default()))
            .unwrap();
        ctx.attach_behavior(camera, Behavior::OrbitCamera(OrbitCamera::new(params).unwrap()))
            .unwrap();
        assert_eq!(ctx.scene().entities_with(ComponentKind::Script), vec![camera]);
    }

    #[test]
    fn test_orbit_behavior_moves_camera_with_input() {
        let (engine, _) = memory_engine();
        let mut ctx = engine
            .create_context(Surface::new(100, 100), ContextOptions::default())
            .unwrap();
        let camera = ctx.create_entity("camera");
        ctx.add_component(camera, Component::Camera(CameraParams::default()))
            .unwrap();
        let orbit = OrbitCamera::new(OrbitCameraParams { distance: 10.0, polar: 0.0, azimuth: 0.0 }).unwrap();
        ctx.attach_behavior(camera, Behavior::OrbitCamera(orbit)).unwrap();
        ctx.run();

        ctx.tick(0.016);
        let before = ctx.scene().transform(camera).unwrap().position;
        assert!(before.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));

        ctx.dispatch_input(InputEvent::Zoom { delta: 1.0 });
        ctx.tick(0.016);
        let after = ctx.scene().transform(camera).unwrap().position;
        assert!(after.abs_diff_eq(Vec3::new(0.0, 0.0, 9.0), 1e-4));
    }
}
