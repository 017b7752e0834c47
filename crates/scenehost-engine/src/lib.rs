//! Scenehost Engine - Headless runtime context and scene graph
//!
//! This crate provides the engine capabilities the scene host components
//! are written against:
//! - Runtime contexts bound to a drawable surface
//! - An arena scene graph with typed components and attachable behaviors
//! - Per-frame callbacks with explicit subscription handles
//! - Cancellable asynchronous asset loading from pluggable sources
//! - An injectable graphics backend (headless by default)

pub mod asset;
pub mod backend;
pub mod behavior;
pub mod component;
pub mod container;
pub mod context;
pub mod error;
pub mod frame;
pub mod scene;
pub mod surface;

pub use asset::{
    Asset, AssetKind, AssetResource, AssetSource, ContainerResource, FetchFuture,
    FileAssetSource, LoadId, LoadStatus, MemoryAssetSource, ModelResource,
};
pub use backend::{BackendStats, FrameView, GraphicsBackend, NullBackend, RenderTarget};
pub use behavior::{Behavior, InputEvent, OrbitCamera, OrbitCameraParams};
pub use component::{
    CameraParams, Color, Component, ComponentKind, LightKind, LightParams, Material,
    ModelComponent, Primitive,
};
pub use context::{ContextId, ContextOptions, Engine, RuntimeContext};
pub use error::{AssetError, BehaviorError, EngineError};
pub use frame::{FrameClock, FrameSubscription, FrameTime};
pub use scene::{Entity, EntityId, Scene, Transform};
pub use surface::{FillMode, ResolutionMode, Surface};

pub use glam::{Quat, Vec3};
