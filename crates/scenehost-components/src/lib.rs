//! Scenehost Components - Scene hosts bound to a runtime context
//!
//! Two components share one lifecycle: mounting creates a runtime context,
//! builds a scene and starts the run loop; unmounting destroys the context.
//! - [`SceneHost`] shows a rotating box
//! - [`AssetSceneHost`] shows a model loaded from a URL behind an orbit camera

pub mod asset_host;
pub mod host;
pub mod scene_host;

pub use asset_host::{AssetSceneHost, AssetSceneProps, ModelState};
pub use host::{SceneComponent, SurfaceProps};
pub use scene_host::{spin_delta, SceneHost};
