//! Error types for the engine crate

use thiserror::Error;

use crate::component::ComponentKind;
use crate::scene::EntityId;

/// Errors raised while creating or mutating a runtime context
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("surface has no drawable area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },
    #[error("graphics backend '{backend}' failed: {reason}")]
    Backend { backend: String, reason: String },
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    #[error("entity {child} cannot be attached under {parent}")]
    InvalidParent { parent: EntityId, child: EntityId },
    #[error("entity {entity} already has a {kind:?} component")]
    DuplicateComponent { entity: EntityId, kind: ComponentKind },
    #[error("invalid behavior: {0}")]
    Behavior(#[from] BehaviorError),
    #[error("asset loading requires a running tokio runtime")]
    NoRuntime,
}

/// Errors reported to asset load callbacks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("HTTP {status} while fetching {url}")]
    Status { url: String, status: u16 },
    #[error("failed to decode container: {0}")]
    Decode(String),
    #[error("load was cancelled")]
    Cancelled,
}

/// Validation errors for attachable behaviors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BehaviorError {
    #[error("orbit distance must be positive and finite, got {0}")]
    InvalidDistance(f32),
    #[error("orbit polar angle must be within [-90, 90] degrees, got {0}")]
    InvalidPolarAngle(f32),
    #[error("orbit azimuth angle must be finite, got {0}")]
    InvalidAzimuthAngle(f32),
    #[error("orbit camera needs a camera component on entity {0}")]
    MissingCamera(EntityId),
}
