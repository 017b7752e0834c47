//! Typed components that can be attached to scene entities

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::asset::ModelResource;
use crate::behavior::Behavior;

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Built-in primitive shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Box,
    Sphere,
    Plane,
}

/// Surface material for primitive render components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub diffuse: Color,
    pub opacity: f32,
}

impl Default for Material {
    /// White, fully opaque standard material
    fn default() -> Self {
        Self {
            diffuse: Color::WHITE,
            opacity: 1.0,
        }
    }
}

impl Material {
    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }
}

/// Perspective camera settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub clear_color: Color,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov: 45.0,
            clear_color: Color::rgb(0.5, 0.5, 0.5),
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightParams {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl LightParams {
    pub fn directional() -> Self {
        Self {
            kind: LightKind::Directional,
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

/// A renderable model taken from a loaded container asset
#[derive(Debug, Clone)]
pub struct ModelComponent {
    /// URL of the asset the model came from
    pub source: String,
    pub resource: Arc<ModelResource>,
}

impl PartialEq for ModelComponent {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && Arc::ptr_eq(&self.resource, &other.resource)
    }
}

/// Components an entity can carry. At most one of each kind per entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Collision/bounds shape
    Shape { primitive: Primitive },
    /// Visible primitive
    Render { primitive: Primitive, material: Material },
    Camera(CameraParams),
    Light(LightParams),
    Model(ModelComponent),
    /// Behaviors run by the context every frame
    Script(Vec<Behavior>),
}

/// Discriminant of [`Component`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Shape,
    Render,
    Camera,
    Light,
    Model,
    Script,
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Shape { .. } => ComponentKind::Shape,
            Component::Render { .. } => ComponentKind::Render,
            Component::Camera(_) => ComponentKind::Camera,
            Component::Light(_) => ComponentKind::Light,
            Component::Model(_) => ComponentKind::Model,
            Component::Script(_) => ComponentKind::Script,
        }
    }
}
