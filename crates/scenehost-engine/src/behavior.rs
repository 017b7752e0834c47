//! Attachable behaviors and orbit camera navigation

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::BehaviorError;
use crate::scene::Transform;

/// Pointer input forwarded to behaviors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer drag in pixels
    Drag { dx: f32, dy: f32 },
    /// Scroll wheel steps, positive zooms in
    Zoom { delta: f32 },
}

impl InputEvent {
    pub fn is_finite(&self) -> bool {
        match *self {
            InputEvent::Drag { dx, dy } => dx.is_finite() && dy.is_finite(),
            InputEvent::Zoom { delta } => delta.is_finite(),
        }
    }
}

/// Initial orbit camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitCameraParams {
    /// Distance from the pivot
    pub distance: f32,
    /// Elevation above the pivot's horizontal plane, in degrees
    pub polar: f32,
    /// Rotation around the vertical axis, in degrees
    pub azimuth: f32,
}

impl OrbitCameraParams {
    pub fn validate(&self) -> Result<(), BehaviorError> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(BehaviorError::InvalidDistance(self.distance));
        }
        if !self.polar.is_finite() || !(-90.0..=90.0).contains(&self.polar) {
            return Err(BehaviorError::InvalidPolarAngle(self.polar));
        }
        if !self.azimuth.is_finite() {
            return Err(BehaviorError::InvalidAzimuthAngle(self.azimuth));
        }
        Ok(())
    }
}

/// Orbit camera controller state
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub distance: f32,
    pub polar: f32,
    pub azimuth: f32,
    pub pivot: Vec3,
    /// Degrees of rotation per dragged pixel
    pub sensitivity: f32,
    /// Fraction of the distance covered per zoom step
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(params: OrbitCameraParams) -> Result<Self, BehaviorError> {
        params.validate()?;
        Ok(Self {
            distance: params.distance,
            polar: params.polar,
            azimuth: params.azimuth,
            pivot: Vec3::ZERO,
            sensitivity: 0.3,
            zoom_speed: 0.1,
            min_distance: params.distance.min(0.5),
            max_distance: params.distance.max(100.0),
        })
    }

    pub fn params(&self) -> OrbitCameraParams {
        OrbitCameraParams {
            distance: self.distance,
            polar: self.polar,
            azimuth: self.azimuth,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        // NaN would survive the clamps below and stick
        if !event.is_finite() {
            return;
        }
        match event {
            InputEvent::Drag { dx, dy } => {
                self.azimuth = (self.azimuth - dx * self.sensitivity).rem_euclid(360.0);
                self.polar = (self.polar + dy * self.sensitivity).clamp(-90.0, 90.0);
            }
            InputEvent::Zoom { delta } => {
                let factor = 1.0 - delta * self.zoom_speed;
                self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
            }
        }
    }

    /// Camera transform looking at the pivot from the current orbit position
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.azimuth.to_radians(),
            -self.polar.to_radians(),
            0.0,
        );
        let forward = rotation * Vec3::NEG_Z;
        Transform {
            position: self.pivot - forward * self.distance,
            rotation,
        }
    }
}

/// Behaviors a script component can run
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    OrbitCamera(OrbitCamera),
}

impl Behavior {
    pub fn name(&self) -> &'static str {
        match self {
            Behavior::OrbitCamera(_) => "orbitCamera",
        }
    }

    pub fn validate(&self) -> Result<(), BehaviorError> {
        match self {
            Behavior::OrbitCamera(orbit) => orbit.params().validate(),
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match self {
            Behavior::OrbitCamera(orbit) => orbit.handle_input(event),
        }
    }

    /// Transform the behavior wants its entity to have this frame
    pub fn update(&self) -> Option<Transform> {
        match self {
            Behavior::OrbitCamera(orbit) => Some(orbit.transform()),
        }
    }
}
