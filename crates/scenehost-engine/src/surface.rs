//! Drawable surface description

use serde::{Deserialize, Serialize};

/// How the surface follows its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Keep the size the surface was created with
    #[default]
    None,
    /// Stretch to fill the hosting window
    FillWindow,
    /// Fill the window while keeping the aspect ratio
    KeepAspect,
}

/// How the render resolution is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Render at the fixed width and height of the surface
    #[default]
    Fixed,
    /// Track the displayed size of the surface
    Auto,
}

/// The pixel area a runtime context renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub fill_mode: FillMode,
    #[serde(default)]
    pub resolution: ResolutionMode,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fill_mode: FillMode::default(),
            resolution: ResolutionMode::default(),
        }
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height, 1.0 for an empty surface
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
