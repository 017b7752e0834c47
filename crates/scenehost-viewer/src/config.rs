//! Configuration loading and validation

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

/// Which host component to mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Rotating box demo scene
    #[default]
    Box,
    /// Model loaded from `model_url`
    Model,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub host: HostKind,
    /// Model location, required for the model host
    #[serde(default)]
    pub model_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Frames to run before unmounting (0 runs until interrupted)
    #[serde(default = "default_frames")]
    pub frames: u64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            frame_rate: default_frame_rate(),
        }
    }
}

fn default_frames() -> u64 {
    600
}

fn default_frame_rate() -> u32 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory relative model paths resolve against
    #[serde(default)]
    pub base_dir: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            base_dir: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.surface.width == 0 || self.surface.height == 0 {
            bail!(
                "surface must have a non-zero size, got {}x{}",
                self.surface.width,
                self.surface.height
            );
        }
        if self.run.frame_rate == 0 {
            bail!("frame_rate must be at least 1");
        }
        if self.scene.host == HostKind::Model && self.scene.model_url.is_none() {
            bail!("the model host needs scene.model_url");
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let config = Config {
        scene: SceneConfig {
            host: HostKind::Model,
            model_url: Some("models/scene.glb".to_string()),
        },
        ..Config::default()
    };

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}
