//! Graphics backend capability
//!
//! The runtime context never talks to a GPU directly. It asks an injected
//! [`GraphicsBackend`] for a [`RenderTarget`] bound to its surface and hands
//! that target one [`FrameView`] per tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::EngineError;
use crate::scene::{EntityId, Scene};
use crate::surface::Surface;

/// What a render target sees for one frame
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    /// First camera found in the scene, if any
    pub camera: Option<EntityId>,
    pub frame_index: u64,
    pub dt: f32,
}

/// Opens render targets for surfaces
pub trait GraphicsBackend: Send + Sync {
    fn name(&self) -> &str;

    fn open(&self, surface: &Surface) -> Result<Box<dyn RenderTarget>, EngineError>;
}

/// A live binding between one context and its surface
pub trait RenderTarget {
    fn resize(&mut self, surface: &Surface);

    fn present(&mut self, frame: &FrameView<'_>);

    /// Called exactly once when the owning context is destroyed
    fn release(&mut self);
}

/// Counters shared between a backend and everything it opened
#[derive(Debug, Default)]
pub struct BackendStats {
    opened: AtomicU64,
    released: AtomicU64,
    frames: AtomicU64,
    resizes: AtomicU64,
}

impl BackendStats {
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn resizes(&self) -> u64 {
        self.resizes.load(Ordering::SeqCst)
    }

    /// Targets opened and not yet released
    pub fn live(&self) -> u64 {
        self.opened().saturating_sub(self.released())
    }
}

/// Headless backend that draws nothing and counts what it was asked to do
#[derive(Debug, Default, Clone)]
pub struct NullBackend {
    stats: Arc<BackendStats>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<BackendStats> {
        self.stats.clone()
    }
}

impl GraphicsBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn open(&self, surface: &Surface) -> Result<Box<dyn RenderTarget>, EngineError> {
        if surface.is_empty() {
            return Err(EngineError::EmptySurface {
                width: surface.width,
                height: surface.height,
            });
        }
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(NullTarget {
            stats: self.stats.clone(),
            released: false,
        }))
    }
}

struct NullTarget {
    stats: Arc<BackendStats>,
    released: bool,
}

impl RenderTarget for NullTarget {
    fn resize(&mut self, _surface: &Surface) {
        self.stats.resizes.fetch_add(1, Ordering::SeqCst);
    }

    fn present(&mut self, _frame: &FrameView<'_>) {
        self.stats.frames.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.stats.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
