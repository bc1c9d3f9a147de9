//! Card Rendering Module
//!
//! This module turns the form state into something that can be drawn.
//!
//! # Architecture
//!
//! - `scene.rs` - Resolution-independent display list shared by preview and export
//! - `layout.rs` - Card layout for each template
//! - `raster.rs` - Software rasterizer producing RGBA bitmaps
//!
//! The preview publishes the scene it last painted to a [`PreviewSurface`];
//! exports read from that surface so the file always matches what is on screen.

mod layout;
mod raster;
mod scene;

pub use layout::{background_fill, SceneCache};
#[cfg(test)]
pub use layout::build_scene;
pub use raster::{rasterize_scene, RasterError};
pub use scene::{CardScene, Fill, Shape, TextAlign};

use std::sync::{Arc, Mutex};

/// Handle to the card scene currently shown in the preview.
///
/// Clones share the same slot. An empty surface means no card has been
/// painted yet, which exports report as a missing preview.
#[derive(Debug, Clone, Default)]
pub struct PreviewSurface {
    scene: Arc<Mutex<Option<Arc<CardScene>>>>,
}

impl PreviewSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed scene.
    pub fn publish(&self, scene: CardScene) {
        if let Ok(mut slot) = self.scene.lock() {
            *slot = Some(Arc::new(scene));
        }
    }

    /// The scene most recently published, if any.
    pub fn snapshot(&self) -> Option<Arc<CardScene>> {
        self.scene.lock().ok().and_then(|slot| slot.clone())
    }

    /// Forget the displayed scene (e.g. while the preview is hidden).
    pub fn clear(&self) {
        if let Ok(mut slot) = self.scene.lock() {
            *slot = None;
        }
    }

    /// Whether a scene is currently published.
    pub fn is_mounted(&self) -> bool {
        self.snapshot().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardRecord, Template};

    #[test]
    fn test_surface_starts_empty() {
        let surface = PreviewSurface::new();
        assert!(surface.snapshot().is_none());
        assert!(!surface.is_mounted());
    }

    #[test]
    fn test_clones_share_scene() {
        let surface = PreviewSurface::new();
        let handle = surface.clone();
        surface.publish(build_scene(&CardRecord::sample(), Template::Classic));
        let scene = handle.snapshot().expect("scene published");
        assert_eq!(scene.template, Template::Classic);

        handle.clear();
        assert!(!surface.is_mounted());
    }
}
