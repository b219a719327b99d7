//! Projector & Frame Loop Settings
//!
//! Plain configuration structs with sensible defaults and builder-style
//! helpers. All of them are `serde`-serializable so applications can keep
//! them in their own config files.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lumen::settings::{ProjectorSettings, Viewport};
//!
//! // Default: 1280x720, objects and elements painter-sorted, frustum culling on
//! let settings = ProjectorSettings::default();
//!
//! // Unsorted output for an opaque-only depth-buffered backend
//! let settings = ProjectorSettings::default()
//!     .with_viewport(Viewport::new(800, 600))
//!     .with_sorting(false, false);
//! ```

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scene::ObjectMask;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Maps normalized device coordinates (y up, `[-1, 1]`) to pixel
    /// coordinates (y down, origin top-left).
    #[inline]
    #[must_use]
    pub fn ndc_to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }

    /// Half the viewport size, the scale between NDC extents and pixels.
    #[inline]
    #[must_use]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

// ---------------------------------------------------------------------------
// ProjectorSettings
// ---------------------------------------------------------------------------

/// Controls what a [`Projector`](crate::projector::Projector) emits and how it
/// orders the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorSettings {
    /// Target surface; screen-space coordinates are expressed in its pixels.
    pub viewport: Viewport,
    /// Painter-sort the object list (far first).
    pub sort_objects: bool,
    /// Painter-sort the element list (far first).
    pub sort_elements: bool,
    /// Reject meshes and lines whose bounding sphere lies outside the frustum.
    pub frustum_culling: bool,
    /// Build per-material element buckets after sorting.
    pub bucket_by_material: bool,
    /// Object types the graph walk collects.
    pub object_mask: ObjectMask,
}

impl Default for ProjectorSettings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            sort_objects: true,
            sort_elements: true,
            frustum_culling: true,
            bucket_by_material: true,
            object_mask: ObjectMask::RENDERABLE,
        }
    }
}

impl ProjectorSettings {
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_sorting(mut self, sort_objects: bool, sort_elements: bool) -> Self {
        self.sort_objects = sort_objects;
        self.sort_elements = sort_elements;
        self
    }

    #[must_use]
    pub fn with_frustum_culling(mut self, enabled: bool) -> Self {
        self.frustum_culling = enabled;
        self
    }

    #[must_use]
    pub fn with_object_mask(mut self, mask: ObjectMask) -> Self {
        self.object_mask = mask;
        self
    }
}

// ---------------------------------------------------------------------------
// FrameLoopSettings
// ---------------------------------------------------------------------------

/// Pacing configuration for [`FrameLoop`](crate::app::FrameLoop).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopSettings {
    /// Soft frame-rate cap. `None` runs frames back to back.
    pub target_fps: Option<u32>,
    /// Stop after this many frames. `None` runs until quit.
    pub max_frames: Option<u64>,
    /// Log the measured frame rate at `debug` level.
    pub report_fps: bool,
}

impl Default for FrameLoopSettings {
    fn default() -> Self {
        Self {
            target_fps: Some(60),
            max_frames: None,
            report_fps: true,
        }
    }
}

impl FrameLoopSettings {
    #[must_use]
    pub fn with_target_fps(mut self, fps: Option<u32>) -> Self {
        self.target_fps = fps;
        self
    }

    #[must_use]
    pub fn with_max_frames(mut self, frames: Option<u64>) -> Self {
        self.max_frames = frames;
        self
    }

    /// Minimum duration of one frame, derived from `target_fps`.
    #[must_use]
    pub fn target_frame_interval(&self) -> Option<Duration> {
        match self.target_fps {
            Some(fps) if fps > 0 => Some(Duration::from_secs_f64(1.0 / f64::from(fps))),
            _ => None,
        }
    }
}
