//! Viewport transform math.
//!
//! [`ViewportModel`] applies pan and zoom operations to [`Viewport`] values
//! and maps points between screen space and world space:
//!
//! ```text
//! to_screen(p) = p * zoom + pan
//! to_world(p)  = (p - pan) / zoom
//! ```
//!
//! Every zoom change goes through [`ViewportModel::zoom_at`], which keeps
//! the world point under the anchor fixed on screen.

use crate::board::{Point, Viewport};
use crate::config::{CanvasSettings, ZoomLimits, DEFAULT_WHEEL_ZOOM_FACTOR};

/// Map a world-space point to screen space.
#[inline]
pub fn to_screen(viewport: &Viewport, world: Point) -> Point {
    world * viewport.zoom + viewport.pan
}

/// Map a screen-space point to world space.
#[inline]
pub fn to_world(viewport: &Viewport, screen: Point) -> Point {
    (screen - viewport.pan) / viewport.zoom
}

/// Pan/zoom operations bound to a set of zoom limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportModel {
    limits: ZoomLimits,
    wheel_zoom_factor: f64,
}

impl Default for ViewportModel {
    fn default() -> Self {
        Self {
            limits: ZoomLimits::default(),
            wheel_zoom_factor: DEFAULT_WHEEL_ZOOM_FACTOR,
        }
    }
}

impl ViewportModel {
    /// Invalid limits or a wheel factor not above 1 fall back to the
    /// defaults.
    pub fn new(limits: ZoomLimits, wheel_zoom_factor: f64) -> Self {
        let wheel_zoom_factor = if wheel_zoom_factor.is_finite() && wheel_zoom_factor > 1.0 {
            wheel_zoom_factor
        } else {
            tracing::warn!(wheel_zoom_factor, "Invalid wheel zoom factor, using default");
            DEFAULT_WHEEL_ZOOM_FACTOR
        };
        Self {
            limits: limits.or_default(),
            wheel_zoom_factor,
        }
    }

    pub fn from_settings(settings: &CanvasSettings) -> Self {
        Self::new(settings.zoom_limits, settings.wheel_zoom_factor)
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Shift the pan offset by a screen-space delta. Zoom is unchanged.
    pub fn pan(&self, viewport: Viewport, delta: Point) -> Viewport {
        Viewport {
            pan: viewport.pan + delta,
            zoom: viewport.zoom,
        }
    }

    /// Set the zoom while keeping the world point under `anchor` fixed.
    ///
    /// The requested zoom is clamped to the limits. Unusable requests
    /// (non-finite, zero, negative) leave the viewport untouched.
    pub fn zoom_at(&self, viewport: Viewport, anchor: Point, new_zoom: f64) -> Viewport {
        let Some(zoom) = self.limits.clamp(new_zoom) else {
            tracing::trace!("Ignoring unusable zoom request {}", new_zoom);
            return viewport;
        };

        let world_before = to_world(&viewport, anchor);
        Viewport {
            pan: anchor - world_before * zoom,
            zoom,
        }
    }

    /// One wheel step anchored at the cursor: zoom in for negative deltas,
    /// out for positive ones.
    pub fn wheel_zoom(&self, viewport: Viewport, anchor: Point, delta_y: f64) -> Viewport {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return viewport;
        }
        let new_zoom = if delta_y < 0.0 {
            viewport.zoom * self.wheel_zoom_factor
        } else {
            viewport.zoom / self.wheel_zoom_factor
        };
        self.zoom_at(viewport, anchor, new_zoom)
    }

    /// The "Reset View" viewport.
    pub fn reset(&self) -> Viewport {
        Viewport::default()
    }

    /// World-space point at the center of a canvas of the given screen size.
    pub fn visible_world_center(&self, viewport: &Viewport, canvas_size: Point) -> Point {
        to_world(viewport, canvas_size / 2.0)
    }
}
