//! Viewport controller for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: f64 = 0.05;
/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 9.99;
/// Wheel zoom base: each unit of vertical wheel delta scales by this factor.
pub const WHEEL_ZOOM_BASE: f64 = 0.995;

/// Scale and translation mapping world coordinates onto the screen:
/// `screen = world * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Translation as a vector.
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }
}

/// Owns the zoom scale and pan translation, keeping the scale inside
/// `[min_zoom, max_zoom]` after every change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    transform: ViewportTransform,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
    }
}

impl Viewport {
    /// Create an identity viewport with the given zoom bounds.
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        let mut viewport = Self {
            transform: ViewportTransform::IDENTITY,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        };
        viewport.set_zoom_limits(min_zoom, max_zoom);
        viewport
    }

    /// Current transform.
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Current zoom scale.
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Replace the zoom bounds and re-clamp the current scale at the origin.
    /// Bounds that are not positive or are inverted are swapped/replaced.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let (mut lo, mut hi) = (min_zoom, max_zoom);
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        if !(lo > 0.0 && lo.is_finite()) {
            log::warn!("Invalid min zoom {min_zoom}, using {DEFAULT_MIN_ZOOM}");
            lo = DEFAULT_MIN_ZOOM;
        }
        if !(hi >= lo && hi.is_finite()) {
            log::warn!("Invalid max zoom {max_zoom}, using {DEFAULT_MAX_ZOOM}");
            hi = DEFAULT_MAX_ZOOM.max(lo);
        }
        self.min_zoom = lo;
        self.max_zoom = hi;
        let clamped = self.clamp(self.transform.scale);
        self.zoom_to_point(Point::ZERO, clamped);
    }

    /// Clamp a scale into the zoom bounds.
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.transform.scale.clamp(self.min_zoom, self.max_zoom);
        }
        scale.clamp(self.min_zoom, self.max_zoom)
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn affine(&self) -> Affine {
        Affine::translate(self.transform.translation()) * Affine::scale(self.transform.scale)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.affine().inverse() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.affine() * world_point
    }

    /// Pan by a delta in screen coordinates. Panning is unbounded.
    pub fn pan(&mut self, delta: Vec2) {
        self.transform.translate_x += delta.x;
        self.transform.translate_y += delta.y;
    }

    /// Set an absolute scale (clamped), keeping `screen_point` fixed.
    /// Returns the applied scale.
    pub fn zoom_to_point(&mut self, screen_point: Point, scale: f64) -> f64 {
        let scale = self.clamp(scale);
        let world_point = self.screen_to_world(screen_point);
        self.transform.scale = scale;
        // Adjust offset so world_point stays at screen_point
        let moved = self.world_to_screen(world_point);
        self.pan(screen_point - moved);
        scale
    }

    /// Multiply the current scale by `factor` (clamped), keeping `screen_point`
    /// fixed. Returns the applied scale.
    pub fn change_zoom(&mut self, screen_point: Point, factor: f64) -> f64 {
        self.zoom_to_point(screen_point, self.transform.scale * factor)
    }

    /// Replace the whole transform. The scale is clamped at the origin.
    pub fn set_transform(&mut self, transform: ViewportTransform) {
        self.transform = ViewportTransform {
            scale: if transform.scale.is_finite() && transform.scale > 0.0 {
                transform.scale
            } else {
                1.0
            },
            ..transform
        };
        let clamped = self.clamp(self.transform.scale);
        self.zoom_to_point(Point::ZERO, clamped);
    }
}
