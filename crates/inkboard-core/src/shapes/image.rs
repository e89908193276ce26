//! Image shape for embedding raster images.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raster image placed on the board. Pixels stay with the host; the scene
/// keeps the source reference and the display geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
    /// Source reference (URL or data URL) the host decodes from.
    pub source: String,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Image {
    /// Create an image at its natural size.
    pub fn new(position: Point, source: String, source_width: u32, source_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: source_width as f64,
            height: source_height as f64,
            source_width,
            source_height,
            source,
            style: ShapeStyle::default(),
        }
    }

    /// Scale uniformly so the displayed height equals `height`.
    pub fn scale_to_height(&mut self, height: f64) {
        if self.source_height == 0 {
            return;
        }
        let scale = height / self.source_height as f64;
        self.width = self.source_width as f64 * scale;
        self.height = height;
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
