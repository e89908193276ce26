//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.16;
/// Approximate advance of one character as a multiple of the font size.
const CHAR_WIDTH: f64 = 0.6;
/// Minimum box width so an empty text node can still be hit.
const MIN_WIDTH: f64 = 20.0;

/// A text box. Glyph layout belongs to the host renderer; bounds here are an
/// approximation good enough for hit testing and content extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Text content, lines separated by `\n`.
    pub content: String,
    /// Font size in world units.
    pub font_size: f64,
    /// Style properties. The glyph color is the fill color.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size in pixels.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::default(),
        }
    }

    /// Font size derived from a brush width.
    pub fn font_size_for_brush(brush_width: u32) -> f64 {
        brush_width as f64 * 3.0 + 10.0
    }

    /// Approximate width of the widest line.
    pub fn approximate_width(&self) -> f64 {
        let widest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        (widest as f64 * self.font_size * CHAR_WIDTH).max(MIN_WIDTH)
    }

    /// Approximate height of all lines.
    pub fn approximate_height(&self) -> f64 {
        let lines = self.content.lines().count().max(1);
        lines as f64 * self.font_size * LINE_HEIGHT
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.approximate_width(),
            self.position.y + self.approximate_height(),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Glyphs are shaped by the renderer; the path is the text box.
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
