//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let mut rect = Self::new(p1, 0.0, 0.0);
        rect.set_corners(p1, p2);
        rect
    }

    /// Reshape to the box spanned by two corner points.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        self.position = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        self.width = (p2.x - p1.x).abs();
        self.height = (p2.y - p1.y).abs();
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.style.fill_color.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            // Outline only: hit on the border
            let pad = tolerance + self.style.stroke_width / 2.0;
            let outer = rect.inflate(pad, pad);
            let inner = rect.inflate(-pad, -pad);
            let in_hole = inner.width() > 0.0 && inner.height() > 0.0 && inner.contains(point);
            outer.contains(point) && !in_hole
        }
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
