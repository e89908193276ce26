//! Ellipse shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned ellipse, positioned by the top-left of its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse whose bounding box starts at `position`.
    pub fn new(position: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            radius_x,
            radius_y,
            style: ShapeStyle::default(),
        }
    }

    /// Create an ellipse inscribed in the box spanned by two corners.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let mut ellipse = Self::new(p1, 0.0, 0.0);
        ellipse.set_corners(p1, p2);
        ellipse
    }

    /// Reshape to the ellipse inscribed in the box spanned by two corners.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        self.position = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        self.radius_x = (p2.x - p1.x).abs() / 2.0;
        self.radius_y = (p2.y - p1.y).abs() / 2.0;
    }

    /// Center of the ellipse.
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.radius_x, self.position.y + self.radius_y)
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center(), (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + 2.0 * self.radius_x,
            self.position.y + 2.0 * self.radius_y,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let center = self.center();
        let half_sw = self.style.stroke_width / 2.0;
        let dx_outer = (point.x - center.x) / (self.radius_x + tolerance + half_sw);
        let dy_outer = (point.y - center.y) / (self.radius_y + tolerance + half_sw);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = (self.radius_x - tolerance - half_sw).max(0.0);
        let inner_ry = (self.radius_y - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - center.x) / inner_rx;
        let dy_inner = (point.y - center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
