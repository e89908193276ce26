//! Triangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isosceles triangle inscribed in its bounding box, apex at the top middle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Triangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Reshape to the box spanned by two corner points.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        self.position = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        self.width = (p2.x - p1.x).abs();
        self.height = (p2.y - p1.y).abs();
    }

    /// Apex, bottom-right and bottom-left vertices.
    pub fn vertices(&self) -> [Point; 3] {
        let Point { x, y } = self.position;
        [
            Point::new(x + self.width / 2.0, y),
            Point::new(x + self.width, y + self.height),
            Point::new(x, y + self.height),
        ]
    }
}

impl ShapeTrait for Triangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.style.fill_color.is_some() && self.to_path().contains(point) {
            return true;
        }
        let [a, b, c] = self.vertices();
        point_to_polyline_dist(point, &[a, b, c, a]) <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let [a, b, c] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.close_path();
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;

    #[test]
    fn test_vertices() {
        let tri = Triangle::new(Point::new(0.0, 0.0), 40.0, 30.0);
        assert_eq!(
            tri.vertices(),
            [Point::new(20.0, 0.0), Point::new(40.0, 30.0), Point::new(0.0, 30.0)]
        );
    }

    #[test]
    fn test_outline_hit() {
        let tri = Triangle::new(Point::new(0.0, 0.0), 40.0, 30.0);
        assert!(tri.hit_test(Point::new(20.0, 30.0), 0.0));
        assert!(!tri.hit_test(Point::new(20.0, 20.0), 0.0));
    }

    #[test]
    fn test_filled_hit() {
        let mut tri = Triangle::new(Point::new(0.0, 0.0), 40.0, 30.0);
        tri.style.fill_color = Some(SerializableColor::black());
        assert!(tri.hit_test(Point::new(20.0, 20.0), 0.0));
        assert!(!tri.hit_test(Point::new(2.0, 2.0), 0.0));
    }
}
