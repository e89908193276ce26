//! Shape definitions for the board.

mod ellipse;
mod freehand;
mod image;
mod line;
mod rectangle;
mod text;
mod triangle;

pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use image::Image;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;
pub use triangle::Triangle;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opacity used by the eraser to preview an object about to be removed.
pub const ERASE_PREVIEW_OPACITY: f64 = 0.2;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every object on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Whether native selection may pick this object up.
    #[serde(default)]
    pub selectable: bool,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Whether the eraser is currently previewing this object.
    pub fn is_erase_preview(&self) -> bool {
        (self.opacity - ERASE_PREVIEW_OPACITY).abs() < f64::EPSILON
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
            selectable: false,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [single] => (*single - point).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Every kind of object a scene can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Freehand(Freehand),
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Text(Text),
    Image(Image),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Freehand($s) => $body,
            Shape::Line($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Triangle($s) => $body,
            Shape::Text($s) => $body,
            Shape::Image($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance))
    }

    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    /// Check if this shape is a text node.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the text node mutably, if this shape is one.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, as used in the scene document.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Freehand(_) => "freehand",
            Shape::Line(_) => "line",
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Triangle(_) => "triangle",
            Shape::Text(_) => "text",
            Shape::Image(_) => "image",
        }
    }
}
