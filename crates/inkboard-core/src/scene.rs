//! Scene document: the ordered objects on the board plus the page background.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Margin kept free below a portrait page when it is fitted to the canvas height.
pub const PAGE_MARGIN: f64 = 100.0;

/// Page image shown behind every object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Source reference the host decodes from.
    pub source: String,
    /// Natural width in pixels.
    pub source_width: u32,
    /// Natural height in pixels.
    pub source_height: u32,
    /// Uniform display scale.
    pub scale: f64,
    /// Center of the page in world coordinates.
    pub center: Point,
}

impl Background {
    /// Fit a page onto a canvas: landscape pages fill the width, portrait pages
    /// fill the height minus [`PAGE_MARGIN`]. The page is centered on the canvas.
    pub fn fitted(source: String, source_width: u32, source_height: u32, canvas: Size) -> Self {
        let scale = if source_width > source_height {
            canvas.width / source_width as f64
        } else {
            (canvas.height - PAGE_MARGIN).max(1.0) / source_height as f64
        };
        Self {
            source,
            source_width,
            source_height,
            scale,
            center: Point::new(canvas.width / 2.0, canvas.height / 2.0),
        }
    }

    /// Displayed page rectangle.
    pub fn bounds(&self) -> Rect {
        let size = Size::new(
            self.source_width as f64 * self.scale,
            self.source_height as f64 * self.scale,
        );
        Rect::from_center_size(self.center, size)
    }
}

/// Axis-aligned extent of the scene content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentBounds {
    /// Sentinel reported for an empty scene: min above max on both axes.
    pub const EMPTY: Self = Self {
        min_x: 10000.0,
        min_y: 10000.0,
        max_x: -10000.0,
        max_y: -10000.0,
        width: -20000.0,
        height: -20000.0,
    };

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            min_x: rect.x0,
            min_y: rect.y0,
            max_x: rect.x1,
            max_y: rect.y1,
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// Whether these are the empty-scene sentinel bounds.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }
}

/// The ordered collection of objects currently on the board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Objects back to front.
    #[serde(default)]
    pub objects: Vec<Shape>,
    /// Optional page image behind all objects.
    #[serde(default)]
    pub background: Option<Background>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object on top of the others.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.objects.push(shape);
        id
    }

    /// Remove an object. Removing an absent object is a no-op returning `None`.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.objects.iter().position(|s| s.id() == id)?;
        Some(self.objects.remove(index))
    }

    /// Replace an existing object with the same id. Returns false if absent.
    pub fn replace(&mut self, shape: Shape) -> bool {
        match self.get_mut(shape.id()) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    /// Get an object by id.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id() == id)
    }

    /// Get a mutable reference to an object by id.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Whether an object with this id is present.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Remove every object, keeping the background.
    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }

    /// Topmost object under a point (in world coordinates).
    pub fn shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.objects
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(|s| s.id())
    }

    /// Toggle native selectability on every object.
    pub fn set_all_selectable(&mut self, selectable: bool) {
        for shape in &mut self.objects {
            shape.style_mut().selectable = selectable;
        }
    }

    /// Return every object shown at eraser preview opacity to full opacity.
    pub fn clear_erase_previews(&mut self) {
        for shape in &mut self.objects {
            let style = shape.style_mut();
            if style.is_erase_preview() {
                style.opacity = 1.0;
            }
        }
    }

    /// Tightest box covering every object's painted bounds (stroke included),
    /// or [`ContentBounds::EMPTY`].
    pub fn content_bounds(&self) -> ContentBounds {
        self.objects
            .iter()
            .map(|s| {
                let half = s.style().stroke_width / 2.0;
                s.bounds().inflate(half, half)
            })
            .reduce(|acc, b| acc.union(b))
            .map(ContentBounds::from_rect)
            .unwrap_or(ContentBounds::EMPTY)
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Serialize the scene to its JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a scene from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
