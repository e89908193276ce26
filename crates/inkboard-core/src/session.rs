//! Shape drafting across one pointer-down, move, up gesture.

use crate::history::HistoryStore;
use crate::scene::Scene;
use crate::settings::DrawingSettings;
use crate::shapes::{Ellipse, Line, Rectangle, Shape, ShapeId, Triangle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Shapes drafted by dragging from an origin point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftKind {
    Line,
    Rectangle,
    Ellipse,
    Triangle,
}

impl DraftKind {
    /// A zero-size shape of this kind anchored at `origin`.
    fn create(self, origin: Point) -> Shape {
        match self {
            DraftKind::Line => Shape::Line(Line::new(origin, origin)),
            DraftKind::Rectangle => Shape::Rectangle(Rectangle::new(origin, 0.0, 0.0)),
            DraftKind::Ellipse => Shape::Ellipse(Ellipse::new(origin, 0.0, 0.0)),
            DraftKind::Triangle => Shape::Triangle(Triangle::new(origin, 0.0, 0.0)),
        }
    }
}

/// An in-progress draft. The draft shape lives in the scene from `begin`
/// onwards; `end` commits it, `cancel` takes it back out.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    kind: DraftKind,
    origin: Point,
    draft: ShapeId,
    active: bool,
}

impl DrawingSession {
    /// Add a draft shape at `point` styled from `settings`.
    pub fn begin(
        scene: &mut Scene,
        point: Point,
        kind: DraftKind,
        settings: &DrawingSettings,
    ) -> Self {
        let mut shape = kind.create(point);
        let style = shape.style_mut();
        *style = settings.stroke_style();
        if kind == DraftKind::Line {
            style.fill_color = None;
        }
        let draft = scene.add(shape);
        log::debug!("Drafting {kind:?} {draft} at {point:?}");
        Self {
            kind,
            origin: point,
            draft,
            active: true,
        }
    }

    /// Recompute the draft geometry from the origin to `point`.
    /// Returns false if the session is inactive or the draft has left the scene.
    pub fn update(&self, scene: &mut Scene, point: Point) -> bool {
        if !self.active {
            return false;
        }
        let Some(shape) = scene.get_mut(self.draft) else {
            return false;
        };
        match shape {
            Shape::Line(line) => line.end = point,
            Shape::Rectangle(rect) => rect.set_corners(self.origin, point),
            Shape::Ellipse(ellipse) => ellipse.set_corners(self.origin, point),
            Shape::Triangle(triangle) => triangle.set_corners(self.origin, point),
            _ => return false,
        }
        true
    }

    /// Finish the gesture and snapshot the scene. No-op if already ended.
    pub fn end(&mut self, scene: &Scene, history: &mut HistoryStore) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        history.record(scene)
    }

    /// Abandon the gesture, removing the uncommitted draft.
    pub fn cancel(mut self, scene: &mut Scene) {
        if self.active {
            self.active = false;
            scene.remove(self.draft);
            log::debug!("Discarded draft {}", self.draft);
        }
    }

    pub fn kind(&self) -> DraftKind {
        self.kind
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Id of the draft shape.
    pub fn draft(&self) -> ShapeId {
        self.draft
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;

    fn draft(kind: DraftKind, from: Point, to: Point) -> (Scene, HistoryStore, DrawingSession) {
        let mut scene = Scene::new();
        let mut history = HistoryStore::new();
        let settings = DrawingSettings::default();
        let mut session = DrawingSession::begin(&mut scene, from, kind, &settings);
        assert!(session.update(&mut scene, to));
        assert!(session.end(&scene, &mut history));
        (scene, history, session)
    }

    #[test]
    fn test_rectangle_geometry() {
        let (scene, _, session) = draft(
            DraftKind::Rectangle,
            Point::new(10.0, 10.0),
            Point::new(50.0, 80.0),
        );
        match scene.get(session.draft()) {
            Some(Shape::Rectangle(rect)) => {
                assert_eq!(rect.position, Point::new(10.0, 10.0));
                assert!((rect.width - 40.0).abs() < f64::EPSILON);
                assert!((rect.height - 70.0).abs() < f64::EPSILON);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_rectangle_dragged_up_left() {
        let (scene, _, session) = draft(
            DraftKind::Rectangle,
            Point::new(50.0, 80.0),
            Point::new(10.0, 10.0),
        );
        let bounds = scene.get(session.draft()).unwrap().bounds();
        assert_eq!(bounds.origin(), Point::new(10.0, 10.0));
        assert!((bounds.width() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ellipse_radii() {
        let (scene, _, session) = draft(
            DraftKind::Ellipse,
            Point::new(0.0, 0.0),
            Point::new(40.0, 20.0),
        );
        match scene.get(session.draft()) {
            Some(Shape::Ellipse(ellipse)) => {
                assert_eq!(ellipse.position, Point::ZERO);
                assert!((ellipse.radius_x - 20.0).abs() < f64::EPSILON);
                assert!((ellipse.radius_y - 10.0).abs() < f64::EPSILON);
            }
            other => panic!("expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn test_line_endpoint() {
        let (scene, _, session) = draft(
            DraftKind::Line,
            Point::new(1.0, 2.0),
            Point::new(30.0, 40.0),
        );
        match scene.get(session.draft()) {
            Some(Shape::Line(line)) => {
                assert_eq!(line.start, Point::new(1.0, 2.0));
                assert_eq!(line.end, Point::new(30.0, 40.0));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_area_still_commits() {
        let (scene, history, session) = draft(
            DraftKind::Triangle,
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
        );
        let bounds = scene.get(session.draft()).unwrap().bounds();
        assert!(bounds.width().abs() < f64::EPSILON);
        assert!(bounds.height().abs() < f64::EPSILON);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_end_twice_is_noop() {
        let (scene, mut history, mut session) = draft(
            DraftKind::Rectangle,
            Point::ZERO,
            Point::new(1.0, 1.0),
        );
        assert!(!session.end(&scene, &mut history));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_style_from_settings() {
        let mut scene = Scene::new();
        let settings = DrawingSettings {
            brush_width: 6,
            current_color: SerializableColor::new(0, 0, 255, 255),
            fill_enabled: true,
            ..Default::default()
        };
        let rect = DrawingSession::begin(&mut scene, Point::ZERO, DraftKind::Rectangle, &settings);
        let line = DrawingSession::begin(&mut scene, Point::ZERO, DraftKind::Line, &settings);

        let style = scene.get(rect.draft()).unwrap().style();
        assert_eq!(style.stroke_color, SerializableColor::new(0, 0, 255, 255));
        assert!((style.stroke_width - 6.0).abs() < f64::EPSILON);
        assert_eq!(style.fill_color, Some(SerializableColor::new(0, 0, 255, 255)));
        assert!(!style.selectable);
        assert!(scene.get(line.draft()).unwrap().style().fill_color.is_none());
    }

    #[test]
    fn test_cancel_removes_draft() {
        let mut scene = Scene::new();
        let session = DrawingSession::begin(
            &mut scene,
            Point::ZERO,
            DraftKind::Ellipse,
            &DrawingSettings::default(),
        );
        assert_eq!(scene.len(), 1);
        session.cancel(&mut scene);
        assert!(scene.is_empty());
    }
}
