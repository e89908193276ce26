//! Line, rectangle, ellipse and triangle tools.

use super::{ModeBehavior, ToolContext};
use crate::input::Pointer;
use crate::session::{DraftKind, DrawingSession};

/// Drives one [`DrawingSession`] per drag gesture.
#[derive(Debug)]
pub struct ShapeTool {
    kind: DraftKind,
    session: Option<DrawingSession>,
}

impl ShapeTool {
    pub fn new(kind: DraftKind) -> Self {
        Self {
            kind,
            session: None,
        }
    }

    pub fn kind(&self) -> DraftKind {
        self.kind
    }

    /// The live session, if a drag is in progress.
    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }
}

impl ModeBehavior for ShapeTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        if self.session.as_ref().is_some_and(DrawingSession::is_active) {
            log::warn!("Pointer down during an active {:?} draft, ignoring", self.kind);
            return;
        }
        self.session = Some(DrawingSession::begin(
            ctx.scene,
            pointer.world,
            self.kind,
            ctx.settings,
        ));
        ctx.request_render();
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        if let Some(session) = &self.session {
            if session.update(ctx.scene, pointer.world) {
                ctx.request_render();
            }
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, _pointer: &Pointer) {
        if let Some(mut session) = self.session.take() {
            if session.end(ctx.scene, ctx.history) {
                ctx.request_render();
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(session) = self.session.take() {
            session.cancel(ctx.scene);
            ctx.request_render();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use crate::tools::fixture::Fixture;
    use kurbo::Point;

    fn drag(tool: &mut ShapeTool, fx: &mut Fixture, from: (f64, f64), to: (f64, f64)) {
        let down = fx.pointer(from.0, from.1);
        tool.on_pointer_down(&mut fx.ctx(), &down);
        let mv = fx.pointer(to.0, to.1);
        tool.on_pointer_move(&mut fx.ctx(), &mv);
        tool.on_pointer_up(&mut fx.ctx(), &mv);
    }

    #[test]
    fn test_rectangle_drag() {
        let mut fx = Fixture::new();
        let mut tool = ShapeTool::new(DraftKind::Rectangle);
        drag(&mut tool, &mut fx, (10.0, 10.0), (50.0, 80.0));
        assert_eq!(fx.history.len(), 1);
        match &fx.scene.objects[0] {
            Shape::Rectangle(rect) => {
                assert_eq!(rect.position, Point::new(10.0, 10.0));
                assert!((rect.width - 40.0).abs() < f64::EPSILON);
                assert!((rect.height - 70.0).abs() < f64::EPSILON);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
        assert!(tool.session().is_none());
    }

    #[test]
    fn test_drag_in_world_coordinates() {
        let mut fx = Fixture::new();
        fx.viewport.change_zoom(Point::ZERO, 2.0);
        let mut tool = ShapeTool::new(DraftKind::Ellipse);
        drag(&mut tool, &mut fx, (0.0, 0.0), (80.0, 40.0));
        match &fx.scene.objects[0] {
            Shape::Ellipse(ellipse) => {
                assert!((ellipse.radius_x - 20.0).abs() < 1e-9);
                assert!((ellipse.radius_y - 10.0).abs() < 1e-9);
            }
            other => panic!("expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn test_second_press_during_draft_ignored() {
        let mut fx = Fixture::new();
        let mut tool = ShapeTool::new(DraftKind::Line);
        let down = fx.pointer(0.0, 0.0);
        tool.on_pointer_down(&mut fx.ctx(), &down);
        tool.on_pointer_down(&mut fx.ctx(), &down);
        assert_eq!(fx.scene.len(), 1);
    }

    #[test]
    fn test_up_without_down_is_noop() {
        let mut fx = Fixture::new();
        let mut tool = ShapeTool::new(DraftKind::Triangle);
        let up = fx.pointer(3.0, 3.0);
        tool.on_pointer_up(&mut fx.ctx(), &up);
        assert!(fx.history.is_empty());
    }
}
