//! Drag-to-pan.

use super::{ModeBehavior, ToolContext};
use crate::input::Pointer;
use kurbo::Point;

/// Translates the viewport by the screen-space pointer delta while held.
#[derive(Debug, Default)]
pub struct DragTool {
    last_screen: Option<Point>,
}

impl DragTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.last_screen.is_some()
    }
}

impl ModeBehavior for DragTool {
    fn on_pointer_down(&mut self, _ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        self.last_screen = Some(pointer.screen);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        let Some(last) = self.last_screen else {
            return;
        };
        ctx.viewport.pan(pointer.screen - last);
        self.last_screen = Some(pointer.screen);
        ctx.request_render();
    }

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &Pointer) {
        self.last_screen = None;
    }

    fn on_exit(&mut self, _ctx: &mut ToolContext<'_>) {
        self.last_screen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixture::Fixture;
    use kurbo::Vec2;

    #[test]
    fn test_drag_pans_by_screen_delta() {
        let mut fx = Fixture::new();
        fx.viewport.change_zoom(Point::ZERO, 2.0);
        let mut tool = DragTool::new();
        let down = fx.pointer(100.0, 100.0);
        tool.on_pointer_down(&mut fx.ctx(), &down);
        let mv = fx.pointer(130.0, 80.0);
        tool.on_pointer_move(&mut fx.ctx(), &mv);
        let mv = fx.pointer(140.0, 90.0);
        tool.on_pointer_move(&mut fx.ctx(), &mv);
        tool.on_pointer_up(&mut fx.ctx(), &mv);

        assert_eq!(fx.viewport.transform().translation(), Vec2::new(40.0, -10.0));
        assert!((fx.viewport.scale() - 2.0).abs() < f64::EPSILON);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_move_without_press_does_not_pan() {
        let mut fx = Fixture::new();
        let mut tool = DragTool::new();
        let mv = fx.pointer(50.0, 50.0);
        tool.on_pointer_move(&mut fx.ctx(), &mv);
        assert_eq!(fx.viewport.transform().translation(), Vec2::ZERO);
    }
}
