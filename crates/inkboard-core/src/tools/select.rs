//! Native selection mode.

use super::{ModeBehavior, ToolContext};

/// Hands manipulation to the surface's native selection. Installs no gesture
/// handlers of its own.
#[derive(Debug, Default)]
pub struct SelectTool;

impl ModeBehavior for SelectTool {
    fn on_enter(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.scene.set_all_selectable(true);
        ctx.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Shape};
    use crate::tools::fixture::Fixture;
    use kurbo::Point;

    #[test]
    fn test_enter_makes_everything_selectable() {
        let mut fx = Fixture::new();
        fx.scene.add(Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0))));
        SelectTool.on_enter(&mut fx.ctx());
        assert!(fx.scene.objects[0].style().selectable);
    }

    #[test]
    fn test_pointer_input_ignored() {
        let mut fx = Fixture::new();
        let before = fx.viewport.transform();
        let p = fx.pointer(5.0, 5.0);
        SelectTool.on_pointer_down(&mut fx.ctx(), &p);
        let mv = fx.pointer(50.0, 50.0);
        SelectTool.on_pointer_move(&mut fx.ctx(), &mv);
        SelectTool.on_pointer_up(&mut fx.ctx(), &p);
        assert_eq!(fx.viewport.transform(), before);
        assert!(fx.scene.is_empty());
    }
}
