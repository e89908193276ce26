//! Freehand pencil.

use super::{ModeBehavior, ToolContext};
use crate::input::Pointer;
use crate::shapes::{Freehand, Shape};

/// Accrues a freehand path while the pointer is down and commits it on release.
#[derive(Debug, Default)]
pub struct PencilTool {
    /// Path being drawn, not yet part of the scene.
    stroke: Option<Shape>,
}

impl PencilTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn stroke_mut(&mut self) -> Option<&mut Freehand> {
        match self.stroke.as_mut() {
            Some(Shape::Freehand(path)) => Some(path),
            _ => None,
        }
    }
}

impl ModeBehavior for PencilTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        let mut path = Freehand::from_points(vec![pointer.world]);
        path.style = ctx.settings.stroke_style();
        path.style.fill_color = None;
        self.stroke = Some(Shape::Freehand(path));
        ctx.request_render();
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        if let Some(path) = self.stroke_mut() {
            path.add_point(pointer.world);
            ctx.request_render();
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, _pointer: &Pointer) {
        if let Some(stroke) = self.stroke.take() {
            ctx.scene.add(stroke);
            ctx.commit();
        }
    }

    fn on_exit(&mut self, _ctx: &mut ToolContext<'_>) {
        if self.stroke.take().is_some() {
            log::debug!("Discarded uncommitted pencil stroke");
        }
    }

    fn preview(&self) -> Option<&Shape> {
        self.stroke.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixture::Fixture;

    #[test]
    fn test_stroke_commits_on_release() {
        let mut fx = Fixture::new();
        let mut pencil = PencilTool::new();
        let p = fx.pointer(0.0, 0.0);
        pencil.on_pointer_down(&mut fx.ctx(), &p);
        for i in 1..5 {
            let p = fx.pointer(i as f64 * 10.0, 0.0);
            pencil.on_pointer_move(&mut fx.ctx(), &p);
        }
        assert!(fx.scene.is_empty());
        match pencil.preview() {
            Some(Shape::Freehand(path)) => assert_eq!(path.len(), 5),
            other => panic!("expected preview, got {other:?}"),
        }

        let p = fx.pointer(40.0, 0.0);
        pencil.on_pointer_up(&mut fx.ctx(), &p);
        assert_eq!(fx.scene.len(), 1);
        assert_eq!(fx.history.len(), 1);
        assert!(pencil.preview().is_none());
    }

    #[test]
    fn test_single_click_still_commits() {
        let mut fx = Fixture::new();
        let mut pencil = PencilTool::new();
        let p = fx.pointer(5.0, 5.0);
        pencil.on_pointer_down(&mut fx.ctx(), &p);
        pencil.on_pointer_up(&mut fx.ctx(), &p);
        assert_eq!(fx.scene.len(), 1);
        assert_eq!(fx.history.len(), 1);
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let mut fx = Fixture::new();
        let mut pencil = PencilTool::new();
        let p = fx.pointer(5.0, 5.0);
        pencil.on_pointer_move(&mut fx.ctx(), &p);
        pencil.on_pointer_up(&mut fx.ctx(), &p);
        assert!(fx.scene.is_empty());
        assert!(fx.history.is_empty());
    }

    #[test]
    fn test_exit_discards_stroke() {
        let mut fx = Fixture::new();
        let mut pencil = PencilTool::new();
        let p = fx.pointer(5.0, 5.0);
        pencil.on_pointer_down(&mut fx.ctx(), &p);
        pencil.on_exit(&mut fx.ctx());
        assert!(pencil.preview().is_none());
        assert!(fx.scene.is_empty());
    }
}
