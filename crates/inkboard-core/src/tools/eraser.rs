//! Eraser: hover to preview, click or drag to remove.

use super::{HoverChange, ModeBehavior, ToolContext};
use crate::input::Pointer;
use crate::scene::Scene;
use crate::shapes::{ERASE_PREVIEW_OPACITY, ShapeId};

#[derive(Debug, Default)]
pub struct EraserTool {
    /// Object currently shown at preview opacity.
    hovered: Option<ShapeId>,
    /// Pointer is held down; moving over previewed objects erases them.
    pressed: bool,
}

impl EraserTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn set_opacity(scene: &mut Scene, id: ShapeId, opacity: f64) -> bool {
        match scene.get_mut(id) {
            Some(shape) => {
                shape.style_mut().opacity = opacity;
                true
            }
            None => false,
        }
    }

    fn erase(&mut self, ctx: &mut ToolContext<'_>, id: ShapeId) {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if ctx.scene.remove(id).is_some() {
            log::debug!("Erased {id}");
        }
    }
}

impl ModeBehavior for EraserTool {
    fn on_hover(&mut self, ctx: &mut ToolContext<'_>, target: ShapeId, change: HoverChange) {
        match change {
            HoverChange::In => {
                if Self::set_opacity(ctx.scene, target, ERASE_PREVIEW_OPACITY) {
                    self.hovered = Some(target);
                    ctx.request_render();
                }
            }
            HoverChange::Out => {
                // Already erased objects are simply gone.
                if Self::set_opacity(ctx.scene, target, 1.0) {
                    ctx.request_render();
                }
                if self.hovered == Some(target) {
                    self.hovered = None;
                }
            }
        }
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        self.pressed = true;
        if let Some(target) = pointer.target {
            self.erase(ctx, target);
            // Second removal of the same target finds nothing.
            self.erase(ctx, target);
            ctx.commit();
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        if !self.pressed {
            return;
        }
        let Some(target) = pointer.target else {
            return;
        };
        let previewed = ctx
            .scene
            .get(target)
            .is_some_and(|shape| shape.style().is_erase_preview());
        if previewed {
            self.erase(ctx, target);
            ctx.commit();
        }
    }

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &Pointer) {
        self.pressed = false;
    }

    fn on_exit(&mut self, ctx: &mut ToolContext<'_>) {
        self.pressed = false;
        if let Some(id) = self.hovered.take() {
            Self::set_opacity(ctx.scene, id, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use crate::tools::fixture::Fixture;
    use kurbo::Point;

    fn with_rect(fx: &mut Fixture, x: f64, y: f64) -> ShapeId {
        let mut rect = Rectangle::new(Point::new(x, y), 20.0, 20.0);
        rect.style.fill_color = Some(rect.style.stroke_color);
        fx.scene.add(Shape::Rectangle(rect))
    }

    fn opacity(fx: &Fixture, id: ShapeId) -> f64 {
        fx.scene.get(id).unwrap().style().opacity
    }

    #[test]
    fn test_hover_previews_and_restores() {
        let mut fx = Fixture::new();
        let id = with_rect(&mut fx, 0.0, 0.0);
        let mut eraser = EraserTool::new();
        eraser.on_hover(&mut fx.ctx(), id, HoverChange::In);
        assert!((opacity(&fx, id) - ERASE_PREVIEW_OPACITY).abs() < f64::EPSILON);
        eraser.on_hover(&mut fx.ctx(), id, HoverChange::Out);
        assert!((opacity(&fx, id) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_removes_once_with_one_snapshot() {
        let mut fx = Fixture::new();
        let id = with_rect(&mut fx, 0.0, 0.0);
        let _other = with_rect(&mut fx, 100.0, 100.0);
        let mut eraser = EraserTool::new();

        eraser.on_hover(&mut fx.ctx(), id, HoverChange::In);
        let p = fx.pointer(10.0, 10.0);
        assert_eq!(p.target, Some(id));
        eraser.on_pointer_down(&mut fx.ctx(), &p);

        assert!(!fx.scene.contains(id));
        assert_eq!(fx.scene.len(), 1);
        assert_eq!(fx.history.len(), 1);

        // Hover-out after removal is harmless.
        eraser.on_hover(&mut fx.ctx(), id, HoverChange::Out);
        assert_eq!(fx.scene.len(), 1);
    }

    #[test]
    fn test_drag_erases_previewed_objects() {
        let mut fx = Fixture::new();
        let a = with_rect(&mut fx, 100.0, 0.0);
        let b = with_rect(&mut fx, 200.0, 0.0);
        let mut eraser = EraserTool::new();

        let start = fx.pointer(0.0, 300.0);
        eraser.on_pointer_down(&mut fx.ctx(), &start);
        assert!(fx.history.is_empty());

        for id in [a, b] {
            eraser.on_hover(&mut fx.ctx(), id, HoverChange::In);
        }
        let over_a = fx.pointer(110.0, 10.0);
        eraser.on_pointer_move(&mut fx.ctx(), &over_a);
        let over_b = fx.pointer(210.0, 10.0);
        eraser.on_pointer_move(&mut fx.ctx(), &over_b);

        assert!(fx.scene.is_empty());
        assert_eq!(fx.history.len(), 2);
    }

    #[test]
    fn test_move_after_release_does_not_erase() {
        let mut fx = Fixture::new();
        let id = with_rect(&mut fx, 100.0, 0.0);
        let mut eraser = EraserTool::new();
        let empty = fx.pointer(0.0, 300.0);
        eraser.on_pointer_down(&mut fx.ctx(), &empty);
        eraser.on_pointer_up(&mut fx.ctx(), &empty);

        eraser.on_hover(&mut fx.ctx(), id, HoverChange::In);
        let over = fx.pointer(110.0, 10.0);
        eraser.on_pointer_move(&mut fx.ctx(), &over);
        assert!(fx.scene.contains(id));
    }

    #[test]
    fn test_exit_restores_preview() {
        let mut fx = Fixture::new();
        let id = with_rect(&mut fx, 0.0, 0.0);
        let mut eraser = EraserTool::new();
        eraser.on_hover(&mut fx.ctx(), id, HoverChange::In);
        eraser.on_exit(&mut fx.ctx());
        assert!((opacity(&fx, id) - 1.0).abs() < f64::EPSILON);
    }
}
