//! Text placement and editing.

use super::{ModeBehavior, ToolContext};
use crate::input::Pointer;
use crate::shapes::{Shape, ShapeId, Text};
use kurbo::Vec2;

/// Offset from the pointer to the top-left corner of a placed text node.
const PLACEMENT_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Where the text tool is in its place, edit, re-arm cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextState {
    #[default]
    Idle,
    /// A node is under edit. `dirty` is set once its content changes.
    Editing { node: ShapeId, dirty: bool },
    /// Editing just ended on a click; the next click places a new node.
    ArmedForNext,
}

/// Places text nodes on click. At most one node is under edit.
#[derive(Debug, Default)]
pub struct TextTool {
    state: TextState,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TextState {
        self.state
    }

    fn place_text(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        let mut text = Text::new(pointer.world - PLACEMENT_OFFSET, String::new());
        text.font_size = Text::font_size_for_brush(ctx.settings.brush_width);
        text.style.stroke_color = ctx.settings.current_color;
        text.style.fill_color = Some(ctx.settings.current_color);
        let node = ctx.scene.add(Shape::Text(text));
        log::debug!("Placed text {node}");
        self.state = TextState::Editing { node, dirty: false };
        ctx.commit();
    }

    /// Leave edit state, snapshotting the node if its content changed.
    fn finish_editing(&mut self, ctx: &mut ToolContext<'_>) -> bool {
        let TextState::Editing { node, dirty } = self.state else {
            return false;
        };
        self.state = TextState::Idle;
        if dirty && ctx.scene.contains(node) {
            ctx.commit();
        }
        true
    }
}

impl ModeBehavior for TextTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &Pointer) {
        match self.state {
            TextState::Idle | TextState::ArmedForNext => self.place_text(ctx, pointer),
            TextState::Editing { .. } => {
                self.finish_editing(ctx);
                self.state = TextState::ArmedForNext;
            }
        }
    }

    fn on_text_input(&mut self, ctx: &mut ToolContext<'_>, input: &str) -> bool {
        let TextState::Editing { node, .. } = self.state else {
            return false;
        };
        let Some(text) = ctx.scene.get_mut(node).and_then(Shape::as_text_mut) else {
            log::warn!("Text node {node} left the scene while editing");
            self.state = TextState::Idle;
            return false;
        };
        text.content.push_str(input);
        self.state = TextState::Editing { node, dirty: true };
        ctx.request_render();
        true
    }

    fn exit_text_editing(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish_editing(ctx);
    }

    fn on_exit(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish_editing(ctx);
    }

    fn editing(&self) -> Option<ShapeId> {
        match self.state {
            TextState::Editing { node, .. } => Some(node),
            _ => None,
        }
    }
}
