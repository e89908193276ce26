//! Tool system for the board.
//!
//! Each [`Mode`] installs one [`ModeBehavior`] that receives resolved pointer
//! input. [`ToolStateMachine`] swaps behaviors, always tearing the previous
//! one down before the next one is installed.

mod draft;
mod eraser;
mod pan;
mod pencil;
mod select;
mod text;

pub use draft::ShapeTool;
pub use eraser::EraserTool;
pub use pan::DragTool;
pub use pencil::PencilTool;
pub use select::SelectTool;
pub use text::{TextState, TextTool};

use crate::history::HistoryStore;
use crate::input::Pointer;
use crate::scene::Scene;
use crate::session::DraftKind;
use crate::settings::DrawingSettings;
use crate::shapes::{Shape, ShapeId};
use crate::surface::{Cursor, RenderSurface, SurfaceConfig};
use crate::viewport::Viewport;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    #[default]
    Pencil,
    Line,
    Rectangle,
    Ellipse,
    Triangle,
    Text,
    Eraser,
    Select,
    Drag,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Pencil,
        Mode::Line,
        Mode::Rectangle,
        Mode::Ellipse,
        Mode::Triangle,
        Mode::Text,
        Mode::Eraser,
        Mode::Select,
        Mode::Drag,
    ];

    /// Parse a mode name, case-insensitively. Unknown names fall back to
    /// [`Mode::Pencil`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown mode {name:?}, falling back to pencil");
            Mode::Pencil
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Pencil => "PENCIL",
            Mode::Line => "LINE",
            Mode::Rectangle => "RECTANGLE",
            Mode::Ellipse => "ELLIPSE",
            Mode::Triangle => "TRIANGLE",
            Mode::Text => "TEXT",
            Mode::Eraser => "ERASER",
            Mode::Select => "SELECT",
            Mode::Drag => "DRAG",
        }
    }

    /// Selection and cursor configuration installed while this mode is active.
    pub fn surface_config(&self) -> SurfaceConfig {
        let (selection, cursor) = match self {
            Mode::Pencil | Mode::Line | Mode::Rectangle | Mode::Ellipse | Mode::Triangle => {
                (false, Cursor::Pencil)
            }
            Mode::Text => (false, Cursor::Default),
            Mode::Eraser => (false, Cursor::Eraser),
            Mode::Select => (true, Cursor::AllScroll),
            Mode::Drag => (false, Cursor::Drag),
        };
        SurfaceConfig { selection, cursor }
    }

    /// Shape drafted by dragging in this mode, if any.
    pub fn draft_kind(&self) -> Option<DraftKind> {
        match self {
            Mode::Line => Some(DraftKind::Line),
            Mode::Rectangle => Some(DraftKind::Rectangle),
            Mode::Ellipse => Some(DraftKind::Ellipse),
            Mode::Triangle => Some(DraftKind::Triangle),
            _ => None,
        }
    }

    /// Fresh behavior for this mode.
    fn behavior(&self) -> Box<dyn ModeBehavior> {
        if let Some(kind) = self.draft_kind() {
            return Box::new(ShapeTool::new(kind));
        }
        match self {
            Mode::Text => Box::new(TextTool::new()),
            Mode::Eraser => Box::new(EraserTool::new()),
            Mode::Select => Box::new(SelectTool),
            Mode::Drag => Box::new(DragTool::new()),
            _ => Box::new(PencilTool::new()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mode name that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "RECT" => return Ok(Mode::Rectangle),
            "ERASE" => return Ok(Mode::Eraser),
            _ => {}
        }
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == upper)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Mode::from_name(&name))
    }
}

/// Hover transitions delivered to the active behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    In,
    Out,
}

/// Mutable board state lent to a behavior for one event.
pub struct ToolContext<'a> {
    pub scene: &'a mut Scene,
    pub history: &'a mut HistoryStore,
    pub viewport: &'a mut Viewport,
    pub settings: &'a DrawingSettings,
    pub surface: &'a mut dyn RenderSurface,
}

impl ToolContext<'_> {
    /// Snapshot the scene into history and repaint.
    pub fn commit(&mut self) {
        self.history.record(self.scene);
        self.surface.request_render();
    }

    pub fn request_render(&mut self) {
        self.surface.request_render();
    }
}

/// Gesture handlers installed by a mode. Every handler defaults to doing
/// nothing.
pub trait ModeBehavior {
    /// The mode became active.
    fn on_enter(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_down(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &Pointer) {}

    fn on_pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &Pointer) {}

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &Pointer) {}

    /// The pointer entered or left an object.
    fn on_hover(&mut self, _ctx: &mut ToolContext<'_>, _target: ShapeId, _change: HoverChange) {}

    /// Typed text for the node under edit. Returns true if it was consumed.
    fn on_text_input(&mut self, _ctx: &mut ToolContext<'_>, _text: &str) -> bool {
        false
    }

    /// Leave text editing without arming placement of a new node.
    fn exit_text_editing(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// The mode is being left. Must undo anything `on_enter` installed and
    /// settle any in-progress gesture.
    fn on_exit(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// Text node currently under edit.
    fn editing(&self) -> Option<ShapeId> {
        None
    }

    /// Uncommitted shape to draw on top of the scene.
    fn preview(&self) -> Option<&Shape> {
        None
    }
}

/// Owns the active mode and its behavior.
pub struct ToolStateMachine {
    mode: Mode,
    behavior: Box<dyn ModeBehavior>,
    transitions: usize,
}

impl fmt::Debug for ToolStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolStateMachine")
            .field("mode", &self.mode)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

impl ToolStateMachine {
    /// Create the machine in `mode`. Nothing is installed until [`enter`](Self::enter).
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            behavior: mode.behavior(),
            transitions: 0,
        }
    }

    /// Install the initial mode's configuration and handlers.
    pub fn enter(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.surface.apply_config(self.mode.surface_config());
        self.behavior.on_enter(ctx);
    }

    /// Switch modes. Returns false (and does nothing) if `mode` is already active.
    pub fn set_mode(&mut self, mode: Mode, ctx: &mut ToolContext<'_>) -> bool {
        if mode == self.mode {
            return false;
        }
        log::info!("Switching mode {} -> {}", self.mode, mode);

        self.behavior.on_exit(ctx);
        ctx.scene.set_all_selectable(false);

        self.mode = mode;
        self.behavior = mode.behavior();
        ctx.surface.apply_config(mode.surface_config());
        self.behavior.on_enter(ctx);

        self.transitions += 1;
        ctx.surface.request_render();
        true
    }

    /// Drop any in-progress gesture without settling it and reinstall a fresh
    /// behavior for the current mode. Used when the scene is replaced wholesale.
    pub fn interrupt(&mut self, ctx: &mut ToolContext<'_>) {
        self.behavior = self.mode.behavior();
        self.behavior.on_enter(ctx);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of completed mode switches.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    pub fn behavior(&self) -> &dyn ModeBehavior {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ModeBehavior {
        self.behavior.as_mut()
    }
}


#[cfg(test)]
mod tests {
    use super::fixture::Fixture;
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("ellipse".parse::<Mode>(), Ok(Mode::Ellipse));
        assert_eq!("RECT".parse::<Mode>(), Ok(Mode::Rectangle));
        assert!("LASSO".parse::<Mode>().is_err());
        assert_eq!(Mode::from_name("LASSO"), Mode::Pencil);
    }

    #[test]
    fn test_mode_json() {
        assert_eq!(serde_json::to_string(&Mode::Drag).unwrap(), "\"DRAG\"");
        let mode: Mode = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(mode, Mode::Select);
        let mode: Mode = serde_json::from_str("\"\"").unwrap();
        assert_eq!(mode, Mode::Pencil);
    }

    #[test]
    fn test_surface_config_table() {
        assert!(Mode::Select.surface_config().selection);
        assert_eq!(Mode::Select.surface_config().cursor, Cursor::AllScroll);
        for mode in Mode::ALL.into_iter().filter(|m| *m != Mode::Select) {
            assert!(!mode.surface_config().selection, "{mode}");
        }
        assert_eq!(Mode::Triangle.surface_config().cursor, Cursor::Pencil);
        assert_eq!(Mode::Eraser.surface_config().cursor, Cursor::Eraser);
        assert_eq!(Mode::Drag.surface_config().cursor, Cursor::Drag);
        assert_eq!(Mode::Text.surface_config().cursor, Cursor::Default);
    }

    #[test]
    fn test_set_same_mode_is_noop() {
        let mut fx = Fixture::new();
        let mut tools = ToolStateMachine::new(Mode::Pencil);
        tools.enter(&mut fx.ctx());
        assert!(tools.set_mode(Mode::Eraser, &mut fx.ctx()));
        assert!(!tools.set_mode(Mode::Eraser, &mut fx.ctx()));
        assert_eq!(tools.transitions(), 1);
        assert_eq!(fx.surface.configs().len(), 2);
        assert!(fx.history.is_empty());
    }

    #[test]
    fn test_select_toggles_selectability() {
        let mut fx = Fixture::new();
        fx.scene.add(Shape::Rectangle(crate::shapes::Rectangle::new(
            kurbo::Point::ZERO,
            10.0,
            10.0,
        )));
        let mut tools = ToolStateMachine::new(Mode::Pencil);
        tools.enter(&mut fx.ctx());

        tools.set_mode(Mode::Select, &mut fx.ctx());
        assert!(fx.scene.objects.iter().all(|s| s.style().selectable));
        assert!(fx.surface.current_config().unwrap().selection);

        tools.set_mode(Mode::Drag, &mut fx.ctx());
        assert!(fx.scene.objects.iter().all(|s| !s.style().selectable));
        assert!(!fx.surface.current_config().unwrap().selection);
    }

    #[test]
    fn test_switch_discards_uncommitted_draft() {
        let mut fx = Fixture::new();
        let mut tools = ToolStateMachine::new(Mode::Rectangle);
        tools.enter(&mut fx.ctx());
        let down = fx.pointer(10.0, 10.0);
        tools.behavior_mut().on_pointer_down(&mut fx.ctx(), &down);
        assert_eq!(fx.scene.len(), 1);

        tools.set_mode(Mode::Select, &mut fx.ctx());
        assert!(fx.scene.is_empty());
        assert!(fx.history.is_empty());
    }
}
