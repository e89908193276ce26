//! Inkboard session replay
//!
//! Drives a board on a headless surface from a JSON script and prints the
//! resulting scene and viewport.
//!
//! ## Script format
//!
//! ```json
//! {
//!   "config": {
//!     "drawing_settings": {
//!       "brush_width": 2,
//!       "current_color": {"r": 0, "g": 0, "b": 0, "a": 255},
//!       "current_mode": "RECTANGLE"
//!     }
//!   },
//!   "surface": { "width": 800, "height": 600 },
//!   "steps": [
//!     { "type": "down", "x": 10, "y": 10 },
//!     { "type": "move", "x": 50, "y": 80 },
//!     { "type": "up", "x": 50, "y": 80 },
//!     { "type": "undo" }
//!   ]
//! }
//! ```

use inkboard_core::{
    Board, BoardConfig, DecodedImage, DrawingSettingsUpdate, HeadlessSurface, Mode, MouseButton,
    PointerEvent, TouchGesture, ViewportConfigUpdate,
};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SurfaceSize {
    width: f64,
    height: f64,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// One host action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Step {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        #[serde(default)]
        ctrl: bool,
    },
    Pinch {
        first: Point,
        second: Point,
        to_first: Point,
        to_second: Point,
    },
    SetMode {
        mode: Mode,
    },
    Settings(DrawingSettingsUpdate),
    Viewport(ViewportConfigUpdate),
    Undo,
    Redo,
    Clear,
    Zoom {
        #[serde(default)]
        point: Option<Point>,
        scale: f64,
    },
    ResetZoom {
        #[serde(default)]
        scale: Option<f64>,
    },
    ResetView,
    ZoomIn,
    ZoomOut,
    TypeText {
        text: String,
    },
    ExitTextEditing,
    OpenPage {
        source: String,
        width: u32,
        height: u32,
    },
    InsertImage {
        source: String,
        width: u32,
        height: u32,
    },
    Resize {
        width: f64,
        height: f64,
    },
    /// Advance the replay clock, firing due timers.
    Wait {
        ms: u64,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Script {
    config: BoardConfig,
    surface: SurfaceSize,
    steps: Vec<Step>,
}

/// Final state printed after the replay.
#[derive(Debug, Serialize)]
struct Outcome {
    mode: Mode,
    scale: f64,
    translate_x: f64,
    translate_y: f64,
    history_len: usize,
    history_pointer: Option<usize>,
    scene: serde_json::Value,
}

fn run_step(
    board: &mut Board<HeadlessSurface>,
    step: Step,
    clock: &mut Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    match step {
        Step::Down { x, y, button } => board.handle_pointer_event(PointerEvent::Down {
            position: Point::new(x, y),
            button,
        }),
        Step::Move { x, y } => board.handle_pointer_event(PointerEvent::Move {
            position: Point::new(x, y),
        }),
        Step::Up { x, y, button } => board.handle_pointer_event(PointerEvent::Up {
            position: Point::new(x, y),
            button,
        }),
        Step::Wheel { x, y, dx, dy, ctrl } => board.handle_pointer_event(PointerEvent::Wheel {
            position: Point::new(x, y),
            delta: Vec2::new(dx, dy),
            zoom_modifier: ctrl,
        }),
        Step::Pinch {
            first,
            second,
            to_first,
            to_second,
        } => {
            board.touch_gesture(TouchGesture::Start { first, second });
            board.touch_gesture(TouchGesture::Update {
                first: to_first,
                second: to_second,
            });
            board.touch_gesture(TouchGesture::End);
        }
        Step::SetMode { mode } => board.set_mode(mode),
        Step::Settings(update) => board.set_drawing_settings(update),
        Step::Viewport(update) => board.set_viewport_config(update)?,
        Step::Undo => {
            board.undo()?;
        }
        Step::Redo => {
            board.redo()?;
        }
        Step::Clear => board.clear_canvas(),
        Step::Zoom { point, scale } => {
            board.change_zoom(point, scale);
        }
        Step::ResetZoom { scale } => {
            board.reset_zoom(scale);
        }
        Step::ResetView => board.reset_view(),
        Step::ZoomIn => {
            board.zoom_in();
        }
        Step::ZoomOut => {
            board.zoom_out();
        }
        Step::TypeText { text } => {
            if !board.type_text(&text) {
                log::warn!("No text node under edit, dropped {text:?}");
            }
        }
        Step::ExitTextEditing => board.exit_text_editing(),
        Step::OpenPage {
            source,
            width,
            height,
        } => board.open_page(DecodedImage::new(source, width, height))?,
        Step::InsertImage {
            source,
            width,
            height,
        } => {
            board.insert_image(DecodedImage::new(source, width, height))?;
        }
        Step::Resize { width, height } => {
            board.observe_resize_at(Size::new(width, height), *clock);
        }
        Step::Wait { ms } => {
            *clock += Duration::from_millis(ms);
            board.poll_timers_at(*clock);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: inkboard-replay <script.json>")?;
    let script: Script = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    log::info!("Replaying {} steps from {path}", script.steps.len());

    let surface = HeadlessSurface::new(script.surface.width, script.surface.height);
    let mut board = Board::new(surface, script.config)?;
    let mut clock = Instant::now();

    for (index, step) in script.steps.into_iter().enumerate() {
        log::debug!("Step {index}: {step:?}");
        if let Err(err) = run_step(&mut board, step, &mut clock) {
            log::error!("Step {index} failed: {err}");
        }
        for event in board.poll_events() {
            log::info!("{event:?}");
        }
    }

    let transform = board.viewport().transform();
    let outcome = Outcome {
        mode: board.mode(),
        scale: transform.scale,
        translate_x: transform.translate_x,
        translate_y: transform.translate_y,
        history_len: board.history().len(),
        history_pointer: board.history().pointer(),
        scene: serde_json::to_value(board.scene())?,
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    board.teardown();
    Ok(())
}
