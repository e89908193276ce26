//! Inkboard Core Library
//!
//! Platform-agnostic board engine for the Inkboard whiteboard: tool modes,
//! shape drafting, viewport zoom/pan and snapshot undo/redo. Rendering, image
//! decoding and pointer delivery belong to the host and reach the engine
//! through the [`RenderSurface`] and [`ImageLoader`] traits.

pub mod board;
pub mod debounce;
pub mod error;
pub mod history;
pub mod image;
pub mod input;
pub mod scene;
pub mod session;
pub mod settings;
pub mod shapes;
pub mod surface;
pub mod tools;
pub mod viewport;

pub use board::{Board, BoardConfig, BoardEvent, ViewportConfig, ViewportConfigUpdate};
pub use debounce::Debouncer;
pub use error::{BoardError, BoardResult};
pub use history::{HistoryEntry, HistoryStore};
pub use image::{BoxFuture, DecodedImage, ImageLoader, load_image};
pub use input::{MouseButton, PinchTracker, Pointer, PointerEvent, TouchGesture};
pub use scene::{Background, ContentBounds, Scene};
pub use session::{DraftKind, DrawingSession};
pub use settings::{DrawingSettings, DrawingSettingsUpdate};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeStyle, ShapeTrait};
pub use surface::{Cursor, HeadlessSurface, RenderSurface, SurfaceConfig, SurfaceError};
pub use tools::{HoverChange, Mode, ModeBehavior, ToolContext, ToolStateMachine};
pub use viewport::{Viewport, ViewportTransform};
