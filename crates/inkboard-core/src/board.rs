//! Board facade: the single entry point the host UI drives.
//!
//! The board owns the scene, viewport, history, tool state machine and the
//! render surface. Every operation runs synchronously to completion; the host
//! drains [`BoardEvent`]s with [`Board::poll_events`] and drives the resize
//! debouncer with [`Board::poll_timers`].

use crate::debounce::{DEFAULT_RESIZE_DEBOUNCE_MS, Debouncer};
use crate::error::{BoardError, BoardResult};
use crate::history::HistoryStore;
use crate::image::DecodedImage;
use crate::input::{
    MouseButton, PinchTracker, Pointer, PointerEvent, TouchGesture, wheel_zoom_factor,
};
use crate::scene::{Background, ContentBounds, Scene};
use crate::settings::{DrawingSettings, DrawingSettingsUpdate};
use crate::shapes::{Image, Shape, ShapeId};
use crate::surface::RenderSurface;
use crate::tools::{HoverChange, Mode, ToolContext, ToolStateMachine};
use crate::viewport::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, Viewport, ViewportTransform};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Zoom factor applied by [`Board::zoom_in`].
pub const ZOOM_IN_STEP: f64 = 1.1;
/// Zoom factor applied by [`Board::zoom_out`].
pub const ZOOM_OUT_STEP: f64 = 0.9;
/// Hit tolerance around objects, in screen pixels.
pub const HOVER_TOLERANCE: f64 = 4.0;

/// Viewport part of the board configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Initial scale, applied at the origin.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Scene document to load.
    pub content_snapshot: Option<String>,
    /// Viewport transform to restore.
    pub transform: Option<ViewportTransform>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            content_snapshot: None,
            transform: None,
        }
    }
}

/// Partial update for [`ViewportConfig`]. Only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfigUpdate {
    pub zoom: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub content_snapshot: Option<String>,
    pub transform: Option<ViewportTransform>,
}

/// Everything needed to construct a [`Board`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub drawing_settings: DrawingSettings,
    pub viewport: ViewportConfig,
    /// Maximum number of history entries (`None` = unbounded).
    pub history_limit: Option<usize>,
    /// Quiet period before a burst of resize notifications is handled.
    pub resize_debounce_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            drawing_settings: DrawingSettings::default(),
            viewport: ViewportConfig::default(),
            history_limit: None,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

/// Notifications for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// The zoom changed. `point` is the pinned screen point.
    ZoomChanged { scale: f64, point: Point },
    /// A viewport configuration update was applied.
    ConfigChanged,
}

/// The board engine.
pub struct Board<S: RenderSurface> {
    surface: S,
    scene: Scene,
    viewport: Viewport,
    history: HistoryStore,
    tools: ToolStateMachine,
    settings: DrawingSettings,
    config: ViewportConfig,
    events: Vec<BoardEvent>,
    resize: Debouncer<Size>,
    pinch: PinchTracker,
    /// Object last reported to the active behavior as hovered.
    hovered: Option<ShapeId>,
    released: bool,
}

impl<S: RenderSurface> Board<S> {
    /// Attach to `surface` and apply `config`.
    ///
    /// Fails with [`BoardError::SurfaceUnavailable`] if the surface cannot be
    /// attached, or [`BoardError::InvalidSnapshot`] if the initial content does
    /// not parse. In both cases the surface is left unobserved.
    pub fn new(mut surface: S, config: BoardConfig) -> BoardResult<Self> {
        let BoardConfig {
            drawing_settings,
            viewport: viewport_config,
            history_limit,
            resize_debounce_ms,
        } = config;

        let content = viewport_config
            .content_snapshot
            .as_deref()
            .map(Scene::from_json)
            .transpose()?;

        let size = surface.attach()?;
        log::info!("Attached to {}x{} surface", size.width, size.height);
        surface.observe_resize();

        let settings = drawing_settings.sanitized();
        let mode = settings.current_mode;
        let mut board = Self {
            surface,
            scene: Scene::new(),
            viewport: Viewport::new(viewport_config.min_zoom, viewport_config.max_zoom),
            history: HistoryStore::with_limit(history_limit),
            tools: ToolStateMachine::new(mode),
            settings,
            config: viewport_config.clone(),
            events: Vec::new(),
            resize: Debouncer::new(Duration::from_millis(resize_debounce_ms)),
            pinch: PinchTracker::new(),
            hovered: None,
            released: false,
        };

        board.reset_zoom(None);
        let (tools, mut ctx) = board.tool_context();
        tools.enter(&mut ctx);
        board.apply_viewport(
            Some(viewport_config.zoom),
            content,
            viewport_config.transform,
        );
        Ok(board)
    }

    /// Lend the tool state machine and the state its behaviors mutate.
    fn tool_context(&mut self) -> (&mut ToolStateMachine, ToolContext<'_>) {
        (
            &mut self.tools,
            ToolContext {
                scene: &mut self.scene,
                history: &mut self.history,
                viewport: &mut self.viewport,
                settings: &self.settings,
                surface: &mut self.surface,
            },
        )
    }

    fn commit(&mut self) {
        self.history.record(&self.scene);
        self.surface.request_render();
    }

    fn canvas_center(&self) -> Point {
        let size = self.surface.size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    /// Replace the scene wholesale, abandoning any in-progress gesture.
    fn load_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.hovered = None;
        let (tools, mut ctx) = self.tool_context();
        tools.interrupt(&mut ctx);
        self.surface.request_render();
    }

    /// Apply the given parts of a viewport configuration, then snapshot.
    fn apply_viewport(
        &mut self,
        zoom: Option<f64>,
        content: Option<Scene>,
        transform: Option<ViewportTransform>,
    ) {
        if let Some(zoom) = zoom {
            self.viewport.zoom_to_point(Point::ZERO, zoom);
        }
        if let Some(scene) = content {
            self.load_scene(scene);
        }
        if let Some(transform) = transform {
            self.viewport.set_transform(transform);
            self.change_zoom(None, 1.0);
        }
        self.commit();
        self.events.push(BoardEvent::ConfigChanged);
    }

    // --- Settings and configuration ---

    /// Merge a settings update, switching modes if the mode changed.
    pub fn set_drawing_settings(&mut self, update: DrawingSettingsUpdate) {
        if self.settings.merge(update) {
            let mode = self.settings.current_mode;
            self.hovered = None;
            let (tools, mut ctx) = self.tool_context();
            tools.set_mode(mode, &mut ctx);
        }
    }

    /// Switch to `mode`. Same as a settings update carrying only the mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.set_drawing_settings(DrawingSettingsUpdate {
            current_mode: Some(mode),
            ..Default::default()
        });
    }

    /// Apply a viewport configuration update.
    ///
    /// A malformed `content_snapshot` rejects the whole update before anything
    /// changes. Otherwise the present fields are applied, a snapshot is pushed
    /// and [`BoardEvent::ConfigChanged`] is queued.
    pub fn set_viewport_config(&mut self, update: ViewportConfigUpdate) -> BoardResult<()> {
        let content = update
            .content_snapshot
            .as_deref()
            .map(Scene::from_json)
            .transpose()?;

        if update.min_zoom.is_some() || update.max_zoom.is_some() {
            self.config.min_zoom = update.min_zoom.unwrap_or(self.config.min_zoom);
            self.config.max_zoom = update.max_zoom.unwrap_or(self.config.max_zoom);
            self.viewport
                .set_zoom_limits(self.config.min_zoom, self.config.max_zoom);
        }
        if let Some(zoom) = update.zoom {
            self.config.zoom = zoom;
        }
        if update.content_snapshot.is_some() {
            self.config.content_snapshot = update.content_snapshot;
        }
        if update.transform.is_some() {
            self.config.transform = update.transform;
        }

        self.apply_viewport(update.zoom, content, update.transform);
        Ok(())
    }

    // --- Scene operations ---

    /// Remove every object, keeping the background.
    pub fn clear_canvas(&mut self) {
        self.scene.clear_objects();
        self.hovered = None;
        let (tools, mut ctx) = self.tool_context();
        tools.interrupt(&mut ctx);
        log::debug!("Cleared canvas");
        self.commit();
    }

    /// Step back one snapshot. Returns false at the earliest entry.
    pub fn undo(&mut self) -> BoardResult<bool> {
        let Some(entry) = self.history.undo().cloned() else {
            return Ok(false);
        };
        match Scene::from_json(entry.as_str()) {
            Ok(scene) => {
                self.load_scene(scene);
                Ok(true)
            }
            Err(err) => {
                self.history.redo();
                Err(err.into())
            }
        }
    }

    /// Step forward one snapshot. Returns false at the latest entry.
    pub fn redo(&mut self) -> BoardResult<bool> {
        let Some(entry) = self.history.redo().cloned() else {
            return Ok(false);
        };
        match Scene::from_json(entry.as_str()) {
            Ok(scene) => {
                self.load_scene(scene);
                Ok(true)
            }
            Err(err) => {
                self.history.undo();
                Err(err.into())
            }
        }
    }

    /// Show a decoded page image as the background, fitted to the canvas.
    /// Not recorded in history.
    pub fn open_page(&mut self, image: DecodedImage) -> BoardResult<()> {
        if image.width == 0 || image.height == 0 {
            return Err(BoardError::ImageLoad(format!(
                "page has no pixels: {}x{}",
                image.width, image.height
            )));
        }
        let background =
            Background::fitted(image.source, image.width, image.height, self.surface.size());
        log::debug!("Opened page at scale {}", background.scale);
        self.scene.background = Some(background);
        self.surface.request_render();
        Ok(())
    }

    /// Place a decoded image at the origin, scaled to the canvas height.
    pub fn insert_image(&mut self, image: DecodedImage) -> BoardResult<ShapeId> {
        if image.width == 0 || image.height == 0 {
            return Err(BoardError::ImageLoad(format!(
                "image has no pixels: {}x{}",
                image.width, image.height
            )));
        }
        let mut shape = Image::new(Point::ZERO, image.source, image.width, image.height);
        shape.scale_to_height(self.surface.size().height);
        let id = self.scene.add(Shape::Image(shape));
        self.commit();
        Ok(id)
    }

    /// Replace an existing object, e.g. after native manipulation in SELECT.
    pub fn update_shape(&mut self, shape: Shape) -> BoardResult<()> {
        let id = shape.id();
        if !self.scene.replace(shape) {
            return Err(BoardError::InvalidInput(format!("no object with id {id}")));
        }
        self.commit();
        Ok(())
    }

    /// Tightest box covering every object, or the empty sentinel.
    pub fn get_content_boundaries(&self) -> ContentBounds {
        self.scene.content_bounds()
    }

    // --- Viewport ---

    /// Multiply the scale by `factor`, pinned at `point` (default: canvas
    /// center). Returns the clamped scale.
    pub fn change_zoom(&mut self, point: Option<Point>, factor: f64) -> f64 {
        let point = point.unwrap_or_else(|| self.canvas_center());
        let scale = self.viewport.change_zoom(point, factor);
        log::debug!("Zoom {scale:.3} at {point:?}");
        self.events.push(BoardEvent::ZoomChanged { scale, point });
        self.surface.request_render();
        scale
    }

    /// Set the scale to `scale` (default 1) pinned at the canvas center.
    pub fn reset_zoom(&mut self, scale: Option<f64>) -> f64 {
        let point = self.canvas_center();
        let scale = self.viewport.zoom_to_point(point, scale.unwrap_or(1.0));
        self.events.push(BoardEvent::ZoomChanged { scale, point });
        self.surface.request_render();
        scale
    }

    /// Return to the initial location at 1×.
    pub fn reset_view(&mut self) {
        self.viewport.set_transform(ViewportTransform::IDENTITY);
        self.reset_zoom(Some(1.0));
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.change_zoom(None, ZOOM_IN_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.change_zoom(None, ZOOM_OUT_STEP)
    }

    // --- Input ---

    fn resolve(&self, screen: Point) -> Pointer {
        let world = self.viewport.screen_to_world(screen);
        Pointer {
            screen,
            world,
            target: self
                .scene
                .shape_at(world, HOVER_TOLERANCE / self.viewport.scale()),
        }
    }

    fn track_hover(&mut self, target: Option<ShapeId>) {
        if target == self.hovered {
            return;
        }
        let previous = std::mem::replace(&mut self.hovered, target);
        let (tools, mut ctx) = self.tool_context();
        if let Some(id) = previous {
            tools.behavior_mut().on_hover(&mut ctx, id, HoverChange::Out);
        }
        if let Some(id) = target {
            tools.behavior_mut().on_hover(&mut ctx, id, HoverChange::In);
        }
    }

    /// Route host pointer input. Only the left button drives tools.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                if button != MouseButton::Left {
                    return;
                }
                let pointer = self.resolve(position);
                let (tools, mut ctx) = self.tool_context();
                tools.behavior_mut().on_pointer_down(&mut ctx, &pointer);
            }
            PointerEvent::Move { position } => {
                let pointer = self.resolve(position);
                self.track_hover(pointer.target);
                let (tools, mut ctx) = self.tool_context();
                tools.behavior_mut().on_pointer_move(&mut ctx, &pointer);
            }
            PointerEvent::Up { position, button } => {
                if button != MouseButton::Left {
                    return;
                }
                let pointer = self.resolve(position);
                let (tools, mut ctx) = self.tool_context();
                tools.behavior_mut().on_pointer_up(&mut ctx, &pointer);
            }
            PointerEvent::Wheel {
                position,
                delta,
                zoom_modifier,
            } => {
                if zoom_modifier {
                    self.change_zoom(Some(position), wheel_zoom_factor(delta.y));
                } else {
                    self.viewport.pan(-delta);
                    self.surface.request_render();
                }
            }
        }
    }

    /// Route a two-finger gesture: pinch zoom pinned at the contact midpoint.
    pub fn touch_gesture(&mut self, gesture: TouchGesture) {
        match gesture {
            TouchGesture::Start { first, second } => self.pinch.begin(first, second),
            TouchGesture::Update { first, second } => {
                if let Some((midpoint, factor)) = self.pinch.update(first, second) {
                    self.change_zoom(Some(midpoint), factor);
                }
            }
            TouchGesture::End => self.pinch.end(),
        }
    }

    /// Type into the text node under edit. Returns false if nothing is edited.
    pub fn type_text(&mut self, text: &str) -> bool {
        let (tools, mut ctx) = self.tool_context();
        tools.behavior_mut().on_text_input(&mut ctx, text)
    }

    /// Leave text editing (the Enter key).
    pub fn exit_text_editing(&mut self) {
        let (tools, mut ctx) = self.tool_context();
        tools.behavior_mut().exit_text_editing(&mut ctx);
    }

    // --- Resize and timers ---

    /// Container resized. Handled once notifications stop for the debounce delay.
    pub fn observe_resize(&mut self, size: Size) {
        self.observe_resize_at(size, Instant::now());
    }

    pub fn observe_resize_at(&mut self, size: Size, now: Instant) {
        if self.released {
            return;
        }
        self.resize.schedule(size, now);
    }

    /// When the pending resize fires, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Run due timers. Returns true if a resize was handled.
    pub fn poll_timers(&mut self) -> bool {
        self.poll_timers_at(Instant::now())
    }

    pub fn poll_timers_at(&mut self, now: Instant) -> bool {
        match self.resize.poll(now) {
            Some(size) => {
                self.handle_resize(size);
                true
            }
            None => false,
        }
    }

    fn handle_resize(&mut self, size: Size) {
        log::debug!("Resizing surface to {}x{}", size.width, size.height);
        self.change_zoom(None, 1.0);
        self.surface.set_size(size);
        self.commit();
    }

    // --- Lifecycle ---

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.resize.cancel();
        self.surface.unobserve_resize();
        self.surface.release();
        log::info!("Board released its surface");
    }

    /// Release the surface and the resize observer, then drop the board.
    pub fn teardown(mut self) {
        self.release();
    }

    // --- Accessors ---

    /// Drain queued notifications.
    pub fn poll_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Uncommitted shape being drawn, for the renderer.
    pub fn preview_shape(&self) -> Option<&Shape> {
        self.tools.behavior().preview()
    }

    /// Text node currently under edit.
    pub fn editing_text(&self) -> Option<ShapeId> {
        self.tools.behavior().editing()
    }

    pub fn mode(&self) -> Mode {
        self.tools.mode()
    }

    pub fn tools(&self) -> &ToolStateMachine {
        &self.tools
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn settings(&self) -> &DrawingSettings {
        &self.settings
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: RenderSurface> Drop for Board<S> {
    fn drop(&mut self) {
        self.release();
    }
}
