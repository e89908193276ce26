//! Render surface seam: the host-side canvas the board directs.
//!
//! Rasterization, native selection handles and text layout live behind this
//! trait. The board owns exactly one surface, injected at construction.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cursor shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Pencil,
    Eraser,
    AllScroll,
    Drag,
}

/// Interaction configuration installed on the surface for the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Whether native rubber-band/object selection is enabled.
    pub selection: bool,
    /// Cursor for empty canvas and hovered objects.
    pub cursor: Cursor,
}

/// Failure reported by a surface that cannot be attached.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SurfaceError(pub String);

/// The host canvas.
pub trait RenderSurface {
    /// Acquire the surface and report its pixel size.
    fn attach(&mut self) -> Result<Size, SurfaceError>;

    /// Current pixel size.
    fn size(&self) -> Size;

    /// Resize the backing store.
    fn set_size(&mut self, size: Size);

    /// Install cursor and selection configuration.
    fn apply_config(&mut self, config: SurfaceConfig);

    /// Schedule a repaint.
    fn request_render(&mut self);

    /// Start delivering container resize notifications to the board.
    fn observe_resize(&mut self);

    /// Stop delivering container resize notifications.
    fn unobserve_resize(&mut self);

    /// Free the surface. Called exactly once, at teardown.
    fn release(&mut self);
}

impl<T: RenderSurface + ?Sized> RenderSurface for &mut T {
    fn attach(&mut self) -> Result<Size, SurfaceError> {
        (**self).attach()
    }

    fn size(&self) -> Size {
        (**self).size()
    }

    fn set_size(&mut self, size: Size) {
        (**self).set_size(size)
    }

    fn apply_config(&mut self, config: SurfaceConfig) {
        (**self).apply_config(config)
    }

    fn request_render(&mut self) {
        (**self).request_render()
    }

    fn observe_resize(&mut self) {
        (**self).observe_resize()
    }

    fn unobserve_resize(&mut self) {
        (**self).unobserve_resize()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Off-screen surface that records what the board asked of it.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: Size,
    available: bool,
    attached: bool,
    observing: bool,
    released: bool,
    configs: Vec<SurfaceConfig>,
    render_requests: usize,
}

impl HeadlessSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            available: true,
            attached: false,
            observing: false,
            released: false,
            configs: Vec::new(),
            render_requests: 0,
        }
    }

    /// A surface whose `attach` fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(0.0, 0.0)
        }
    }

    /// Configurations applied so far, oldest first.
    pub fn configs(&self) -> &[SurfaceConfig] {
        &self.configs
    }

    /// The configuration currently installed.
    pub fn current_config(&self) -> Option<SurfaceConfig> {
        self.configs.last().copied()
    }

    pub fn render_requests(&self) -> usize {
        self.render_requests
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderSurface for HeadlessSurface {
    fn attach(&mut self) -> Result<Size, SurfaceError> {
        if !self.available {
            return Err(SurfaceError("headless surface marked unavailable".to_string()));
        }
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Err(SurfaceError(format!("surface has no area: {:?}", self.size)));
        }
        self.attached = true;
        Ok(self.size)
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn apply_config(&mut self, config: SurfaceConfig) {
        self.configs.push(config);
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn observe_resize(&mut self) {
        self.observing = true;
    }

    fn unobserve_resize(&mut self) {
        self.observing = false;
    }

    fn release(&mut self) {
        self.attached = false;
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        assert_eq!(surface.attach().unwrap(), Size::new(800.0, 600.0));
        assert!(surface.is_attached());
    }

    #[test]
    fn test_unavailable_surface_fails_attach() {
        assert!(HeadlessSurface::unavailable().attach().is_err());
        assert!(HeadlessSurface::new(0.0, 10.0).attach().is_err());
    }

    #[test]
    fn test_records_configs() {
        let mut surface = HeadlessSurface::new(1.0, 1.0);
        surface.apply_config(SurfaceConfig {
            selection: true,
            cursor: Cursor::AllScroll,
        });
        assert_eq!(surface.configs().len(), 1);
        assert_eq!(surface.current_config().unwrap().cursor, Cursor::AllScroll);
    }
}
