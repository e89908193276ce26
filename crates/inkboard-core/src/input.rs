//! Pointer, wheel and touch input types.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Raw pointer input in screen coordinates, as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        /// Zoom modifier (Ctrl) held.
        #[serde(default)]
        zoom_modifier: bool,
    },
}

/// Two-finger touch gesture phases, contact points in screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TouchGesture {
    Start { first: Point, second: Point },
    Update { first: Point, second: Point },
    End,
}

/// A pointer position resolved against the viewport and scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Position in screen coordinates.
    pub screen: Point,
    /// Position in world coordinates.
    pub world: Point,
    /// Topmost object under the pointer.
    pub target: Option<crate::shapes::ShapeId>,
}

/// Tracks a pinch gesture, producing an incremental zoom per update frame.
#[derive(Debug, Clone, Default)]
pub struct PinchTracker {
    /// Contact distance at the previous frame.
    previous_distance: Option<f64>,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the starting contact distance.
    pub fn begin(&mut self, first: Point, second: Point) {
        let distance = first.distance(second);
        self.previous_distance = (distance > f64::EPSILON).then_some(distance);
    }

    /// Zoom factor and pin point for this frame, relative to the previous one.
    pub fn update(&mut self, first: Point, second: Point) -> Option<(Point, f64)> {
        let distance = first.distance(second);
        let previous = self.previous_distance?;
        if distance <= f64::EPSILON {
            return None;
        }
        self.previous_distance = Some(distance);
        Some((first.midpoint(second), distance / previous))
    }

    pub fn end(&mut self) {
        self.previous_distance = None;
    }

    pub fn is_active(&self) -> bool {
        self.previous_distance.is_some()
    }
}

/// Zoom factor for a wheel delta while the zoom modifier is held.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    crate::viewport::WHEEL_ZOOM_BASE.powf(delta_y)
}
