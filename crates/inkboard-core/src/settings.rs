//! Drawing settings supplied by the host UI.

use crate::shapes::{SerializableColor, ShapeStyle};
use crate::tools::Mode;
use serde::{Deserialize, Serialize};

/// Brush, color, fill and active tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSettings {
    /// Stroke width in pixels; always at least 1.
    pub brush_width: u32,
    pub current_color: SerializableColor,
    pub current_mode: Mode,
    /// Fill closed shapes with the current color.
    #[serde(default)]
    pub fill_enabled: bool,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            brush_width: 2,
            current_color: SerializableColor::black(),
            current_mode: Mode::Pencil,
            fill_enabled: false,
        }
    }
}

/// Partial update merged into [`DrawingSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingSettingsUpdate {
    #[serde(default)]
    pub brush_width: Option<u32>,
    #[serde(default)]
    pub current_color: Option<SerializableColor>,
    #[serde(default)]
    pub current_mode: Option<Mode>,
    #[serde(default)]
    pub fill_enabled: Option<bool>,
}

impl DrawingSettings {
    /// Merge a partial update. Returns true if the mode changed.
    pub fn merge(&mut self, update: DrawingSettingsUpdate) -> bool {
        if let Some(width) = update.brush_width {
            self.brush_width = sanitize_brush_width(width);
        }
        if let Some(color) = update.current_color {
            self.current_color = color;
        }
        if let Some(fill) = update.fill_enabled {
            self.fill_enabled = fill;
        }
        match update.current_mode {
            Some(mode) if mode != self.current_mode => {
                self.current_mode = mode;
                true
            }
            _ => false,
        }
    }

    /// Stroke style for a new drafted shape.
    pub fn stroke_style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.current_color,
            stroke_width: self.brush_width as f64,
            fill_color: self.fill_enabled.then_some(self.current_color),
            ..ShapeStyle::default()
        }
    }

    /// Correct values the host may have sent out of range.
    pub(crate) fn sanitized(mut self) -> Self {
        self.brush_width = sanitize_brush_width(self.brush_width);
        self
    }
}

fn sanitize_brush_width(width: u32) -> u32 {
    if width == 0 {
        log::warn!("Brush width must be positive, using 1");
        1
    } else {
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_reports_mode_change() {
        let mut settings = DrawingSettings::default();
        assert!(!settings.merge(DrawingSettingsUpdate {
            current_mode: Some(Mode::Pencil),
            ..Default::default()
        }));
        assert!(settings.merge(DrawingSettingsUpdate {
            current_mode: Some(Mode::Eraser),
            ..Default::default()
        }));
        assert_eq!(settings.current_mode, Mode::Eraser);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut settings = DrawingSettings::default();
        settings.merge(DrawingSettingsUpdate {
            brush_width: Some(7),
            ..Default::default()
        });
        assert_eq!(settings.brush_width, 7);
        assert_eq!(settings.current_color, SerializableColor::black());
        assert!(!settings.fill_enabled);
    }

    #[test]
    fn test_zero_brush_width_corrected() {
        let mut settings = DrawingSettings::default();
        settings.merge(DrawingSettingsUpdate {
            brush_width: Some(0),
            ..Default::default()
        });
        assert_eq!(settings.brush_width, 1);
    }

    #[test]
    fn test_stroke_style_fill() {
        let mut settings = DrawingSettings {
            current_color: SerializableColor::new(255, 0, 0, 255),
            brush_width: 4,
            ..Default::default()
        };
        let style = settings.stroke_style();
        assert!(style.fill_color.is_none());
        assert!((style.stroke_width - 4.0).abs() < f64::EPSILON);
        assert!(!style.selectable);

        settings.fill_enabled = true;
        assert_eq!(
            settings.stroke_style().fill_color,
            Some(SerializableColor::new(255, 0, 0, 255))
        );
    }

    #[test]
    fn test_unknown_mode_in_update_falls_back() {
        let update: DrawingSettingsUpdate =
            serde_json::from_str(r#"{"current_mode": "LASSO"}"#).unwrap();
        assert_eq!(update.current_mode, Some(Mode::Pencil));
    }
}
