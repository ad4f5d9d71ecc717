use crate::config::BrushConfig;
use crate::scene::{Color, StrokeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Pointer drags select and transform layers
    #[default]
    Select,
    /// Pointer drags paint freehand strokes
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color,
    pub width: f32,
}

impl Brush {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.width)
    }
}

/// Tolerates an inverted range, where `max_width` wins
fn clamp_width(width: f32, limits: &BrushConfig) -> f32 {
    width.max(limits.min_width).min(limits.max_width)
}

/// Interaction mode plus brush parameters. The brush is editable in either
/// mode and only read when a stroke starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolController {
    mode: ToolMode,
    brush: Brush,
    limits: BrushConfig,
}

impl ToolController {
    pub fn new(limits: BrushConfig) -> Self {
        let brush = Brush {
            color: limits.color,
            width: clamp_width(limits.width, &limits),
        };
        Self {
            mode: ToolMode::Select,
            brush,
            limits,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == ToolMode::Draw
    }

    /// Returns true if the mode changed
    pub fn set_mode(&mut self, mode: ToolMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    /// Width is clamped to the configured range; non-finite values are ignored
    pub fn set_brush_width(&mut self, width: f32) {
        if width.is_finite() {
            self.brush.width = clamp_width(width, &self.limits);
        }
    }

    pub fn width_range(&self) -> (f32, f32) {
        (self.limits.min_width, self.limits.max_width)
    }

    /// Back to the configured defaults
    pub fn reset(&mut self) {
        *self = Self::new(self.limits.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_select_mode_with_default_brush() {
        let tools = ToolController::new(BrushConfig::default());
        assert_eq!(tools.mode(), ToolMode::Select);
        assert_eq!(tools.brush().width, 6.0);
        assert_eq!(tools.brush().color.to_hex(), "#ff85a1");
    }

    #[test]
    fn test_width_is_clamped() {
        let mut tools = ToolController::new(BrushConfig::default());
        tools.set_brush_width(500.0);
        assert_eq!(tools.brush().width, 64.0);
        tools.set_brush_width(0.0);
        assert_eq!(tools.brush().width, 1.0);
        tools.set_brush_width(f32::NAN);
        assert_eq!(tools.brush().width, 1.0);
    }

    #[test]
    fn test_brush_remembered_across_modes() {
        let mut tools = ToolController::new(BrushConfig::default());
        tools.set_brush_color(Color::black());
        tools.set_brush_width(12.0);
        assert!(tools.set_mode(ToolMode::Draw));
        assert!(!tools.set_mode(ToolMode::Draw));
        assert_eq!(tools.brush().color, Color::black());
        assert_eq!(tools.brush().width, 12.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut tools = ToolController::new(BrushConfig::default());
        tools.set_mode(ToolMode::Draw);
        tools.set_brush_width(30.0);
        tools.reset();
        assert_eq!(tools, ToolController::new(BrushConfig::default()));
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let limits = BrushConfig {
            min_width: 10.0,
            max_width: 5.0,
            ..BrushConfig::default()
        };
        let mut tools = ToolController::new(limits);
        assert_eq!(tools.brush().width, 5.0);
        tools.set_brush_width(8.0);
        assert_eq!(tools.brush().width, 5.0);
    }
}
