use crate::config::SurfaceConfig;
use crate::scene::Vec2;

/// Size of the layout region available to the canvas, as measured by the host page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportHint {
    pub width: f64,
    pub height: f64,
}

impl ViewportHint {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A region with no area means layout has not settled yet
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pixel size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fit the surface into the measured region minus page chrome,
    /// clamped to the configured limits.
    pub fn fit_viewport(hint: ViewportHint, limits: &SurfaceConfig) -> Self {
        let width = (hint.width as f32 - limits.chrome_width)
            .min(limits.max_width)
            .max(limits.min_width);
        let height = (hint.height as f32 - limits.chrome_height)
            .min(limits.max_height)
            .max(limits.min_height);
        Self::new(width.round() as u32, height.round() as u32)
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.as_vec2() * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleName {
    Right,
    Bottom,
    Left,
    Top,
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
    Rotate,
}

impl HandleName {
    pub const ALL: [HandleName; 9] = [
        HandleName::TopLeft,
        HandleName::Top,
        HandleName::TopRight,
        HandleName::Right,
        HandleName::BottomRight,
        HandleName::Bottom,
        HandleName::BottomLeft,
        HandleName::Left,
        HandleName::Rotate,
    ];

    pub fn to_kebab_case(&self) -> &'static str {
        match self {
            HandleName::Right => "right",
            HandleName::Bottom => "bottom",
            HandleName::Left => "left",
            HandleName::Top => "top",
            HandleName::BottomRight => "bottom-right",
            HandleName::BottomLeft => "bottom-left",
            HandleName::TopRight => "top-right",
            HandleName::TopLeft => "top-left",
            HandleName::Rotate => "rotate",
        }
    }

    pub fn cursor(&self) -> &'static str {
        match self {
            HandleName::Right => "ew-resize",
            HandleName::Left => "ew-resize",
            HandleName::Top => "ns-resize",
            HandleName::Bottom => "ns-resize",
            HandleName::TopLeft => "nwse-resize",
            HandleName::BottomRight => "nwse-resize",
            HandleName::TopRight => "nesw-resize",
            HandleName::BottomLeft => "nesw-resize",
            HandleName::Rotate => "grab",
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            HandleName::TopLeft
                | HandleName::TopRight
                | HandleName::BottomLeft
                | HandleName::BottomRight
        )
    }

    /// Position of the handle on a box of half-extent `half`, centered on the
    /// origin. `(-1, -1)` is the top-left corner. The rotate handle sits
    /// `rotate_offset` above the top edge.
    pub fn local_position(&self, half: Vec2, rotate_offset: f32) -> Vec2 {
        match self {
            HandleName::Right => Vec2::new(half.x, 0.0),
            HandleName::Left => Vec2::new(-half.x, 0.0),
            HandleName::Top => Vec2::new(0.0, -half.y),
            HandleName::Bottom => Vec2::new(0.0, half.y),
            HandleName::TopLeft => Vec2::new(-half.x, -half.y),
            HandleName::TopRight => Vec2::new(half.x, -half.y),
            HandleName::BottomLeft => Vec2::new(-half.x, half.y),
            HandleName::BottomRight => Vec2::new(half.x, half.y),
            HandleName::Rotate => Vec2::new(0.0, -half.y - rotate_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_viewport_clamps() {
        let limits = SurfaceConfig::default();
        // Tiny phone-sized region: clamped up to the minimum
        let small = SurfaceSize::fit_viewport(ViewportHint::new(320.0, 480.0), &limits);
        assert_eq!(small, SurfaceSize::new(400, 300));
        // Huge desktop region: clamped down to the maximum
        let large = SurfaceSize::fit_viewport(ViewportHint::new(2000.0, 1400.0), &limits);
        assert_eq!(large, SurfaceSize::new(800, 600));
        // In between: region minus chrome
        let mid = SurfaceSize::fit_viewport(ViewportHint::new(700.0, 650.0), &limits);
        assert_eq!(mid, SurfaceSize::new(620, 450));
    }

    #[test]
    fn test_viewport_measurable() {
        assert!(ViewportHint::new(10.0, 10.0).is_measurable());
        assert!(!ViewportHint::new(0.0, 600.0).is_measurable());
        assert!(!ViewportHint::new(f64::NAN, 600.0).is_measurable());
    }

    #[test]
    fn test_handle_positions() {
        let half = Vec2::new(50.0, 20.0);
        assert_eq!(HandleName::TopLeft.local_position(half, 30.0), Vec2::new(-50.0, -20.0));
        assert_eq!(HandleName::Right.local_position(half, 30.0), Vec2::new(50.0, 0.0));
        assert_eq!(HandleName::Rotate.local_position(half, 30.0), Vec2::new(0.0, -50.0));
        assert!(HandleName::BottomRight.is_corner());
        assert!(!HandleName::Rotate.is_corner());
    }
}
