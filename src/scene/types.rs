pub use glam::Vec2;
use glam::Affine2;
use serde::{Deserialize, Serialize};

/// RGBA color with f32 components (0.0 - 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    /// Parse a hex color string ("#ffafc1", "ffafc1" or "#ffafc180")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }

        let channel = |i: usize| -> Option<f32> {
            Some(u8::from_str_radix(&hex[i..i + 2], 16).ok()? as f32 / 255.0)
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };

        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Convert to hex string; alpha is only written when not opaque
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn to_skia(&self) -> tiny_skia::Color {
        let [r, g, b, a] = self.to_rgba8();
        tiny_skia::Color::from_rgba8(r, g, b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("not a hex color: {value:?}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Placement of a layer: its local content is centered on the origin, then
/// scaled, rotated and moved so the origin lands on `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32, // radians
}

impl Transform2D {
    pub fn new(position: Vec2, scale: Vec2, rotation: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builder method to set scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Builder method to set a uniform scale
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec2::splat(scale))
    }

    /// Builder method to set rotation (in radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// Apply this transform to a local point
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.to_affine().transform_point2(point)
    }

    /// Map a world point back into local coordinates.
    /// Returns None when the transform is degenerate (zero scale).
    pub fn inverse_transform_point(&self, point: Vec2) -> Option<Vec2> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        let unrotated = Vec2::from_angle(-self.rotation).rotate(point - self.position);
        Some(unrotated / self.scale)
    }

    pub fn to_skia(&self) -> tiny_skia::Transform {
        affine_to_skia(&self.to_affine())
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

pub fn affine_to_skia(m: &Affine2) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(
        m.matrix2.x_axis.x,
        m.matrix2.x_axis.y,
        m.matrix2.y_axis.x,
        m.matrix2.y_axis.y,
        m.translation.x,
        m.translation.y,
    )
}

/// Stroke styling for shape outlines
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::black(),
            width: 1.0,
        }
    }
}

/// Complete styling for a shape (fill and/or stroke)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
}

impl ShapeStyle {
    pub fn fill_only(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroke_only(stroke: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }

    pub fn fill_and_stroke(fill: Color, stroke: StrokeStyle) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
        }
    }
}

/// Axis-aligned bounding box using Vec2
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut min = *first;
        let mut max = *first;
        for &p in rest {
            min = min.min(p);
            max = max.max(p);
        }

        Some(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Expand to include another bounding box
    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Expand by a margin
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_color_hex_parsing() {
        let color = Color::from_hex("#ffafc1").unwrap();
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.686).abs() < 0.01);
        assert!((color.b - 0.757).abs() < 0.01);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let original = "#ff85a1";
        let color = Color::from_hex(original).unwrap();
        assert_eq!(color.to_hex(), original);
    }

    #[test]
    fn test_color_hex_with_alpha() {
        let color = Color::from_hex("#00000026").unwrap();
        assert_eq!(color.to_rgba8(), [0, 0, 0, 0x26]);
        assert_eq!(color.to_hex(), "#00000026");
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(Color::from_hex("pink").is_none());
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#gg0000").is_none());
    }

    #[test]
    fn test_color_serde_as_hex() {
        let json = serde_json::to_string(&Color::white()).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let parsed: Color = serde_json::from_str("\"#ffafc1\"").unwrap();
        assert_eq!(parsed.to_hex(), "#ffafc1");
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_transform_identity() {
        let t = Transform2D::identity();
        let point = Vec2::new(10.0, 20.0);
        assert_eq!(t.transform_point(point), point);
    }

    #[test]
    fn test_transform_translation() {
        let t = Transform2D::from_position(Vec2::new(5.0, 10.0));
        let transformed = t.transform_point(Vec2::new(10.0, 20.0));
        assert_eq!(transformed, Vec2::new(15.0, 30.0));
    }

    #[test]
    fn test_transform_scale_then_rotate() {
        let t = Transform2D::from_position(Vec2::new(100.0, 100.0))
            .with_uniform_scale(2.0)
            .with_rotation(FRAC_PI_2);
        let p = t.transform_point(Vec2::new(10.0, 0.0));
        assert!((p - Vec2::new(100.0, 120.0)).length() < 1e-4);
    }

    #[test]
    fn test_inverse_transform_roundtrip() {
        let t = Transform2D::from_position(Vec2::new(40.0, -3.0))
            .with_scale(Vec2::new(0.5, 3.0))
            .with_rotation(0.7);
        let local = Vec2::new(12.0, -8.0);
        let back = t.inverse_transform_point(t.transform_point(local)).unwrap();
        assert!((back - local).length() < 1e-3);
    }

    #[test]
    fn test_inverse_of_zero_scale_is_none() {
        let t = Transform2D::identity().with_scale(Vec2::new(0.0, 1.0));
        assert!(t.inverse_transform_point(Vec2::ONE).is_none());
    }

    #[test]
    fn test_bbox_from_points() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(5.0, 15.0),
        ];
        let bbox = BBox::from_points(&points).unwrap();
        assert_eq!(bbox.min, Vec2::new(0.0, 0.0));
        assert_eq!(bbox.max, Vec2::new(10.0, 15.0));
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_bbox_from_center() {
        let bbox = BBox::from_center(Vec2::new(200.0, 150.0), Vec2::new(360.0, 270.0));
        assert_eq!(bbox.min, Vec2::new(20.0, 15.0));
        assert_eq!(bbox.size(), Vec2::new(360.0, 270.0));
    }
}
