use std::sync::atomic::{AtomicU64, Ordering};

use super::shape::{shapes_bounds, Shadow, Shape, ShapeGeometry};
use super::types::{BBox, Color, ShapeStyle, StrokeStyle, Transform2D, Vec2};
use crate::loader::DecodedImage;

/// Global layer ID counter
static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

fn generate_layer_id() -> LayerId {
    NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed)
}

pub type LayerId = u64;

/// Decorative frames offered by the toolbar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// White photo mat with a wider band along the bottom edge
    Polaroid,
    /// Thick pink outline just inside the surface edge
    Border,
}

impl FrameKind {
    pub const ALL: [FrameKind; 2] = [FrameKind::Polaroid, FrameKind::Border];

    pub fn label(&self) -> &'static str {
        match self {
            FrameKind::Polaroid => "Polaroid",
            FrameKind::Border => "Pink Border",
        }
    }

    /// Shapes making up this frame for a surface of the given size,
    /// in local coordinates centered on the surface center.
    pub fn shapes(&self, surface: Vec2) -> Vec<Shape> {
        match self {
            FrameKind::Polaroid => {
                let mat = Vec2::new(surface.x * 0.9, surface.y * 0.85);
                let outer = Shape::new(
                    ShapeGeometry::rectangle(mat.x, mat.y),
                    ShapeStyle::fill_and_stroke(
                        Color::white().with_alpha(0.95),
                        StrokeStyle::new(Color::white(), 2.0),
                    ),
                )
                .with_shadow(Shadow {
                    color: Color::black().with_alpha(0.15),
                    offset: Vec2::new(0.0, 5.0),
                    blur: 15.0,
                });
                let band = Shape::new(
                    ShapeGeometry::rectangle_at(
                        Vec2::new(0.0, mat.y / 2.0 - 40.0),
                        mat.x * 0.92,
                        60.0,
                    ),
                    ShapeStyle::fill_only(Color::rgb(250.0 / 255.0, 250.0 / 255.0, 250.0 / 255.0)),
                );
                vec![outer, band]
            }
            FrameKind::Border => {
                let pink = Color::rgb(1.0, 175.0 / 255.0, 193.0 / 255.0);
                vec![Shape::new(
                    ShapeGeometry::rectangle(surface.x * 0.95, surface.y * 0.95),
                    ShapeStyle::stroke_only(StrokeStyle::new(pink, 16.0)),
                )]
            }
        }
    }
}

/// What part a layer plays in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    Background,
    Frame(FrameKind),
    Sticker,
    Stroke,
}

/// What a layer draws
#[derive(Clone, Debug, PartialEq)]
pub enum LayerContent {
    /// Decoded raster, drawn centered on the layer origin
    Image(DecodedImage),
    /// Vector shapes in local coordinates
    Shapes(Vec<Shape>),
}

/// A placed item in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub role: LayerRole,
    pub content: LayerContent,
    pub transform: Transform2D,
}

impl Layer {
    fn with_role(role: LayerRole, content: LayerContent, transform: Transform2D) -> Self {
        Self {
            id: generate_layer_id(),
            role,
            content,
            transform,
        }
    }

    pub fn background(image: DecodedImage, transform: Transform2D) -> Self {
        Self::with_role(LayerRole::Background, LayerContent::Image(image), transform)
    }

    pub fn sticker(image: DecodedImage, transform: Transform2D) -> Self {
        Self::with_role(LayerRole::Sticker, LayerContent::Image(image), transform)
    }

    pub fn frame(kind: FrameKind, surface: Vec2) -> Self {
        Self::with_role(
            LayerRole::Frame(kind),
            LayerContent::Shapes(kind.shapes(surface)),
            Transform2D::from_position(surface * 0.5),
        )
    }

    /// Build a stroke layer from world-space points, re-centered so the
    /// layer origin sits in the middle of the stroke.
    pub fn stroke(world_points: Vec<Vec2>, style: StrokeStyle) -> Option<Self> {
        let center = BBox::from_points(&world_points)?.center();
        let mut geometry = ShapeGeometry::polyline(world_points);
        geometry.translate(-center);
        let shape = Shape::new(geometry, ShapeStyle::stroke_only(style));
        Some(Self::with_role(
            LayerRole::Stroke,
            LayerContent::Shapes(vec![shape]),
            Transform2D::from_position(center),
        ))
    }

    /// Whether the user can select, move, resize, rotate and delete this layer
    pub fn is_interactive(&self) -> bool {
        matches!(self.role, LayerRole::Sticker | LayerRole::Stroke)
    }

    /// Bounds before the transform is applied
    pub fn local_bounds(&self) -> BBox {
        match &self.content {
            LayerContent::Image(image) => BBox::from_center(Vec2::ZERO, image.size()),
            LayerContent::Shapes(shapes) => {
                shapes_bounds(shapes).unwrap_or(BBox::new(Vec2::ZERO, Vec2::ZERO))
            }
        }
    }

    /// Corners of the local bounds mapped into world space
    pub fn world_corners(&self) -> [Vec2; 4] {
        self.local_bounds()
            .corners()
            .map(|corner| self.transform.transform_point(corner))
    }

    /// Get the world-space axis-aligned bounding box
    pub fn world_bounds(&self) -> BBox {
        let corners = self.world_corners();
        BBox::from_points(&corners).unwrap_or(BBox::new(Vec2::ZERO, Vec2::ZERO))
    }

    /// Size of the local bounds after scaling
    pub fn displayed_size(&self) -> Vec2 {
        self.local_bounds().size() * self.transform.scale.abs()
    }

    /// Check if a world point falls inside this layer's (possibly rotated) bounds
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self.transform.inverse_transform_point(point) {
            Some(local) => self.local_bounds().contains(local),
            None => false,
        }
    }

    pub fn label(&self) -> String {
        match self.role {
            LayerRole::Background => "Background".to_string(),
            LayerRole::Frame(kind) => kind.label().to_string(),
            LayerRole::Sticker => format!("Sticker {}", self.id),
            LayerRole::Stroke => format!("Doodle {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn test_image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::solid(width, height, [10, 20, 30, 255]).unwrap()
    }

    #[test]
    fn test_layer_ids_are_unique() {
        let a = Layer::sticker(test_image(2, 2), Transform2D::identity());
        let b = Layer::sticker(test_image(2, 2), Transform2D::identity());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_interactivity_by_role() {
        let surface = Vec2::new(400.0, 300.0);
        assert!(!Layer::background(test_image(4, 4), Transform2D::identity()).is_interactive());
        assert!(!Layer::frame(FrameKind::Border, surface).is_interactive());
        assert!(Layer::sticker(test_image(4, 4), Transform2D::identity()).is_interactive());
        let stroke = Layer::stroke(vec![Vec2::ZERO, Vec2::ONE], StrokeStyle::default()).unwrap();
        assert!(stroke.is_interactive());
    }

    #[test]
    fn test_image_bounds_are_centered() {
        let layer = Layer::sticker(
            test_image(100, 50),
            Transform2D::from_position(Vec2::new(200.0, 150.0)).with_uniform_scale(2.0),
        );
        let bounds = layer.world_bounds();
        assert_eq!(bounds.min, Vec2::new(100.0, 100.0));
        assert_eq!(bounds.max, Vec2::new(300.0, 200.0));
        assert_eq!(layer.displayed_size(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_contains_point_respects_rotation() {
        let layer = Layer::sticker(
            test_image(100, 10),
            Transform2D::from_position(Vec2::new(100.0, 100.0)).with_rotation(FRAC_PI_4),
        );
        // Along the rotated long axis
        assert!(layer.contains_point(Vec2::new(130.0, 130.0)));
        // Inside the axis-aligned box but outside the rotated strip
        assert!(!layer.contains_point(Vec2::new(130.0, 70.0)));
    }

    #[test]
    fn test_stroke_is_recentered() {
        let layer = Layer::stroke(
            vec![Vec2::new(10.0, 10.0), Vec2::new(30.0, 50.0)],
            StrokeStyle::new(Color::black(), 4.0),
        )
        .unwrap();
        assert_eq!(layer.transform.position, Vec2::new(20.0, 30.0));
        let bounds = layer.world_bounds();
        assert_eq!(bounds.min, Vec2::new(8.0, 8.0));
        assert_eq!(bounds.max, Vec2::new(32.0, 52.0));
    }

    #[test]
    fn test_empty_stroke_is_rejected() {
        assert!(Layer::stroke(Vec::new(), StrokeStyle::default()).is_none());
    }

    #[test]
    fn test_polaroid_band_sits_near_bottom() {
        let shapes = FrameKind::Polaroid.shapes(Vec2::new(400.0, 300.0));
        assert_eq!(shapes.len(), 2);
        let mat = shapes[0].geometry.local_bounds();
        let band = shapes[1].geometry.local_bounds();
        assert_eq!(mat.size(), Vec2::new(360.0, 255.0));
        assert!(band.center().y > 0.0);
        assert!(band.max.y <= mat.max.y);
    }
}
