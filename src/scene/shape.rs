use super::types::{BBox, Color, ShapeStyle, Vec2};

/// Geometry of a vector shape, in its layer's local coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeGeometry {
    /// Axis-aligned rectangle centered on `center`
    Rectangle {
        center: Vec2,
        width: f32,
        height: f32,
    },

    /// Open polyline; a single point renders as a dot
    Polyline { points: Vec<Vec2> },
}

impl ShapeGeometry {
    /// Create a rectangle centered on the origin
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle {
            center: Vec2::ZERO,
            width,
            height,
        }
    }

    /// Create a rectangle centered on `center`
    pub fn rectangle_at(center: Vec2, width: f32, height: f32) -> Self {
        Self::Rectangle {
            center,
            width,
            height,
        }
    }

    pub fn polyline(points: Vec<Vec2>) -> Self {
        Self::Polyline { points }
    }

    /// Get the local bounding box, ignoring stroke width
    pub fn local_bounds(&self) -> BBox {
        match self {
            ShapeGeometry::Rectangle {
                center,
                width,
                height,
            } => BBox::from_center(*center, Vec2::new(*width, *height)),
            ShapeGeometry::Polyline { points } => {
                BBox::from_points(points).unwrap_or(BBox::new(Vec2::ZERO, Vec2::ZERO))
            }
        }
    }

    /// Shift every coordinate by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            ShapeGeometry::Rectangle { center, .. } => *center += delta,
            ShapeGeometry::Polyline { points } => {
                for p in points.iter_mut() {
                    *p += delta;
                }
            }
        }
    }
}

/// Drop shadow drawn beneath a shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub offset: Vec2,
    pub blur: f32,
}

/// A styled vector shape; frames are made of these, as are freehand strokes
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
    pub shadow: Option<Shadow>,
}

impl Shape {
    pub fn new(geometry: ShapeGeometry, style: ShapeStyle) -> Self {
        Self {
            geometry,
            style,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Local bounds including half the stroke width
    pub fn local_bounds(&self) -> BBox {
        let bounds = self.geometry.local_bounds();
        match self.style.stroke {
            Some(stroke) => bounds.expand(stroke.width / 2.0),
            None => bounds,
        }
    }
}

/// Union of the bounds of several shapes
pub fn shapes_bounds(shapes: &[Shape]) -> Option<BBox> {
    let mut iter = shapes.iter().map(Shape::local_bounds);
    let first = iter.next()?;
    Some(iter.fold(first, |acc, b| acc.union(&b)))
}
