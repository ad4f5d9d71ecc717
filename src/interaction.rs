//! Pointer gestures: moving, scaling and rotating the active layer, and
//! painting freehand strokes.
use crate::scene::{Layer, LayerId, SceneGraph, Shape, ShapeGeometry, ShapeStyle, StrokeStyle, Vec2};
use crate::tools::Brush;
use crate::types::HandleName;
use crate::utils::angle_around;

/// Smallest displayed extent a layer can be scaled down to
pub const MIN_SIZE: f32 = 10.0;
/// Pointer distance within which a handle is grabbed
pub const HANDLE_HIT_RADIUS: f32 = 9.0;
/// Distance of the rotate handle above the top edge
pub const ROTATE_HANDLE_OFFSET: f32 = 28.0;
/// Points closer than this to the previous one are dropped from a stroke
const MIN_POINT_SPACING: f32 = 0.5;

/// Selection chrome for the active layer, in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutline {
    pub layer: LayerId,
    /// Corners of the rotated bounds, clockwise from top-left
    pub corners: [Vec2; 4],
    pub handles: Vec<(HandleName, Vec2)>,
}

impl SelectionOutline {
    pub fn for_layer(layer: &Layer) -> Self {
        let bounds = layer.local_bounds();
        let half = bounds.size() * 0.5 * layer.transform.scale.abs();
        let center = layer.transform.transform_point(bounds.center());
        let rotation = Vec2::from_angle(layer.transform.rotation);

        let handles = HandleName::ALL
            .iter()
            .map(|&h| (h, center + rotation.rotate(h.local_position(half, ROTATE_HANDLE_OFFSET))))
            .collect();

        Self {
            layer: layer.id,
            corners: layer.world_corners(),
            handles,
        }
    }

    /// Handle under the pointer, if any
    pub fn handle_at(&self, point: Vec2) -> Option<HandleName> {
        self.handles
            .iter()
            .filter(|(_, pos)| pos.distance(point) <= HANDLE_HIT_RADIUS)
            .min_by(|(_, a), (_, b)| a.distance(point).total_cmp(&b.distance(point)))
            .map(|(h, _)| *h)
    }

    /// Start and end of the stem joining the top edge to the rotate handle
    pub fn rotate_stem(&self) -> Option<(Vec2, Vec2)> {
        let find = |name| self.handles.iter().find(|(h, _)| *h == name).map(|(_, p)| *p);
        Some((find(HandleName::Top)?, find(HandleName::Rotate)?))
    }
}

/// A stroke being painted; the brush is captured when the stroke starts
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeBuilder {
    style: StrokeStyle,
    points: Vec<Vec2>,
}

impl StrokeBuilder {
    pub fn new(brush: Brush, start: Vec2) -> Self {
        Self {
            style: brush.stroke_style(),
            points: vec![start],
        }
    }

    /// Append a point; returns false if it was too close to the previous one
    pub fn push(&mut self, point: Vec2) -> bool {
        match self.points.last() {
            Some(last) if last.distance(point) < MIN_POINT_SPACING => false,
            _ => {
                self.points.push(point);
                true
            }
        }
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// The stroke so far, in surface coordinates
    pub fn preview(&self) -> Shape {
        Shape::new(
            ShapeGeometry::polyline(self.points.clone()),
            ShapeStyle::stroke_only(self.style),
        )
    }

    pub fn finish(self) -> Option<Layer> {
        Layer::stroke(self.points, self.style)
    }
}

/// An in-progress pointer drag
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Move {
        layer: LayerId,
        /// Layer position minus pointer position at grab time
        grab_offset: Vec2,
    },
    Scale {
        layer: LayerId,
        handle: HandleName,
        start_pointer: Vec2,
        start_scale: Vec2,
        /// Unscaled half extent of the layer's local bounds
        half: Vec2,
    },
    Rotate {
        layer: LayerId,
        start_angle: f32,
        start_rotation: f32,
    },
    Draw(StrokeBuilder),
}

impl Gesture {
    /// CSS cursor shown while the gesture runs
    pub fn cursor(&self) -> &'static str {
        match self {
            Gesture::Move { .. } => "move",
            Gesture::Scale { handle, .. } => handle.cursor(),
            Gesture::Rotate { .. } => "grabbing",
            Gesture::Draw(_) => "crosshair",
        }
    }

    /// Begin a transform gesture on `layer` from a pointer-down at `point`
    pub fn grab(layer: &Layer, handle: Option<HandleName>, point: Vec2) -> Self {
        let center = layer.transform.position;
        match handle {
            None => Gesture::Move {
                layer: layer.id,
                grab_offset: center - point,
            },
            Some(HandleName::Rotate) => Gesture::Rotate {
                layer: layer.id,
                start_angle: angle_around(center, point),
                start_rotation: layer.transform.rotation,
            },
            Some(handle) => Gesture::Scale {
                layer: layer.id,
                handle,
                start_pointer: point,
                start_scale: layer.transform.scale,
                half: layer.local_bounds().size() * 0.5,
            },
        }
    }

    /// Apply a pointer move. Returns true if anything visible changed.
    pub fn update(&mut self, scene: &mut SceneGraph, pointer: Vec2) -> bool {
        match self {
            Gesture::Draw(stroke) => stroke.push(pointer),
            Gesture::Move { layer, grab_offset } => {
                let Some(layer) = scene.get_layer_mut(*layer) else {
                    return false;
                };
                layer.transform.position = pointer + *grab_offset;
                true
            }
            Gesture::Rotate {
                layer,
                start_angle,
                start_rotation,
            } => {
                let Some(layer) = scene.get_layer_mut(*layer) else {
                    return false;
                };
                let angle = angle_around(layer.transform.position, pointer);
                layer.transform.rotation = *start_rotation + (angle - *start_angle);
                true
            }
            Gesture::Scale {
                layer,
                handle,
                start_pointer,
                start_scale,
                half,
            } => {
                let Some(layer) = scene.get_layer_mut(*layer) else {
                    return false;
                };
                layer.transform.scale = scaled(
                    *handle,
                    layer.transform.position,
                    layer.transform.rotation,
                    *start_pointer,
                    *start_scale,
                    *half,
                    pointer,
                );
                true
            }
        }
    }

    pub fn pending_stroke(&self) -> Option<&StrokeBuilder> {
        match self {
            Gesture::Draw(stroke) => Some(stroke),
            _ => None,
        }
    }
}

/// New scale for a scale gesture. Corners scale uniformly by the change in
/// distance from the center; edges stretch one local axis. Both keep each
/// displayed extent at or above [`MIN_SIZE`].
fn scaled(
    handle: HandleName,
    center: Vec2,
    rotation: f32,
    start_pointer: Vec2,
    start_scale: Vec2,
    half: Vec2,
    pointer: Vec2,
) -> Vec2 {
    let min_scale = |half_extent: f32| {
        if half_extent > 0.0 {
            MIN_SIZE / (2.0 * half_extent)
        } else {
            0.0
        }
    };

    if handle.is_corner() {
        let start_dist = start_pointer.distance(center);
        if start_dist <= f32::EPSILON {
            return start_scale;
        }
        let floor = (min_scale(half.x) / start_scale.x.abs())
            .max(min_scale(half.y) / start_scale.y.abs());
        let ratio = (pointer.distance(center) / start_dist).max(floor);
        return start_scale * ratio;
    }

    let local = Vec2::from_angle(-rotation).rotate(pointer - center);
    match handle {
        HandleName::Left | HandleName::Right if half.x > 0.0 => Vec2::new(
            (local.x.abs() / half.x).max(min_scale(half.x)),
            start_scale.y,
        ),
        HandleName::Top | HandleName::Bottom if half.y > 0.0 => Vec2::new(
            start_scale.x,
            (local.y.abs() / half.y).max(min_scale(half.y)),
        ),
        _ => start_scale,
    }
}
