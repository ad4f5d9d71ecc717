//! Software compositor: flattens a scene into a pixmap.
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};

use crate::error::{EditorError, Result};
use crate::scene::{
    Color, Layer, LayerContent, LayerRole, SceneGraph, Shape, ShapeGeometry, Transform2D, Vec2,
};
use crate::types::SurfaceSize;

/// What to draw besides the layers themselves
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Colour to clear to; None leaves the surface transparent
    pub fill: Option<Color>,
    /// Whether the background photo is drawn
    pub include_background: bool,
    /// A stroke still being drawn, in world coordinates
    pub pending_stroke: Option<&'a Shape>,
}

/// Composite the scene in band order into a fresh pixmap
pub fn render(scene: &SceneGraph, size: SurfaceSize, options: &RenderOptions) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(size.width, size.height).ok_or_else(|| {
        EditorError::Export(format!("cannot allocate {}x{} surface", size.width, size.height))
    })?;

    if let Some(fill) = options.fill {
        pixmap.fill(fill.to_skia());
    }

    for layer in scene.render_order() {
        if layer.role == LayerRole::Background && !options.include_background {
            continue;
        }
        draw_layer(&mut pixmap, layer);
    }

    if let Some(stroke) = options.pending_stroke {
        draw_shape(&mut pixmap, stroke, Transform::identity());
    }

    Ok(pixmap)
}

/// Encode a pixmap as PNG
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| EditorError::Export(e.to_string()))
}

/// Straight-alpha RGBA bytes, as expected by canvas `ImageData`
pub fn to_straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

fn draw_layer(pixmap: &mut Pixmap, layer: &Layer) {
    match &layer.content {
        LayerContent::Image(image) => {
            let transform = image_transform(&layer.transform, image.size());
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
        }
        LayerContent::Shapes(shapes) => {
            let transform = layer.transform.to_skia();
            for shape in shapes {
                draw_shape(pixmap, shape, transform);
            }
        }
    }
}

/// Images are stored with their top-left at the origin; shift them so the
/// layer origin is the image center.
fn image_transform(transform: &Transform2D, size: Vec2) -> Transform {
    transform
        .to_skia()
        .pre_translate(-size.x / 2.0, -size.y / 2.0)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn draw_shape(pixmap: &mut Pixmap, shape: &Shape, transform: Transform) {
    match &shape.geometry {
        ShapeGeometry::Rectangle {
            center,
            width,
            height,
        } => {
            let Some(rect) =
                Rect::from_xywh(center.x - width / 2.0, center.y - height / 2.0, *width, *height)
            else {
                return;
            };

            if let Some(shadow) = shape.shadow {
                // Approximate blur by widening a translucent copy
                let spread = shadow.blur / 4.0;
                if let Some(shadow_rect) = Rect::from_xywh(
                    rect.x() + shadow.offset.x - spread,
                    rect.y() + shadow.offset.y - spread,
                    rect.width() + spread * 2.0,
                    rect.height() + spread * 2.0,
                ) {
                    let path = PathBuilder::from_rect(shadow_rect);
                    pixmap.fill_path(
                        &path,
                        &paint_for(shadow.color),
                        FillRule::Winding,
                        transform,
                        None,
                    );
                }
            }

            let path = PathBuilder::from_rect(rect);
            if let Some(fill) = shape.style.fill {
                pixmap.fill_path(&path, &paint_for(fill), FillRule::Winding, transform, None);
            }
            if let Some(stroke) = shape.style.stroke {
                let style = Stroke {
                    width: stroke.width,
                    line_join: LineJoin::Miter,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint_for(stroke.color), &style, transform, None);
            }
        }
        ShapeGeometry::Polyline { points } => {
            let Some(stroke) = shape.style.stroke else {
                return;
            };
            let paint = paint_for(stroke.color);

            if let [only] = points.as_slice() {
                // A click without movement leaves a round dot
                if let Some(dot) = PathBuilder::from_circle(only.x, only.y, stroke.width / 2.0) {
                    pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
                }
                return;
            }

            let mut builder = PathBuilder::new();
            for (i, p) in points.iter().enumerate() {
                if i == 0 {
                    builder.move_to(p.x, p.y);
                } else {
                    builder.line_to(p.x, p.y);
                }
            }
            let Some(path) = builder.finish() else {
                return;
            };
            let style = Stroke {
                width: stroke.width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &style, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DecodedImage;
    use crate::scene::{FrameKind, ShapeStyle, StrokeStyle};

    fn rgba_at(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn opaque_fill() -> RenderOptions<'static> {
        RenderOptions {
            fill: Some(Color::white()),
            include_background: true,
            pending_stroke: None,
        }
    }

    #[test]
    fn test_empty_scene_is_fill_color() {
        let pixmap = render(&SceneGraph::new(), SurfaceSize::new(40, 30), &opaque_fill()).unwrap();
        assert_eq!(pixmap.width(), 40);
        assert_eq!(rgba_at(&pixmap, 0, 0), [255, 255, 255, 255]);
        assert_eq!(rgba_at(&pixmap, 39, 29), [255, 255, 255, 255]);
    }

    #[test]
    fn test_no_fill_is_transparent() {
        let options = RenderOptions {
            fill: None,
            ..opaque_fill()
        };
        let pixmap = render(&SceneGraph::new(), SurfaceSize::new(4, 4), &options).unwrap();
        assert_eq!(rgba_at(&pixmap, 2, 2)[3], 0);
    }

    #[test]
    fn test_image_drawn_centered_on_position() {
        let mut scene = SceneGraph::new();
        let image = DecodedImage::solid(10, 10, [255, 0, 0, 255]).unwrap();
        scene.add_layer(Layer::sticker(
            image,
            Transform2D::from_position(Vec2::new(20.0, 20.0)),
        ));
        let pixmap = render(&scene, SurfaceSize::new(40, 40), &opaque_fill()).unwrap();

        assert_eq!(rgba_at(&pixmap, 20, 20), [255, 0, 0, 255]);
        assert_eq!(rgba_at(&pixmap, 16, 16), [255, 0, 0, 255]);
        assert_eq!(rgba_at(&pixmap, 5, 5), [255, 255, 255, 255]);
        assert_eq!(rgba_at(&pixmap, 30, 30), [255, 255, 255, 255]);
    }

    #[test]
    fn test_background_can_be_skipped() {
        let mut scene = SceneGraph::new();
        let image = DecodedImage::solid(40, 40, [0, 0, 255, 255]).unwrap();
        scene.set_background(Layer::background(
            image,
            Transform2D::from_position(Vec2::new(20.0, 20.0)),
        ));

        let kept = render(&scene, SurfaceSize::new(40, 40), &opaque_fill()).unwrap();
        assert_eq!(rgba_at(&kept, 20, 20), [0, 0, 255, 255]);

        let options = RenderOptions {
            fill: None,
            include_background: false,
            pending_stroke: None,
        };
        let stripped = render(&scene, SurfaceSize::new(40, 40), &options).unwrap();
        assert_eq!(rgba_at(&stripped, 20, 20)[3], 0);
    }

    #[test]
    fn test_border_frame_paints_edges_only() {
        let mut scene = SceneGraph::new();
        scene.add_frame(Layer::frame(FrameKind::Border, Vec2::new(200.0, 100.0)));
        let pixmap = render(&scene, SurfaceSize::new(200, 100), &opaque_fill()).unwrap();

        // The 16px stroke straddles the 95% rectangle edge at x = 5
        assert_eq!(rgba_at(&pixmap, 5, 50), [255, 175, 193, 255]);
        assert_eq!(rgba_at(&pixmap, 100, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn test_pending_stroke_is_drawn() {
        let stroke = Shape::new(
            ShapeGeometry::polyline(vec![Vec2::new(0.0, 10.0), Vec2::new(40.0, 10.0)]),
            ShapeStyle::stroke_only(StrokeStyle::new(Color::black(), 4.0)),
        );
        let options = RenderOptions {
            pending_stroke: Some(&stroke),
            ..opaque_fill()
        };
        let pixmap = render(&SceneGraph::new(), SurfaceSize::new(40, 20), &options).unwrap();
        assert_eq!(rgba_at(&pixmap, 20, 10), [0, 0, 0, 255]);
        assert_eq!(rgba_at(&pixmap, 20, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_single_point_stroke_is_a_dot() {
        let dot = Shape::new(
            ShapeGeometry::polyline(vec![Vec2::new(10.0, 10.0)]),
            ShapeStyle::stroke_only(StrokeStyle::new(Color::black(), 8.0)),
        );
        let options = RenderOptions {
            pending_stroke: Some(&dot),
            ..opaque_fill()
        };
        let pixmap = render(&SceneGraph::new(), SurfaceSize::new(20, 20), &options).unwrap();
        assert_eq!(rgba_at(&pixmap, 10, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let pixmap = render(&SceneGraph::new(), SurfaceSize::new(12, 7), &opaque_fill()).unwrap();
        let png = encode_png(&pixmap).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn test_straight_rgba_layout() {
        let pixmap = render(&SceneGraph::new(), SurfaceSize::new(2, 1), &opaque_fill()).unwrap();
        assert_eq!(to_straight_rgba(&pixmap), vec![255; 8]);
    }
}
