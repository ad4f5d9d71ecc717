use crate::scene::{Transform2D, Vec2};
use crate::types::SurfaceSize;
use web_sys::{Element, MouseEvent};

/// Uniform scale that fits `content` inside `bounds`, multiplied by `inset`
pub fn fit_scale(content: Vec2, bounds: Vec2, inset: f32) -> f32 {
    if content.x <= 0.0 || content.y <= 0.0 {
        return 1.0;
    }
    (bounds.x / content.x).min(bounds.y / content.y) * inset
}

/// Transform centering `content` on the surface, scaled to fit with `inset`
pub fn centered_fit(content: Vec2, surface: SurfaceSize, inset: f32) -> Transform2D {
    let scale = fit_scale(content, surface.as_vec2(), inset);
    Transform2D::from_position(surface.center()).with_uniform_scale(scale)
}

/// Convert client coordinates of a pointer event into element-local coordinates
pub fn client_to_element_coords(event: &MouseEvent, element: &Element) -> Vec2 {
    // Get the bounding rectangle of the element
    let rect = element.get_bounding_client_rect();

    // Subtract the element's position from the event coordinates
    let x = event.client_x() as f64 - rect.left();
    let y = event.client_y() as f64 - rect.top();

    Vec2::new(x as f32, y as f32)
}

/// Signed angle of `point` around `center`, in radians
pub fn angle_around(center: Vec2, point: Vec2) -> f32 {
    let d = point - center;
    d.y.atan2(d.x)
}

/// Compose the export file name from a prefix and a millisecond timestamp
pub fn export_file_name(prefix: &str, epoch_millis: u64) -> String {
    format!("{}_{}.png", prefix, epoch_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_background() {
        // 800x600 photo into 400x300 surface with 90% inset
        let scale = fit_scale(Vec2::new(800.0, 600.0), Vec2::new(400.0, 300.0), 0.9);
        assert!((scale - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_fit_scale_uses_tighter_axis() {
        let scale = fit_scale(Vec2::new(100.0, 400.0), Vec2::new(400.0, 300.0), 1.0);
        assert!((scale - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_fit_scale_degenerate_content() {
        assert_eq!(fit_scale(Vec2::new(0.0, 10.0), Vec2::new(400.0, 300.0), 0.9), 1.0);
    }

    #[test]
    fn test_centered_fit() {
        let t = centered_fit(Vec2::new(800.0, 600.0), SurfaceSize::new(400, 300), 0.9);
        assert_eq!(t.position, Vec2::new(200.0, 150.0));
        assert!((t.scale.x - 0.45).abs() < 1e-6);
        assert_eq!(t.scale.x, t.scale.y);
    }

    #[test]
    fn test_angle_around() {
        let a = angle_around(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("artsy_capture", 1_700_000_000_123),
            "artsy_capture_1700000000123.png"
        );
    }
}
