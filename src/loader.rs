//! Turns picked files into decoded images ready for placement.
//!
//! Decoding never touches the scene: callers hand the result to the session,
//! so a failed decode cannot leave a half-added layer behind.
use resvg::usvg;
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::error::{EditorError, Result};
use crate::scene::Vec2;

/// A decoded raster image, stored premultiplied for compositing
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pixmap: Pixmap,
}

impl DecodedImage {
    /// Build from straight (non-premultiplied) RGBA8 pixels
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| EditorError::Decode("image has no pixels".to_string()))?;
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(EditorError::Decode(format!(
                "expected {}x{} RGBA pixels, got {} bytes",
                width,
                height,
                rgba.len()
            )));
        }

        let mut pixmap = Pixmap::new(size.width(), size.height())
            .ok_or_else(|| EditorError::Decode("image is too large".to_string()))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self { pixmap })
    }

    /// Single-colour image
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let pixels = rgba.repeat((width as usize) * (height as usize));
        Self::from_rgba8(width, height, &pixels)
    }

    fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Decode an in-memory image file.
///
/// Raster formats go through the `image` crate; SVG documents are rendered
/// at their intrinsic size.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(EditorError::Decode("file is empty".to_string()));
    }
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }

    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8(width, height, rgba.as_raw())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn decode_svg(bytes: &[u8]) -> Result<DecodedImage> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &options)
        .map_err(|e| EditorError::Decode(format!("invalid SVG: {}", e)))?;
    let size = tree.size().to_int_size();

    let mut target = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| EditorError::Decode("SVG has no area".to_string()))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut target.as_mut());

    // Both pixmaps are premultiplied RGBA8
    let int_size = IntSize::from_wh(size.width(), size.height())
        .ok_or_else(|| EditorError::Decode("SVG has no area".to_string()))?;
    let pixmap = Pixmap::from_vec(target.take(), int_size)
        .ok_or_else(|| EditorError::Decode("SVG render produced no pixels".to_string()))?;
    Ok(DecodedImage::from_pixmap(pixmap))
}

/// Read a picked file and decode it. This is the only suspension point of a load.
pub async fn read_file(file: web_sys::File) -> Result<DecodedImage> {
    let file = gloo::file::File::from(file);
    let bytes = gloo::file::futures::read_as_bytes(&file)
        .await
        .map_err(|e| EditorError::Decode(format!("{}: {}", file.name(), e)))?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let image = decode(&png_bytes(8, 4, [255, 0, 0, 255])).unwrap();
        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 4);
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 0, 0, 255));
    }

    #[test]
    fn test_pixels_are_premultiplied() {
        let image = decode(&png_bytes(1, 1, [200, 100, 0, 128])).unwrap();
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert!(px.red() <= 101);
    }

    #[test]
    fn test_decode_svg() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#ff0000"/></svg>"##;
        let image = decode(svg).unwrap();
        assert_eq!((image.width(), image.height()), (20, 10));
        assert_eq!(image.pixmap().pixel(10, 5).unwrap().alpha(), 255);
    }

    #[test]
    fn test_empty_file_is_decode_error() {
        assert!(matches!(decode(&[]), Err(EditorError::Decode(_))));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, EditorError::Decode(_)));
    }

    #[test]
    fn test_truncated_png_is_decode_error() {
        let bytes = png_bytes(16, 16, [0, 255, 0, 255]);
        assert!(matches!(decode(&bytes[..20]), Err(EditorError::Decode(_))));
    }

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(DecodedImage::from_rgba8(2, 2, &[0; 8]).is_err());
        assert!(DecodedImage::from_rgba8(0, 2, &[]).is_err());
    }
}
