//! Browser tests for the canvas-backed surface. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use artsy_capture::error::EditorError;
use artsy_capture::surface::{CanvasHost, CanvasSurface, RenderHost, Surface};
use artsy_capture::types::SurfaceSize;
use tiny_skia::{Color, Pixmap};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::NodeRef;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    gloo_utils::document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap()
}

fn pixel(canvas: &HtmlCanvasElement, x: f64, y: f64) -> Vec<u8> {
    let context = canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<CanvasRenderingContext2d>()
        .unwrap();
    context.get_image_data(x, y, 1.0, 1.0).unwrap().data().0
}

#[wasm_bindgen_test]
fn test_surface_sizes_canvas() {
    let canvas = canvas();
    let surface = CanvasSurface::new(canvas.clone(), SurfaceSize::new(420, 310)).unwrap();
    assert_eq!(surface.size(), SurfaceSize::new(420, 310));
    assert_eq!((canvas.width(), canvas.height()), (420, 310));
}

#[wasm_bindgen_test]
fn test_present_then_release() {
    let canvas = canvas();
    let mut surface = CanvasSurface::new(canvas.clone(), SurfaceSize::new(4, 4)).unwrap();
    let mut frame = Pixmap::new(4, 4).unwrap();
    frame.fill(Color::from_rgba8(255, 0, 0, 255));

    surface.present(&frame).unwrap();
    assert_eq!(pixel(&canvas, 1.0, 1.0), vec![255, 0, 0, 255]);

    surface.release();
    surface.release();
    assert_eq!(pixel(&canvas, 1.0, 1.0)[3], 0);
    // Presenting after release is ignored
    surface.present(&frame).unwrap();
    assert_eq!(pixel(&canvas, 1.0, 1.0)[3], 0);
}

#[wasm_bindgen_test]
fn test_unmounted_canvas_is_environment_error() {
    let mut host = CanvasHost::new(NodeRef::default());
    let err = host.create_surface(SurfaceSize::new(400, 300)).err().unwrap();
    assert!(matches!(err, EditorError::Environment(_)));
}
