//! Rendering surfaces and the host capability that creates them.
//!
//! The session is handed a [`RenderHost`] at construction and never reaches
//! into the page on its own, so the same session code drives a `<canvas>` in
//! the browser and an in-memory surface in tests.
use std::cell::Cell;
use std::rc::Rc;

use tiny_skia::Pixmap;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};
use yew::NodeRef;

use crate::error::{EditorError, Result};
use crate::raster;
use crate::types::SurfaceSize;

/// Something composited frames can be shown on
pub trait Surface {
    fn size(&self) -> SurfaceSize;

    /// Show a composited frame
    fn present(&mut self, frame: &Pixmap) -> Result<()>;

    /// Give up the underlying resources; later presents are ignored
    fn release(&mut self);
}

/// Capabilities the session needs from its environment
pub trait RenderHost {
    type Surface: Surface;

    fn create_surface(&mut self, size: SurfaceSize) -> Result<Self::Surface>;

    /// Wall-clock time in Unix epoch milliseconds
    fn now_millis(&self) -> u64;
}

// === Browser ===

/// Host backed by a `<canvas>` element in the page
#[derive(Clone)]
pub struct CanvasHost {
    canvas: NodeRef,
}

impl CanvasHost {
    pub fn new(canvas: NodeRef) -> Self {
        Self { canvas }
    }
}

impl RenderHost for CanvasHost {
    type Surface = CanvasSurface;

    fn create_surface(&mut self, size: SurfaceSize) -> Result<CanvasSurface> {
        let canvas = self
            .canvas
            .cast::<HtmlCanvasElement>()
            .ok_or_else(|| EditorError::Environment("canvas element is not mounted".to_string()))?;
        CanvasSurface::new(canvas, size)
    }

    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

pub struct CanvasSurface {
    context: Option<CanvasRenderingContext2d>,
    size: SurfaceSize,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, size: SurfaceSize) -> Result<Self> {
        canvas.set_width(size.width);
        canvas.set_height(size.height);

        let context = canvas
            .get_context("2d")
            .map_err(|e| EditorError::Environment(format!("2d context request failed: {:?}", e)))?
            .ok_or_else(|| EditorError::Environment("2d rendering context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EditorError::Environment("unexpected rendering context type".to_string()))?;

        Ok(Self {
            context: Some(context),
            size,
        })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn present(&mut self, frame: &Pixmap) -> Result<()> {
        let Some(context) = &self.context else {
            return Ok(());
        };
        let rgba = raster::to_straight_rgba(frame);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_slice()),
            frame.width(),
            frame.height(),
        )
        .map_err(|e| EditorError::Export(format!("ImageData failed: {:?}", e)))?;
        context
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| EditorError::Export(format!("putImageData failed: {:?}", e)))
    }

    fn release(&mut self) {
        if let Some(context) = self.context.take() {
            context.clear_rect(0.0, 0.0, self.size.width as f64, self.size.height as f64);
        }
    }
}

// === Headless ===

/// Counters shared between a [`HeadlessHost`] and the surfaces it creates
#[derive(Debug, Default)]
pub struct HeadlessStats {
    pub created: Cell<usize>,
    pub released: Cell<usize>,
    pub presented: Cell<usize>,
}

/// In-memory host for native use and tests
pub struct HeadlessHost {
    stats: Rc<HeadlessStats>,
    clock: Cell<u64>,
    failure: Option<String>,
    present_failure: Option<String>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            stats: Rc::new(HeadlessStats::default()),
            clock: Cell::new(1_700_000_000_000),
            failure: None,
            present_failure: None,
        }
    }

    /// A host whose surface creation always fails, as when no rendering context exists
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new()
        }
    }

    /// A host whose surfaces are created but cannot show a frame
    pub fn failing_present(reason: &str) -> Self {
        Self {
            present_failure: Some(reason.to_string()),
            ..Self::new()
        }
    }

    pub fn stats(&self) -> Rc<HeadlessStats> {
        self.stats.clone()
    }

    pub fn set_clock(&self, epoch_millis: u64) {
        self.clock.set(epoch_millis);
    }
}

impl RenderHost for HeadlessHost {
    type Surface = HeadlessSurface;

    fn create_surface(&mut self, size: SurfaceSize) -> Result<HeadlessSurface> {
        if let Some(reason) = &self.failure {
            return Err(EditorError::Environment(reason.clone()));
        }
        self.stats.created.set(self.stats.created.get() + 1);
        Ok(HeadlessSurface {
            size,
            last_frame: None,
            released: false,
            present_failure: self.present_failure.clone(),
            stats: self.stats.clone(),
        })
    }

    fn now_millis(&self) -> u64 {
        self.clock.get()
    }
}

pub struct HeadlessSurface {
    size: SurfaceSize,
    last_frame: Option<Pixmap>,
    released: bool,
    present_failure: Option<String>,
    stats: Rc<HeadlessStats>,
}

impl HeadlessSurface {
    /// The most recently presented frame
    pub fn last_frame(&self) -> Option<&Pixmap> {
        self.last_frame.as_ref()
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn present(&mut self, frame: &Pixmap) -> Result<()> {
        if let Some(reason) = &self.present_failure {
            return Err(EditorError::Export(reason.clone()));
        }
        if !self.released {
            self.last_frame = Some(frame.clone());
            self.stats.presented.set(self.stats.presented.get() + 1);
        }
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.last_frame = None;
            self.stats.released.set(self.stats.released.get() + 1);
        }
    }
}
