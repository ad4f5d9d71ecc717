//! The editing session: sole owner of the scene and its rendering surface.
//!
//! A session moves through `Uninitialized -> Initializing -> Ready` and ends in
//! `TornDown`. A surface that cannot be created or cannot show its first
//! frame parks it in `Failed`, which is never retried. Asynchronous loads
//! carry a [`LoadTicket`] taken before they suspend; a ticket from an earlier
//! generation is rejected on arrival, so a load that finishes after `reset()`
//! or `teardown()` cannot repopulate the scene.
use std::any::Any;

use crate::config::{EditorConfig, ExportBackground};
use crate::error::{EditorError, Result};
use crate::interaction::{Gesture, SelectionOutline, StrokeBuilder};
use crate::loader::DecodedImage;
use crate::raster::{self, RenderOptions};
use crate::scene::{Color, FrameKind, Layer, LayerId, SceneGraph, Transform2D, Vec2};
use crate::surface::{RenderHost, Surface};
use crate::tools::{ToolController, ToolMode};
use crate::types::{SurfaceSize, ViewportHint};
use crate::utils::{centered_fit, export_file_name, fit_scale};

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    /// Waiting for a measurable layout
    Initializing,
    Ready(ToolMode),
    /// The surface could not be created or shown; terminal until teardown
    Failed,
    TornDown,
}

/// Result of a call to [`SceneSession::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created(SurfaceSize),
    /// Layout not measurable yet; call again when it is
    Deferred,
    AlreadyReady,
}

/// Proof that a load was started against a particular session generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Where a loaded image ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Background,
    Sticker,
}

/// A flattened, PNG-encoded snapshot of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub file_name: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Row shown in the layers panel
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSummary {
    pub id: LayerId,
    pub label: String,
    pub active: bool,
}

enum Phase<S> {
    Uninitialized,
    Initializing,
    Ready(S),
    Failed(EditorError),
    TornDown,
}

pub struct SceneSession<H: RenderHost> {
    host: H,
    config: EditorConfig,
    phase: Phase<H::Surface>,
    scene: SceneGraph,
    tools: ToolController,
    gesture: Option<Gesture>,
    generation: u64,
    listeners: Vec<Box<dyn Any>>,
}

impl<H: RenderHost> SceneSession<H> {
    pub fn new(host: H, config: EditorConfig) -> Self {
        let tools = ToolController::new(config.brush.clone());
        Self {
            host,
            config,
            phase: Phase::Uninitialized,
            scene: SceneGraph::new(),
            tools,
            gesture: None,
            generation: 0,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.phase {
            Phase::Uninitialized => SessionState::Uninitialized,
            Phase::Initializing => SessionState::Initializing,
            Phase::Ready(_) => SessionState::Ready(self.tools.mode()),
            Phase::Failed(_) => SessionState::Failed,
            Phase::TornDown => SessionState::TornDown,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn surface(&self) -> Option<&H::Surface> {
        match &self.phase {
            Phase::Ready(surface) => Some(surface),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.surface().map(|s| s.size())
    }

    // === Lifecycle ===

    /// Create the surface once layout can be measured.
    ///
    /// Safe to call repeatedly: an unmeasurable hint defers, a ready session
    /// is left alone, and a failed session reports its original error.
    pub fn initialize(&mut self, hint: ViewportHint) -> Result<InitOutcome> {
        match &self.phase {
            Phase::Ready(_) => return Ok(InitOutcome::AlreadyReady),
            Phase::Failed(err) => return Err(err.clone()),
            Phase::TornDown => return Err(EditorError::Closed),
            Phase::Uninitialized | Phase::Initializing => {}
        }

        if !hint.is_measurable() {
            log::debug!("layout not measurable yet ({}x{})", hint.width, hint.height);
            self.phase = Phase::Initializing;
            return Ok(InitOutcome::Deferred);
        }

        let size = SurfaceSize::fit_viewport(hint, &self.config.surface);
        match self.host.create_surface(size) {
            Ok(surface) => {
                self.phase = Phase::Ready(surface);
                self.scene.mark_dirty();
                if let Err(err) = self.present() {
                    let err =
                        EditorError::Environment(format!("could not show the canvas: {}", err));
                    log::error!("{}", err);
                    if let Phase::Ready(surface) = &mut self.phase {
                        surface.release();
                    }
                    self.phase = Phase::Failed(err.clone());
                    return Err(err);
                }
                log::info!("editor surface ready at {}x{}", size.width, size.height);
                Ok(InitOutcome::Created(size))
            }
            Err(err) => {
                log::error!("could not create editor surface: {}", err);
                self.phase = Phase::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Release the surface and every registered listener. Idempotent.
    pub fn teardown(&mut self) {
        if matches!(self.phase, Phase::TornDown) {
            return;
        }
        self.gesture = None;
        self.listeners.clear();
        if let Phase::Ready(surface) = &mut self.phase {
            surface.release();
        }
        self.phase = Phase::TornDown;
        self.generation += 1;
        log::info!("editor session torn down");
    }

    /// Keep an input listener alive until teardown
    pub fn register_listener(&mut self, listener: Box<dyn Any>) {
        if matches!(self.phase, Phase::TornDown) {
            return;
        }
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Clear every layer and the background, and return the tools to their defaults
    pub fn reset(&mut self) {
        if matches!(self.phase, Phase::TornDown) {
            return;
        }
        self.generation += 1;
        self.gesture = None;
        self.scene.clear();
        self.tools.reset();
        log::info!("canvas cleared (generation {})", self.generation);
        self.present_logged();
    }

    // === Loads ===

    /// Take a ticket before starting an asynchronous load
    pub fn ticket(&self) -> Result<LoadTicket> {
        match self.phase {
            Phase::TornDown => Err(EditorError::Closed),
            Phase::Ready(_) => Ok(LoadTicket {
                generation: self.generation,
            }),
            _ => Err(EditorError::NotReady),
        }
    }

    fn check_ticket(&self, ticket: LoadTicket) -> Result<SurfaceSize> {
        if matches!(self.phase, Phase::TornDown) {
            return Err(EditorError::Closed);
        }
        if ticket.generation != self.generation {
            log::debug!(
                "discarding load from generation {} (now {})",
                ticket.generation,
                self.generation
            );
            return Err(EditorError::Stale);
        }
        self.size().ok_or(EditorError::NotReady)
    }

    /// Install a locked background, fitted inside the surface and centered
    pub fn set_background(&mut self, ticket: LoadTicket, image: DecodedImage) -> Result<LayerId> {
        let size = self.check_ticket(ticket)?;
        let transform = centered_fit(image.size(), size, self.config.background_inset);
        let layer = Layer::background(image, transform);
        let id = layer.id;
        if self.scene.set_background(layer).is_some() {
            log::debug!("replaced previous background");
        }
        self.present_logged();
        Ok(id)
    }

    /// Add an interactive image layer on top and select it
    pub fn add_layer(&mut self, ticket: LoadTicket, image: DecodedImage) -> Result<LayerId> {
        let size = self.check_ticket(ticket)?;
        let scale = fit_scale(image.size(), size.as_vec2(), self.config.sticker_footprint);
        let transform = Transform2D::from_position(size.center()).with_uniform_scale(scale);
        let id = self.scene.add_layer(Layer::sticker(image, transform));
        self.scene.set_active(id);
        log::debug!("added sticker {}", id);
        self.present_logged();
        Ok(id)
    }

    /// Insert a cosmetic frame behind all other frames
    pub fn add_decorative_frame(&mut self, kind: FrameKind) -> Result<LayerId> {
        let size = self.size().ok_or(EditorError::NotReady)?;
        let id = self.scene.add_frame(Layer::frame(kind, size.as_vec2()));
        log::debug!("added {} frame", kind.label());
        self.present_logged();
        Ok(id)
    }

    /// Apply the outcome of an asynchronous load. A late result is discarded
    /// before its error is looked at, and a failed decode leaves the scene as it was.
    pub fn place(
        &mut self,
        ticket: LoadTicket,
        target: LoadTarget,
        loaded: Result<DecodedImage>,
    ) -> Result<LayerId> {
        self.check_ticket(ticket)?;
        let image = loaded?;
        match target {
            LoadTarget::Background => self.set_background(ticket, image),
            LoadTarget::Sticker => self.add_layer(ticket, image),
        }
    }

    // === Selection and ordering ===

    pub fn remove_active_layer(&mut self) -> Option<LayerId> {
        if !self.is_ready() {
            return None;
        }
        let id = self.scene.active()?;
        if self.gesture.as_ref().is_some_and(|g| g.pending_stroke().is_none()) {
            self.gesture = None;
        }
        self.scene.remove_layer(id)?;
        log::debug!("removed layer {}", id);
        self.present_logged();
        Some(id)
    }

    pub fn select(&mut self, id: LayerId) -> bool {
        let selected = self.scene.set_active(id);
        if selected {
            self.present_logged();
        }
        selected
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
        self.present_logged();
    }

    pub fn bring_to_front(&mut self, id: LayerId) {
        self.scene.bring_to_front(id);
        self.present_logged();
    }

    pub fn send_to_back(&mut self, id: LayerId) {
        self.scene.send_to_back(id);
        self.present_logged();
    }

    pub fn bring_forward(&mut self, id: LayerId) {
        self.scene.bring_forward(id);
        self.present_logged();
    }

    pub fn send_backward(&mut self, id: LayerId) {
        self.scene.send_backward(id);
        self.present_logged();
    }

    /// Interactive layers, topmost first
    pub fn layer_summaries(&self) -> Vec<LayerSummary> {
        let active = self.scene.active();
        self.scene
            .layers()
            .iter()
            .rev()
            .map(|layer| LayerSummary {
                id: layer.id,
                label: layer.label(),
                active: active == Some(layer.id),
            })
            .collect()
    }

    /// Chrome for the active layer, shown only while selecting
    pub fn selection_outline(&self) -> Option<SelectionOutline> {
        if self.tools.is_drawing() {
            return None;
        }
        self.scene.active_layer().map(SelectionOutline::for_layer)
    }

    // === Tools ===

    /// Switch between drawing and selecting. Any stroke in progress is
    /// committed and the selection is cleared; layers are untouched.
    pub fn set_draw_mode(&mut self, enabled: bool) {
        let mode = if enabled { ToolMode::Draw } else { ToolMode::Select };
        self.finish_gesture();
        self.scene.clear_selection();
        if self.tools.set_mode(mode) {
            log::debug!("tool mode is now {:?}", mode);
        }
        self.present_logged();
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.tools.set_brush_color(color);
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.tools.set_brush_width(width);
    }

    // === Pointer input ===

    /// Returns true if the view needs refreshing
    pub fn pointer_down(&mut self, point: Vec2) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.finish_gesture();

        if self.tools.is_drawing() {
            self.gesture = Some(Gesture::Draw(StrokeBuilder::new(self.tools.brush(), point)));
            self.scene.mark_dirty();
            self.present_logged();
            return true;
        }

        if let Some(layer) = self.scene.active_layer() {
            if let Some(handle) = SelectionOutline::for_layer(layer).handle_at(point) {
                self.gesture = Some(Gesture::grab(layer, Some(handle), point));
                return true;
            }
        }

        match self.scene.hit_test(point) {
            Some(id) => {
                self.scene.set_active(id);
                self.gesture = self
                    .scene
                    .get_layer(id)
                    .map(|layer| Gesture::grab(layer, None, point));
                self.present_logged();
                true
            }
            None => {
                let had_selection = self.scene.active().is_some();
                self.scene.clear_selection();
                had_selection
            }
        }
    }

    pub fn pointer_move(&mut self, point: Vec2) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        let changed = gesture.update(&mut self.scene, point);
        if changed {
            self.scene.mark_dirty();
            self.present_logged();
        }
        changed
    }

    pub fn pointer_up(&mut self, point: Vec2) -> bool {
        if self.gesture.is_none() {
            return false;
        }
        self.pointer_move(point);
        self.finish_gesture();
        self.present_logged();
        true
    }

    /// End the current gesture, committing a stroke in progress
    fn finish_gesture(&mut self) {
        if let Some(Gesture::Draw(stroke)) = self.gesture.take() {
            if let Some(layer) = stroke.finish() {
                let id = self.scene.add_layer(layer);
                log::debug!("committed stroke {}", id);
            }
        }
    }

    /// CSS cursor for a pointer at `point`
    pub fn cursor_at(&self, point: Vec2) -> &'static str {
        if let Some(gesture) = &self.gesture {
            return gesture.cursor();
        }
        if !self.is_ready() {
            return "default";
        }
        if self.tools.is_drawing() {
            return "crosshair";
        }
        let handle = self
            .scene
            .active_layer()
            .and_then(|layer| SelectionOutline::for_layer(layer).handle_at(point));
        match handle {
            Some(handle) => handle.cursor(),
            None if self.scene.hit_test(point).is_some() => "move",
            None => "default",
        }
    }

    // === Output ===

    /// Flatten the scene into a PNG. The selection is cleared first so no
    /// chrome can appear in the output.
    pub fn export_merged_image(&mut self) -> Result<ExportedImage> {
        let size = self.size().ok_or(EditorError::NotReady)?;
        self.finish_gesture();
        self.scene.clear_selection();
        self.present_logged();

        let options = match self.config.export_background {
            ExportBackground::Keep => RenderOptions {
                fill: Some(self.config.background_color),
                include_background: true,
                pending_stroke: None,
            },
            ExportBackground::Transparent => RenderOptions {
                fill: None,
                include_background: false,
                pending_stroke: None,
            },
        };
        let pixmap = raster::render(&self.scene, size, &options)?;
        let png = raster::encode_png(&pixmap)?;
        let file_name = export_file_name(&self.config.export_prefix, self.host.now_millis());
        log::info!("exported {} ({} bytes)", file_name, png.len());

        Ok(ExportedImage {
            file_name,
            png,
            width: size.width,
            height: size.height,
        })
    }

    /// Composite and present the scene if anything changed
    pub fn present(&mut self) -> Result<bool> {
        if !self.scene.is_dirty() {
            return Ok(false);
        }
        let Phase::Ready(surface) = &mut self.phase else {
            return Ok(false);
        };

        let preview = self
            .gesture
            .as_ref()
            .and_then(Gesture::pending_stroke)
            .map(StrokeBuilder::preview);
        let options = RenderOptions {
            fill: Some(self.config.background_color),
            include_background: true,
            pending_stroke: preview.as_ref(),
        };
        let frame = raster::render(&self.scene, surface.size(), &options)?;
        surface.present(&frame)?;
        self.scene.clear_dirty();
        Ok(true)
    }

    fn present_logged(&mut self) {
        if let Err(err) = self.present() {
            log::warn!("failed to present frame: {}", err);
        }
    }
}

impl<H: RenderHost> Drop for SceneSession<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
