use super::layer::{Layer, LayerId};
use super::types::Vec2;

/// Scene graph for the collage.
///
/// Layers live in three bands that always render in the same order:
/// the background, then decorative frames, then interactive layers
/// (stickers and doodles). Ordering inside the interactive band is
/// insertion order unless the user reorders it.
pub struct SceneGraph {
    /// Locked photo beneath everything
    background: Option<Layer>,
    /// Decorative frames, back to front
    frames: Vec<Layer>,
    /// Interactive layers, back to front
    layers: Vec<Layer>,
    /// Layer with interaction focus
    active: Option<LayerId>,
    /// Whether the scene needs re-rendering
    dirty: bool,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self {
            background: None,
            frames: Vec::new(),
            layers: Vec::new(),
            active: None,
            dirty: true,
        }
    }

    // === Background ===

    /// Install a background, returning the one it replaced
    pub fn set_background(&mut self, layer: Layer) -> Option<Layer> {
        self.dirty = true;
        self.background.replace(layer)
    }

    pub fn background(&self) -> Option<&Layer> {
        self.background.as_ref()
    }

    // === Frames ===

    /// Add a frame behind every other frame
    pub fn add_frame(&mut self, layer: Layer) -> LayerId {
        let id = layer.id;
        self.frames.insert(0, layer);
        self.dirty = true;
        id
    }

    pub fn frames(&self) -> &[Layer] {
        &self.frames
    }

    // === Interactive layers ===

    /// Add an interactive layer on top and return its ID
    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id;
        self.layers.push(layer);
        self.dirty = true;
        id
    }

    /// Remove an interactive layer by ID
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let pos = self.layers.iter().position(|l| l.id == id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        self.dirty = true;
        Some(self.layers.remove(pos))
    }

    /// Get an interactive layer by ID
    pub fn get_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Get a mutable reference to an interactive layer, marking the scene dirty
    pub fn get_layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        let layer = self.layers.iter_mut().find(|l| l.id == id);
        if layer.is_some() {
            self.dirty = true;
        }
        layer
    }

    /// Interactive layers, back to front
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Every layer in paint order: background, frames, interactive layers
    pub fn render_order(&self) -> impl Iterator<Item = &Layer> {
        self.background
            .iter()
            .chain(self.frames.iter())
            .chain(self.layers.iter())
    }

    /// Number of frames and interactive layers (the background is not counted)
    pub fn len(&self) -> usize {
        self.frames.len() + self.layers.len()
    }

    /// True when there is no background, frame or interactive layer
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.frames.is_empty() && self.layers.is_empty()
    }

    /// Drop every layer and the background
    pub fn clear(&mut self) {
        self.background = None;
        self.frames.clear();
        self.layers.clear();
        self.active = None;
        self.dirty = true;
    }

    // === Dirty tracking ===

    /// Check if the scene needs re-rendering
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark entire scene as dirty (force full re-render)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear dirty flag after rendering
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // === Selection Management ===

    pub fn active(&self) -> Option<LayerId> {
        self.active
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active.and_then(|id| self.get_layer(id))
    }

    /// Give interaction focus to an interactive layer. Returns false if the
    /// ID does not name one.
    pub fn set_active(&mut self, id: LayerId) -> bool {
        if self.get_layer(id).is_some_and(Layer::is_interactive) {
            if self.active != Some(id) {
                self.active = Some(id);
                self.dirty = true;
            }
            true
        } else {
            false
        }
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        if self.active.take().is_some() {
            self.dirty = true;
        }
    }

    // === Hit Testing ===

    /// Find the topmost interactive layer at a point
    pub fn hit_test(&self, point: Vec2) -> Option<LayerId> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.is_interactive() && layer.contains_point(point))
            .map(|layer| layer.id)
    }

    // === Z-Order Management (interactive band only) ===

    /// Move layer to front (top of z-order)
    pub fn bring_to_front(&mut self, id: LayerId) {
        if let Some(pos) = self.layers.iter().position(|l| l.id == id) {
            let layer = self.layers.remove(pos);
            self.layers.push(layer);
            self.dirty = true;
        }
    }

    /// Move layer to back of the interactive band; it stays above frames
    pub fn send_to_back(&mut self, id: LayerId) {
        if let Some(pos) = self.layers.iter().position(|l| l.id == id) {
            let layer = self.layers.remove(pos);
            self.layers.insert(0, layer);
            self.dirty = true;
        }
    }

    /// Move layer forward one position
    pub fn bring_forward(&mut self, id: LayerId) {
        if let Some(pos) = self.layers.iter().position(|l| l.id == id) {
            if pos + 1 < self.layers.len() {
                self.layers.swap(pos, pos + 1);
                self.dirty = true;
            }
        }
    }

    /// Move layer backward one position
    pub fn send_backward(&mut self, id: LayerId) {
        if let Some(pos) = self.layers.iter().position(|l| l.id == id) {
            if pos > 0 {
                self.layers.swap(pos, pos - 1);
                self.dirty = true;
            }
        }
    }
}
