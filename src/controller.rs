//! Pointer-driven drawing state machine for the canvas.
//!
//! A press anchors a drawing session, moves either reshape the in-progress
//! shape or erase shapes under the pointer, and the release commits the
//! normalized shape to the store. The store is passed into every handler so
//! external resets and undo/redo between events are always observed.

use crate::config::EditorConfig;
use crate::geometry::{Coordinates, BORDER_SIZE, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::shapes::{Shape, Tool};
use crate::store::ShapeStore;
use crate::tools::ToolState;

/// On-screen placement of the canvas element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    pub origin: Coordinates,
    pub displayed_width: f64,
    pub displayed_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing { anchor: Coordinates },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No button held.
    Ignored,
    /// Button held but no tool picked.
    NoTool,
    Previewed,
    Erased(usize),
}

/// Something committed shapes can be painted onto.
pub trait Surface {
    fn clear(&mut self);
    fn stroke_rect(&mut self, shape: &Shape);
}

pub struct DrawingController {
    state: DrawState,
    in_progress: Option<Shape>,
    layout: Option<CanvasLayout>,
    border_size: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Default for DrawingController {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, BORDER_SIZE)
    }
}

impl DrawingController {
    pub fn new(canvas_width: f64, canvas_height: f64, border_size: f64) -> Self {
        Self {
            state: DrawState::Idle,
            in_progress: None,
            layout: None,
            border_size,
            canvas_width,
            canvas_height,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.canvas_width, config.canvas_height, config.border_size)
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn in_progress(&self) -> Option<&Shape> {
        self.in_progress.as_ref()
    }

    pub fn border_size(&self) -> f64 {
        self.border_size
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Record where the canvas sits on screen. Returns true if it moved or
    /// was resized.
    pub fn update_layout(&mut self, layout: Option<CanvasLayout>) -> bool {
        if self.layout == layout {
            return false;
        }
        log::debug!("canvas layout changed: {layout:?}");
        self.layout = layout;
        true
    }

    /// Translate a screen position into the logical canvas grid, offset by
    /// half a stroke so the stroke centre sits on the pointer. Reads as the
    /// origin while the canvas has no usable layout.
    pub fn pointer_to_canvas(&self, screen: Coordinates) -> Coordinates {
        let Some(layout) = self.layout else {
            return Coordinates::ZERO;
        };
        if layout.displayed_width <= 0.0 || layout.displayed_height <= 0.0 {
            return Coordinates::ZERO;
        }
        let sx = self.canvas_width / layout.displayed_width;
        let sy = self.canvas_height / layout.displayed_height;
        Coordinates {
            x: (screen.x - layout.origin.x) * sx - self.border_size / 2.0,
            y: (screen.y - layout.origin.y) * sy - self.border_size / 2.0,
        }
    }

    pub fn press(&mut self, screen: Coordinates, tools: &mut ToolState) {
        let anchor = self.pointer_to_canvas(screen);
        self.state = DrawState::Drawing { anchor };
        self.in_progress = None;
        tools.set_drawing(true);
    }

    pub fn move_to(
        &mut self,
        screen: Coordinates,
        tools: &ToolState,
        store: &mut ShapeStore,
    ) -> MoveOutcome {
        let DrawState::Drawing { anchor } = self.state else {
            return MoveOutcome::Ignored;
        };
        let pointer = self.pointer_to_canvas(screen);

        match tools.selected() {
            None => MoveOutcome::NoTool,
            Some(Tool::Eraser) => MoveOutcome::Erased(self.erase_at(pointer, store)),
            Some(tool) => {
                if let Some(kind) = tool.shape_kind() {
                    // replaced wholesale on every move
                    self.in_progress = Some(Shape::from_drag(kind, anchor, pointer));
                }
                MoveOutcome::Previewed
            }
        }
    }

    /// End the session, committing the in-progress shape if there is one.
    pub fn release(&mut self, tools: &mut ToolState, store: &mut ShapeStore) -> Option<Shape> {
        self.state = DrawState::Idle;
        tools.set_drawing(false);

        let mut shape = self.in_progress.take()?.normalized();
        if shape.id.is_none() {
            shape.id = Some(uuid::Uuid::new_v4().to_string());
        }
        log::debug!(
            "committed {:?} at ({}, {}) {}x{}",
            shape.kind,
            shape.x,
            shape.y,
            shape.width,
            shape.height
        );
        store.append(shape.clone());
        Some(shape)
    }

    /// Drop every committed shape and any drag in progress.
    pub fn clear(&mut self, store: &mut ShapeStore) {
        self.in_progress = None;
        store.reset_all();
        log::info!("canvas cleared");
    }

    /// Full clear-and-repaint of committed shapes plus the in-progress one.
    pub fn redraw<S: Surface>(&self, store: &ShapeStore, surface: &mut S) {
        surface.clear();
        for shape in store.shapes() {
            surface.stroke_rect(shape);
        }
        if let Some(shape) = &self.in_progress {
            surface.stroke_rect(shape);
        }
    }

    fn erase_at(&self, pointer: Coordinates, store: &mut ShapeStore) -> usize {
        let hits: Vec<Shape> = store
            .shapes()
            .iter()
            .filter(|shape| shape.border_contains(pointer, self.border_size))
            .cloned()
            .collect();
        for shape in &hits {
            store.remove(shape);
        }
        if !hits.is_empty() {
            log::debug!("erased {} shapes at ({}, {})", hits.len(), pointer.x, pointer.y);
        }
        hits.len()
    }
}
