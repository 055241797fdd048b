//! Bounding-box annotation editor.
//!
//! Users draw rectangles and squares over a fixed 1280x720 canvas, erase them
//! by their stroke, relabel them, and undo/redo every change. The shape list
//! persists between sessions. A separate endpoint scales pointer boxes into
//! canvas space and reports how much of the canvas they cover.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod server;
pub mod shapes;
pub mod store;
pub mod tools;

pub use controller::{CanvasLayout, DrawState, DrawingController, MoveOutcome, Surface};
pub use error::{ConfigError, ServerError, StoreError};
pub use geometry::{compute_overlap_area, Coordinates, CornerBox, ReferenceSpace};
pub use shapes::{Shape, ShapeKind, Tool};
pub use store::ShapeStore;
pub use tools::ToolState;
