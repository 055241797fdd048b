//! Pointer box scaling and canvas overlap.
//!
//! A bounding box reported against a fixed reference space is rescaled into
//! the displayed canvas, clipped to it, and measured.

use serde::{Deserialize, Serialize};

/// Logical width of the drawing surface, whatever its displayed size.
pub const CANVAS_WIDTH: f64 = 1280.0;
/// Logical height of the drawing surface.
pub const CANVAS_HEIGHT: f64 = 720.0;
/// Stroke width of committed shapes, also the eraser hit band.
pub const BORDER_SIZE: f64 = 5.0;

// ── Points ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub const ZERO: Coordinates = Coordinates { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ── Boxes ───────────────────────────────────────────────────────────────────

/// Rectangle given by two opposite corners. The corners are not required to
/// be ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CornerBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            x1: self.x1 * sx,
            y1: self.y1 * sy,
            x2: self.x2 * sx,
            y2: self.y2 * sy,
        }
    }

    /// Max of the lower corners, min of the upper corners. Corner order is
    /// taken as given, so an inverted operand yields the overlap of the
    /// bounding extents rather than a true clip.
    pub fn intersection(&self, other: &CornerBox) -> CornerBox {
        CornerBox {
            x1: max_or_nan(self.x1, other.x1),
            y1: max_or_nan(self.y1, other.y1),
            x2: min_or_nan(self.x2, other.x2),
            y2: min_or_nan(self.y2, other.y2),
        }
    }

    pub fn area(&self) -> f64 {
        ((self.x2 - self.x1) * (self.y2 - self.y1)).abs()
    }

    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Upper corner below the lower one on some axis.
    fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }
}

// f64::max/min drop a NaN operand; the overlap must carry it instead.
fn max_or_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn min_or_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Fixed coordinate space external boxes are captured in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSpace {
    pub width: f64,
    pub height: f64,
}

impl Default for ReferenceSpace {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Rescale `bbox` from `reference` into a `canvas_width` x `canvas_height`
/// canvas and return the area it covers there.
///
/// No validation happens here: zero reference sizes, NaN and negative inputs
/// all flow through the arithmetic. An ordered box that misses the canvas
/// covers nothing; an inverted box keeps the raw bounding-extent product.
pub fn compute_overlap_area(
    bbox: &CornerBox,
    reference: ReferenceSpace,
    canvas_width: f64,
    canvas_height: f64,
) -> f64 {
    let sx = canvas_width / reference.width;
    let sy = canvas_height / reference.height;
    let scaled = bbox.scaled(sx, sy);
    let canvas = CornerBox::new(0.0, 0.0, canvas_width, canvas_height);
    let overlap = canvas.intersection(&scaled);
    if scaled.is_ordered() && canvas.is_ordered() && overlap.is_empty() {
        return 0.0;
    }
    overlap.area()
}

/// Decimal rendering used in the endpoint body.
pub fn format_area(area: f64) -> String {
    if area.is_nan() {
        "NaN".to_string()
    } else if area.is_infinite() {
        if area > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        // Display prints integral floats without a trailing ".0"
        format!("{area}")
    }
}
