use serde::{Deserialize, Serialize};

use crate::geometry::Coordinates;

// ── Data Model ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Square,
}

/// What a pointer drag does on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Rectangle,
    Square,
    Eraser,
}

impl Tool {
    /// The shape a drag with this tool commits, if any.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Square => Some(ShapeKind::Square),
            Tool::Eraser => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Rectangle => "Draw Rectangle",
            Tool::Square => "Draw Square",
            Tool::Eraser => "Erase Shape",
        }
    }
}

/// A labelled region in canvas space.
///
/// While a drag is in progress `width`/`height` carry the signed pointer
/// delta; committed shapes are normalized so `(x, y)` is the top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Axis-aligned band edges used by the eraser hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Shape {
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            label: None,
            id: None,
        }
    }

    /// Shape spanned from `anchor` to `pointer`, signed extents kept as is.
    /// Squares take the smaller of the two signed deltas as their side.
    pub fn from_drag(kind: ShapeKind, anchor: Coordinates, pointer: Coordinates) -> Self {
        let width = pointer.x - anchor.x;
        let height = pointer.y - anchor.y;
        match kind {
            ShapeKind::Rectangle => Shape::new(kind, anchor.x, anchor.y, width, height),
            ShapeKind::Square => {
                let side = width.min(height);
                Shape::new(kind, anchor.x, anchor.y, side, side)
            }
        }
    }

    /// Move `(x, y)` to the top-left corner and make both extents
    /// non-negative.
    pub fn normalized(mut self) -> Self {
        if self.width < 0.0 {
            self.x += self.width;
            self.width = self.width.abs();
        }
        if self.height < 0.0 {
            self.y += self.height;
            self.height = self.height.abs();
        }
        self
    }

    pub fn is_normalized(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    pub fn outer_frame(&self, border: f64) -> Frame {
        Frame {
            top: self.y - border,
            left: self.x - border,
            right: self.x + self.width + border,
            bottom: self.y + self.height + border,
        }
    }

    pub fn inner_frame(&self, border: f64) -> Frame {
        Frame {
            top: self.y + border,
            left: self.x + border,
            right: self.x + self.width - border,
            bottom: self.y + self.height - border,
        }
    }

    /// Whether `point` lies on the drawn stroke: strictly inside the outer
    /// frame and outside the inner one.
    pub fn border_contains(&self, point: Coordinates, border: f64) -> bool {
        let outer = self.outer_frame(border);
        let inner = self.inner_frame(border);
        let in_outer = point.x > outer.left
            && point.x < outer.right
            && point.y > outer.top
            && point.y < outer.bottom;
        let out_of_inner = point.x < inner.left
            || point.x > inner.right
            || point.y < inner.top
            || point.y > inner.bottom;
        in_outer && out_of_inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::new(ShapeKind::Rectangle, x, y, w, h)
    }

    #[test]
    fn drag_up_left_normalizes_to_top_left() {
        let shape = Shape::from_drag(
            ShapeKind::Rectangle,
            Coordinates::new(100.0, 80.0),
            Coordinates::new(40.0, 20.0),
        );
        assert_eq!((shape.width, shape.height), (-60.0, -60.0));

        let shape = shape.normalized();
        assert_eq!(shape, rect(40.0, 20.0, 60.0, 60.0));
        assert!(shape.is_normalized());
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let once = rect(10.0, 10.0, -5.0, 8.0).normalized();
        assert_eq!(once.clone().normalized(), once);
    }

    #[test]
    fn square_side_follows_smaller_delta() {
        let anchor = Coordinates::new(50.0, 50.0);
        let square = Shape::from_drag(ShapeKind::Square, anchor, Coordinates::new(90.0, 60.0));
        assert_eq!((square.width, square.height), (10.0, 10.0));

        let square = Shape::from_drag(ShapeKind::Square, anchor, Coordinates::new(20.0, 40.0));
        assert_eq!((square.width, square.height), (-30.0, -30.0));
        assert_eq!(square.normalized(), Shape::new(ShapeKind::Square, 20.0, 20.0, 30.0, 30.0));
    }

    #[test]
    fn border_hit_test() {
        let shape = rect(100.0, 100.0, 200.0, 100.0);
        // on the left stroke
        assert!(shape.border_contains(Coordinates::new(101.0, 150.0), 5.0));
        // just outside the outline but within the band
        assert!(shape.border_contains(Coordinates::new(97.0, 150.0), 5.0));
        // interior
        assert!(!shape.border_contains(Coordinates::new(200.0, 150.0), 5.0));
        // beyond the outer frame
        assert!(!shape.border_contains(Coordinates::new(90.0, 150.0), 5.0));
        // outer frame edge is exclusive
        assert!(!shape.border_contains(Coordinates::new(95.0, 150.0), 5.0));
    }

    #[test]
    fn eraser_tool_commits_nothing() {
        assert_eq!(Tool::Eraser.shape_kind(), None);
        assert_eq!(Tool::Square.shape_kind(), Some(ShapeKind::Square));
    }

    #[test]
    fn shape_json_uses_type_tag() {
        let json = serde_json::to_string(&rect(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, r#"{"type":"rectangle","x":1.0,"y":2.0,"width":3.0,"height":4.0}"#);
    }
}
