use proptest::prelude::*;

use smash_waldo::geometry::{compute_overlap_area, CornerBox, ReferenceSpace};
use smash_waldo::shapes::{Shape, ShapeKind};
use smash_waldo::store::{ShapeStore, DEFAULT_HISTORY_LIMIT};
use smash_waldo::Coordinates;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1000.0)
}

proptest! {
    #[test]
    fn box_inside_canvas_keeps_scaled_area(
        x in 0.0f64..400.0,
        y in 0.0f64..300.0,
        w in 0.0f64..400.0,
        h in 0.0f64..300.0,
        canvas_w in 100.0f64..4000.0,
        canvas_h in 100.0f64..4000.0,
    ) {
        let bbox = CornerBox::new(x, y, x + w, y + h);
        let sx = canvas_w / 800.0;
        let sy = canvas_h / 600.0;
        let area = compute_overlap_area(&bbox, ReferenceSpace::default(), canvas_w, canvas_h);
        prop_assert!(close(area, (w * sx) * (h * sy)), "area {} for {:?}", area, bbox);
    }

    #[test]
    fn box_past_right_edge_covers_nothing(
        x in 801.0f64..2000.0,
        y in -500.0f64..500.0,
        w in 0.0f64..400.0,
        h in 0.0f64..400.0,
        canvas_w in 100.0f64..4000.0,
    ) {
        let bbox = CornerBox::new(x, y, x + w, y + h);
        let area = compute_overlap_area(&bbox, ReferenceSpace::default(), canvas_w, 600.0);
        prop_assert_eq!(area, 0.0);
    }

    #[test]
    fn normalized_drag_starts_at_min_corner(
        ax in -2000i32..2000, ay in -2000i32..2000,
        px in -2000i32..2000, py in -2000i32..2000,
    ) {
        let anchor = Coordinates::new(ax as f64, ay as f64);
        let pointer = Coordinates::new(px as f64, py as f64);
        let shape = Shape::from_drag(ShapeKind::Rectangle, anchor, pointer).normalized();

        prop_assert!(shape.is_normalized());
        prop_assert_eq!(shape.x, ax.min(px) as f64);
        prop_assert_eq!(shape.y, ay.min(py) as f64);
        prop_assert_eq!(shape.width, (ax - px).abs() as f64);
        prop_assert_eq!(shape.height, (ay - py).abs() as f64);
    }

    #[test]
    fn square_side_is_smaller_signed_delta(
        dx in -1000i32..1000,
        dy in -1000i32..1000,
    ) {
        let anchor = Coordinates::new(500.0, 500.0);
        let pointer = Coordinates::new(500.0 + dx as f64, 500.0 + dy as f64);
        let square = Shape::from_drag(ShapeKind::Square, anchor, pointer);
        prop_assert_eq!(square.width, dx.min(dy) as f64);
        prop_assert_eq!(square.height, square.width);
    }

    #[test]
    fn undo_then_redo_restores_appends(n in 1usize..40) {
        let mut store = ShapeStore::in_memory(DEFAULT_HISTORY_LIMIT);
        for i in 0..n {
            store.append(Shape::new(ShapeKind::Rectangle, i as f64, 0.0, 1.0, 1.0));
        }
        let drawn = store.shapes().to_vec();

        for _ in 0..n {
            prop_assert!(store.undo());
        }
        prop_assert!(store.is_empty());
        for _ in 0..n {
            prop_assert!(store.redo());
        }
        prop_assert_eq!(store.shapes(), drawn.as_slice());
    }
}
