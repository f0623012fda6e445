// Brush planner tests (native) for the `inkly-client` crate.
// These tests avoid wasm/browser APIs: the planner is pure and the RNG is
// injected, so every visual rule can be checked on the host.

use inkly_client::brush::{Brush, PaintOp, plan_segment};
use inkly_client::color::{self, Color};
use inkly_client::geometry::{DOT_SPACING, Point, stamp_points};

fn no_rng() -> impl FnMut() -> f64 {
    || panic!("this brush must not consume randomness")
}

fn half_rng() -> impl FnMut() -> f64 {
    || 0.5
}

const INK: Color = Color { r: 10, g: 20, b: 30 };

// A zero-length segment is the first sample of every stroke; every brush
// must still leave a mark.
#[test]
fn zero_length_segment_marks_for_every_brush() {
    let p = Point::new(100.0, 100.0);
    for brush in Brush::ALL {
        let ops = plan_segment(brush, INK, 5.0, p, p, &mut half_rng());
        assert!(!ops.is_empty(), "{} produced no ops", brush.id());
    }
}

#[test]
fn dotted_stamp_count_and_endpoints() {
    let from = Point::new(0.0, 0.0);
    let to = Point::new(20.0, 0.0);
    let ops = plan_segment(Brush::Dotted, INK, 6.0, from, to, &mut no_rng());

    // d = 20, spacing 8 -> ceil(20/8) + 1 = 4 stamps, endpoints included.
    assert_eq!(ops.len(), 4);
    let centers: Vec<Point> = ops
        .iter()
        .map(|op| match op {
            PaintOp::Disc { center, radius, color } => {
                assert_eq!(*radius, 3.0);
                assert_eq!(*color, INK);
                *center
            }
            other => panic!("dotted planned a non-disc op: {other:?}"),
        })
        .collect();
    assert_eq!(centers[0], from);
    assert_eq!(centers[3], to);
    // Even interpolation: equal gaps between consecutive stamps.
    let gap = centers[0].distance(centers[1]);
    for pair in centers.windows(2) {
        assert!((pair[0].distance(pair[1]) - gap).abs() < 1e-9);
    }
}

#[test]
fn dotted_zero_length_is_single_stamp() {
    let p = Point::new(4.0, 4.0);
    assert_eq!(stamp_points(p, p, DOT_SPACING), vec![p]);
}

#[test]
fn spray_emits_stroke_before_overlay() {
    let from = Point::new(0.0, 0.0);
    let to = Point::new(10.0, 0.0);
    let ops = plan_segment(Brush::Spray, INK, 4.0, from, to, &mut half_rng());

    assert_eq!(ops.len(), 1 + 15);
    assert!(matches!(ops[0], PaintOp::Stroke { .. }));
    let jitter = 1.5 * 4.0;
    for op in &ops[1..] {
        match op {
            PaintOp::Square { x, y, size, color } => {
                // Particles land around the segment end, never the start.
                assert!((x - to.x).abs() <= jitter);
                assert!((y - to.y).abs() <= jitter);
                assert!(*size >= 1.0 && *size < 3.0);
                assert_eq!(*color, INK);
            }
            other => panic!("spray overlay planned {other:?}"),
        }
    }
}

#[test]
fn sparkle_ring_is_gold_and_fixed() {
    let to = Point::new(50.0, 50.0);
    let size = 5.0;
    let ops = plan_segment(Brush::Sparkle, INK, size, to, to, &mut no_rng());

    assert_eq!(ops.len(), 1 + 8);
    assert!(matches!(ops[0], PaintOp::Stroke { color, .. } if color == INK));
    let radius = size + 5.0;
    for op in &ops[1..] {
        match op {
            PaintOp::Square { x, y, size, color } => {
                assert_eq!(*size, 3.0);
                assert_eq!(*color, color::GOLD);
                let d = Point::new(*x, *y).distance(to);
                assert!((d - radius).abs() < 1e-9);
            }
            other => panic!("sparkle overlay planned {other:?}"),
        }
    }
}

#[test]
fn stroke_modifiers_per_brush() {
    let from = Point::new(0.0, 0.0);
    let to = Point::new(1.0, 1.0);
    let size = 10.0;
    let stroke = |brush: Brush| match plan_segment(brush, INK, size, from, to, &mut half_rng())
        .into_iter()
        .next()
    {
        Some(PaintOp::Stroke { width, alpha, glow, erase, .. }) => (width, alpha, glow, erase),
        other => panic!("expected a stroke, got {other:?}"),
    };

    assert_eq!(stroke(Brush::Normal), (10.0, 1.0, None, false));
    assert_eq!(stroke(Brush::Thick), (18.0, 1.0, None, false));
    assert_eq!(stroke(Brush::Neon), (8.0, 1.0, Some(20.0), false));
    assert_eq!(stroke(Brush::Marker), (13.0, 0.6, None, false));
    assert_eq!(stroke(Brush::Eraser), (15.0, 1.0, None, true));
}

// Each plan call carries its own modifiers, so switching brushes between
// segments cannot leak glow or alpha into the next segment.
#[test]
fn brush_switch_leaves_no_residue() {
    let p = Point::new(0.0, 0.0);
    let q = Point::new(5.0, 0.0);
    let _ = plan_segment(Brush::Neon, INK, 5.0, p, q, &mut no_rng());
    match plan_segment(Brush::Normal, INK, 5.0, p, q, &mut no_rng()).first() {
        Some(PaintOp::Stroke { glow, alpha, .. }) => {
            assert_eq!(*glow, None);
            assert_eq!(*alpha, 1.0);
        }
        other => panic!("expected a stroke, got {other:?}"),
    }
}

#[test]
fn brush_ids_round_trip() {
    for brush in Brush::ALL {
        assert_eq!(Brush::from_id(brush.id()), Some(brush));
    }
    assert_eq!(Brush::from_id("crayon"), None);
}
