//! Brush engine: turns one path segment into an ordered list of paint
//! operations.
//!
//! The planner is pure (no canvas, no RNG source of its own), so every
//! visual rule in the brush table is testable natively. The renderer
//! (`render.rs`) executes the returned ops strictly in order, which is what
//! keeps overlays (spray, sparkle) behind their base stroke.

use crate::color::{self, Color};
use crate::geometry::{DOT_SPACING, Point, sparkle_ring, stamp_points};

/// Glow radius for the neon brush, in pixels.
const NEON_GLOW: f64 = 20.0;
/// Marker opacity.
const MARKER_ALPHA: f64 = 0.6;
/// Particles per spray overlay.
const SPRAY_COUNT: usize = 15;
/// Spray jitter half-extent, as a multiple of the brush size.
const SPRAY_JITTER: f64 = 1.5;
/// Side length of a sparkle square.
const SPARKLE_SIZE: f64 = 3.0;
/// Sparkle ring radius beyond the brush size.
const SPARKLE_RING_EXTRA: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Brush {
    Normal,
    Thick,
    Neon,
    Marker,
    Eraser,
    Dotted,
    Spray,
    Sparkle,
}

impl Brush {
    pub const ALL: [Brush; 8] = [
        Brush::Normal,
        Brush::Thick,
        Brush::Neon,
        Brush::Marker,
        Brush::Eraser,
        Brush::Dotted,
        Brush::Spray,
        Brush::Sparkle,
    ];

    /// Identifier used by palette buttons and the `brushes_unlocked` field of
    /// the player profile.
    pub fn id(&self) -> &'static str {
        match self {
            Brush::Normal => "normal",
            Brush::Thick => "thick",
            Brush::Neon => "neon",
            Brush::Marker => "marker",
            Brush::Eraser => "eraser",
            Brush::Dotted => "dotted",
            Brush::Spray => "spray",
            Brush::Sparkle => "sparkle",
        }
    }

    pub fn from_id(id: &str) -> Option<Brush> {
        Brush::ALL.iter().copied().find(|b| b.id() == id)
    }

    /// Stroke width for this brush at the given base size. `Dotted` has no
    /// continuous stroke; its value here is unused.
    fn stroke_width(&self, size: f64) -> f64 {
        match self {
            Brush::Normal | Brush::Spray | Brush::Sparkle | Brush::Dotted => size,
            Brush::Thick => size * 1.8,
            Brush::Neon => size * 0.8,
            Brush::Marker => size * 1.3,
            Brush::Eraser => size * 1.5,
        }
    }
}

/// One drawing primitive. `Stroke` carries all transient context modifiers
/// explicitly so the renderer can reset them around every operation instead
/// of leaking one brush's state into the next.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    Stroke {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
        alpha: f64,
        glow: Option<f64>,
        erase: bool,
    },
    Disc {
        center: Point,
        radius: f64,
        color: Color,
    },
    /// Axis-aligned filled square, positioned by its top-left corner.
    Square {
        x: f64,
        y: f64,
        size: f64,
        color: Color,
    },
}

/// Plan the paint operations for one segment `from -> to`.
///
/// `rng` yields values in `[0, 1)`; only the spray overlay consumes it.
/// A zero-length segment is valid (the first sample of every stroke) and
/// still produces a mark: a dot-like stub for line brushes, a single stamp
/// for `Dotted`.
pub fn plan_segment(
    brush: Brush,
    color: Color,
    size: f64,
    from: Point,
    to: Point,
    rng: &mut dyn FnMut() -> f64,
) -> Vec<PaintOp> {
    // Dotted bypasses the stroke/overlay pipeline entirely.
    if brush == Brush::Dotted {
        return stamp_points(from, to, DOT_SPACING)
            .into_iter()
            .map(|center| PaintOp::Disc {
                center,
                radius: size / 2.0,
                color,
            })
            .collect();
    }

    let mut ops = vec![PaintOp::Stroke {
        from,
        to,
        width: brush.stroke_width(size),
        color,
        alpha: if brush == Brush::Marker { MARKER_ALPHA } else { 1.0 },
        glow: (brush == Brush::Neon).then_some(NEON_GLOW),
        erase: brush == Brush::Eraser,
    }];

    // Overlays attach to the post-stroke point, never the previous one.
    match brush {
        Brush::Spray => {
            let jitter = SPRAY_JITTER * size;
            for _ in 0..SPRAY_COUNT {
                let dx = (rng() * 2.0 - 1.0) * jitter;
                let dy = (rng() * 2.0 - 1.0) * jitter;
                ops.push(PaintOp::Square {
                    x: to.x + dx,
                    y: to.y + dy,
                    size: 1.0 + rng() * 2.0,
                    color,
                });
            }
        }
        Brush::Sparkle => {
            for p in sparkle_ring(to, size + SPARKLE_RING_EXTRA) {
                ops.push(PaintOp::Square {
                    x: p.x,
                    y: p.y,
                    size: SPARKLE_SIZE,
                    color: color::GOLD,
                });
            }
        }
        _ => {}
    }

    ops
}
