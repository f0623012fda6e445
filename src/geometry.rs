//! Canvas-space points and the pointer-to-canvas coordinate mapper.

/// Spacing between disc stamps for the dotted brush, in canvas pixels.
pub const DOT_SPACING: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn lerp(&self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Evenly interpolated stamp positions for the dotted brush, endpoints
/// included. A segment of length `d` yields `ceil(d / spacing) + 1` points;
/// a zero-length segment yields a single stamp.
pub fn stamp_points(from: Point, to: Point, spacing: f64) -> Vec<Point> {
    let d = from.distance(to);
    if d == 0.0 {
        return vec![from];
    }
    let steps = (d / spacing).ceil() as usize;
    (0..=steps)
        .map(|i| from.lerp(to, i as f64 / steps as f64))
        .collect()
}

/// Eight positions on a ring around `center`, one every 45 degrees starting
/// at angle zero. Used by the sparkle overlay.
pub fn sparkle_ring(center: Point, radius: f64) -> [Point; 8] {
    std::array::from_fn(|i| {
        let angle = i as f64 * std::f64::consts::FRAC_PI_4;
        Point {
            x: center.x + angle.cos() * radius,
            y: center.y + angle.sin() * radius,
        }
    })
}

/// Maps raw client coordinates into canvas pixel space.
///
/// The canvas has a fixed intrinsic resolution (800x600) but is laid out at
/// whatever size CSS gives it; drawing at unscaled client offsets lands in
/// the wrong place on any scaled layout. Captured per event from
/// `getBoundingClientRect`, kept free of web types so it tests natively.
#[derive(Clone, Copy, Debug)]
pub struct CanvasMetrics {
    pub intrinsic_width: f64,
    pub intrinsic_height: f64,
    pub rect_left: f64,
    pub rect_top: f64,
    pub rect_width: f64,
    pub rect_height: f64,
}

impl CanvasMetrics {
    pub fn to_canvas(&self, client_x: f64, client_y: f64) -> Point {
        Point {
            x: (client_x - self.rect_left) * (self.intrinsic_width / self.rect_width),
            y: (client_y - self.rect_top) * (self.intrinsic_height / self.rect_height),
        }
    }
}
