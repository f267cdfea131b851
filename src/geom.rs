//! Planar geometry helpers for the radial chart.
//!
//! All coordinates are screen coordinates: the y axis grows downward, so a
//! visually clockwise rotation corresponds to a negative mathematical angle.
//! That sign convention is load-bearing for slot placement and must not change.

// ─── Point ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

// ─── Rotation ────────────────────────────────────────────────────────────────

/// Rotate `pt` around `center` by `deg` degrees, clockwise on screen.
///
/// The angle is converted as r = −deg·π/180 and fed to the standard 2D
/// rotation matrix, which on a y-down screen yields a clockwise visual
/// rotation for positive `deg`.
pub fn rotate_pt(pt: Point, center: Point, deg: f64) -> Point {
    let r = -deg.to_radians();
    let tx = pt.x - center.x;
    let ty = pt.y - center.y;
    Point::new(
        center.x + tx * r.cos() - ty * r.sin(),
        center.y + tx * r.sin() + ty * r.cos(),
    )
}

/// Point on the circle of the given `radius` around `center`, at slot angle
/// `deg` (0 = right of center before rotation; 180 = left).
pub fn pt_on_circle(center: Point, radius: f64, deg: f64) -> Point {
    rotate_pt(Point::new(center.x + radius, center.y), center, deg)
}

/// Angle of the line from `pt1` to `pt2` in degrees: 0 = right, 90 = up,
/// −90 = down, 180 = left (screen coordinates).
pub fn line_angle(pt1: Point, pt2: Point) -> f64 {
    (-(pt2.y - pt1.y)).atan2(pt2.x - pt1.x).to_degrees()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
