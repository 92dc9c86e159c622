/// Plane geometry shared by the update functions.

use glam::DVec2;

/// A position in play-area (or screen) coordinates.
pub type Point = DVec2;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).length()
}

/// Clamp a point into `[0, width] × [0, height]`.
pub fn clamp_to_area(p: Point, width: f64, height: f64) -> Point {
    Point::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height))
}

/// Unit vector pointing from `from` to `to`.
///
/// Coincident points yield the zero vector, so callers scaling the result
/// by a speed simply do not move.
pub fn unit_towards(from: Point, to: Point) -> Point {
    let d = distance(from, to);
    if d > 0.0 {
        (to - from) / d
    } else {
        Point::ZERO
    }
}
