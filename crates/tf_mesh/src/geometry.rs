// crates/tf_mesh/src/geometry.rs

//! Geometric primitives
//!
//! Pure functions over 2D points. None of them fail: degenerate input gives
//! degenerate output (zero area, zero normal) and it is up to the mesh
//! builder to reject it.

use glam::DVec2;

/// 2D point / vector
pub type Point = DVec2;

/// Signed triangle area, half the cross product of `(b - a)` and `(c - a)`.
///
/// Positive for counter-clockwise input, zero for collinear points.
#[inline]
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    0.5 * (b - a).perp_dot(c - a)
}

/// Unsigned triangle area
#[inline]
pub fn triangle_area_abs(a: Point, b: Point, c: Point) -> f64 {
    triangle_area(a, b, c).abs()
}

/// Arithmetic mean of the points; the origin for an empty slice.
pub fn average(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let sum = points.iter().fold(Point::ZERO, |acc, p| acc + *p);
    sum / points.len() as f64
}

/// Euclidean distance
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Unit normal to the right of the directed segment `a -> b`.
///
/// For a counter-clockwise triangle this is the outward normal of the edge.
/// Returns zero for coincident points.
#[inline]
pub fn outward_normal(a: Point, b: Point) -> Point {
    let d = b - a;
    let len = d.length();
    if len > 0.0 {
        Point::new(d.y, -d.x) / len
    } else {
        Point::ZERO
    }
}

/// Triangle perimeter
#[inline]
pub fn perimeter(a: Point, b: Point, c: Point) -> f64 {
    a.distance(b) + b.distance(c) + c.distance(a)
}

/// Longest edge length of a triangle
#[inline]
pub fn longest_edge(a: Point, b: Point, c: Point) -> f64 {
    a.distance(b).max(b.distance(c)).max(c.distance(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_area() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);
        assert!((triangle_area(a, b, c) - 0.5).abs() < 1e-15);
        assert!((triangle_area(a, c, b) + 0.5).abs() < 1e-15);
        assert!((triangle_area_abs(a, c, b) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_collinear_area_is_zero() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 1.0);
        let c = Point::new(3.0, 3.0);
        assert_eq!(triangle_area(a, b, c), 0.0);
    }

    #[test]
    fn test_average_order_independent() {
        let p = [Point::new(1.0, 2.0), Point::new(3.0, -4.0), Point::new(5.0, 8.0)];
        let q = [p[2], p[0], p[1]];
        let m = average(&p);
        assert!((m - Point::new(3.0, 2.0)).length() < 1e-14);
        assert!((m - average(&q)).length() < 1e-14);
        assert_eq!(average(&[]), Point::ZERO);
    }

    #[test]
    fn test_outward_normal_ccw() {
        // bottom edge of a CCW triangle points down
        let n = outward_normal(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert!((n - Point::new(0.0, -1.0)).length() < 1e-15);
        assert_eq!(outward_normal(Point::ONE, Point::ONE), Point::ZERO);
    }

    #[test]
    fn test_perimeter() {
        let p = perimeter(Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(0.0, 4.0));
        assert!((p - 12.0).abs() < 1e-14);
        let l = longest_edge(Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(0.0, 4.0));
        assert!((l - 5.0).abs() < 1e-14);
    }
}
