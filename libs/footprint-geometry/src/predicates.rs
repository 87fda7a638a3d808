//! # Geometry Predicates
//!
//! Primitive tests on the horizontal (XZ) plane. Points are `DVec3` with
//! `y` as height; every predicate here ignores `y`.
//!
//! ## Orientation Convention
//!
//! Looking down the `y` axis with `z` pointing north, a positive
//! `cross_2d(a, b)` means `a` lies clockwise of `b`. Outer rings are
//! clockwise, so a convex corner satisfies `is_convex(to_prev, to_next)`.

use config::constants::{PARALLEL_EPSILON, POINT_EQ_EPSILON};
use glam::DVec3;

/// World up.
pub const UP: DVec3 = DVec3::Y;

/// Signed magnitude of the 2D cross product on the XZ plane.
///
/// # Example
///
/// ```rust
/// use footprint_geometry::predicates::cross_2d;
/// use glam::DVec3;
///
/// // east lies clockwise of north
/// assert!(cross_2d(DVec3::X, DVec3::Z) > 0.0);
/// ```
#[inline]
pub fn cross_2d(a: DVec3, b: DVec3) -> f64 {
    a.x * b.z - a.z * b.x
}

/// Returns true if `to_prev` lies strictly clockwise of `to_next`.
#[inline]
pub fn is_convex(to_prev: DVec3, to_next: DVec3) -> bool {
    cross_2d(to_prev, to_next) > 0.0
}

/// Returns true if `a` and `b` are parallel or anti-parallel.
#[inline]
pub fn is_collinear(a: DVec3, b: DVec3) -> bool {
    let scale = flat(a).length() * flat(b).length();
    cross_2d(a, b).abs() <= PARALLEL_EPSILON * scale
}

/// Returns true if `other` lies strictly inside the clockwise triangle
/// `prev -> p -> next`. Points on an edge are outside.
///
/// # Example
///
/// ```rust
/// use footprint_geometry::predicates::point_in_triangle;
/// use glam::DVec3;
///
/// let (a, b, c) = (DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 4.0), DVec3::new(4.0, 0.0, 0.0));
/// assert!(point_in_triangle(DVec3::new(1.0, 0.0, 1.0), a, b, c));
/// assert!(!point_in_triangle(DVec3::new(2.0, 0.0, 0.0), a, b, c));
/// ```
pub fn point_in_triangle(other: DVec3, prev: DVec3, p: DVec3, next: DVec3) -> bool {
    let to_prev = prev - next;
    let to_p = p - prev;
    let to_next = next - p;

    is_convex(other - prev, to_p) && is_convex(other - p, to_next) && is_convex(other - next, to_prev)
}

/// Positions in `ring` whose points lie strictly inside the clockwise
/// triangle `prev -> p -> next`.
pub fn positions_in_triangle(
    points: &[DVec3],
    ring: &[usize],
    prev: DVec3,
    p: DVec3,
    next: DVec3,
) -> Vec<usize> {
    ring.iter()
        .enumerate()
        .filter(|(_, &index)| point_in_triangle(points[index], prev, p, next))
        .map(|(position, _)| position)
        .collect()
}

/// Monotonic surrogate of the clockwise angle from `reference` to `v`.
///
/// Ranges over `[0, 4)`: 0 for `v` along `reference`, 1 a quarter turn
/// clockwise, 2 opposite, 3 a quarter turn counter-clockwise.
///
/// ```text
///        4 0
///         ↑
///     3 ← x → 1
///         ↓
///         2
/// ```
pub fn clockwise_metric(reference: DVec3, v: DVec3) -> f64 {
    let reference = flat_normalize(reference);
    let v = flat_normalize(v);
    let dot = reference.dot(v);
    let side = flat_normalize(DVec3::new(reference.z, 0.0, -reference.x)).dot(v);
    if side >= 0.0 {
        1.0 - dot
    } else {
        3.0 + dot
    }
}

/// Intersection of the line `start + t·direction` with the line
/// `other_start + s·other_direction`, returned on the second line.
///
/// Returns `None` if the directions are parallel or zero.
///
/// # Example
///
/// ```rust
/// use footprint_geometry::predicates::xz_intersection;
/// use glam::DVec3;
///
/// let hit = xz_intersection(
///     DVec3::new(0.0, 0.0, 2.0), DVec3::X,
///     DVec3::new(5.0, 0.0, 4.0), DVec3::new(0.0, 0.0, -4.0),
/// ).unwrap();
/// assert_eq!(hit, DVec3::new(5.0, 0.0, 2.0));
/// assert!(xz_intersection(DVec3::ZERO, DVec3::X, DVec3::Z, DVec3::X).is_none());
/// ```
pub fn xz_intersection(
    start: DVec3,
    direction: DVec3,
    other_start: DVec3,
    other_direction: DVec3,
) -> Option<DVec3> {
    let denominator = other_direction.x * direction.z - other_direction.z * direction.x;
    if denominator == 0.0 {
        return None;
    }
    let factor = ((start.x - other_start.x) * direction.z - (start.z - other_start.z) * direction.x)
        / denominator;
    Some(DVec3::new(
        other_start.x + other_direction.x * factor,
        0.0,
        other_start.z + other_direction.z * factor,
    ))
}

/// Vector from the closest point of the infinite line to `point`.
pub fn vector_from_line(start: DVec3, direction: DVec3, point: DVec3) -> DVec3 {
    let axis = direction.normalize_or_zero();
    let projected = start + axis * (point - start).dot(axis);
    point - projected
}

/// Distance from `point` to the infinite line through `start`.
pub fn distance_to_line(start: DVec3, direction: DVec3, point: DVec3) -> f64 {
    vector_from_line(start, direction, point).length()
}

/// Distance from `point` to the segment `start..end`.
///
/// The projection onto the supporting line is used even past the segment
/// ends, so the result is the smaller of the line distance and the two
/// endpoint distances.
pub fn distance_to_segment(start: DVec3, end: DVec3, point: DVec3) -> f64 {
    distance_to_line(start, end - start, point)
        .min(start.distance(point))
        .min(end.distance(point))
}

/// Approximate point identity.
#[inline]
pub fn same_point(a: DVec3, b: DVec3) -> bool {
    a.distance_squared(b) < POINT_EQ_EPSILON * POINT_EQ_EPSILON
}

/// Sign with zero counted as positive.
#[inline]
pub fn sign(value: f64) -> f64 {
    if value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Drops the height component.
#[inline]
pub fn flat(v: DVec3) -> DVec3 {
    DVec3::new(v.x, 0.0, v.z)
}

/// Normalizes, mapping zero-length vectors to zero.
#[inline]
pub fn flat_normalize(v: DVec3) -> DVec3 {
    v.normalize_or_zero()
}

/// Unit direction on the XZ plane for a compass bearing in degrees
/// (clockwise from north, north = +z).
///
/// # Example
///
/// ```rust
/// use footprint_geometry::predicates::bearing_direction;
///
/// let east = bearing_direction(90.0);
/// assert!((east.x - 1.0).abs() < 1e-12 && east.z.abs() < 1e-12);
/// ```
pub fn bearing_direction(degrees: f64) -> DVec3 {
    let radians = degrees.to_radians();
    DVec3::new(radians.sin(), 0.0, radians.cos())
}
