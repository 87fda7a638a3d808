//! # Polygon Utilities
//!
//! Ring-level operations over a shared point list. A ring is a slice of
//! indices into `points`; several rings may share one point list.
//!
//! ## Operations
//!
//! - **Orientation**: [`is_clockwise`] via a vertical probe ray
//! - **Cleanup**: [`prune_collinear`], [`prepare_ring`]
//! - **Measures**: [`polygon_area`], [`Bounds`]
//! - **Containment**: [`point_in_polygon`]
//! - **Ray casting**: [`ray_hits`], [`ray_hits_in_range`]

mod hits;

pub use hits::{ray_hits, ray_hits_in_range, RayHit};

use crate::error::{GeometryError, GeometryResult};
use crate::predicates::{
    distance_to_segment, flat_normalize, is_collinear, is_convex, same_point, xz_intersection,
};
use config::constants::{
    COLLINEAR_DISTANCE_EPSILON, FAR_PROBE_DISTANCE, WINDING_PROBE_JITTER,
    WINDING_PROBE_MAX_ATTEMPTS,
};
use glam::DVec3;
use rand::Rng;

// =============================================================================
// BOUNDS
// =============================================================================

/// Axis-aligned bounding box on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x
    pub min_x: f64,
    /// Largest x
    pub max_x: f64,
    /// Smallest z
    pub min_z: f64,
    /// Largest z
    pub max_z: f64,
}

impl Bounds {
    /// Bounds of the given points, or `None` for an empty iterator.
    pub fn of<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_x: first.x,
            max_x: first.x,
            min_z: first.z,
            max_z: first.z,
        };
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.min_z = bounds.min_z.min(p.z);
            bounds.max_z = bounds.max_z.max(p.z);
        }
        Some(bounds)
    }

    /// Bounds of the points referenced by `ring`.
    pub fn of_ring(points: &[DVec3], ring: &[usize]) -> Option<Self> {
        Self::of(ring.iter().map(|&i| &points[i]))
    }

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along z.
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }
}

/// Index of the point with the largest x (first one on ties).
pub fn rightmost_index(points: &[DVec3]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, p) in points.iter().enumerate() {
        match best {
            Some(b) if points[b].x >= p.x => {}
            _ => best = Some(i),
        }
    }
    best
}

// =============================================================================
// ORIENTATION
// =============================================================================

/// Returns whether `ring` winds clockwise (seen from above, +z north).
///
/// A probe starts one unit above the bounding box at its horizontal middle
/// and shoots south. The first boundary edge it crosses runs west to east
/// exactly when the ring is clockwise. If the probe passes exactly through a
/// vertex the answer is ambiguous, so the probe moves to a random x in the
/// middle half of the box and starts over, up to
/// [`WINDING_PROBE_MAX_ATTEMPTS`] positions.
///
/// # Errors
///
/// - [`GeometryError::DegenerateRing`] for rings with fewer than 3 vertices
///   or no horizontal extent
/// - [`GeometryError::DegenerateRayHit`] when every probe grazed a vertex
pub fn is_clockwise<R: Rng + ?Sized>(
    points: &[DVec3],
    ring: &[usize],
    rng: &mut R,
) -> GeometryResult<bool> {
    let bounds = Bounds::of_ring(points, ring)
        .filter(|b| ring.len() >= 3 && b.width() > 0.0)
        .ok_or(GeometryError::DegenerateRing { len: ring.len() })?;

    let probe_z = bounds.max_z + 1.0;
    let mut probe_x = bounds.min_x + bounds.width() * 0.5;

    for _ in 0..WINDING_PROBE_MAX_ATTEMPTS {
        let origin = DVec3::new(probe_x, 0.0, probe_z);
        match closest_probe_hit(points, ring, origin) {
            ProbeOutcome::Hit(start) => {
                return Ok(is_convex(points[ring[start]] - origin, DVec3::NEG_Z));
            }
            ProbeOutcome::Grazed => {
                let offset = rng.gen_range(-WINDING_PROBE_JITTER..WINDING_PROBE_JITTER);
                probe_x = bounds.min_x + bounds.width() * (0.5 + offset);
            }
            ProbeOutcome::Missed => {
                return Err(GeometryError::DegenerateRing { len: ring.len() });
            }
        }
    }

    Err(GeometryError::DegenerateRayHit {
        attempts: WINDING_PROBE_MAX_ATTEMPTS,
    })
}

enum ProbeOutcome {
    Hit(usize),
    Grazed,
    Missed,
}

fn closest_probe_hit(points: &[DVec3], ring: &[usize], origin: DVec3) -> ProbeOutcome {
    let n = ring.len();
    let mut best: Option<(f64, usize)> = None;
    for i in 0..n {
        let cur = points[ring[i]];
        let next = points[ring[(i + 1) % n]];
        let straddles =
            (cur.x < origin.x && next.x > origin.x) || (cur.x > origin.x && next.x < origin.x);
        if straddles {
            let Some(hit) = xz_intersection(origin, DVec3::NEG_Z, cur, next - cur) else {
                continue;
            };
            let distance = origin.distance(hit);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, i));
            }
        } else if cur.x == origin.x || next.x == origin.x {
            return ProbeOutcome::Grazed;
        }
    }
    best.map_or(ProbeOutcome::Missed, |(_, i)| ProbeOutcome::Hit(i))
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Positions in `ring` whose vertex adds no corner.
///
/// A vertex is flagged when its incident edges are parallel. Otherwise, if
/// the following vertex sits within [`COLLINEAR_DISTANCE_EPSILON`] of the
/// segment from the previous vertex to this one, that following vertex is
/// flagged instead (`A-------C-B` where `C` is visually on the line).
/// The result is sorted and free of duplicates.
pub fn collinear_positions(points: &[DVec3], ring: &[usize]) -> Vec<usize> {
    let n = ring.len();
    let mut flagged = Vec::new();
    for i in 0..n {
        let prev = points[ring[(i + n - 1) % n]];
        let p = points[ring[i]];
        let next = points[ring[(i + 1) % n]];

        if is_collinear(prev - p, next - p) {
            flagged.push(i);
        } else if distance_to_segment(prev, p, next) < COLLINEAR_DISTANCE_EPSILON {
            flagged.push((i + 1) % n);
        }
    }
    flagged.sort_unstable();
    flagged.dedup();
    flagged
}

/// Returns `ring` without the positions reported by [`collinear_positions`].
pub fn prune_collinear(points: &[DVec3], ring: &[usize]) -> Vec<usize> {
    let flagged = collinear_positions(points, ring);
    ring.iter()
        .enumerate()
        .filter(|(position, _)| flagged.binary_search(position).is_err())
        .map(|(_, &index)| index)
        .collect()
}

/// Turns a raw coordinate ring into a clean, correctly wound point list.
///
/// - drops a trailing point that repeats the first one
/// - orients outer rings clockwise and holes counter-clockwise
/// - removes vertices that add no corner
///
/// # Errors
///
/// Fails with [`GeometryError::DegenerateRing`] when fewer than 3 vertices
/// remain, or propagates winding probe failures.
pub fn prepare_ring<R: Rng + ?Sized>(
    mut positions: Vec<DVec3>,
    is_hole: bool,
    rng: &mut R,
) -> GeometryResult<Vec<DVec3>> {
    if positions.len() > 1 && same_point(positions[0], positions[positions.len() - 1]) {
        positions.pop();
    }
    if positions.len() < 3 {
        return Err(GeometryError::DegenerateRing {
            len: positions.len(),
        });
    }

    let identity: Vec<usize> = (0..positions.len()).collect();
    if is_clockwise(&positions, &identity, rng)? == is_hole {
        positions.reverse();
    }

    let kept = prune_collinear(&positions, &identity);
    if kept.len() < 3 {
        return Err(GeometryError::DegenerateRing { len: kept.len() });
    }
    Ok(kept.into_iter().map(|i| positions[i]).collect())
}

// =============================================================================
// MEASURES
// =============================================================================

/// Unsigned area of the ring on the XZ plane (shoelace formula).
pub fn polygon_area(points: &[DVec3], ring: &[usize]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let a = points[ring[0]];
    let doubled: f64 = ring
        .windows(2)
        .skip(1)
        .map(|pair| {
            let b = points[pair[0]] - a;
            let c = points[pair[1]] - a;
            b.x * c.z - c.x * b.z
        })
        .sum();
    doubled.abs() * 0.5
}

/// Average of the ring's vertices with the height dropped.
pub fn vertex_centroid(points: &[DVec3], ring: &[usize]) -> DVec3 {
    if ring.is_empty() {
        return DVec3::ZERO;
    }
    let sum: DVec3 = ring.iter().map(|&i| points[i]).sum();
    let center = sum / ring.len() as f64;
    DVec3::new(center.x, 0.0, center.z)
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// Returns whether `point` lies inside the ring (crossing parity).
///
/// The segment tested runs from far outside towards `point`, along the
/// direction from the ring's first vertex to `point`.
pub fn point_in_polygon(point: DVec3, points: &[DVec3], ring: &[usize]) -> bool {
    let Some(&first) = ring.first() else {
        return false;
    };
    let mut direction = flat_normalize(point - points[first]);
    if direction == DVec3::ZERO {
        direction = DVec3::X;
    }
    let outside = point - direction * FAR_PROBE_DISTANCE;
    ray_hits_in_range(outside, point, points, ring).len() % 2 == 1
}

#[cfg(test)]
mod tests;
