//! Hole bridging.
//!
//! A hole is spliced into the outer ring through a zero-width slit from its
//! rightmost vertex to a mutually visible outer vertex. The result is one
//! weakly simple ring that ear clipping can consume directly.

use crate::error::{GeometryError, GeometryResult};
use crate::polygon::rightmost_index;
use crate::predicates::{point_in_triangle, xz_intersection};
use glam::DVec3;

/// Outer ring with every bridgeable hole spliced in.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRing {
    /// Outer points followed by the points of each merged hole, in merge order.
    pub points: Vec<DVec3>,
    /// Single ring over `points`; bridge vertices appear twice.
    pub ring: Vec<usize>,
    /// Point count per loop: the outer ring first, then each merged hole.
    pub loop_sizes: Vec<usize>,
    /// Indices (into the input hole list) of holes that could not be bridged.
    pub dropped: Vec<usize>,
}

/// Splices `hole` into `ring`.
///
/// `ring` must wind clockwise over `points` and `hole` counter-clockwise.
/// The hole's points are expected to be appended to `points` by the caller,
/// so hole vertex `k` is referenced as `points.len() + k` in the result.
///
/// # Errors
///
/// [`GeometryError::CorruptHoleData`] when no outer edge lies to the right
/// of the hole's rightmost vertex.
pub fn combine_ring_with_hole(
    points: &[DVec3],
    ring: &[usize],
    hole: &[DVec3],
) -> GeometryResult<Vec<usize>> {
    let bridge_start =
        rightmost_index(hole).ok_or_else(|| GeometryError::corrupt_hole("hole is empty"))?;
    let start = hole[bridge_start];
    let n = ring.len();

    // closest outer edge crossed by a ray shot east
    let mut best: Option<(f64, DVec3, usize)> = None;
    for i in 0..n {
        let upper = points[ring[i]];
        let lower = points[ring[(i + 1) % n]];
        if !(upper.z > start.z && lower.z < start.z && (upper.x > start.x || lower.x > start.x)) {
            continue;
        }
        let Some(hit) = xz_intersection(start, DVec3::X, upper, lower - upper) else {
            continue;
        };
        if hit.x < start.x {
            continue;
        }
        let distance = start.distance(hit);
        if best.map_or(true, |(d, _, _)| distance < d) {
            best = Some((distance, hit, i));
        }
    }
    let (_, hit, upper_position) = best.ok_or_else(|| {
        GeometryError::corrupt_hole(format!(
            "no outer edge east of hole vertex ({}, {})",
            start.x, start.z
        ))
    })?;
    let lower_position = (upper_position + 1) % n;

    // the visible vertex is the hit edge's eastern end unless an outer
    // vertex pokes into the triangle between the ray and that end
    let (search, mut closest) = if points[ring[lower_position]].x >= start.x {
        ((start, hit, points[ring[lower_position]]), lower_position)
    } else {
        ((start, points[ring[upper_position]], hit), upper_position)
    };
    let (a, b, c) = search;
    for (position, &index) in ring.iter().enumerate() {
        if point_in_triangle(points[index], a, b, c)
            && start.distance(points[index]) < start.distance(points[ring[closest]])
        {
            closest = position;
        }
    }

    let base = points.len();
    let hole_indices = (bridge_start..hole.len()).chain(0..=bridge_start);
    let mut combined = Vec::with_capacity(n + hole.len() + 2);
    combined.extend_from_slice(&ring[..=closest]);
    combined.extend(hole_indices.map(|k| base + k));
    combined.extend_from_slice(&ring[closest..]);
    Ok(combined)
}

/// Bridges every hole into the outer ring, rightmost hole first.
///
/// Holes are sorted by their rightmost x (descending, stable) so that each
/// bridge only has to cross already-merged geometry. A hole that cannot be
/// bridged is skipped and reported in [`MergedRing::dropped`].
pub fn merge_holes(outer: Vec<DVec3>, holes: &[Vec<DVec3>]) -> MergedRing {
    let outer_len = outer.len();
    let mut merged = MergedRing {
        ring: (0..outer_len).collect(),
        points: outer,
        loop_sizes: vec![outer_len],
        dropped: Vec::new(),
    };

    let mut order: Vec<(usize, f64)> = holes
        .iter()
        .enumerate()
        .map(|(i, hole)| {
            let max_x = hole.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            (i, max_x)
        })
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (hole_index, _) in order {
        let hole = &holes[hole_index];
        match combine_ring_with_hole(&merged.points, &merged.ring, hole) {
            Ok(ring) => {
                merged.ring = ring;
                merged.points.extend_from_slice(hole);
                merged.loop_sizes.push(hole.len());
            }
            Err(_) => merged.dropped.push(hole_index),
        }
    }
    merged
}
