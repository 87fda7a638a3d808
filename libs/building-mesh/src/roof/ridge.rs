//! Ridge roofs: gabled, hipped and half-hipped.
//!
//! ```text
//!     1----->--2        1----->--2
//!     |        |        |\      /|
//!     |   M    |   =>   | S----E |
//!     |        |        |/      \|
//!     4--<-----3        4--<-----3
//! ```
//!
//! A probe along the roof direction through the middle `M` of the outline
//! finds the ridge ends `S` and `E`, which are pushed slightly inwards.
//! Rays from the ridge ends to their neighbouring outline vertices cut the
//! footprint into faces. Gabled roofs keep the tiny triangles at the ridge
//! ends as vertical gable walls; hipped roofs slope them.

use super::{lift, range_of_vertices, ratio, segment, RoofBuild, RoofContext};
use crate::roof::RoofKind;
use config::constants::FAR_PROBE_DISTANCE;
use footprint_geometry::polygon::{ray_hits, RayHit};
use footprint_geometry::predicates::{
    distance_to_line, distance_to_segment, flat_normalize, is_convex, same_point,
};
use footprint_geometry::{Footprint, GeometryError, GeometryResult, Node, RaySpec};
use glam::DVec3;

/// Share of the ridge length the ends move inwards.
fn push_in(kind: &RoofKind) -> f64 {
    match kind {
        RoofKind::Gabled => 0.001,
        _ => 0.1,
    }
}

pub(super) fn build(
    footprint: &Footprint,
    direction: DVec3,
    context: &RoofContext<'_>,
) -> GeometryResult<RoofBuild> {
    let kind = context.kind;
    let points = &footprint.points;
    let ring = &footprint.ring;

    let mid = mid_position(points, direction);
    let probe = mid - direction * FAR_PROBE_DISTANCE;
    let mut hits = ray_hits(probe, direction, points, ring);
    hits.sort_by(|a, b| probe.distance(a.position).total_cmp(&probe.distance(b.position)));
    let count = hits.len();
    if count < 2 {
        return Err(GeometryError::topology(format!(
            "ridge probe crossed the outline {count} times"
        )));
    }
    let (first, last) = (hits[0], hits[count - 1]);

    let span = first.position.distance(last.position) * push_in(kind);
    let s = first.position + direction * span.min(first.position.distance(hits[1].position) * 0.9);
    let e = last.position - direction * span.min(last.position.distance(hits[count - 2].position) * 0.9);

    let (mut prev_s, mut next_s) = neighbours(points, ring, &first);
    let (mut prev_e, mut next_e) = neighbours(points, ring, &last);
    if *kind == RoofKind::Hipped {
        let outer_len = footprint.outer_len();
        let search = |start, end, reference, towards, step| {
            find_previous_index(points, ring, outer_len, start, end, reference, towards, step)
        };
        (prev_s, prev_e, next_s, next_e) = (
            search(next_e, prev_s, s, direction, 1),
            search(next_s, prev_e, e, -direction, 1),
            search(prev_e, next_s, s, direction, -1),
            search(prev_s, next_e, e, -direction, -1),
        );
    }

    let non_roof_areas = if *kind == RoofKind::Gabled {
        vec![
            gable_area(s, range_of_vertices(points, ring, prev_s, next_s)),
            gable_area(e, range_of_vertices(points, ring, prev_e, next_e)),
        ]
    } else {
        Vec::new()
    };

    let mut rays = RaySpec::new();
    let start = rays.add_branch(s);
    let end = rays.add_branch(e);
    rays.add_rays(start, [end, Node::Ring(prev_s), Node::Ring(next_s)]);
    rays.add_rays(end, [Node::Ring(prev_e), Node::Ring(next_e)]);

    let segmented = segment(footprint, &rays, &non_roof_areas, context.feature_id)?;

    let distances: Vec<f64> = segmented
        .points
        .iter()
        .map(|&v| match kind {
            RoofKind::Gabled => distance_to_line(mid, direction, v),
            _ => distance_to_segment(s, e, v),
        })
        .collect();
    let max = distances.iter().copied().fold(0.0, f64::max);

    Ok(RoofBuild {
        kind: kind.clone(),
        heights: context.heights,
        extra_vertices: lift(
            &segmented.points,
            distances.iter().map(|&d| ratio(d, max)),
            &context.heights,
        ),
        points: segmented.points,
        roof_groups: segmented.roof_groups,
        top_triangles: segmented.top_triangles,
        connection_ring: true,
        roof_base: false,
        extra_rings: 0,
        fallback: None,
    })
}

fn gable_area(apex: DVec3, side: Vec<DVec3>) -> Vec<DVec3> {
    let mut area = Vec::with_capacity(side.len() + 1);
    area.push(apex);
    area.extend(side);
    area
}

/// Middle of the outline's extent along `direction` and across it.
pub(super) fn mid_position(points: &[DVec3], direction: DVec3) -> DVec3 {
    let across = direction.cross(DVec3::Y);
    let extent = |axis: DVec3| {
        points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            let d = p.dot(axis);
            (min.min(d), max.max(d))
        })
    };
    let (across_min, across_max) = extent(across);
    let (along_min, along_max) = extent(direction);
    across * (across_min + across_max) * 0.5 + direction * (along_min + along_max) * 0.5
}

/// Ring positions before and after a probe hit. A hit exactly on a vertex
/// skips that vertex.
fn neighbours(points: &[DVec3], ring: &[usize], hit: &RayHit) -> (usize, usize) {
    let n = ring.len();
    let prev = if same_point(hit.position, points[ring[hit.edge]]) {
        (hit.edge + n - 1) % n
    } else {
        hit.edge
    };
    let next = if same_point(hit.position, points[ring[(hit.edge + 1) % n]]) {
        (hit.edge + 2) % n
    } else {
        (hit.edge + 1) % n
    };
    (prev, next)
}

/// Walks the outer ring from `start` to `end` (by `step`) and returns the
/// first position on the far side of the half-plane through `reference`
/// facing `direction`.
///
/// A convex vertex whose incoming edge points back towards the reference
/// more steeply than the edge after it is skipped: the ray to it would cut
/// through that next edge.
///
/// ```text
///     a___
///         °°°---___b
///         c---°°°  /
///                 /
///                E
/// ```
///
/// This correction is a heuristic that holds for the outlines seen in
/// practice (rectangles, L and U shapes), not a general guarantee.
#[allow(clippy::too_many_arguments)]
pub(super) fn find_previous_index(
    points: &[DVec3],
    ring: &[usize],
    outer_len: usize,
    start: usize,
    end: usize,
    reference: DVec3,
    direction: DVec3,
    step: isize,
) -> usize {
    let n = ring.len();
    let start_ext = start + if step < 0 && start < end { n } else { 0 };
    let end_ext = end + if step > 0 && end < start { n } else { 0 };

    let mut outer = Vec::new();
    let stop = end_ext as isize + step;
    let mut i = start_ext as isize;
    while i != stop {
        let position = i as usize % n;
        if ring[position] < outer_len {
            outer.push(position);
        }
        i += step;
    }

    let count = outer.len() as isize;
    for (k, &position) in outer.iter().enumerate() {
        let vertex = points[ring[position]];
        if direction.dot(flat_normalize(vertex - reference)) >= 0.0 {
            continue;
        }
        let k = k as isize;
        let prev = points[ring[outer[(k - step).rem_euclid(count) as usize]]];
        let next = points[ring[outer[(k + step).rem_euclid(count) as usize]]];
        let to_prev = flat_normalize(prev - vertex);
        let to_next = flat_normalize(next - vertex);
        if is_convex(to_prev, to_next)
            && to_prev.dot(to_next) > to_prev.dot(flat_normalize(reference - vertex))
        {
            continue;
        }
        return position;
    }
    outer.last().copied().unwrap_or(start % n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rectangle() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 4.0),
            DVec3::new(10.0, 0.0, 4.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_mid_position_of_rectangle() {
        let mid = mid_position(&rectangle(), DVec3::X);
        assert_relative_eq!(mid.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(mid.z, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_neighbours_skip_hit_vertex() {
        let points = rectangle();
        let ring = vec![0, 1, 2, 3];
        let mid_edge = RayHit {
            position: DVec3::new(0.0, 0.0, 2.0),
            edge: 3,
        };
        assert_eq!(neighbours(&points, &ring, &mid_edge), (3, 0));

        let on_start = RayHit {
            position: DVec3::new(0.0, 0.0, 0.0),
            edge: 3,
        };
        assert_eq!(neighbours(&points, &ring, &on_start), (2, 0));

        let on_end = RayHit {
            position: DVec3::new(0.0, 0.0, 4.0),
            edge: 3,
        };
        assert_eq!(neighbours(&points, &ring, &on_end), (3, 1));
    }

    #[test]
    fn test_find_previous_index_on_rectangle() {
        let points = rectangle();
        let ring = vec![0, 1, 2, 3];
        let s = DVec3::new(1.0, 0.0, 2.0);
        let e = DVec3::new(9.0, 0.0, 2.0);
        assert_eq!(find_previous_index(&points, &ring, 4, 2, 3, s, DVec3::X, 1), 3);
        assert_eq!(find_previous_index(&points, &ring, 4, 0, 1, e, DVec3::NEG_X, 1), 1);
        assert_eq!(find_previous_index(&points, &ring, 4, 1, 0, s, DVec3::X, -1), 0);
        assert_eq!(find_previous_index(&points, &ring, 4, 3, 2, e, DVec3::NEG_X, -1), 2);
    }

    #[test]
    fn test_find_previous_index_moves_past_near_side() {
        // U shape opening south; from the east arm the walk must pass the
        // notch vertices that are still east of the reference
        let points = vec![
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::new(10.0, 0.0, 10.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(7.0, 0.0, 0.0),
            DVec3::new(7.0, 0.0, 6.0),
            DVec3::new(3.0, 0.0, 6.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
        ];
        let ring: Vec<usize> = (0..8).collect();
        let reference = DVec3::new(5.0, 0.0, 8.0);
        let found = find_previous_index(&points, &ring, 8, 2, 7, reference, DVec3::X, 1);
        assert!(points[ring[found]].x < reference.x);
    }
}
