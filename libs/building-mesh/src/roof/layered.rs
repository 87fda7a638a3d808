//! Layered roofs: round, mansard, gambrel and the saltbox variants.
//!
//! ```text
//!     1----->--S---2        1----->--S---2
//!     |            |      s'|\_____A____/| e'
//!     | --dir----> |   =>   | |___B____| |
//!     |            |      s'|/     C    \| e'
//!     4--<-----E---3        4--<-----E---3
//! ```
//!
//! `S` and `E` are the outline's extremes across the roof direction.
//! Between them, `levels` parallel probes run along the roof direction.
//! Every crossing becomes a prime point (`s'` entering, `e'` leaving)
//! pushed slightly inwards and tied back to the edge it crossed; two primes
//! on the same edge share one side triangle. The faces between probes
//! follow a half-circle height profile.

use super::{lift, range_of_vertices, segment, RoofBuild, RoofContext};
use crate::roof::RoofKind;
use config::constants::FAR_PROBE_DISTANCE;
use footprint_geometry::polygon::ray_hits;
use footprint_geometry::predicates::distance_to_line;
use footprint_geometry::{Footprint, GeometryError, GeometryResult, Node, RaySpec};
use glam::DVec3;
use std::collections::BTreeMap;

fn levels(kind: &RoofKind) -> usize {
    match kind {
        RoofKind::Round => 6,
        _ => 2,
    }
}

fn push_in(kind: &RoofKind) -> f64 {
    match kind {
        RoofKind::Mansard => 0.1,
        _ => 0.001,
    }
}

/// Mansard-like roofs slope on every side, so no face is a wall.
fn has_side_walls(kind: &RoofKind) -> bool {
    !matches!(kind, RoofKind::Mansard | RoofKind::QuadrupleSaltbox)
}

/// Height ratio of the probe at `t` across the outline: zero drop in the
/// middle, full drop at the sides.
fn profile(t: f64) -> f64 {
    1.0 - (2.0 * t - 1.0).acos().sin()
}

pub(super) fn build(
    footprint: &Footprint,
    direction: DVec3,
    context: &RoofContext<'_>,
) -> GeometryResult<RoofBuild> {
    let kind = context.kind;
    let points = &footprint.points;
    let ring = &footprint.ring;
    let n = ring.len();

    let across = DVec3::new(direction.z, 0.0, -direction.x);
    let (s, e) = extremes(points, across)
        .ok_or_else(|| GeometryError::topology("layered roof on an empty outline"))?;

    let level_count = levels(kind);
    let side_walls = has_side_walls(kind);
    let mut rays = RaySpec::new();
    let mut non_roof_areas: Vec<Vec<DVec3>> = Vec::new();
    let mut edge_to_prime: BTreeMap<(usize, usize), (Node, DVec3)> = BTreeMap::new();
    let mut references = vec![(s, 1.0), (e, 1.0)];

    for level in 1..=level_count {
        let t = level as f64 / (level_count + 1) as f64;
        let probe = s + (e - s) * t - direction * FAR_PROBE_DISTANCE;
        let mut hits = ray_hits(probe, direction, points, ring);
        hits.sort_by(|a, b| probe.distance(a.position).total_cmp(&probe.distance(b.position)));
        let (Some(first), Some(last)) = (hits.first(), hits.last()) else {
            return Err(GeometryError::topology(format!("level {level} probe missed the outline")));
        };
        let prime_distance = first.position.distance(last.position) * push_in(kind);

        let mut last_prime = None;
        for (i, hit) in hits.iter().enumerate() {
            let is_start = i % 2 == 0;
            let partner = hits.get(i ^ 1).ok_or_else(|| {
                GeometryError::topology(format!("level {level} probe has an unpaired crossing"))
            })?;
            let side = if is_start { 1.0 } else { -1.0 };
            let position = hit.position
                + direction * side * prime_distance.min(hit.position.distance(partner.position) * 0.45);
            let id = rays.branches().len();
            let own = rays.add_branch(position);

            let (mut prev, mut next) = (hit.edge, (hit.edge + 1) % n);
            if side_walls {
                let mut area = vec![position];
                area.extend(range_of_vertices(points, ring, prev, next));
                non_roof_areas.push(area);
            }
            if is_start {
                (prev, next) = (next, prev);
            }

            let target = match edge_to_prime.get(&(prev, next)) {
                Some(&(prior, prior_position)) => {
                    rays.remove_ray(prior, Node::Ring(next));
                    if side_walls {
                        non_roof_areas.pop();
                        if let Some(area) = non_roof_areas.iter_mut().find(|a| a.contains(&prior_position)) {
                            let at = if is_start { area.len().saturating_sub(2) } else { 0 };
                            area.insert(at, position);
                        }
                    }
                    prior
                }
                None => Node::Ring(prev),
            };
            edge_to_prime.insert((prev, next), (own, position));

            let mut targets = vec![target, Node::Ring(next)];
            if is_start {
                targets.push(Node::Branch(id + 1));
            }
            rays.add_rays(own, targets);
            last_prime = Some(position);
        }

        if let Some(position) = last_prime {
            references.push((position, profile(t)));
        }
        if *kind == RoofKind::Saltbox {
            break;
        }
    }

    let segmented = segment(footprint, &rays, &non_roof_areas, context.feature_id)?;

    let spacing = distance_to_line(s, direction, e) / (level_count + 1) as f64;
    let ratios: Vec<f64> = segmented
        .points
        .iter()
        .map(|&v| height_ratio(&references, direction, spacing, v))
        .collect();

    Ok(RoofBuild {
        kind: kind.clone(),
        heights: context.heights,
        extra_vertices: lift(&segmented.points, ratios, &context.heights),
        points: segmented.points,
        roof_groups: segmented.roof_groups,
        top_triangles: segmented.top_triangles,
        connection_ring: true,
        roof_base: false,
        extra_rings: 0,
        fallback: None,
    })
}

/// Points with the smallest and largest projection onto `axis`; the first
/// one wins ties.
fn extremes(points: &[DVec3], axis: DVec3) -> Option<(DVec3, DVec3)> {
    let (first, rest) = points.split_first()?;
    let start = (*first, first.dot(axis));
    let ((min, _), (max, _)) = rest.iter().fold((start, start), |(min, max), p| {
        let d = p.dot(axis);
        (
            if d < min.1 { (*p, d) } else { min },
            if d > max.1 { (*p, d) } else { max },
        )
    });
    Some((min, max))
}

/// Interpolates between the two reference lines closest to `v`.
fn height_ratio(references: &[(DVec3, f64)], direction: DVec3, spacing: f64, v: DVec3) -> f64 {
    let mut by_distance: Vec<(f64, f64)> = references
        .iter()
        .map(|&(anchor, ratio)| (distance_to_line(anchor, direction, v), ratio))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
    match by_distance.as_slice() {
        [(d0, r0), (_, r1), ..] => {
            let t = if spacing > 0.0 { (d0 / spacing).clamp(0.0, 1.0) } else { 0.0 };
            r0 + (r1 - r0) * t
        }
        [(_, r0)] => *r0,
        [] => 0.0,
    }
}
