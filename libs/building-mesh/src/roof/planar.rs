//! Flat and skillion roofs: the outline triangulated once.

use super::{lift, ratio, triangulate_lossy, RoofBuild, RoofContext};
use crate::feature::BuildingHeights;
use crate::roof::RoofKind;
use config::constants::FAR_PROBE_DISTANCE;
use footprint_geometry::Footprint;
use glam::DVec3;

/// Flat roof on the footprint ring at roof-start height.
pub(super) fn flat(footprint: &Footprint, heights: BuildingHeights, feature_id: &str) -> RoofBuild {
    RoofBuild {
        kind: RoofKind::Flat,
        heights,
        points: footprint.points.clone(),
        roof_groups: vec![triangulate_lossy(&footprint.points, &footprint.ring, feature_id)],
        top_triangles: Vec::new(),
        extra_vertices: Vec::new(),
        connection_ring: false,
        roof_base: true,
        extra_rings: 0,
        fallback: None,
    }
}

/// Single tilted plane falling along `direction`.
///
/// Heights are measured from a point far behind the first vertex, so the
/// distance grows with the projection onto `direction` without projecting.
pub(super) fn skillion(footprint: &Footprint, direction: DVec3, context: &RoofContext<'_>) -> RoofBuild {
    let points = &footprint.points;
    let reference = points.first().copied().unwrap_or(DVec3::ZERO) - direction * FAR_PROBE_DISTANCE;
    let distances: Vec<f64> = points.iter().map(|p| reference.distance(*p)).collect();
    let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
    let max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    RoofBuild {
        kind: RoofKind::Skillion,
        heights: context.heights,
        points: points.clone(),
        roof_groups: vec![triangulate_lossy(points, &footprint.ring, context.feature_id)],
        top_triangles: Vec::new(),
        extra_vertices: lift(
            points,
            distances.iter().map(|d| ratio(d - min, max - min)),
            &context.heights,
        ),
        connection_ring: true,
        roof_base: false,
        extra_rings: 0,
        fallback: None,
    }
}
