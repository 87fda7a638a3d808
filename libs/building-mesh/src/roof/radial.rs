//! Radial roofs: pyramidal, dome and onion.
//!
//! Copies of the footprint ring shrink towards the centre as they rise,
//! like the rings of a lathe; the last ring is closed by a fan to a single
//! apex at the total height.

use super::{RoofBuild, RoofKind};
use crate::feature::BuildingHeights;
use footprint_geometry::Footprint;
use glam::DVec3;
use std::f64::consts::{FRAC_PI_2, PI};

const DOME_LEVELS: usize = 6;
const ONION_LEVELS: usize = 12;

/// `(scale towards the centre, height drop ratio)` of every intermediate
/// ring, bottom to top.
fn ring_profile(kind: &RoofKind) -> Vec<(f64, f64)> {
    match kind {
        RoofKind::Dome => (1..DOME_LEVELS)
            .map(|level| {
                let angle = level as f64 / DOME_LEVELS as f64 * FRAC_PI_2;
                (angle.cos(), 1.0 - angle.sin())
            })
            .collect(),
        RoofKind::Onion => (0..ONION_LEVELS)
            .map(|level| {
                let x = 1.0 - level as f64 / ONION_LEVELS as f64;
                let bulge = (x * 2.0 * PI / 3.0).sin();
                (x + (bulge - x) * x, x)
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub(super) fn build(footprint: &Footprint, kind: &RoofKind, heights: BuildingHeights) -> RoofBuild {
    let points = &footprint.points;
    let n = points.len();
    let center = footprint.center();
    let roof_height = heights.roof_height();

    let profile = ring_profile(kind);
    let mut extra_vertices = Vec::with_capacity(profile.len() * n + 1);
    for &(scale, drop) in &profile {
        extra_vertices.extend(points.iter().map(|&p| {
            let shrunk = center + (p - center) * scale;
            DVec3::new(shrunk.x, heights.total_height - drop * roof_height, shrunk.z)
        }));
    }
    extra_vertices.push(DVec3::new(center.x, heights.total_height, center.z));

    // the base ring comes first, so the top ring sits `profile.len()` rings up
    let top = profile.len() * n;
    let apex = top + n;
    let ring = &footprint.ring;
    let fan = (0..ring.len())
        .map(|i| [top + ring[i], top + ring[(i + 1) % ring.len()], apex])
        .collect();

    RoofBuild {
        kind: kind.clone(),
        heights,
        points: points.clone(),
        roof_groups: vec![fan],
        top_triangles: Vec::new(),
        extra_vertices,
        connection_ring: false,
        roof_base: true,
        extra_rings: profile.len(),
        fallback: None,
    }
}
