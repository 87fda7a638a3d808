//! Roof mesh: unindexed triangles with per-face UV frames.

use crate::color::Rgba;
use crate::mesh::{face_normal, RoofMesh};
use crate::rng::BuildRng;
use crate::roof::RoofBuild;
use config::constants::{FAR_PROBE_DISTANCE, NORMAL_GROUPING_DOT, ROOF_UV_SCALE};
use footprint_geometry::predicates::{distance_to_line, flat};
use footprint_geometry::Footprint;
use glam::DVec3;
use rand::Rng;
use std::f64::consts::PI;

/// Roof colour when the feature has none.
const DEFAULT_ROOF_COLOR: Rgba = [1.0, 1.0, 1.0, 0.0];

/// Everything the roof mesh is built from.
#[derive(Debug, Clone, Copy)]
pub struct RoofInput<'a> {
    pub footprint: &'a Footprint,
    pub roof: &'a RoofBuild,
    /// Building origin; subtracted from every position.
    pub origin: DVec3,
    pub height_multiplier: f64,
    /// Parsed `roofColor` property.
    pub color: Option<Rgba>,
}

/// Builds the roof mesh.
///
/// Flat roofs get a top-down projection turned by a random angle so
/// neighbouring roofs do not line up. Sloped faces are grouped by their
/// horizontal normal; each group measures its UVs from its highest, most
/// central vertex, which maps to `(0.5, 1)`.
pub fn assemble_roof(input: &RoofInput<'_>, rng: &mut BuildRng) -> RoofMesh {
    let RoofInput {
        footprint,
        roof,
        origin,
        height_multiplier: hm,
        ..
    } = *input;

    // base ring first, then the lifted vertices
    let relative = |p: DVec3, y: f64| DVec3::new(p.x - origin.x, y, p.z - origin.z);
    let mut indexed: Vec<DVec3> = Vec::with_capacity(roof.vertex_count());
    if roof.roof_base {
        let y = roof.heights.roof_start_height * hm;
        indexed.extend(roof.points.iter().map(|&p| relative(p, y)));
    }
    indexed.extend(roof.extra_vertices.iter().map(|&v| relative(v, v.y * hm)));

    let mut corners: Vec<usize> = Vec::new();
    if roof.roof_base {
        let n = roof.points.len();
        for ring in 0..roof.extra_rings {
            let (lower, upper) = (ring * n, (ring + 1) * n);
            for range in footprint.loops() {
                for x in range.clone() {
                    let next = if x + 1 == range.end { range.start } else { x + 1 };
                    corners.extend([lower + x, lower + next, upper + x]);
                    corners.extend([lower + next, upper + next, upper + x]);
                }
            }
        }
    }
    corners.extend(roof.roof_groups.iter().flatten().flatten().copied());

    let positions: Vec<DVec3> = corners.iter().map(|&i| indexed[i]).collect();
    let triangles: Vec<[u32; 3]> = (0..positions.len() as u32 / 3)
        .map(|k| [3 * k, 3 * k + 1, 3 * k + 2])
        .collect();

    let scale = ROOF_UV_SCALE * hm;
    let uvs = if roof.is_flat() {
        flat_uvs(&positions, scale, rng)
    } else {
        sloped_uvs(&positions, scale)
    };

    let color = input.color.unwrap_or(DEFAULT_ROOF_COLOR);
    RoofMesh {
        colors: vec![color; positions.len()],
        positions,
        triangles,
        uvs,
    }
}

fn flat_uvs(positions: &[DVec3], scale: f64, rng: &mut BuildRng) -> Vec<[f32; 3]> {
    let angle = f64::from(rng.0.gen_range(-180i32..180)) * PI / 360.0;
    let (sin, cos) = angle.sin_cos();
    positions
        .iter()
        .map(|p| {
            let (x, z) = (p.x * scale, p.z * scale);
            [(x * cos - z * sin) as f32, (x * sin + z * cos) as f32, 1.0]
        })
        .collect()
}

/// Horizontal part of a face normal; straight up for level faces.
fn projected_normal(normal: DVec3) -> DVec3 {
    let projected = flat(normal).normalize_or_zero();
    if projected == DVec3::ZERO {
        DVec3::Y
    } else {
        projected
    }
}

/// `(right, forward)` texture axes of a face with projected normal `n`.
fn uv_frame(n: DVec3) -> (DVec3, DVec3) {
    if n == DVec3::Y {
        (DVec3::Z, DVec3::NEG_X)
    } else {
        (DVec3::new(n.z, 0.0, -n.x), n)
    }
}

fn sloped_uvs(positions: &[DVec3], scale: f64) -> Vec<[f32; 3]> {
    let normals: Vec<DVec3> = positions
        .chunks_exact(3)
        .flat_map(|t| {
            let n = projected_normal(face_normal(t[0], t[1], t[2]));
            [n; 3]
        })
        .collect();

    // group vertices by similar normal, first key wins
    let mut groups: Vec<(DVec3, Vec<usize>)> = Vec::new();
    for (i, &n) in normals.iter().enumerate() {
        match groups.iter().position(|(key, _)| n.dot(*key) > NORMAL_GROUPING_DOT) {
            Some(group) => groups[group].1.push(i),
            None => groups.push((n, vec![i])),
        }
    }

    let mut uvs = vec![[0.0f32; 3]; positions.len()];
    for (key, members) in &groups {
        let Some(&first) = members.first() else {
            continue;
        };
        // far out behind the face and high up, so the closest vertex is
        // the top-most centred one
        let probe = positions[first] - *key * FAR_PROBE_DISTANCE + DVec3::Y * FAR_PROBE_DISTANCE;
        let axis = key.cross(DVec3::Y);
        let anchor = members
            .iter()
            .copied()
            .min_by(|&a, &b| {
                distance_to_line(probe, axis, positions[a])
                    .total_cmp(&distance_to_line(probe, axis, positions[b]))
            })
            .unwrap_or(first);

        for &i in members {
            let diff = positions[i] - positions[anchor];
            let (right, forward) = uv_frame(normals[i]);
            let along = diff.dot(forward);
            uvs[i] = [
                (0.5 + diff.dot(right) * scale) as f32,
                (1.0 + (along * along + diff.y * diff.y).sqrt() * scale) as f32,
                0.0,
            ];
        }
    }
    uvs
}
