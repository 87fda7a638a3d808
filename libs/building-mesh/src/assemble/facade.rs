//! Wall mesh: stacked rings, seam copies, top and bottom caps.

use crate::color::Rgba;
use crate::facade::FacadePattern;
use crate::mesh::{FacadeLayout, FacadeMesh};
use crate::roof::RoofBuild;
use crate::textures::LayerAssignment;
use footprint_geometry::{Footprint, Triangle};
use glam::DVec3;

/// Facade colour when the feature has none.
const DEFAULT_FACADE_COLOR: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Everything the wall mesh is built from.
#[derive(Debug, Clone, Copy)]
pub struct FacadeInput<'a> {
    pub footprint: &'a Footprint,
    pub roof: &'a RoofBuild,
    /// Floor triangulation of the footprint.
    pub bottom_triangles: &'a [Triangle],
    /// Building origin; subtracted from every position.
    pub origin: DVec3,
    pub height_multiplier: f64,
    /// Depth of the below-ground ring for ground-level parts.
    pub skirt_depth: Option<f64>,
    pub pattern: &'a FacadePattern,
    pub layers: LayerAssignment,
    /// Facade levels (window rows).
    pub levels: i64,
    /// Parsed `color` property.
    pub color: Option<Rgba>,
}

/// Builds the wall mesh.
///
/// Rings hold one vertex per footprint point, except the connection ring,
/// which holds one per roof point so gable triangles can reach the cut
/// points. Every loop gets a seam copy of its first vertex per ring, so `u`
/// runs from the loop start to its end without wrapping.
///
/// Triangles are laid out as walls, then top triangles, then the floor
/// (reversed, facing down).
pub fn assemble_facade(input: &FacadeInput<'_>) -> FacadeMesh {
    let FacadeInput {
        footprint,
        roof,
        origin,
        height_multiplier: hm,
        ..
    } = *input;
    let heights = &roof.heights;
    let points = &footprint.points;
    let n = points.len();
    let loop_count = footprint.loop_sizes.len();

    // ===== RINGS =====
    let skirt = input.skirt_depth.filter(|_| heights.is_ground_level);
    let base_y = heights.min_height * hm;
    let mut ring_heights = Vec::with_capacity(3);
    if let Some(depth) = skirt {
        ring_heights.push(base_y - depth);
    }
    ring_heights.push(base_y);
    ring_heights.push(heights.roof_start_height * hm);

    let relative = |p: DVec3, y: f64| DVec3::new(p.x - origin.x, y, p.z - origin.z);
    let mut positions: Vec<DVec3> = Vec::new();
    let mut ring_starts = Vec::with_capacity(4);
    for &y in &ring_heights {
        ring_starts.push(positions.len());
        positions.extend(points.iter().map(|&p| relative(p, y)));
    }
    if roof.connection_ring {
        ring_starts.push(positions.len());
        positions.extend(roof.extra_vertices.iter().map(|&v| relative(v, v.y * hm)));
    }
    let ring_count = ring_starts.len();

    // one seam copy per ring per loop
    let seam_start = positions.len();
    for &start in &ring_starts {
        for range in footprint.loops() {
            positions.push(positions[start + range.start]);
        }
    }
    let seam = |ring: usize, loop_index: usize| seam_start + ring * loop_count + loop_index;

    // ===== TRIANGLES =====
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    for ring in 0..ring_count - 1 {
        let (lower, upper) = (ring_starts[ring], ring_starts[ring + 1]);
        for (loop_index, range) in footprint.loops().enumerate() {
            for x in range.clone() {
                let last = x + 1 == range.end;
                let a = lower + x;
                let above = upper + x;
                let next = if last { seam(ring, loop_index) } else { a + 1 };
                let next_above = if last { seam(ring + 1, loop_index) } else { above + 1 };

                // Two triangles per quad
                triangles.push([a as u32, next as u32, above as u32]);
                triangles.push([next as u32, next_above as u32, above as u32]);
            }
        }
    }
    let wall_triangles = triangles.len();

    let top_start = ring_starts[ring_count - 1];
    triangles.extend(
        roof.top_triangles
            .iter()
            .map(|t| t.map(|i| (top_start + i) as u32)),
    );
    let top_triangles = triangles.len() - wall_triangles;

    // floor on the lowest ring, facing down
    triangles.extend(
        input
            .bottom_triangles
            .iter()
            .rev()
            .map(|&[a, b, c]| [c as u32, b as u32, a as u32]),
    );
    let bottom_triangles = input.bottom_triangles.len();

    // ===== UVS =====
    let pattern = input.pattern;
    let is_church = pattern.rule.is_church;
    let levels = if is_church { 1.0 } else { input.levels as f32 };
    let window = input.layers.window_channel(is_church) as f32;
    let door = input.layers.door_channel() as f32;

    let total = positions.len();
    let half = total.div_ceil(2);
    let mut uvs: Vec<[f32; 4]> = (0..total)
        .map(|i| [0.0, if i < half { 0.0 } else { levels }, window, door])
        .collect();

    let rows: Vec<f32> = skirt
        .map(|_| -1.0)
        .into_iter()
        .chain([0.0, levels, levels])
        .take(ring_count)
        .collect();

    let window_span = pattern.window_width * pattern.layout.width_factor();
    let mut walking_u = 0.0f64;
    for (loop_index, range) in footprint.loops().enumerate() {
        for x in range.clone() {
            for (ring, &v) in rows.iter().enumerate() {
                uvs[ring_starts[ring] + x][0] = walking_u as f32;
                uvs[ring_starts[ring] + x][1] = v;
            }
            let following = if x + 1 == range.end { range.start } else { x + 1 };
            let width = points[x].distance(points[following]);
            if pattern.rule.has_windows && window_span > 0.0 && width > window_span {
                walking_u += (width / window_span).floor();
            }
        }
        for (ring, &v) in rows.iter().enumerate() {
            uvs[seam(ring, loop_index)][0] = walking_u as f32;
            uvs[seam(ring, loop_index)][1] = v;
        }
    }

    // ===== COLOURS =====
    let mut color = input.color.unwrap_or(DEFAULT_FACADE_COLOR);
    color[3] = if heights.is_ground_level { 1.0 } else { 0.0 };
    let colors = vec![color; total];

    FacadeMesh {
        positions,
        triangles,
        uvs,
        colors,
        layout: FacadeLayout {
            ring_count,
            ring_len: n,
            seam_start,
            wall_triangles,
            top_triangles,
            bottom_triangles,
        },
    }
}
