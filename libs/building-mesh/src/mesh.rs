//! # Mesh Buffers
//!
//! Output buffers for the renderer: positions relative to the building
//! origin, triangle indices, UVs and per-vertex colours.

use crate::color::Rgba;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Where the parts of a facade mesh live in its buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeLayout {
    /// Stacked vertex rings (skirt, base, roof start, connection).
    pub ring_count: usize,
    /// Vertices per ring.
    pub ring_len: usize,
    /// First seam vertex; seam copies follow the rings.
    pub seam_start: usize,
    /// Wall quads as triangles, first in the triangle buffer.
    pub wall_triangles: usize,
    /// Roof by-products on the top ring (gable ends), after the walls.
    pub top_triangles: usize,
    /// Downward-facing floor, last in the triangle buffer.
    pub bottom_triangles: usize,
}

/// Wall mesh of one building.
///
/// UVs are `(u, v, window layer, door layer)`: `u` counts windows along the
/// wall, `v` counts levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacadeMesh {
    pub positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<[f32; 4]>,
    pub colors: Vec<Rgba>,
    pub layout: FacadeLayout,
}

impl FacadeMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Wall triangles.
    pub fn walls(&self) -> &[[u32; 3]] {
        &self.triangles[..self.layout.wall_triangles]
    }

    /// Top ring triangles.
    pub fn tops(&self) -> &[[u32; 3]] {
        let start = self.layout.wall_triangles;
        &self.triangles[start..start + self.layout.top_triangles]
    }

    /// Floor triangles.
    pub fn bottoms(&self) -> &[[u32; 3]] {
        &self.triangles[self.triangles.len() - self.layout.bottom_triangles..]
    }

    /// Computes the axis-aligned bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        bounding_box(&self.positions)
    }
}

/// Roof mesh of one building.
///
/// Vertices are not shared between triangles, so every triangle keeps its
/// own UV frame. UVs are `(u, v, is_flat)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoofMesh {
    pub positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<[f32; 3]>,
    pub colors: Vec<Rgba>,
}

impl RoofMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unit normal of a triangle; up for clockwise footprint triangles.
    pub fn face_normal(&self, triangle: usize) -> DVec3 {
        let [a, b, c] = self.triangles[triangle].map(|i| self.positions[i as usize]);
        face_normal(a, b, c)
    }

    /// Computes the axis-aligned bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        bounding_box(&self.positions)
    }
}

/// Unit normal `(b - a) × (c - a)`, zero for degenerate triangles.
pub fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Area of a triangle projected onto the XZ plane.
pub fn flat_triangle_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    ((b.x - a.x) * (c.z - a.z) - (c.x - a.x) * (b.z - a.z)).abs() * 0.5
}

fn bounding_box(positions: &[DVec3]) -> (DVec3, DVec3) {
    let Some((first, rest)) = positions.split_first() else {
        return (DVec3::ZERO, DVec3::ZERO);
    };
    rest.iter()
        .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
}
