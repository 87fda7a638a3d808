//! # Triangulation
//!
//! Ear clipping for clockwise rings, plus the two ring rewrites that feed
//! it: bridging holes into the outer ring ([`holes`]) and cutting a ring
//! into sub-polygons along rays ([`cutting`], [`jump`]).
//!
//! ## Pipeline
//!
//! ```text
//! outer + holes ──merge_holes──▶ single ring ──triangulate──▶ triangles
//!                                    │
//!                           insert_cutting_rays
//!                                    │
//!                          JumpDictionary::build ──sub_polygons──▶ rings
//! ```

pub mod cutting;
pub mod holes;
pub mod jump;

pub use cutting::{insert_cutting_rays, CutResult, Node, RaySpec};
pub use holes::{combine_ring_with_hole, merge_holes, MergedRing};
pub use jump::{JumpDictionary, SubPolygons};

use crate::error::{Triangle, TriangulationFailure};
use crate::predicates::{is_convex, point_in_triangle};
use glam::DVec3;

/// Triangulates a clockwise ring by ear clipping.
///
/// Triangles reference `points` (the values of `ring`, not ring positions)
/// and keep the ring's clockwise winding. A ring of `n` vertices yields
/// `n - 2` triangles.
///
/// Vertices sharing an index with a candidate ear's corners never block it,
/// so rings that visit a point twice (hole bridges) are handled.
///
/// # Errors
///
/// Returns a [`TriangulationFailure`] carrying the triangles produced so far
/// when a full scan finds no ear, or when the ring has fewer than 3 vertices.
///
/// # Example
///
/// ```rust
/// use footprint_geometry::triangulate::triangulate;
/// use glam::DVec3;
///
/// let points = vec![
///     DVec3::new(0.0, 0.0, 10.0),
///     DVec3::new(10.0, 0.0, 10.0),
///     DVec3::new(10.0, 0.0, 0.0),
///     DVec3::new(0.0, 0.0, 0.0),
/// ];
/// let triangles = triangulate(&points, &[0, 1, 2, 3]).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate(points: &[DVec3], ring: &[usize]) -> Result<Vec<Triangle>, TriangulationFailure> {
    if ring.len() < 3 {
        return Err(TriangulationFailure {
            partial: Vec::new(),
            remaining: ring.len(),
        });
    }

    let mut remaining: Vec<usize> = ring.to_vec();
    let mut triangles = Vec::with_capacity(ring.len() - 2);

    while remaining.len() > 3 {
        match find_ear(points, &remaining) {
            Some(position) => {
                let len = remaining.len();
                triangles.push([
                    remaining[(position + len - 1) % len],
                    remaining[position],
                    remaining[(position + 1) % len],
                ]);
                remaining.remove(position);
            }
            None => {
                return Err(TriangulationFailure {
                    partial: triangles,
                    remaining: remaining.len(),
                });
            }
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    Ok(triangles)
}

/// First position whose corner is convex and whose triangle contains no
/// other vertex of the ring.
fn find_ear(points: &[DVec3], remaining: &[usize]) -> Option<usize> {
    let len = remaining.len();
    (0..len).find(|&i| {
        let a = remaining[(i + len - 1) % len];
        let b = remaining[i];
        let c = remaining[(i + 1) % len];
        let (prev, p, next) = (points[a], points[b], points[c]);

        if !is_convex(prev - p, next - p) {
            return false;
        }

        !(0..len - 3)
            .map(|j| remaining[(i + 2 + j) % len])
            .filter(|&other| other != a && other != b && other != c)
            .any(|other| point_in_triangle(points[other], prev, p, next))
    })
}

#[cfg(test)]
mod tests;
