//! Ray and segment intersection against ring edges.

use crate::predicates::{same_point, sign, xz_intersection};
use glam::DVec3;

/// Crossing of a ray with a ring edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Intersection point (height zero).
    pub position: DVec3,
    /// Ring position of the edge start; the edge runs to `edge + 1` (wrapping).
    pub edge: usize,
}

/// All crossings of the infinite line through `start` along `direction`
/// with the edges of `ring`, in edge order.
///
/// An edge counts as crossed when its endpoints fall on different sides of
/// the line, with an endpoint exactly on the line counted as the left side.
pub fn ray_hits(start: DVec3, direction: DVec3, points: &[DVec3], ring: &[usize]) -> Vec<RayHit> {
    let normal = DVec3::new(-direction.z, 0.0, direction.x);
    let n = ring.len();
    let mut hits = Vec::new();
    for i in 0..n {
        let cur = points[ring[i]];
        let next = points[ring[(i + 1) % n]];
        if sign(normal.dot(cur - start)) == sign(normal.dot(next - start)) {
            continue;
        }
        if let Some(position) = xz_intersection(start, direction, cur, next - cur) {
            hits.push(RayHit { position, edge: i });
        }
    }
    hits
}

/// Crossings of the segment `start..end` with the edges of `ring`.
///
/// Vertices coinciding with either segment end are reported directly (as a
/// hit on the edge they start, or the edge they end if only the following
/// vertex matches). Other crossings must lie strictly between the ends.
pub fn ray_hits_in_range(
    start: DVec3,
    end: DVec3,
    points: &[DVec3],
    ring: &[usize],
) -> Vec<RayHit> {
    let direction = end - start;
    let normal = DVec3::new(-direction.z, 0.0, direction.x);
    let n = ring.len();
    let mut hits = Vec::new();
    for i in 0..n {
        let cur = points[ring[i]];
        let next = points[ring[(i + 1) % n]];

        if same_point(cur, start) || same_point(cur, end) {
            hits.push(RayHit {
                position: cur,
                edge: i,
            });
            continue;
        }
        if same_point(next, start) || same_point(next, end) {
            hits.push(RayHit {
                position: next,
                edge: i,
            });
            continue;
        }

        if sign(normal.dot(cur - start)) == sign(normal.dot(next - start)) {
            continue;
        }
        let Some(position) = xz_intersection(start, direction, cur, next - cur) else {
            continue;
        };
        let flat_start = DVec3::new(start.x, 0.0, start.z);
        let flat_end = DVec3::new(end.x, 0.0, end.z);
        if (position - flat_start).dot(position - flat_end) < 0.0 {
            hits.push(RayHit { position, edge: i });
        }
    }
    hits
}
