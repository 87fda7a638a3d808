//! Ray cuts through a ring.
//!
//! A [`RaySpec`] names rays between ring vertices and free-standing branch
//! points (roof ridge ends, layer anchors). [`insert_cutting_rays`] splices
//! every boundary crossing into the ring and reports the cut as a flat list
//! of node pairs for [`JumpDictionary`](super::JumpDictionary).

use crate::error::{GeometryError, GeometryResult};
use crate::polygon::{ray_hits_in_range, RayHit};
use crate::predicates::{clockwise_metric, flat_normalize, same_point};
use glam::DVec3;

/// Endpoint of a cutting ray.
///
/// `Ring` refers to a ring position, `Branch` to a point registered with
/// [`RaySpec::add_branch`]. Ring nodes order before branch nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// Position in the ring.
    Ring(usize),
    /// Branch point id.
    Branch(usize),
}

/// Rays to cut a ring along, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaySpec {
    branches: Vec<DVec3>,
    rays: Vec<(Node, Vec<Node>)>,
}

impl RaySpec {
    /// Creates an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a point that is not on the ring and returns its node.
    pub fn add_branch(&mut self, position: DVec3) -> Node {
        self.branches.push(position);
        Node::Branch(self.branches.len() - 1)
    }

    /// Adds rays from `from` to every node in `to`, after any rays already
    /// starting at `from`.
    pub fn add_rays(&mut self, from: Node, to: impl IntoIterator<Item = Node>) {
        match self.rays.iter_mut().find(|(start, _)| *start == from) {
            Some((_, targets)) => targets.extend(to),
            None => self.rays.push((from, to.into_iter().collect())),
        }
    }

    /// Removes the first ray from `from` to `to`. Returns whether one existed.
    pub fn remove_ray(&mut self, from: Node, to: Node) -> bool {
        let Some((_, targets)) = self.rays.iter_mut().find(|(start, _)| *start == from) else {
            return false;
        };
        match targets.iter().position(|&t| t == to) {
            Some(position) => {
                targets.remove(position);
                true
            }
            None => false,
        }
    }

    /// Branch point positions by id.
    pub fn branches(&self) -> &[DVec3] {
        &self.branches
    }

    /// Every ray as `(from, to)`, in insertion order.
    pub fn rays(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.rays
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |&to| (*from, to)))
    }
}

/// Outcome of [`insert_cutting_rays`].
#[derive(Debug, Clone, PartialEq)]
pub struct CutResult {
    /// Consecutive pairs `(hits[2k], hits[2k + 1])` are the cut segments.
    /// Ring nodes refer to positions in the updated ring.
    pub hits: Vec<Node>,
    /// Point index of each branch, by branch id.
    pub branch_points: Vec<usize>,
}

struct PendingHit {
    hit: RayHit,
    ray: usize,
    slot: usize,
}

/// Splices every crossing of the rays in `spec` into `ring`.
///
/// New crossing points are appended to `points`; crossings on existing
/// vertices reuse them. Branch points are appended last, in id order.
///
/// # Errors
///
/// [`GeometryError::SubPolygonTopology`] if a ray names a node that does not
/// exist, or a ray ending on the ring never reaches it.
pub fn insert_cutting_rays(
    points: &mut Vec<DVec3>,
    ring: &mut Vec<usize>,
    spec: &RaySpec,
) -> GeometryResult<CutResult> {
    let position_of = |node: Node, points: &[DVec3], ring: &[usize]| -> GeometryResult<DVec3> {
        match node {
            Node::Ring(position) => ring
                .get(position)
                .map(|&index| points[index])
                .ok_or_else(|| GeometryError::topology(format!("ring position {position} out of range"))),
            Node::Branch(id) => spec
                .branches
                .get(id)
                .copied()
                .ok_or_else(|| GeometryError::topology(format!("unknown branch point {id}"))),
        }
    };

    let rays: Vec<(Node, Node)> = spec.rays().collect();
    let mut per_ray: Vec<Vec<Node>> = Vec::with_capacity(rays.len());
    let mut pending = Vec::new();

    for (ray, &(from, to)) in rays.iter().enumerate() {
        let start = position_of(from, points.as_slice(), ring.as_slice())?;
        let end = position_of(to, points.as_slice(), ring.as_slice())?;

        let mut hits = ray_hits_in_range(start, end, points, ring);
        order_along_ray(&mut hits, start, points, ring);

        if !matches!(to, Node::Branch(_)) {
            let last = *hits.last().ok_or_else(|| {
                GeometryError::topology(format!("ray {from:?} -> {to:?} never reaches its end"))
            })?;
            hits.retain(|hit| !same_point(hit.position, last.position));
            hits.push(last);
        }

        per_ray.push(vec![Node::Ring(0); hits.len()]);
        pending.extend(hits.into_iter().enumerate().map(|(slot, hit)| PendingHit { hit, ray, slot }));
    }

    // splice in ring order so earlier insertions only shift later ones
    pending.sort_by(|a, b| {
        a.hit.edge.cmp(&b.hit.edge).then_with(|| {
            let da = a.hit.position.distance(points[ring[a.hit.edge]]);
            let db = b.hit.position.distance(points[ring[b.hit.edge]]);
            da.total_cmp(&db)
        })
    });

    let insertion_start = points.len();
    let mut inserted = 0;
    for pending_hit in &pending {
        let (position, is_new) = insert_hit_vertex(
            points,
            ring,
            pending_hit.hit.position,
            pending_hit.hit.edge + inserted,
            insertion_start,
        );
        if is_new {
            inserted += 1;
        }
        per_ray[pending_hit.ray][pending_hit.slot] = Node::Ring(position);
    }

    let branch_points: Vec<usize> = spec
        .branches
        .iter()
        .map(|&branch| {
            points.push(branch);
            points.len() - 1
        })
        .collect();

    let mut hits = Vec::new();
    for ((from, to), nodes) in rays.into_iter().zip(per_ray) {
        if matches!(from, Node::Branch(_)) {
            hits.push(from);
        }
        hits.extend(nodes);
        if matches!(to, Node::Branch(_)) {
            hits.push(to);
        }
    }

    Ok(CutResult { hits, branch_points })
}

/// Sorts hits by distance from `start`; coincident hits are ordered by the
/// clockwise angle from the ray's back direction to their edge, and a hit
/// entering a vertex comes before one leaving it.
fn order_along_ray(hits: &mut [RayHit], start: DVec3, points: &[DVec3], ring: &[usize]) {
    hits.sort_by(|a, b| start.distance(a.position).total_cmp(&start.distance(b.position)));

    let n = ring.len();
    let tie_key = |hit: &RayHit| {
        let edge_start = points[ring[hit.edge]];
        let on_edge_start = same_point(hit.position, edge_start);
        let other = if on_edge_start {
            points[ring[(hit.edge + 1) % n]]
        } else {
            edge_start
        };
        let to_start = flat_normalize(start - hit.position);
        let to_other = flat_normalize(other - hit.position);
        (clockwise_metric(to_start, to_other), on_edge_start)
    };

    let mut run_start = 0;
    while run_start < hits.len() {
        let anchor = hits[run_start].position;
        let run_end = hits[run_start..]
            .iter()
            .position(|hit| !same_point(hit.position, anchor))
            .map_or(hits.len(), |offset| run_start + offset);
        if run_end - run_start > 1 {
            hits[run_start..run_end].sort_by(|a, b| {
                let (metric_a, flag_a) = tie_key(a);
                let (metric_b, flag_b) = tie_key(b);
                metric_a.total_cmp(&metric_b).then(flag_a.cmp(&flag_b))
            });
        }
        run_start = run_end;
    }
}

/// Puts a crossing into the ring after position `old`.
///
/// Returns the crossing's ring position and whether the ring grew.
fn insert_hit_vertex(
    points: &mut Vec<DVec3>,
    ring: &mut Vec<usize>,
    position: DVec3,
    old: usize,
    insertion_start: usize,
) -> (usize, bool) {
    if same_point(position, points[ring[old]]) {
        return (old, false);
    }
    let following = (old + 1) % ring.len();
    if same_point(position, points[ring[following]]) {
        return (following, false);
    }

    let at = old + 1;
    let index = match (insertion_start..points.len()).find(|&i| same_point(points[i], position)) {
        Some(existing) => existing,
        None => {
            points.push(position);
            points.len() - 1
        }
    };
    ring.insert(at, index);
    (at, true)
}
