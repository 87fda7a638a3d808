use super::*;
use crate::error::Triangle;
use crate::footprint::Footprint;
use crate::polygon::polygon_area;
use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn p(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

fn covered_area(points: &[DVec3], triangles: &[Triangle]) -> f64 {
    triangles
        .iter()
        .map(|t| polygon_area(points, &t[..]))
        .sum()
}

fn square(size: f64) -> Vec<DVec3> {
    vec![p(0.0, size), p(size, size), p(size, 0.0), p(0.0, 0.0)]
}

// =============================================================================
// EAR CLIPPING
// =============================================================================

#[test]
fn test_square_yields_two_triangles() {
    let points = square(10.0);
    let triangles = triangulate(&points, &identity(4)).unwrap();
    assert_eq!(triangles.len(), 2);
    assert_relative_eq!(covered_area(&points, &triangles), 100.0);
}

#[test]
fn test_concave_ring_yields_n_minus_two_triangles() {
    let points = vec![
        p(0.0, 10.0),
        p(5.0, 10.0),
        p(5.0, 5.0),
        p(10.0, 5.0),
        p(10.0, 0.0),
        p(0.0, 0.0),
    ];
    let triangles = triangulate(&points, &identity(6)).unwrap();
    assert_eq!(triangles.len(), 4);
    assert_relative_eq!(covered_area(&points, &triangles), 75.0, epsilon = 1e-9);
}

#[test]
fn test_counter_clockwise_ring_stalls_with_partial_result() {
    let points = square(10.0);
    let failure = triangulate(&points, &[3, 2, 1, 0]).unwrap_err();
    assert_eq!(failure.remaining, 4);
    assert!(failure.partial.is_empty());
}

#[test]
fn test_short_ring_is_rejected() {
    let failure = triangulate(&square(1.0), &[0, 1]).unwrap_err();
    assert_eq!(failure.remaining, 2);
}

// =============================================================================
// HOLES
// =============================================================================

#[test]
fn test_square_with_hole_bridges_and_triangulates() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let hole = vec![p(3.0, 3.0), p(7.0, 3.0), p(7.0, 7.0), p(3.0, 7.0)];
    let footprint = Footprint::from_rings(square(10.0), vec![hole], &mut rng).unwrap();

    assert_eq!(footprint.loop_sizes, vec![4, 4]);
    assert_eq!(footprint.ring, vec![0, 1, 2, 5, 6, 7, 4, 5, 2, 3]);

    let triangles = footprint.triangulate().unwrap();
    assert_eq!(triangles.len(), 8);
    assert_relative_eq!(covered_area(&footprint.points, &triangles), 84.0, epsilon = 1e-9);
    assert_relative_eq!(footprint.area(), 84.0);
}

#[test]
fn test_unbridgeable_hole_is_dropped() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let outside = vec![p(20.0, 3.0), p(24.0, 3.0), p(24.0, 7.0), p(20.0, 7.0)];
    let footprint = Footprint::from_rings(square(10.0), vec![outside], &mut rng).unwrap();

    assert_eq!(footprint.dropped_holes, vec![0]);
    assert_eq!(footprint.loop_sizes, vec![4]);
    assert_eq!(footprint.ring, identity(4));
}

#[test]
fn test_holes_merge_rightmost_first() {
    let left = vec![p(1.0, 4.5), p(3.0, 4.5), p(3.0, 5.5), p(1.0, 5.5)];
    let right = vec![p(6.0, 4.0), p(8.0, 4.0), p(8.0, 6.0), p(6.0, 6.0)];
    let merged = merge_holes(square(10.0), &[left.clone(), right.clone()]);

    assert!(merged.dropped.is_empty());
    assert_eq!(merged.loop_sizes, vec![4, 4, 4]);
    assert_eq!(&merged.points[4..8], &right[..]);
    assert_eq!(&merged.points[8..12], &left[..]);
    // the left hole bridges onto the right hole, not past it
    assert!(merged.ring.windows(2).any(|w| w == [9, 4]));
    assert_eq!(merged.ring.len(), 4 + 2 * 6);

    let triangles = triangulate(&merged.points, &merged.ring).unwrap();
    assert_relative_eq!(covered_area(&merged.points, &triangles), 94.0, epsilon = 1e-9);
}

// =============================================================================
// CUTTING AND SUB-POLYGONS
// =============================================================================

/// ```text
/// 0---1---2---3
/// |   |   |   |
/// 7---6---5---4
/// ```
#[test]
fn test_strip_splits_into_three_loops() {
    let points = vec![
        p(0.0, 3.0),
        p(1.0, 3.0),
        p(2.0, 3.0),
        p(3.0, 3.0),
        p(3.0, 0.0),
        p(2.0, 0.0),
        p(1.0, 0.0),
        p(0.0, 0.0),
    ];
    let ring = identity(8);
    let cut = CutResult {
        hits: vec![Node::Ring(1), Node::Ring(6), Node::Ring(2), Node::Ring(5)],
        branch_points: Vec::new(),
    };

    let mut polygons = JumpDictionary::build(&points, &ring, &cut).unwrap().sub_polygons();
    let loops: Vec<Vec<usize>> = polygons.by_ref().collect::<Result<_, _>>().unwrap();

    assert_eq!(loops, vec![vec![0, 1, 6, 7], vec![1, 2, 5, 6], vec![2, 3, 4, 5]]);
    assert!(polygons.remaining().is_empty());
}

#[test]
fn test_odd_hit_count_is_a_topology_error() {
    let cut = CutResult {
        hits: vec![Node::Ring(0)],
        branch_points: Vec::new(),
    };
    let err = JumpDictionary::build(&square(1.0), &identity(4), &cut).unwrap_err();
    assert!(matches!(err, crate::GeometryError::SubPolygonTopology { .. }));
}

/// ```text
/// 0--------1
/// | \    / |
/// |  S--E  |
/// | /    \ |
/// 3--------2
/// ```
#[test]
fn test_hipped_rectangle_splits_into_four_faces() {
    let mut points = vec![p(0.0, 4.0), p(10.0, 4.0), p(10.0, 0.0), p(0.0, 0.0)];
    let mut ring = identity(4);

    let mut rays = RaySpec::new();
    let s = rays.add_branch(p(3.0, 2.0));
    let e = rays.add_branch(p(7.0, 2.0));
    rays.add_rays(s, [e, Node::Ring(3), Node::Ring(0)]);
    rays.add_rays(e, [Node::Ring(1), Node::Ring(2)]);

    let cut = insert_cutting_rays(&mut points, &mut ring, &rays).unwrap();
    assert_eq!(ring, identity(4));
    assert_eq!(cut.branch_points, vec![4, 5]);

    let mut polygons = JumpDictionary::build(&points, &ring, &cut).unwrap().sub_polygons();
    let loops: Vec<Vec<usize>> = polygons.by_ref().collect::<Result<_, _>>().unwrap();

    assert_eq!(
        loops,
        vec![vec![0, 4, 3], vec![0, 1, 5, 4], vec![1, 2, 5], vec![2, 3, 4, 5]]
    );
    assert!(polygons.remaining().is_empty());

    let area: f64 = loops
        .iter()
        .map(|face| covered_area(&points, &triangulate(&points, face).unwrap()))
        .sum();
    assert_relative_eq!(area, 40.0, epsilon = 1e-9);
}

#[test]
fn test_crossing_is_spliced_into_ring() {
    let mut points = vec![p(0.0, 4.0), p(10.0, 4.0), p(10.0, 0.0), p(0.0, 0.0)];
    let mut ring = identity(4);

    let mut spec = RaySpec::new();
    let inside = spec.add_branch(p(5.0, 2.0));
    let outside = spec.add_branch(p(5.0, 6.0));
    spec.add_rays(inside, [outside]);

    let cut = insert_cutting_rays(&mut points, &mut ring, &spec).unwrap();
    assert_eq!(ring, vec![0, 4, 1, 2, 3]);
    assert_relative_eq!(points[4].x, 5.0);
    assert_relative_eq!(points[4].z, 4.0);
    assert_eq!(cut.branch_points, vec![5, 6]);
    assert_eq!(cut.hits, vec![inside, Node::Ring(1), outside]);
}

#[test]
fn test_ray_spec_edits() {
    let mut spec = RaySpec::new();
    let a = spec.add_branch(p(0.0, 0.0));
    spec.add_rays(a, [Node::Ring(1), Node::Ring(2)]);
    spec.add_rays(a, [Node::Ring(3)]);
    assert!(spec.remove_ray(a, Node::Ring(2)));
    assert!(!spec.remove_ray(a, Node::Ring(7)));
    assert_eq!(
        spec.rays().collect::<Vec<_>>(),
        vec![(a, Node::Ring(1)), (a, Node::Ring(3))]
    );
}

#[test]
fn test_unknown_node_is_rejected() {
    let mut points = square(4.0);
    let mut ring = identity(4);
    let mut spec = RaySpec::new();
    spec.add_rays(Node::Branch(3), [Node::Ring(0)]);
    assert!(insert_cutting_rays(&mut points, &mut ring, &spec).is_err());
}
