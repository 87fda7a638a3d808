use super::*;
use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn p(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// Clockwise 10x10 square seen from above.
fn square() -> Vec<DVec3> {
    vec![p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0), p(0.0, 0.0)]
}

fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

#[test]
fn test_winding_flips_under_reversal() {
    let points = square();
    let ring = identity(4);
    let mut reversed = ring.clone();
    reversed.reverse();

    assert!(is_clockwise(&points, &ring, &mut rng()).unwrap());
    assert!(!is_clockwise(&points, &reversed, &mut rng()).unwrap());
}

#[test]
fn test_winding_retries_when_probe_grazes_vertex() {
    // the apex sits exactly on the first probe column
    let points = vec![p(0.0, 0.0), p(5.0, 8.0), p(10.0, 0.0)];
    let ring = identity(3);
    assert!(is_clockwise(&points, &ring, &mut rng()).unwrap());
    assert!(!is_clockwise(&points, &[2, 1, 0], &mut rng()).unwrap());
}

#[test]
fn test_winding_rejects_degenerate_rings() {
    let vertical = vec![p(0.0, 0.0), p(0.0, 5.0), p(0.0, 9.0)];
    assert_eq!(
        is_clockwise(&vertical, &identity(3), &mut rng()),
        Err(GeometryError::DegenerateRing { len: 3 })
    );
    assert!(is_clockwise(&square(), &[0, 1], &mut rng()).is_err());
}

#[test]
fn test_area_of_square_and_triangle() {
    assert_relative_eq!(polygon_area(&square(), &identity(4)), 100.0);
    let tri = vec![p(0.0, 0.0), p(0.0, 4.0), p(3.0, 0.0)];
    assert_relative_eq!(polygon_area(&tri, &[2, 1, 0]), 6.0);
    assert_eq!(polygon_area(&tri, &[0, 1]), 0.0);
}

#[test]
fn test_point_in_polygon_parity() {
    let points = square();
    let ring = identity(4);
    assert!(point_in_polygon(p(5.0, 5.0), &points, &ring));
    assert!(point_in_polygon(p(0.5, 9.0), &points, &ring));
    assert!(!point_in_polygon(p(15.0, 5.0), &points, &ring));
    assert!(!point_in_polygon(p(-1.0, -1.0), &points, &ring));
}

#[test]
fn test_point_in_concave_polygon() {
    // U shape, clockwise, opening to the north
    let points = vec![
        p(0.0, 10.0),
        p(3.0, 10.0),
        p(3.0, 3.0),
        p(7.0, 3.0),
        p(7.0, 10.0),
        p(10.0, 10.0),
        p(10.0, 0.0),
        p(0.0, 0.0),
    ];
    let ring = identity(8);
    assert!(point_in_polygon(p(1.5, 8.0), &points, &ring));
    assert!(!point_in_polygon(p(5.0, 8.0), &points, &ring));
    assert!(point_in_polygon(p(5.0, 1.0), &points, &ring));
}

#[test]
fn test_prune_removes_straight_vertices() {
    let points = vec![
        p(0.0, 10.0),
        p(5.0, 10.0),
        p(10.0, 10.0),
        p(10.0, 0.0),
        p(5.0, 0.0),
        p(0.0, 0.0),
    ];
    let ring = identity(points.len());
    assert_eq!(collinear_positions(&points, &ring), vec![1, 4]);
    assert_eq!(prune_collinear(&points, &ring), vec![0, 2, 3, 5]);
}

#[test]
fn test_prepare_ring_orients_and_closes() {
    let mut open = square();
    open.reverse();
    open.push(open[0]);

    let outer = prepare_ring(open.clone(), false, &mut rng()).unwrap();
    assert_eq!(outer.len(), 4);
    assert!(is_clockwise(&outer, &identity(4), &mut rng()).unwrap());

    let hole = prepare_ring(open, true, &mut rng()).unwrap();
    assert!(!is_clockwise(&hole, &identity(4), &mut rng()).unwrap());
}

#[test]
fn test_prepare_ring_rejects_collapsed_input() {
    let line = vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(0.0, 0.0)];
    assert!(prepare_ring(line, false, &mut rng()).is_err());
    assert_eq!(
        prepare_ring(vec![p(0.0, 0.0), p(1.0, 0.0)], false, &mut rng()),
        Err(GeometryError::DegenerateRing { len: 2 })
    );
}

#[test]
fn test_ray_hits_full_line() {
    let points = square();
    let hits = ray_hits(p(-50.0, 5.0), DVec3::X, &points, &identity(4));
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].edge, 1);
    assert_relative_eq!(hits[0].position.x, 10.0);
    assert_eq!(hits[1].edge, 3);
    assert_relative_eq!(hits[1].position.x, 0.0);
}

#[test]
fn test_ray_hits_in_range_respects_segment_ends() {
    let points = square();
    let ring = identity(4);
    let hits = ray_hits_in_range(p(5.0, 5.0), p(20.0, 5.0), &points, &ring);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].edge, 1);

    let ending_on_vertex = ray_hits_in_range(p(5.0, 5.0), p(10.0, 0.0), &points, &ring);
    assert!(ending_on_vertex
        .iter()
        .all(|hit| same_point(hit.position, p(10.0, 0.0))));
    assert!(!ending_on_vertex.is_empty());
}

#[test]
fn test_bounds_and_rightmost() {
    let points = vec![p(1.0, 2.0), p(4.0, -1.0), p(4.0, 3.0), p(-2.0, 0.0)];
    let bounds = Bounds::of(&points).unwrap();
    assert_eq!(bounds.width(), 6.0);
    assert_eq!(bounds.depth(), 4.0);
    assert_eq!(rightmost_index(&points), Some(1));
    assert_eq!(rightmost_index(&[]), None);
    assert_eq!(vertex_centroid(&square(), &identity(4)), p(5.0, 5.0));
}
