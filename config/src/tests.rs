//! # Tests for Config Constants
//!
//! Unit tests verifying the relationships between configuration constants.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_point_epsilon_is_positive() {
    assert!(POINT_EQ_EPSILON > 0.0, "POINT_EQ_EPSILON must be positive");
}

#[test]
fn test_collinear_epsilon_larger_than_point_epsilon() {
    assert!(
        COLLINEAR_DISTANCE_EPSILON > POINT_EQ_EPSILON,
        "COLLINEAR_DISTANCE_EPSILON should be >= POINT_EQ_EPSILON"
    );
}

#[test]
fn test_height_epsilon_is_small() {
    assert!(HEIGHT_EPSILON < 1e-3, "HEIGHT_EPSILON should be small");
}

// =============================================================================
// PROBING TESTS
// =============================================================================

#[test]
fn test_probe_distance_exceeds_typical_footprint() {
    assert!(
        FAR_PROBE_DISTANCE >= 100.0,
        "probes must start outside building-sized footprints"
    );
}

#[test]
fn test_winding_jitter_stays_inside_bbox() {
    assert!(WINDING_PROBE_JITTER > 0.0 && WINDING_PROBE_JITTER < 0.5);
    assert!(WINDING_PROBE_MAX_ATTEMPTS >= 2);
}

// =============================================================================
// HEIGHT TESTS
// =============================================================================

#[test]
fn test_roof_defaults() {
    assert_eq!(DEFAULT_BUILDING_HEIGHT, 10.0);
    assert!(DEFAULT_ROOF_HEIGHT_RATIO > 0.0 && DEFAULT_ROOF_HEIGHT_RATIO < 1.0);
    assert!(DEFAULT_ROOF_HEIGHT_CAP > 0.0);
    assert!(LEVEL_HEIGHT > 0.0);
}

#[test]
fn test_skirt_depth_is_positive() {
    assert!(SKIRT_DEPTH > 0.0);
}

// =============================================================================
// TEXTURING TESTS
// =============================================================================

#[test]
fn test_texture_layer_limit() {
    assert!(MAX_TEXTURE_LAYERS.is_power_of_two());
}

#[test]
fn test_normal_grouping_threshold() {
    assert!(NORMAL_GROUPING_DOT > 0.0 && NORMAL_GROUPING_DOT < 1.0);
}

// =============================================================================
// BATCH TESTS
// =============================================================================

#[test]
fn test_hull_ratio_is_a_share() {
    assert!(HULL_SHARED_VERTEX_RATIO > 0.0 && HULL_SHARED_VERTEX_RATIO <= 1.0);
    assert!(HULL_AREA_TOLERANCE > 0.0);
}
