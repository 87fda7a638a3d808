//! # End-to-end Tests
//!
//! Whole features through [`BatchProcessor`].

use crate::batch::{BatchProcessor, GroundSampler, SkipReason};
use crate::feature::BuildingFeature;
use crate::mesh::flat_triangle_area;
use crate::roof::{RoofFallback, RoofKind};
use approx::assert_relative_eq;
use config::constants::GeometrySettings;
use glam::DVec3;

// =============================================================================
// HELPERS
// =============================================================================

fn square(cx: f64, cz: f64, size: f64) -> Vec<DVec3> {
    let h = size / 2.0;
    vec![
        DVec3::new(cx - h, 0.0, cz + h),
        DVec3::new(cx + h, 0.0, cz + h),
        DVec3::new(cx + h, 0.0, cz - h),
        DVec3::new(cx - h, 0.0, cz - h),
    ]
}

fn rectangle(width: f64, depth: f64) -> Vec<DVec3> {
    vec![
        DVec3::new(0.0, 0.0, depth),
        DVec3::new(width, 0.0, depth),
        DVec3::new(width, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0),
    ]
}

fn no_skirt() -> BatchProcessor {
    BatchProcessor::new(GeometrySettings::new(1.0, None, None, 42).unwrap())
}

struct Hill;

impl GroundSampler for Hill {
    fn height_at(&self, position: DVec3) -> f64 {
        position.x * 0.5
    }
}

// =============================================================================
// SINGLE BUILDINGS
// =============================================================================

#[test]
fn test_pyramid_building() {
    let feature = BuildingFeature::new("p", square(0.0, 0.0, 10.0))
        .with_property("height", 9.0)
        .with_property("roofShape", "pyramidal");
    let output = no_skirt().process(&[feature]);
    let building = &output.buildings[0];

    assert_eq!(building.roof_kind, RoofKind::Pyramidal);
    assert_eq!(building.origin, DVec3::ZERO);

    let facade = &building.facade;
    assert_eq!(facade.layout.ring_count, 2);
    assert_eq!(facade.walls().len(), 8);
    assert!(facade.tops().is_empty());
    assert_eq!(facade.bottoms().len(), 2);
    let (low, high) = facade.bounding_box();
    assert_relative_eq!(low.y, 0.0);
    assert_relative_eq!(high.y, 6.3, epsilon = 1e-9);

    let roof = &building.roof;
    assert_eq!(roof.triangle_count(), 4);
    let apexes = roof
        .positions
        .iter()
        .filter(|p| (p.y - 9.0).abs() < 1e-9)
        .collect::<Vec<_>>();
    assert_eq!(apexes.len(), 4);
    for apex in apexes {
        assert_relative_eq!(apex.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(apex.z, 0.0, epsilon = 1e-9);
    }
    // every face leans outwards and up
    for t in 0..roof.triangle_count() {
        assert!(roof.face_normal(t).y > 0.0);
    }
}

#[test]
fn test_bottom_covers_footprint() {
    let outer = vec![
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::new(10.0, 0.0, 10.0),
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(6.0, 0.0, 0.0),
        DVec3::new(6.0, 0.0, 6.0),
        DVec3::new(4.0, 0.0, 6.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0),
    ];
    let hole = vec![
        DVec3::new(1.0, 0.0, 7.0),
        DVec3::new(3.0, 0.0, 7.0),
        DVec3::new(3.0, 0.0, 9.0),
        DVec3::new(1.0, 0.0, 9.0),
    ];
    let feature = BuildingFeature::new("u", outer).with_hole(hole);
    let output = no_skirt().process(&[feature]);
    let facade = &output.buildings[0].facade;

    let area: f64 = facade
        .bottoms()
        .iter()
        .map(|t| {
            let [a, b, c] = t.map(|i| facade.positions[i as usize]);
            flat_triangle_area(a, b, c)
        })
        .sum();
    assert_relative_eq!(area, 100.0 - 12.0 - 4.0, epsilon = 1e-9);
    // floor faces down
    for t in facade.bottoms() {
        let [a, b, c] = t.map(|i| facade.positions[i as usize]);
        assert!((b - a).cross(c - a).y < 0.0);
    }
}

#[test]
fn test_unknown_roof_shape_builds_like_flat() {
    let base = BuildingFeature::new("x", rectangle(12.0, 8.0)).with_property("height", 14.0);
    let unknown = base.clone().with_property("roofShape", "unknown_value");

    let flat = no_skirt().process(&[base]);
    let other = no_skirt().process(&[unknown]);
    let (flat, other) = (&flat.buildings[0], &other.buildings[0]);

    assert_eq!(other.roof_kind, RoofKind::Flat);
    assert_eq!(other.roof_fallback, Some(RoofFallback::Unrecognized));
    assert_eq!(flat.roof_fallback, None);
    assert_eq!(other.facade, flat.facade);
    assert_eq!(other.roof, flat.roof);
}

#[test]
fn test_hipped_building_follows_roof_vertices() {
    let feature = BuildingFeature::new("h", rectangle(10.0, 4.0))
        .with_property("height", 10.0)
        .with_property("roofHeight", 3.0)
        .with_property("roofShape", "hipped")
        .with_property("roofDirection", 90.0);
    let output = no_skirt().process(&[feature]);
    let building = &output.buildings[0];

    assert_eq!(building.roof_kind, RoofKind::Hipped);
    assert_eq!(building.roof_fallback, None);
    // base, roof start, connection
    assert_eq!(building.facade.layout.ring_count, 3);
    assert!(building.facade.tops().is_empty());
    assert_eq!(building.roof.triangle_count(), 6);

    let (_, high) = building.roof.bounding_box();
    assert_relative_eq!(high.y, 10.0, epsilon = 1e-9);
}

#[test]
fn test_skirt_reaches_below_ground() {
    let feature = BuildingFeature::new("s", square(0.0, 0.0, 6.0));
    let output = BatchProcessor::default().process(&[feature]);
    let facade = &output.buildings[0].facade;
    assert_eq!(facade.layout.ring_count, 3);
    let (low, _) = facade.bounding_box();
    assert_relative_eq!(low.y, -10.0);
}

#[test]
fn test_raised_part_has_no_skirt() {
    let feature = BuildingFeature::new("r", square(0.0, 0.0, 6.0))
        .with_property("minHeight", 4.0)
        .with_property("height", 12.0);
    let output = BatchProcessor::default().process(&[feature]);
    let facade = &output.buildings[0].facade;
    assert_eq!(facade.layout.ring_count, 2);
    let (low, _) = facade.bounding_box();
    assert_relative_eq!(low.y, 4.0);
    // raised parts are marked through the colour alpha
    assert!(facade.colors.iter().all(|c| c[3] == 0.0));
}

#[test]
fn test_colors_from_properties() {
    let feature = BuildingFeature::new("c", square(0.0, 0.0, 6.0))
        .with_property("color", "#ff0000")
        .with_property("roofColor", "navy");
    let output = no_skirt().process(&[feature]);
    let building = &output.buildings[0];
    assert!(building.facade.colors.iter().all(|c| *c == [1.0, 0.0, 0.0, 1.0]));
    assert!(building.roof.colors.iter().all(|c| *c == [0.0, 0.0, 0.502, 1.0]));
}

// =============================================================================
// BATCHES
// =============================================================================

#[test]
fn test_same_seed_same_output() {
    let features = vec![
        BuildingFeature::new("a", square(0.0, 0.0, 20.0)).with_property("height", 25.0),
        BuildingFeature::new("b", rectangle(10.0, 6.0))
            .with_property("roofShape", "gabled")
            .with_property("roofDirection", 0.0),
        BuildingFeature::new("c", square(30.0, 0.0, 8.0)).with_property("roofShape", "dome"),
    ];
    let first = serde_json::to_string(&no_skirt().process(&features)).unwrap();
    let second = serde_json::to_string(&no_skirt().process(&features)).unwrap();
    assert_eq!(first, second);

    let mut reseeded = BatchProcessor::new(GeometrySettings::new(1.0, None, None, 7).unwrap());
    let third = serde_json::to_string(&reseeded.process(&features)).unwrap();
    assert_ne!(first, third);
}

#[test]
fn test_building_parts_share_origin_and_textures() {
    let features = vec![
        BuildingFeature::new("left", square(0.0, 0.0, 10.0))
            .with_property("building", "b1")
            .with_property("height", 12.0),
        BuildingFeature::new("right", square(10.0, 0.0, 10.0))
            .with_property("building", "b1")
            .with_property("height", 6.0),
    ];
    let output = no_skirt().process(&features);
    let [left, right] = &output.buildings[..] else {
        panic!("expected two buildings, got {}", output.buildings.len());
    };

    assert_eq!(left.origin, DVec3::ZERO);
    assert_eq!(right.origin, DVec3::ZERO);
    assert_eq!(left.building_id.as_deref(), Some("b1"));
    assert_eq!(output.texture_layers.windows().len(), 1);
    assert_eq!(output.texture_layers.doors().len(), 1);
    // window and door channels match
    assert_eq!(&left.facade.uvs[0][2..], &right.facade.uvs[0][2..]);

    // the right part sits 10 units right of the shared origin
    let (low, high) = right.facade.bounding_box();
    assert_relative_eq!(low.x, 5.0);
    assert_relative_eq!(high.x, 15.0);
}

#[test]
fn test_hull_outline_is_skipped() {
    let hull = vec![
        DVec3::new(-5.0, 0.0, 5.0),
        DVec3::new(15.0, 0.0, 5.0),
        DVec3::new(15.0, 0.0, -5.0),
        DVec3::new(-5.0, 0.0, -5.0),
    ];
    let features = vec![
        BuildingFeature::new("hull", hull),
        BuildingFeature::new("left", square(0.0, 0.0, 10.0)).with_property("building", "b1"),
        BuildingFeature::new("right", square(10.0, 0.0, 10.0)).with_property("building", "b1"),
    ];
    let output = no_skirt().process(&features);
    assert_eq!(output.buildings.len(), 2);
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].id, "hull");
    assert_eq!(output.skipped[0].reason, SkipReason::Hull);
}

#[test]
fn test_tile_filter() {
    let settings = GeometrySettings::new(1.0, None, Some(100.0), 42).unwrap();
    let features = vec![
        BuildingFeature::new("inside", square(10.0, -20.0, 8.0)),
        BuildingFeature::new("border", square(50.0, 0.0, 8.0)),
        BuildingFeature::new("outside", square(120.0, 0.0, 8.0)),
    ];
    let output = BatchProcessor::new(settings).process(&features);
    assert_eq!(output.buildings.len(), 1);
    assert_eq!(output.buildings[0].id, "inside");
    assert!(output
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::OutsideTile));
}

#[test]
fn test_failures_do_not_abort_batch() {
    let features = vec![
        BuildingFeature::new("line", vec![DVec3::ZERO, DVec3::X]),
        BuildingFeature::new("bad-height", square(0.0, 0.0, 5.0)).with_property("height", "tall"),
        BuildingFeature::new("empty", Vec::new()),
        BuildingFeature::new("ok", square(0.0, 0.0, 5.0)),
    ];
    let output = no_skirt().process(&features);
    assert_eq!(output.buildings.len(), 1);
    assert_eq!(output.buildings[0].id, "ok");
    assert_eq!(output.failed().count(), 3);
}

#[test]
fn test_missing_direction_still_builds() {
    let feature = BuildingFeature::new("g", rectangle(10.0, 6.0)).with_property("roofShape", "gabled");
    let output = no_skirt().process(&[feature]);
    let building = &output.buildings[0];
    assert_eq!(building.roof_kind, RoofKind::Flat);
    assert_eq!(building.roof_fallback, Some(RoofFallback::MissingDirection));
}

#[test]
fn test_ground_height_is_shared_per_building() {
    let features = vec![
        BuildingFeature::new("left", square(4.0, 0.0, 4.0)).with_property("building", "b1"),
        BuildingFeature::new("right", square(8.0, 0.0, 4.0)).with_property("building", "b1"),
        BuildingFeature::new("alone", square(20.0, 0.0, 4.0)),
    ];
    let output = no_skirt().with_ground(Hill).process(&features);
    let heights: Vec<f64> = output.buildings.iter().map(|b| b.ground_height).collect();
    assert_eq!(heights, vec![2.0, 2.0, 10.0]);
}

#[test]
fn test_rooftop_instances_only_on_tall_flat_roofs() {
    let mut features = Vec::new();
    for i in 0..16 {
        let x = f64::from(i) * 30.0;
        features.push(BuildingFeature::new(format!("tall-{i}"), square(x, 0.0, 12.0)).with_property("height", 20.0));
        features.push(BuildingFeature::new(format!("low-{i}"), square(x, 40.0, 12.0)).with_property("height", 6.0));
    }
    let output = no_skirt().process(&features);
    assert!(!output.instances.is_empty());
    assert!(output.instances.len() <= 16);
    for instance in &output.instances {
        assert!(instance.feature_id.starts_with("tall-"));
        assert_relative_eq!(instance.position.y, 20.0);
    }
}
