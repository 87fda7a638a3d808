//! # Batch Processing
//!
//! A batch is one feature collection (typically one map tile). Features are
//! built in input order against shared per-batch state:
//!
//! ```text
//! features ─┬─> HullIndex (pre-pass over building parts)
//!           └─> per feature: filters -> footprint -> roof -> meshes
//!                              │
//!                              ├─ BuildingArena   shared centre, facade, ground
//!                              ├─ TextureLayers   window/door texture layers
//!                              └─ BuildRng        every random choice
//! ```
//!
//! A feature that fails is logged and listed in
//! [`BatchOutput::skipped`]; the rest of the batch is unaffected.

use crate::facade::{FacadePattern, FacadeSource, RandomFacadeSource};
use crate::feature::BuildingFeature;
use crate::mesh::{FacadeMesh, RoofMesh};
use crate::pipeline::{build_feature, BatchState, Outcome};
use crate::rng::BuildRng;
use crate::roof::{RoofFallback, RoofKind};
use crate::rooftop::RooftopInstance;
use crate::textures::TextureLayers;
use config::constants::{GeometrySettings, HULL_AREA_TOLERANCE, HULL_SHARED_VERTEX_RATIO};
use footprint_geometry::polygon::polygon_area;
use footprint_geometry::predicates::same_point;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{error, info};

// =============================================================================
// GROUND
// =============================================================================

/// Terrain height lookup.
pub trait GroundSampler {
    /// Ground height (before the height multiplier) at a scene position.
    fn height_at(&self, position: DVec3) -> f64;
}

/// Level terrain at a fixed height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    pub height: f64,
}

impl GroundSampler for FlatGround {
    fn height_at(&self, _position: DVec3) -> f64 {
        self.height
    }
}

// =============================================================================
// ARENA
// =============================================================================

/// State shared by every part of one building. The first part built
/// decides it.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedBuilding {
    /// Origin of every part's meshes.
    pub center: DVec3,
    pub facade: FacadePattern,
    pub ground_height: f64,
}

/// Per-batch map from building id to its shared state.
#[derive(Debug, Clone, Default)]
pub struct BuildingArena {
    buildings: BTreeMap<String, SharedBuilding>,
}

impl BuildingArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, building_id: &str) -> Option<&SharedBuilding> {
        self.buildings.get(building_id)
    }

    /// Stores the building unless it is already known; entries are never
    /// replaced.
    pub fn insert(&mut self, building_id: &str, building: SharedBuilding) -> &SharedBuilding {
        self.buildings
            .entry(building_id.to_string())
            .or_insert(building)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Outline vertices and summed area of all parts of one building.
#[derive(Debug, Clone, Default)]
struct PartOutline {
    vertices: BTreeSet<(u64, u64)>,
    area: f64,
}

/// Building parts by building id, used to recognise "hull" footprints.
///
/// Map data often carries a footprint for the whole building next to its
/// parts. Drawing both would overlay the parts with one big block, so a
/// footprint without a building id that matches the summed area of some
/// building's ground-level parts, and mostly shares their vertices, is
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct HullIndex {
    parts: BTreeMap<String, PartOutline>,
}

impl HullIndex {
    /// Collects the outer rings of every ground-level building part.
    pub fn from_features(features: &[BuildingFeature]) -> Self {
        let mut parts: BTreeMap<String, PartOutline> = BTreeMap::new();
        for feature in features {
            let Some(building_id) = feature.building_id() else {
                continue;
            };
            if feature.has("minHeight") {
                continue;
            }
            let outer = open_ring(&feature.outer);
            let part = parts.entry(building_id).or_default();
            part.vertices.extend(outer.iter().map(|&v| vertex_key(v)));
            part.area += ring_area(outer);
        }
        Self { parts }
    }

    /// Whether `outer` outlines one of the indexed buildings.
    pub fn is_hull(&self, outer: &[DVec3]) -> bool {
        let outer = open_ring(outer);
        if outer.is_empty() {
            return false;
        }
        let hull_area = ring_area(outer);
        self.parts.values().any(|part| {
            if (part.area - hull_area).abs() >= HULL_AREA_TOLERANCE {
                return false;
            }
            let shared = outer
                .iter()
                .filter(|&&v| part.vertices.contains(&vertex_key(v)))
                .count();
            shared as f64 >= HULL_SHARED_VERTEX_RATIO * outer.len() as f64
        })
    }
}

/// Exact planar identity of a vertex.
fn vertex_key(v: DVec3) -> (u64, u64) {
    (v.x.to_bits(), v.z.to_bits())
}

/// Ring without its closing duplicate.
fn open_ring(ring: &[DVec3]) -> &[DVec3] {
    match ring {
        [first, .., last] if same_point(*first, *last) => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn ring_area(ring: &[DVec3]) -> f64 {
    let identity: Vec<usize> = (0..ring.len()).collect();
    polygon_area(ring, &identity)
}

/// Whether `center` lies in the tile square `[-size/2, size/2)²` centred on
/// the scene origin. Features on tile borders appear in both tiles; this
/// keeps exactly one copy.
pub fn in_tile(center: DVec3, tile_size: f64) -> bool {
    let half = tile_size * 0.5;
    (-half..half).contains(&center.x) && (-half..half).contains(&center.z)
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Meshes of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingMesh {
    /// Feature id.
    pub id: String,
    /// Building the feature is a part of.
    pub building_id: Option<String>,
    /// Scene position every mesh position is relative to.
    pub origin: DVec3,
    /// Sampled ground height at the origin.
    pub ground_height: f64,
    /// Roof shape that was built.
    pub roof_kind: RoofKind,
    /// Why the requested shape was replaced by a flat roof.
    pub roof_fallback: Option<RoofFallback>,
    pub facade: FacadeMesh,
    pub roof: RoofMesh,
}

/// Why a feature produced no meshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Outline of a building that is drawn from its parts.
    Hull,
    /// Centre lies on a neighbouring tile.
    OutsideTile,
    /// Building the feature failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub id: String,
    pub reason: SkipReason,
}

/// Result of one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub buildings: Vec<BuildingMesh>,
    pub instances: Vec<RooftopInstance>,
    pub skipped: Vec<SkippedFeature>,
    /// Every texture layer the buildings reference.
    pub texture_layers: TextureLayers,
}

impl BatchOutput {
    /// Features that failed, as opposed to being filtered out.
    pub fn failed(&self) -> impl Iterator<Item = &SkippedFeature> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Failed(_)))
    }
}

// =============================================================================
// PROCESSOR
// =============================================================================

/// Builds every feature of a batch.
///
/// # Example
///
/// ```rust
/// use building_mesh::{BatchProcessor, BuildingFeature};
/// use glam::DVec3;
///
/// let square = vec![
///     DVec3::new(0.0, 0.0, 10.0),
///     DVec3::new(10.0, 0.0, 10.0),
///     DVec3::new(10.0, 0.0, 0.0),
///     DVec3::new(0.0, 0.0, 0.0),
/// ];
/// let feature = BuildingFeature::new("b1", square).with_property("height", 6.0);
///
/// let output = BatchProcessor::default().process(&[feature]);
/// assert_eq!(output.buildings.len(), 1);
/// assert!(output.skipped.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BatchProcessor<F = RandomFacadeSource, G = FlatGround> {
    settings: GeometrySettings,
    facades: F,
    ground: G,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(GeometrySettings::default())
    }
}

impl BatchProcessor {
    /// Processor with random facades on flat ground.
    pub fn new(settings: GeometrySettings) -> Self {
        Self {
            settings,
            facades: RandomFacadeSource,
            ground: FlatGround::default(),
        }
    }
}

impl<F: FacadeSource, G: GroundSampler> BatchProcessor<F, G> {
    /// Replaces the facade source.
    pub fn with_facades<F2: FacadeSource>(self, facades: F2) -> BatchProcessor<F2, G> {
        BatchProcessor {
            settings: self.settings,
            facades,
            ground: self.ground,
        }
    }

    /// Replaces the ground sampler.
    pub fn with_ground<G2: GroundSampler>(self, ground: G2) -> BatchProcessor<F, G2> {
        BatchProcessor {
            settings: self.settings,
            facades: self.facades,
            ground,
        }
    }

    pub fn settings(&self) -> &GeometrySettings {
        &self.settings
    }

    /// Builds `features` in order.
    ///
    /// All per-batch state (random source, arena, texture layers) starts
    /// fresh, so the same features always give the same output.
    pub fn process(&mut self, features: &[BuildingFeature]) -> BatchOutput {
        let hulls = HullIndex::from_features(features);
        let mut arena = BuildingArena::new();
        let mut layers = TextureLayers::new();
        let mut rng = BuildRng::from_seed_u64(self.settings.seed);
        let mut output = BatchOutput::default();

        let mut state = BatchState {
            settings: &self.settings,
            hulls: &hulls,
            arena: &mut arena,
            layers: &mut layers,
            facades: &mut self.facades,
            ground: &self.ground,
            rng: &mut rng,
        };

        for feature in features {
            let reason = match build_feature(feature, &mut state) {
                Ok(Outcome::Built(building, instance)) => {
                    output.buildings.push(*building);
                    output.instances.extend(instance);
                    continue;
                }
                Ok(Outcome::Skipped(reason)) => reason,
                Err(err) => {
                    error!(feature = %feature.id, error = %err, "skipping feature");
                    SkipReason::Failed(err.to_string())
                }
            };
            output.skipped.push(SkippedFeature {
                id: feature.id.clone(),
                reason,
            });
        }

        info!(
            built = output.buildings.len(),
            skipped = output.skipped.len(),
            instances = output.instances.len(),
            "batch processed"
        );
        output.texture_layers = layers;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, z: f64, size: f64) -> Vec<DVec3> {
        vec![
            DVec3::new(x, 0.0, z + size),
            DVec3::new(x + size, 0.0, z + size),
            DVec3::new(x + size, 0.0, z),
            DVec3::new(x, 0.0, z),
        ]
    }

    #[test]
    fn test_tile_is_half_open() {
        assert!(in_tile(DVec3::ZERO, 10.0));
        assert!(in_tile(DVec3::new(-5.0, 0.0, -5.0), 10.0));
        assert!(!in_tile(DVec3::new(5.0, 0.0, 0.0), 10.0));
        assert!(!in_tile(DVec3::new(0.0, 0.0, 5.0), 10.0));
    }

    #[test]
    fn test_open_ring_drops_closing_point() {
        let mut ring = square(0.0, 0.0, 1.0);
        ring.push(ring[0]);
        assert_eq!(open_ring(&ring).len(), 4);
        assert_eq!(open_ring(&ring[..4]).len(), 4);
    }

    #[test]
    fn test_hull_of_two_parts() {
        let parts = [
            BuildingFeature::new("a", square(0.0, 0.0, 10.0)).with_property("building", "b"),
            BuildingFeature::new("c", square(10.0, 0.0, 10.0)).with_property("building", "b"),
        ];
        let index = HullIndex::from_features(&parts);

        let hull = vec![
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::new(20.0, 0.0, 10.0),
            DVec3::new(20.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
        ];
        assert!(index.is_hull(&hull));
        // same area elsewhere
        assert!(!index.is_hull(&square(100.0, 100.0, 200f64.sqrt())));
        // same place, different area
        assert!(!index.is_hull(&square(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_raised_parts_are_not_indexed() {
        let parts = [BuildingFeature::new("a", square(0.0, 0.0, 10.0))
            .with_property("building", "b")
            .with_property("minHeight", 3.0)];
        let index = HullIndex::from_features(&parts);
        assert!(!index.is_hull(&square(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_arena_keeps_first_entry() {
        let mut arena = BuildingArena::new();
        let facade = RandomFacadeSource.facade("", 1.0, &mut BuildRng::default());
        let first = SharedBuilding {
            center: DVec3::new(1.0, 0.0, 1.0),
            facade: facade.clone(),
            ground_height: 0.0,
        };
        arena.insert("b", first.clone());
        let kept = arena.insert(
            "b",
            SharedBuilding {
                center: DVec3::ZERO,
                ..first.clone()
            },
        );
        assert_eq!(*kept, first);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get("b"), Some(&first));
    }

    #[test]
    fn test_flat_ground() {
        let ground = FlatGround { height: 2.5 };
        assert_eq!(ground.height_at(DVec3::new(3.0, 0.0, 4.0)), 2.5);
    }
}
