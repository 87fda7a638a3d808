//! Per-feature build: filters, footprint, roof, meshes.

use crate::assemble::{assemble_facade, assemble_roof, FacadeInput, RoofInput};
use crate::batch::{in_tile, BuildingArena, BuildingMesh, GroundSampler, HullIndex, SharedBuilding, SkipReason};
use crate::color::{parse_color, Rgba};
use crate::error::{BuildError, BuildResult};
use crate::facade::FacadeSource;
use crate::feature::{BuildingFeature, BuildingHeights};
use crate::rng::BuildRng;
use crate::roof::{build_roof, RoofContext};
use crate::rooftop::{place_instance, RooftopInstance};
use crate::textures::TextureLayers;
use config::constants::GeometrySettings;
use footprint_geometry::Footprint;
use glam::DVec3;
use tracing::{debug, warn};

/// Mutable batch state a feature is built against.
pub(crate) struct BatchState<'a> {
    pub settings: &'a GeometrySettings,
    pub hulls: &'a HullIndex,
    pub arena: &'a mut BuildingArena,
    pub layers: &'a mut TextureLayers,
    pub facades: &'a mut dyn FacadeSource,
    pub ground: &'a dyn GroundSampler,
    pub rng: &'a mut BuildRng,
}

pub(crate) enum Outcome {
    Built(Box<BuildingMesh>, Option<RooftopInstance>),
    Skipped(SkipReason),
}

/// Builds one feature.
///
/// # Errors
///
/// Fails on unusable properties and on outer rings that cannot be turned
/// into a footprint. Roof problems never fail a feature; they fall back to
/// a flat roof.
pub(crate) fn build_feature(feature: &BuildingFeature, state: &mut BatchState<'_>) -> BuildResult<Outcome> {
    if feature.outer.is_empty() {
        return Err(BuildError::EmptyFootprint);
    }

    let kind = feature.roof_kind();
    let heights = BuildingHeights::from_feature(feature, &kind)?;
    let direction = if kind.needs_direction() {
        feature.roof_direction()?
    } else {
        None
    };

    let building_id = feature.building_id();
    if building_id.is_none() && state.hulls.is_hull(&feature.outer) {
        debug!(feature = %feature.id, "footprint outlines a multi-part building, skipping");
        return Ok(Outcome::Skipped(SkipReason::Hull));
    }

    let footprint = Footprint::from_rings(feature.outer.clone(), feature.holes.clone(), &mut state.rng.0)?;
    for hole in &footprint.dropped_holes {
        warn!(feature = %feature.id, hole, "dropping corrupt hole");
    }

    let center = footprint.center();
    if let Some(tile_size) = state.settings.tile_size {
        if !in_tile(center, tile_size) {
            return Ok(Outcome::Skipped(SkipReason::OutsideTile));
        }
    }

    let bottom_triangles = footprint.triangulate().unwrap_or_else(|failure| {
        warn!(
            feature = %feature.id,
            remaining = failure.remaining,
            "floor triangulation stalled, keeping partial floor"
        );
        failure.into_partial()
    });

    let roof = build_roof(
        &footprint,
        &RoofContext {
            feature_id: &feature.id,
            kind: &kind,
            direction,
            heights,
        },
    );

    // ===== SHARED BUILDING STATE =====
    let shared = match &building_id {
        Some(id) => match state.arena.get(id).cloned() {
            Some(shared) => shared,
            None => {
                let shared = new_building(feature, center, state);
                state.arena.insert(id, shared).clone()
            }
        },
        None => new_building(feature, center, state),
    };
    let layers = state.layers.register(&shared.facade);
    let levels = roof.heights.levels(feature)?;

    // ===== MESHES =====
    let hm = state.settings.height_multiplier;
    let origin = shared.center;
    let facade = assemble_facade(&FacadeInput {
        footprint: &footprint,
        roof: &roof,
        bottom_triangles: &bottom_triangles,
        origin,
        height_multiplier: hm,
        skirt_depth: state.settings.skirt_depth,
        pattern: &shared.facade,
        layers,
        levels,
        color: property_color(feature, "color"),
    });
    let roof_mesh = assemble_roof(
        &RoofInput {
            footprint: &footprint,
            roof: &roof,
            origin,
            height_multiplier: hm,
            color: property_color(feature, "roofColor"),
        },
        state.rng,
    );
    let instance = place_instance(&feature.id, &footprint, &roof, origin, hm, state.rng);

    let building = BuildingMesh {
        id: feature.id.clone(),
        building_id,
        origin,
        ground_height: shared.ground_height,
        roof_kind: roof.kind.clone(),
        roof_fallback: roof.fallback,
        facade,
        roof: roof_mesh,
    };
    Ok(Outcome::Built(Box::new(building), instance))
}

/// Shared state for a building seen for the first time.
fn new_building(feature: &BuildingFeature, center: DVec3, state: &mut BatchState<'_>) -> SharedBuilding {
    SharedBuilding {
        center,
        facade: state
            .facades
            .facade(&feature.building_type(), state.settings.height_multiplier, state.rng),
        ground_height: state.ground.height_at(center),
    }
}

fn property_color(feature: &BuildingFeature, key: &str) -> Option<Rgba> {
    let text = feature.text(key)?;
    let color = parse_color(&text);
    if color.is_none() {
        debug!(feature = %feature.id, key, value = %text, "unrecognised colour");
    }
    color
}
