//! # Roof Shapes
//!
//! Turns a prepared [`Footprint`] and the building heights into roof
//! geometry. Every shape produces a [`RoofBuild`]; the mesh assembler turns
//! that into the roof mesh and the facade's top rings.
//!
//! ## Shape families
//!
//! | Family | Shapes | Approach |
//! |--------|--------|----------|
//! | planar | flat, skillion | triangulate the outline, optionally tilt it |
//! | ridge | gabled, hipped, half-hipped | cut along a ridge, lift by distance to it |
//! | layered | round, mansard, gambrel, saltbox, ... | parallel cuts, piecewise height profile |
//! | radial | pyramidal, dome, onion | shrinking rings and an apex fan |
//!
//! ## Fallbacks
//!
//! A roof never fails the building. Unknown shapes, shapes that need a
//! `roofDirection` but have none, and segmentation that runs into a
//! topology error all produce a flat roof (logged) starting at the total
//! height.
//!
//! ## Vertex layout
//!
//! Roof triangle indices address `[base ring] ++ extra_vertices`, where the
//! base ring (the footprint points at roof-start height) is only present
//! when `roof_base` is set. Extra vertices carry their absolute height in
//! `y`, before the height multiplier.

mod layered;
mod planar;
mod radial;
mod ridge;


use crate::feature::BuildingHeights;
use footprint_geometry::polygon::point_in_polygon;
use footprint_geometry::predicates::bearing_direction;
use footprint_geometry::{
    insert_cutting_rays, triangulate, Footprint, GeometryResult, JumpDictionary, RaySpec, Triangle,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

// =============================================================================
// ROOF KINDS
// =============================================================================

/// Roof shape from the `roofShape` property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofKind {
    Flat,
    Skillion,
    Gabled,
    Hipped,
    HalfHipped,
    Round,
    Mansard,
    Gambrel,
    Saltbox,
    DoubleSaltbox,
    QuadrupleSaltbox,
    Pyramidal,
    Dome,
    Onion,
    /// Anything else; built as a flat roof.
    Unrecognized(String),
}

impl RoofKind {
    /// Parses a `roofShape` value. Matching is case-sensitive; common
    /// misspellings map to their shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use building_mesh::RoofKind;
    ///
    /// assert_eq!(RoofKind::parse("gabeld"), RoofKind::Gabled);
    /// assert_eq!(RoofKind::parse("pyramid"), RoofKind::Pyramidal);
    /// assert_eq!(RoofKind::parse("Flat"), RoofKind::Unrecognized("Flat".into()));
    /// ```
    pub fn parse(shape: &str) -> Self {
        match shape {
            "flat" => Self::Flat,
            "skillion" => Self::Skillion,
            "gabled" | "gabeld" => Self::Gabled,
            "hipped" => Self::Hipped,
            "half-hipped" => Self::HalfHipped,
            "round" => Self::Round,
            "mansard" => Self::Mansard,
            "gambrel" => Self::Gambrel,
            "saltbox" => Self::Saltbox,
            "double_saltbox" => Self::DoubleSaltbox,
            "quadruple_saltbox" => Self::QuadrupleSaltbox,
            "pyramidal" | "pyramid" => Self::Pyramidal,
            "dome" => Self::Dome,
            "onion" => Self::Onion,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Whether the roof adds no height. Unknown shapes are built flat, so
    /// they count as flat too.
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat | Self::Unrecognized(_))
    }

    /// Whether the shape is oriented by `roofDirection`.
    pub fn needs_direction(&self) -> bool {
        matches!(
            self,
            Self::Skillion
                | Self::Gabled
                | Self::Hipped
                | Self::HalfHipped
                | Self::Round
                | Self::Mansard
                | Self::Gambrel
                | Self::Saltbox
                | Self::DoubleSaltbox
                | Self::QuadrupleSaltbox
        )
    }

    /// Canonical property value, or the raw value for unknown shapes.
    pub fn name(&self) -> &str {
        match self {
            Self::Flat => "flat",
            Self::Skillion => "skillion",
            Self::Gabled => "gabled",
            Self::Hipped => "hipped",
            Self::HalfHipped => "half-hipped",
            Self::Round => "round",
            Self::Mansard => "mansard",
            Self::Gambrel => "gambrel",
            Self::Saltbox => "saltbox",
            Self::DoubleSaltbox => "double_saltbox",
            Self::QuadrupleSaltbox => "quadruple_saltbox",
            Self::Pyramidal => "pyramidal",
            Self::Dome => "dome",
            Self::Onion => "onion",
            Self::Unrecognized(shape) => shape,
        }
    }
}

// =============================================================================
// INPUT / OUTPUT
// =============================================================================

/// Everything a roof builder reads besides the footprint.
#[derive(Debug, Clone, Copy)]
pub struct RoofContext<'a> {
    /// Feature id for log events.
    pub feature_id: &'a str,
    pub kind: &'a RoofKind,
    /// Bearing in degrees clockwise from north.
    pub direction: Option<f64>,
    /// Heights for `kind`.
    pub heights: BuildingHeights,
}

/// Why a roof was built flat instead of as requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoofFallback {
    Unrecognized,
    MissingDirection,
    Topology,
}

/// Roof geometry of one footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofBuild {
    /// Shape actually built (`Flat` after a fallback).
    pub kind: RoofKind,
    /// Heights actually used; flat roofs start at the total height.
    pub heights: BuildingHeights,
    /// Footprint points followed by any points the cuts added.
    pub points: Vec<DVec3>,
    /// Roof triangles, one group per roof face.
    pub roof_groups: Vec<Vec<Triangle>>,
    /// Segmentation by-products that belong to the walls (gable ends),
    /// indexing `points`.
    pub top_triangles: Vec<Triangle>,
    /// Lifted vertices, absolute height in `y`.
    pub extra_vertices: Vec<DVec3>,
    /// Whether the walls need a ring following the lifted vertices.
    pub connection_ring: bool,
    /// Whether roof indices start with the footprint ring at roof start.
    pub roof_base: bool,
    /// Rings of `points.len()` vertices at the start of `extra_vertices`
    /// that are joined by strips.
    pub extra_rings: usize,
    pub fallback: Option<RoofFallback>,
}

impl RoofBuild {
    /// Number of vertices the roof indices address.
    pub fn vertex_count(&self) -> usize {
        let base = if self.roof_base { self.points.len() } else { 0 };
        base + self.extra_vertices.len()
    }

    /// Whether the roof ended up flat.
    pub fn is_flat(&self) -> bool {
        self.kind == RoofKind::Flat
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Builds the roof for `context.kind`, falling back to flat when the shape
/// cannot be built.
pub fn build_roof(footprint: &Footprint, context: &RoofContext<'_>) -> RoofBuild {
    let kind = context.kind;
    let built = match kind {
        RoofKind::Flat => return planar::flat(footprint, context.heights.flattened(), context.feature_id),
        RoofKind::Unrecognized(shape) => {
            warn!(
                feature = context.feature_id,
                roof_shape = %shape,
                "roof shape not implemented, using flat roof"
            );
            return flat_fallback(footprint, context, RoofFallback::Unrecognized);
        }
        RoofKind::Pyramidal | RoofKind::Dome | RoofKind::Onion => {
            return radial::build(footprint, kind, context.heights);
        }
        _ => {
            let Some(direction) = context.direction.map(bearing_direction) else {
                warn!(
                    feature = context.feature_id,
                    roof_shape = kind.name(),
                    "no roofDirection available, using flat roof"
                );
                return flat_fallback(footprint, context, RoofFallback::MissingDirection);
            };
            match kind {
                RoofKind::Skillion => Ok(planar::skillion(footprint, direction, context)),
                RoofKind::Gabled | RoofKind::Hipped | RoofKind::HalfHipped => {
                    ridge::build(footprint, direction, context)
                }
                _ => layered::build(footprint, direction, context),
            }
        }
    };

    built.unwrap_or_else(|err| {
        error!(
            feature = context.feature_id,
            roof_shape = kind.name(),
            error = %err,
            "roof segmentation failed, using flat roof"
        );
        flat_fallback(footprint, context, RoofFallback::Topology)
    })
}

fn flat_fallback(footprint: &Footprint, context: &RoofContext<'_>, reason: RoofFallback) -> RoofBuild {
    RoofBuild {
        fallback: Some(reason),
        ..planar::flat(footprint, context.heights.flattened(), context.feature_id)
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Ear-clips `ring`, keeping the partial result of a stalled scan.
fn triangulate_lossy(points: &[DVec3], ring: &[usize], feature_id: &str) -> Vec<Triangle> {
    triangulate(points, ring).unwrap_or_else(|failure| {
        warn!(
            feature = feature_id,
            remaining = failure.remaining,
            produced = failure.partial.len(),
            "triangulation stalled, keeping partial roof"
        );
        failure.into_partial()
    })
}

/// Ring positions `start..=end` as points, wrapping past the ring end.
fn range_of_vertices(points: &[DVec3], ring: &[usize], start: usize, end: usize) -> Vec<DVec3> {
    let positions: Vec<usize> = if start <= end {
        (start..=end).collect()
    } else {
        (start..ring.len()).chain(0..=end).collect()
    };
    positions.into_iter().map(|p| points[ring[p]]).collect()
}

/// A face is roof unless its first triangle's centroid lies in one of the
/// non-roof areas.
fn is_roof_area(triangle: &Triangle, non_roof_areas: &[Vec<DVec3>], points: &[DVec3]) -> bool {
    let centroid = triangle.iter().map(|&i| points[i]).sum::<DVec3>() / 3.0;
    !non_roof_areas.iter().any(|area| {
        let identity: Vec<usize> = (0..area.len()).collect();
        point_in_polygon(centroid, area, &identity)
    })
}

/// Footprint cut into faces.
struct Segmented {
    points: Vec<DVec3>,
    roof_groups: Vec<Vec<Triangle>>,
    top_triangles: Vec<Triangle>,
}

/// Cuts the footprint along `rays` and sorts the triangulated faces into
/// roof groups and wall by-products.
fn segment(
    footprint: &Footprint,
    rays: &RaySpec,
    non_roof_areas: &[Vec<DVec3>],
    feature_id: &str,
) -> GeometryResult<Segmented> {
    let mut points = footprint.points.clone();
    let mut ring = footprint.ring.clone();
    let cut = insert_cutting_rays(&mut points, &mut ring, rays)?;
    let dictionary = JumpDictionary::build(&points, &ring, &cut)?;

    let mut roof_groups = Vec::new();
    let mut top_triangles = Vec::new();
    for face in dictionary.sub_polygons() {
        let face = face?;
        let triangles = triangulate_lossy(&points, &face, feature_id);
        let Some(first) = triangles.first() else {
            continue;
        };
        if is_roof_area(first, non_roof_areas, &points) {
            roof_groups.push(triangles);
        } else {
            top_triangles.extend(triangles);
        }
    }

    Ok(Segmented {
        points,
        roof_groups,
        top_triangles,
    })
}

/// Extra vertices at `total - ratio · roof height` for every point.
fn lift(points: &[DVec3], ratios: impl IntoIterator<Item = f64>, heights: &BuildingHeights) -> Vec<DVec3> {
    let roof_height = heights.roof_height();
    points
        .iter()
        .zip(ratios)
        .map(|(p, ratio)| DVec3::new(p.x, heights.total_height - ratio * roof_height, p.z))
        .collect()
}

/// `value / max`, or zero when there is no spread.
fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}
