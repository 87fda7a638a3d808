//! # Rooftop Instances
//!
//! Tall flat-roofed buildings get a piece of rooftop equipment (an air
//! vent) placed in one of their corners. The renderer draws all of them as
//! one instanced batch, so only the transform is produced here.

use crate::rng::BuildRng;
use crate::roof::RoofBuild;
use config::constants::ROOFTOP_INSTANCE_MIN_HEIGHT;
use footprint_geometry::predicates::{flat_normalize, is_convex};
use footprint_geometry::Footprint;
use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest deviation from a right angle for a usable corner, in degrees.
const CORNER_TOLERANCE_DEG: f64 = 10.0;

/// Distance from the corner (along its bisector) to the instance.
const CORNER_INSET: f64 = 2.0;

/// Distance along the bisector that must still be inside the footprint.
const CORNER_CLEARANCE: f64 = 4.0;

/// Transform of one rooftop instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooftopInstance {
    /// Feature the instance sits on.
    pub feature_id: String,
    /// Scene position; `y` is the scaled roof-start height.
    pub position: DVec3,
    /// Rotation about the vertical axis in radians, aligning the instance
    /// with the corner's incoming edge.
    pub yaw: f64,
    /// Per-axis scale; `y` is always 1.
    pub scale: DVec3,
    /// Point where the renderer samples the ground height (the building
    /// origin), so the instance moves with its building.
    pub lookup: DVec3,
}

/// Places at most one instance on the roof.
///
/// Only effectively flat roofs at least [`ROOFTOP_INSTANCE_MIN_HEIGHT`]
/// above the wall base are considered, and only every other one of those
/// (a coin flip) gets an instance. The first outer corner that is convex,
/// roughly square, has edges of at least one unit and leaves room along its
/// bisector receives it.
pub fn place_instance(
    feature_id: &str,
    footprint: &Footprint,
    roof: &RoofBuild,
    origin: DVec3,
    height_multiplier: f64,
    rng: &mut BuildRng,
) -> Option<RooftopInstance> {
    let heights = &roof.heights;
    if !roof.is_flat() || heights.roof_start_height - heights.min_height < ROOFTOP_INSTANCE_MIN_HEIGHT {
        return None;
    }
    if !rng.0.gen_bool(0.5) {
        return None;
    }

    let (corner, bisector, to_prev) = find_corner(footprint)?;
    let position = corner + bisector * CORNER_INSET;
    let scale = DVec3::new(rng.0.gen::<f64>() + 0.5, 1.0, rng.0.gen::<f64>() + 0.5);

    Some(RooftopInstance {
        feature_id: feature_id.to_string(),
        position: DVec3::new(position.x, heights.roof_start_height * height_multiplier, position.z),
        yaw: -to_prev.z.atan2(to_prev.x),
        scale,
        lookup: DVec3::new(origin.x, 0.0, origin.z),
    })
}

/// First usable corner of the outer loop: `(corner, bisector, to_prev)`.
fn find_corner(footprint: &Footprint) -> Option<(DVec3, DVec3, DVec3)> {
    let points = &footprint.points;
    let n = footprint.outer_len();
    (0..n).find_map(|i| {
        let v = points[i];
        let to_prev = points[(i + n - 1) % n] - v;
        let to_next = points[(i + 1) % n] - v;

        let angle = to_prev.angle_between(to_next).to_degrees();
        if !is_convex(to_prev, to_next)
            || (angle - 90.0).abs() > CORNER_TOLERANCE_DEG
            || to_prev.length_squared() < 1.0
            || to_next.length_squared() < 1.0
        {
            return None;
        }

        let bisector = flat_normalize(flat_normalize(to_prev) + flat_normalize(to_next));
        footprint
            .contains(v + bisector * CORNER_CLEARANCE)
            .then_some((v, bisector, to_prev))
    })
}
