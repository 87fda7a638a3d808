//! # Building Mesh
//!
//! Procedural building meshes from annotated footprints. Each feature (an
//! outline with holes plus properties such as `height`, `roofShape` and
//! `roofDirection`) becomes a facade mesh and a roof mesh.
//!
//! ## Architecture
//!
//! ```text
//! BuildingFeature ─> BuildingHeights ─┐
//!        │                            ├─> roof::build_roof ─> RoofBuild
//!        └─> Footprint ───────────────┘                          │
//!                                                               ▼
//!               FacadePattern + TextureLayers ─> assemble ─> FacadeMesh, RoofMesh
//! ```
//!
//! [`BatchProcessor`] drives this for a whole feature collection, sharing
//! centres and facades between the parts of one building, filtering hull
//! outlines and off-tile features, and placing rooftop instances.
//!
//! ## Example
//!
//! ```rust
//! use building_mesh::{BatchProcessor, BuildingFeature, RoofKind};
//! use glam::DVec3;
//!
//! let outer = vec![
//!     DVec3::new(-5.0, 0.0, 5.0),
//!     DVec3::new(5.0, 0.0, 5.0),
//!     DVec3::new(5.0, 0.0, -5.0),
//!     DVec3::new(-5.0, 0.0, -5.0),
//! ];
//! let feature = BuildingFeature::new("house", outer)
//!     .with_property("height", 9.0)
//!     .with_property("roofShape", "pyramidal");
//!
//! let output = BatchProcessor::default().process(&[feature]);
//! let house = &output.buildings[0];
//! assert_eq!(house.roof_kind, RoofKind::Pyramidal);
//! assert_eq!(house.roof.triangle_count(), 4);
//! ```

pub mod assemble;
pub mod batch;
pub mod color;
pub mod error;
pub mod facade;
pub mod feature;
pub mod mesh;
mod pipeline;
pub mod rng;
pub mod roof;
pub mod rooftop;
pub mod textures;

pub use batch::{
    BatchOutput, BatchProcessor, BuildingArena, BuildingMesh, FlatGround, GroundSampler, HullIndex,
    SkipReason, SkippedFeature,
};
pub use error::{BuildError, BuildResult};
pub use facade::{FacadePattern, FacadeSource, RandomFacadeSource};
pub use feature::{BuildingFeature, BuildingHeights};
pub use mesh::{FacadeMesh, RoofMesh};
pub use rng::BuildRng;
pub use roof::{build_roof, RoofBuild, RoofContext, RoofKind};
pub use rooftop::RooftopInstance;
pub use textures::TextureLayers;

#[cfg(test)]
mod tests;
