//! # Footprint Geometry
//!
//! Planar polygon kernel for building footprints. Points are `DVec3` on the
//! XZ plane (`y` is height and ignored here); rings are index lists into a
//! shared point list.
//!
//! ## Architecture
//!
//! ```text
//! raw rings → polygon::prepare_ring → triangulate::merge_holes → Footprint
//!                                                                   │
//!                    triangulate::triangulate ◀──────────────────────┤
//!                                                                   │
//!        insert_cutting_rays → JumpDictionary → sub_polygons ◀─────┘
//! ```
//!
//! ## Modules
//!
//! - **predicates**: orientation, intersection and distance primitives
//! - **polygon**: winding, area, containment, ray casting, ring cleanup
//! - **triangulate**: ear clipping, hole bridging, ray-cut segmentation
//! - **footprint**: prepared outline with loop layout
//!
//! ## Usage
//!
//! ```rust
//! use footprint_geometry::Footprint;
//! use glam::DVec3;
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let outer = vec![
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(0.0, 0.0, 6.0),
//!     DVec3::new(8.0, 0.0, 6.0),
//!     DVec3::new(8.0, 0.0, 0.0),
//! ];
//! let footprint = Footprint::from_rings(outer, Vec::new(), &mut rng).unwrap();
//! let triangles = footprint.triangulate().unwrap();
//! assert_eq!(triangles.len(), 2);
//! ```

pub mod error;
pub mod footprint;
pub mod polygon;
pub mod predicates;
pub mod triangulate;

pub use error::{GeometryError, GeometryResult, Triangle, TriangulationFailure};
pub use footprint::Footprint;
pub use triangulate::{
    insert_cutting_rays, triangulate, CutResult, JumpDictionary, Node, RaySpec,
};
