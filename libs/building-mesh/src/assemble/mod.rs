//! # Mesh Assembly
//!
//! Turns a footprint and its [`RoofBuild`](crate::roof::RoofBuild) into the
//! two renderer buffers:
//!
//! ```text
//!   connection ring  ─┐  follows the lifted roof vertices (sloped roofs)
//!   roof-start ring   │  walls: quad strips between consecutive rings
//!   base ring         │
//!   skirt ring       ─┘  below ground, hides terrain gaps
//! ```
//!
//! All positions are relative to the building origin (the shared centre of
//! a multi-part building) and scaled by the height multiplier.

mod facade;
mod roof;

pub use facade::{assemble_facade, FacadeInput};
pub use roof::{assemble_roof, RoofInput};
