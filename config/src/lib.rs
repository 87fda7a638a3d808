//! # Config Crate
//!
//! Centralized configuration constants for the building geometry pipeline.
//! All tolerances and tunable parameters are defined here to keep the
//! geometry and mesh crates consistent with each other.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_BUILDING_HEIGHT, POINT_EQ_EPSILON};
//!
//! // Use POINT_EQ_EPSILON for point identity
//! let gap: f64 = 1e-6;
//! assert!(gap < POINT_EQ_EPSILON);
//!
//! // Fall back to the default height when a feature has none
//! let height: Option<f64> = None;
//! assert_eq!(height.unwrap_or(DEFAULT_BUILDING_HEIGHT), 10.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Dependency-Free**: Pure constants and a validated settings snapshot
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
