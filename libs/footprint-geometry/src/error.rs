//! # Error Types
//!
//! Error types for footprint geometry operations.
//!
//! ## Error Policy
//!
//! - Degenerate geometry is reported through `Result`, never by panicking
//! - Every error is local to the polygon being processed; callers decide
//!   whether to degrade (drop a hole, fall back to a simpler roof) or skip
//! - A stalled triangulation hands back the triangles it already produced

use thiserror::Error;

/// A triangle as three indices into a point list.
pub type Triangle = [usize; 3];

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while processing a footprint polygon.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Ear clipping found no clippable ear during a full scan.
    #[error("Triangulation failed: {produced} triangles produced, {remaining} vertices left")]
    TriangulationFailure {
        /// Number of triangles emitted before the scan stalled
        produced: usize,
        /// Vertices still in the working list when the scan stalled
        remaining: usize,
    },

    /// No outer edge could be found to bridge a hole into.
    #[error("Corrupt hole data: {message}")]
    CorruptHoleData {
        /// What the bridge search ran into
        message: String,
    },

    /// A probe ray kept grazing vertices after every retry.
    #[error("Degenerate ray hit persisted after {attempts} probe positions")]
    DegenerateRayHit {
        /// Number of probe positions tried
        attempts: usize,
    },

    /// Jump dictionary traversal hit an entry that does not exist.
    #[error("Sub-polygon topology error: {message}")]
    SubPolygonTopology {
        /// Which lookup failed
        message: String,
    },

    /// A ring has too few distinct vertices to enclose an area.
    #[error("Degenerate ring with {len} vertices")]
    DegenerateRing {
        /// Number of vertices left in the ring
        len: usize,
    },

    /// Two directions are parallel (or zero) so no intersection exists.
    #[error("No intersection: directions are parallel or zero")]
    NoIntersection,
}

impl GeometryError {
    /// Creates a corrupt hole error.
    pub fn corrupt_hole(message: impl Into<String>) -> Self {
        Self::CorruptHoleData {
            message: message.into(),
        }
    }

    /// Creates a sub-polygon topology error.
    pub fn topology(message: impl Into<String>) -> Self {
        Self::SubPolygonTopology {
            message: message.into(),
        }
    }
}

/// Stalled ear clipping, carrying the triangles produced before the stall.
///
/// The partial result is usable (it covers part of the polygon) so callers
/// may keep it and flag the feature instead of discarding everything.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Triangulation failed with {remaining} vertices left")]
pub struct TriangulationFailure {
    /// Triangles emitted before the scan stalled.
    pub partial: Vec<Triangle>,
    /// Vertices still in the working list.
    pub remaining: usize,
}

impl TriangulationFailure {
    /// Keeps the partial triangles, dropping the failure report.
    pub fn into_partial(self) -> Vec<Triangle> {
        self.partial
    }
}

impl From<TriangulationFailure> for GeometryError {
    fn from(failure: TriangulationFailure) -> Self {
        GeometryError::TriangulationFailure {
            produced: failure.partial.len(),
            remaining: failure.remaining,
        }
    }
}

/// Result type alias for footprint geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

// =============================================================================
// TESTS
// =============================================================================
