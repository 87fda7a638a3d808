//! # Configuration Constants
//!
//! Centralized constants for the building geometry pipeline. Every tolerance,
//! probe distance and default used by footprint processing, roof generation and
//! mesh assembly is defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Probing**: Ray casting distances and retry bounds
//! - **Heights**: Building and roof height defaults
//! - **Texturing**: UV scaling and texture-array limits
//! - **Batch**: Filters applied across a whole feature collection

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Distance below which two points are considered the same point.
///
/// Footprint coordinates arrive as single-precision scene positions, so point
/// identity is decided approximately rather than bit for bit.
///
/// # Example
///
/// ```rust
/// use config::constants::POINT_EQ_EPSILON;
///
/// let a = [1.0_f64, 2.0];
/// let b = [1.0 + 1e-7, 2.0];
/// let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
/// assert!(d < POINT_EQ_EPSILON);
/// ```
pub const POINT_EQ_EPSILON: f64 = 1e-5;

/// Distance from a vertex to the segment spanned by its neighbours below which
/// the vertex is treated as lying on that segment.
///
/// # Example
///
/// ```rust
/// use config::constants::COLLINEAR_DISTANCE_EPSILON;
///
/// let sag = 5e-5;
/// assert!(sag < COLLINEAR_DISTANCE_EPSILON);
/// ```
pub const COLLINEAR_DISTANCE_EPSILON: f64 = 1e-4;

/// Relative tolerance on the 2D cross product (scaled by both vector lengths)
/// below which two edge directions count as parallel.
///
/// # Example
///
/// ```rust
/// use config::constants::PARALLEL_EPSILON;
///
/// let (a, b) = ([2.0_f64, 0.0], [-3.0_f64, 1e-14]);
/// let cross = a[0] * b[1] - a[1] * b[0];
/// assert!(cross.abs() <= PARALLEL_EPSILON * 2.0 * 3.0);
/// ```
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// Relative tolerance for "approximately equal" height comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::HEIGHT_EPSILON;
///
/// let (a, b) = (10.0_f64, 10.0 + 1e-7);
/// assert!((a - b).abs() <= HEIGHT_EPSILON * a.abs().max(b.abs()).max(1.0));
/// ```
pub const HEIGHT_EPSILON: f64 = 1e-6;

// =============================================================================
// PROBING CONSTANTS
// =============================================================================

/// Distance used to place probe points safely outside a footprint.
///
/// Ray origins for ridge detection and point-in-polygon tests are moved this
/// far along the ray so they start outside any building footprint.
///
/// # Example
///
/// ```rust
/// use config::constants::FAR_PROBE_DISTANCE;
///
/// let mid = 3.0_f64;
/// let start = mid - FAR_PROBE_DISTANCE;
/// assert!(start < -90.0);
/// ```
pub const FAR_PROBE_DISTANCE: f64 = 100.0;

/// Maximum number of probe positions tried when determining winding order.
///
/// A probe that grazes a vertex exactly is ambiguous; the probe is moved to a
/// random offset and tried again until this bound is reached.
///
/// # Example
///
/// ```rust
/// use config::constants::WINDING_PROBE_MAX_ATTEMPTS;
///
/// assert!(WINDING_PROBE_MAX_ATTEMPTS > 1);
/// ```
pub const WINDING_PROBE_MAX_ATTEMPTS: usize = 16;

/// Relative range (of the bounding-box width) in which retried winding probes
/// are placed: `[0.5 - r, 0.5 + r]`.
pub const WINDING_PROBE_JITTER: f64 = 0.25;

// =============================================================================
// HEIGHT CONSTANTS
// =============================================================================

/// Height in metres assumed when a feature carries no `height` property.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_BUILDING_HEIGHT;
///
/// let height: Option<f64> = None;
/// assert_eq!(height.unwrap_or(DEFAULT_BUILDING_HEIGHT), 10.0);
/// ```
pub const DEFAULT_BUILDING_HEIGHT: f64 = 10.0;

/// Upper bound of the derived roof height for sloped roofs without an explicit
/// `roofHeight` property.
pub const DEFAULT_ROOF_HEIGHT_CAP: f64 = 3.0;

/// Share of the wall height used as derived roof height for sloped roofs.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_ROOF_HEIGHT_CAP, DEFAULT_ROOF_HEIGHT_RATIO};
///
/// let roof = (9.0_f64 * DEFAULT_ROOF_HEIGHT_RATIO).min(DEFAULT_ROOF_HEIGHT_CAP);
/// assert!((roof - 2.7).abs() < 1e-12);
/// ```
pub const DEFAULT_ROOF_HEIGHT_RATIO: f64 = 0.3;

/// Storey height in metres used to derive a level count.
pub const LEVEL_HEIGHT: f64 = 3.0;

/// Depth of the below-ground wall ring emitted for ground-level buildings.
///
/// Keeps buildings on sloped terrain from floating above the ground.
pub const SKIRT_DEPTH: f64 = 10.0;

/// Minimum distance between roof base and footprint base for a flat roof to
/// receive a rooftop instance.
pub const ROOFTOP_INSTANCE_MIN_HEIGHT: f64 = 10.0;

// =============================================================================
// TEXTURING CONSTANTS
// =============================================================================

/// Maximum depth of a texture array referenced by window/door UV channels.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_TEXTURE_LAYERS;
///
/// let requested = 5000;
/// assert_eq!(requested.min(MAX_TEXTURE_LAYERS as i32), 1024);
/// ```
pub const MAX_TEXTURE_LAYERS: usize = 1024;

/// Texture repetitions per metre on roof surfaces (before height scaling).
pub const ROOF_UV_SCALE: f64 = 16.0;

/// Dot product above which two projected roof normals share one UV frame.
pub const NORMAL_GROUPING_DOT: f64 = 0.95;

// =============================================================================
// BATCH CONSTANTS
// =============================================================================

/// Absolute area difference under which a footprint matches the summed area of
/// a multi-part building.
pub const HULL_AREA_TOLERANCE: f64 = 0.1;

/// Share of footprint vertices that must coincide with building-part vertices
/// for the footprint to be treated as a hull outline.
pub const HULL_SHARED_VERTEX_RATIO: f64 = 0.6;

/// Seed used by the deterministic random source when none is configured.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SEED;
///
/// assert_eq!(DEFAULT_SEED, 42);
/// ```
pub const DEFAULT_SEED: u64 = 42;

// =============================================================================
// SETTINGS
// =============================================================================

/// Immutable snapshot of the tunables a batch is processed with.
///
/// # Examples
/// ```
/// use config::constants::GeometrySettings;
/// let settings = GeometrySettings::default();
/// assert_eq!(settings.height_multiplier, 1.0);
/// assert!(settings.skirt_depth.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySettings {
    /// Scene units per metre in the vertical direction.
    pub height_multiplier: f64,
    /// Depth of the below-ground ring for ground-level buildings; `None`
    /// disables the ring.
    pub skirt_depth: Option<f64>,
    /// Edge length of the tile square centred on the origin. Features whose
    /// centre falls outside are skipped; `None` keeps every feature.
    pub tile_size: Option<f64>,
    /// Seed of the deterministic random source.
    pub seed: u64,
}

impl GeometrySettings {
    /// Builds settings, rejecting non-positive scales and negative depths.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GeometrySettings;
    /// let settings = GeometrySettings::new(0.5, None, Some(50.0), 7).expect("valid settings");
    /// assert_eq!(settings.seed, 7);
    /// ```
    pub fn new(
        height_multiplier: f64,
        skirt_depth: Option<f64>,
        tile_size: Option<f64>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if !(height_multiplier > 0.0) || !height_multiplier.is_finite() {
            return Err(ConfigError::InvalidHeightMultiplier(height_multiplier));
        }
        if let Some(depth) = skirt_depth {
            if !(depth >= 0.0) || !depth.is_finite() {
                return Err(ConfigError::InvalidSkirtDepth(depth));
            }
        }
        if let Some(size) = tile_size {
            if !(size > 0.0) || !size.is_finite() {
                return Err(ConfigError::InvalidTileSize(size));
            }
        }
        Ok(Self {
            height_multiplier,
            skirt_depth,
            tile_size,
            seed,
        })
    }
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            height_multiplier: 1.0,
            skirt_depth: Some(SKIRT_DEPTH),
            tile_size: None,
            seed: DEFAULT_SEED,
        }
    }
}

/// Error returned when invalid settings are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the height multiplier is zero, negative or not finite.
    InvalidHeightMultiplier(f64),
    /// Raised when the skirt depth is negative or not finite.
    InvalidSkirtDepth(f64),
    /// Raised when the tile size is zero, negative or not finite.
    InvalidTileSize(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHeightMultiplier(value) => {
                write!(f, "height_multiplier must be positive: {value}")
            }
            ConfigError::InvalidSkirtDepth(value) => {
                write!(f, "skirt_depth must be >= 0: {value}")
            }
            ConfigError::InvalidTileSize(value) => {
                write!(f, "tile_size must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
