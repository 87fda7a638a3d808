//! # Build Errors
//!
//! Error types for turning a feature into building meshes.

use footprint_geometry::GeometryError;
use thiserror::Error;

/// Errors that can occur while building one feature.
///
/// Every variant is local to a single feature: the batch processor logs it
/// and moves on to the next feature.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Error from the footprint geometry layer
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Roof shape needs a direction the feature does not provide
    #[error("Roof shape `{shape}` needs a roof direction")]
    MissingRoofDirection { shape: String },

    /// Property present but unusable
    #[error("Invalid property `{key}`: {message}")]
    InvalidProperty { key: String, message: String },

    /// Feature has no outer ring
    #[error("Feature has no outer ring")]
    EmptyFootprint,
}

impl BuildError {
    /// Creates an invalid property error.
    pub fn invalid_property(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProperty {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a missing roof direction error.
    pub fn missing_direction(shape: impl Into<String>) -> Self {
        Self::MissingRoofDirection {
            shape: shape.into(),
        }
    }
}

/// Result alias for feature building.
pub type BuildResult<T> = Result<T, BuildError>;
