//! # Building Features
//!
//! One footprint (outer ring plus holes) with the loosely typed property map
//! it came with. Tile data is not consistent about types: heights arrive as
//! numbers or as numeric strings, so the accessors accept both.

use crate::error::{BuildError, BuildResult};
use crate::roof::RoofKind;
use config::constants::{
    DEFAULT_BUILDING_HEIGHT, DEFAULT_ROOF_HEIGHT_CAP, DEFAULT_ROOF_HEIGHT_RATIO, HEIGHT_EPSILON,
    LEVEL_HEIGHT,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A building or building part.
///
/// Rings are planar points in scene coordinates (`y` ignored); a closing
/// point equal to the first one is allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFeature {
    /// Identifier used in logs and output.
    pub id: String,
    /// Outer ring.
    pub outer: Vec<DVec3>,
    /// Hole rings.
    #[serde(default)]
    pub holes: Vec<Vec<DVec3>>,
    /// Raw properties (`height`, `roofShape`, `building`, ...).
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl BuildingFeature {
    /// Creates a feature without holes or properties.
    pub fn new(id: impl Into<String>, outer: Vec<DVec3>) -> Self {
        Self {
            id: id.into(),
            outer,
            holes: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Adds a hole ring.
    pub fn with_hole(mut self, hole: Vec<DVec3>) -> Self {
        self.holes.push(hole);
        self
    }

    /// Sets a property.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Whether the property is present and not null.
    pub fn has(&self, key: &str) -> bool {
        self.properties.get(key).is_some_and(|v| !v.is_null())
    }

    /// Numeric property. Numeric strings are parsed.
    ///
    /// # Errors
    ///
    /// [`BuildError::InvalidProperty`] for values that are not numbers.
    pub fn number(&self, key: &str) -> BuildResult<Option<f64>> {
        match self.properties.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| BuildError::invalid_property(key, "number out of range")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| BuildError::invalid_property(key, format!("`{s}`: {e}"))),
            Some(other) => Err(BuildError::invalid_property(
                key,
                format!("expected a number, got {other}"),
            )),
        }
    }

    /// Integer property, rounded from any numeric value.
    pub fn integer(&self, key: &str) -> BuildResult<Option<i64>> {
        Ok(self.number(key)?.map(|n| n.round() as i64))
    }

    /// Textual property. Numbers are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Roof shape; features without one have a flat roof.
    pub fn roof_kind(&self) -> RoofKind {
        self.text("roofShape")
            .map_or(RoofKind::Flat, |shape| RoofKind::parse(&shape))
    }

    /// Roof direction in degrees clockwise from north.
    pub fn roof_direction(&self) -> BuildResult<Option<f64>> {
        self.number("roofDirection")
    }

    /// Shared building id of a building part.
    pub fn building_id(&self) -> Option<String> {
        self.text("building")
    }

    /// Building type hint for facade patterns; empty when absent.
    pub fn building_type(&self) -> String {
        self.text("type").unwrap_or_default()
    }
}

/// Vertical layout of a building, in metres above ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingHeights {
    /// Bottom of the walls.
    pub min_height: f64,
    /// Top of the roof.
    pub total_height: f64,
    /// Top of the walls, where the roof begins.
    pub roof_start_height: f64,
    /// Whether the walls start on the ground.
    pub is_ground_level: bool,
}

impl BuildingHeights {
    /// Reads `minHeight`, `height` and `roofHeight`.
    ///
    /// Non-flat roofs without a `roofHeight` get `min(3, 0.3 · (height -
    /// minHeight))`. A roof height that does not fit under `height` is
    /// stacked on top of it instead. Flat roofs start at the total height.
    ///
    /// # Example
    ///
    /// ```rust
    /// use building_mesh::{BuildingFeature, BuildingHeights};
    ///
    /// let feature = BuildingFeature::new("b", Vec::new())
    ///     .with_property("height", 9.0)
    ///     .with_property("roofShape", "pyramidal");
    /// let heights = BuildingHeights::from_feature(&feature, &feature.roof_kind()).unwrap();
    /// assert!((heights.roof_start_height - 6.3).abs() < 1e-9);
    /// assert_eq!(heights.total_height, 9.0);
    /// ```
    pub fn from_feature(feature: &BuildingFeature, kind: &RoofKind) -> BuildResult<Self> {
        let min_height = feature.number("minHeight")?.unwrap_or(0.0);
        let raw_height = feature
            .number("height")?
            .unwrap_or(DEFAULT_BUILDING_HEIGHT);
        let roof_height = match feature.number("roofHeight")? {
            Some(h) => h,
            None if !kind.is_flat() => {
                DEFAULT_ROOF_HEIGHT_CAP.min((raw_height - min_height) * DEFAULT_ROOF_HEIGHT_RATIO)
            }
            None => 0.0,
        };

        let fits = roof_height + min_height < raw_height
            || (roof_height + min_height - raw_height).abs() < HEIGHT_EPSILON;
        let (total_height, roof_start_height) = if fits {
            (raw_height, raw_height - roof_height)
        } else {
            (roof_height, raw_height)
        };

        let heights = Self {
            min_height,
            total_height,
            roof_start_height,
            is_ground_level: min_height == 0.0,
        };
        Ok(if kind.is_flat() {
            heights.flattened()
        } else {
            heights
        })
    }

    /// Roof height between wall top and roof top.
    pub fn roof_height(&self) -> f64 {
        self.total_height - self.roof_start_height
    }

    /// Same heights with the roof collapsed onto the wall top.
    pub fn flattened(self) -> Self {
        Self {
            roof_start_height: self.total_height,
            ..self
        }
    }

    /// Number of facade levels: `levels` (or wall height / 3 m) minus
    /// `minLevel`, never negative.
    pub fn levels(&self, feature: &BuildingFeature) -> BuildResult<i64> {
        let levels = match feature.integer("levels")? {
            Some(levels) => levels,
            None => ((self.roof_start_height - self.min_height) / LEVEL_HEIGHT) as i64,
        };
        let min_level = feature.integer("minLevel")?.unwrap_or(0);
        Ok((levels - min_level).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn feature() -> BuildingFeature {
        BuildingFeature::new("f", Vec::new())
    }

    #[test]
    fn test_numbers_accept_numeric_strings() {
        let f = feature()
            .with_property("height", "12.5")
            .with_property("levels", 4);
        assert_eq!(f.number("height").unwrap(), Some(12.5));
        assert_eq!(f.integer("levels").unwrap(), Some(4));
        assert_eq!(f.number("missing").unwrap(), None);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let f = feature().with_property("height", "tall");
        let err = f.number("height").unwrap_err();
        assert!(matches!(err, BuildError::InvalidProperty { ref key, .. } if key == "height"));

        let f = feature().with_property("height", json!([1, 2]));
        assert!(f.number("height").is_err());
    }

    #[test]
    fn test_text_renders_numbers() {
        let f = feature().with_property("building", 1234);
        assert_eq!(f.building_id().as_deref(), Some("1234"));
        assert_eq!(f.building_type(), "");
    }

    #[test]
    fn test_default_heights() {
        let f = feature();
        let h = BuildingHeights::from_feature(&f, &f.roof_kind()).unwrap();
        assert_eq!(h.total_height, DEFAULT_BUILDING_HEIGHT);
        assert_eq!(h.roof_start_height, DEFAULT_BUILDING_HEIGHT);
        assert!(h.is_ground_level);
        assert_eq!(h.levels(&f).unwrap(), 3);
    }

    #[test]
    fn test_default_roof_height_is_capped() {
        let f = feature()
            .with_property("height", 30.0)
            .with_property("roofShape", "gabled");
        let h = BuildingHeights::from_feature(&f, &f.roof_kind()).unwrap();
        assert_relative_eq!(h.roof_height(), 3.0);
        assert_relative_eq!(h.roof_start_height, 27.0);
    }

    #[test]
    fn test_oversized_roof_stacks_on_top() {
        let f = feature()
            .with_property("height", 5.0)
            .with_property("roofHeight", 8.0)
            .with_property("roofShape", "dome");
        let h = BuildingHeights::from_feature(&f, &f.roof_kind()).unwrap();
        assert_eq!(h.total_height, 8.0);
        assert_eq!(h.roof_start_height, 5.0);
    }

    #[test]
    fn test_floating_part_and_min_level() {
        let f = feature()
            .with_property("minHeight", 6.0)
            .with_property("height", 18.0)
            .with_property("minLevel", 2);
        let h = BuildingHeights::from_feature(&f, &f.roof_kind()).unwrap();
        assert!(!h.is_ground_level);
        assert_eq!(h.levels(&f).unwrap(), 2);
    }

    #[test]
    fn test_flat_roof_ignores_roof_height() {
        let f = feature()
            .with_property("height", 12.0)
            .with_property("roofHeight", 2.0);
        let h = BuildingHeights::from_feature(&f, &f.roof_kind()).unwrap();
        assert_eq!(h.roof_start_height, 12.0);
        assert_eq!(h.roof_height(), 0.0);
    }
}
