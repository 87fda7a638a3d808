//! Tests for the settings snapshot.

use super::*;

#[test]
fn default_settings_are_valid() {
    let settings = GeometrySettings::default();
    assert!(settings.height_multiplier > 0.0);
    assert_eq!(settings.skirt_depth, Some(SKIRT_DEPTH));
    assert_eq!(settings.tile_size, None);
    assert_eq!(settings.seed, DEFAULT_SEED);
}

#[test]
fn new_validates_inputs() {
    assert_eq!(
        GeometrySettings::new(0.0, None, None, 1).unwrap_err(),
        ConfigError::InvalidHeightMultiplier(0.0)
    );
    assert_eq!(
        GeometrySettings::new(1.0, Some(-1.0), None, 1).unwrap_err(),
        ConfigError::InvalidSkirtDepth(-1.0)
    );
    assert_eq!(
        GeometrySettings::new(1.0, None, Some(0.0), 1).unwrap_err(),
        ConfigError::InvalidTileSize(0.0)
    );
}

#[test]
fn new_rejects_nan_multiplier() {
    assert!(GeometrySettings::new(f64::NAN, None, None, 1).is_err());
}

#[test]
fn zero_skirt_depth_is_allowed() {
    let settings = GeometrySettings::new(1.0, Some(0.0), None, 3).expect("valid settings");
    assert_eq!(settings.skirt_depth, Some(0.0));
}

#[test]
fn error_messages_name_the_field() {
    let err = ConfigError::InvalidTileSize(-2.0);
    assert_eq!(err.to_string(), "tile_size must be positive: -2");
}
