//! # Facade Patterns
//!
//! Window and door parameters for one building. The parameters are opaque
//! to the mesh code: they only key the texture-layer registry, and an
//! external texture generator turns each distinct design into an image.
//!
//! ## Building types
//!
//! | Type | Rule |
//! |------|------|
//! | `religious`, `synagogue` | church windows, no round tops |
//! | `commercial`, `retail` | fewer beams, no round tops |
//! | `roof`, `ruins`, `parking`, ... | no windows |
//! | anything else | windows, round tops allowed |

use crate::rng::BuildRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const CHURCH_TYPES: &[&str] = &["religious", "synagogue"];
const PRUNED_TYPES: &[&str] = &["commercial", "retail"];
const WINDOWLESS_TYPES: &[&str] = &[
    "roof",
    "ruins",
    "parking",
    "container",
    "shelter",
    "viaduct",
    "bunker",
    "anchorage",
    "tower",
];

/// Beam masks a window design draws from, left to right over five slots.
const BEAM_MASKS: &[u8] = &[0b00000, 0b00100, 0b01010, 0b01000, 0b10001];
/// Beam masks for pruned (commercial) facades.
const PRUNED_BEAM_MASKS: &[u8] = &[0b00000, 0b00100];

/// What a building type allows on its facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeRule {
    pub has_windows: bool,
    pub use_prune_rules: bool,
    pub can_have_round_top: bool,
    pub is_church: bool,
}

impl Default for FacadeRule {
    fn default() -> Self {
        Self {
            has_windows: true,
            use_prune_rules: false,
            can_have_round_top: true,
            is_church: false,
        }
    }
}

impl FacadeRule {
    /// Rule for a `type` property value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use building_mesh::facade::FacadeRule;
    ///
    /// assert!(FacadeRule::for_building_type("synagogue").is_church);
    /// assert!(!FacadeRule::for_building_type("parking").has_windows);
    /// assert_eq!(FacadeRule::for_building_type("house"), FacadeRule::default());
    /// ```
    pub fn for_building_type(building_type: &str) -> Self {
        if CHURCH_TYPES.contains(&building_type) {
            Self {
                has_windows: true,
                use_prune_rules: false,
                can_have_round_top: false,
                is_church: true,
            }
        } else if PRUNED_TYPES.contains(&building_type) {
            Self {
                has_windows: true,
                use_prune_rules: true,
                can_have_round_top: false,
                is_church: false,
            }
        } else if WINDOWLESS_TYPES.contains(&building_type) {
            Self {
                has_windows: false,
                use_prune_rules: false,
                can_have_round_top: false,
                is_church: false,
            }
        } else {
            Self::default()
        }
    }
}

/// How windows are grouped on a facade segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindowLayout {
    Single,
    Paired,
    PairedFlipped,
}

impl WindowLayout {
    const WEIGHTED: [(Self, u32); 3] = [(Self::Single, 70), (Self::Paired, 10), (Self::PairedFlipped, 20)];

    /// Facade width one window needs, in window widths: half window, half
    /// wall, and paired windows share a narrower gap.
    pub fn width_factor(self) -> f64 {
        match self {
            Self::Single => 2.0,
            Self::Paired | Self::PairedFlipped => 2.0 * 1.75,
        }
    }
}

/// Outline of the window top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindowShape {
    Normal,
    Round,
    Pointed,
}

impl WindowShape {
    const WEIGHTED: [(Self, u32); 3] = [(Self::Normal, 70), (Self::Round, 20), (Self::Pointed, 10)];
}

/// Parameters of one window texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowDesign {
    pub primary_beams: u8,
    pub secondary_beams: u8,
    pub flipped: bool,
    pub round_top: bool,
    pub church_top: bool,
}

/// Parameters of one door texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoorDesign {
    pub vertical_divisions: u8,
    pub horizontal_divisions: u8,
    pub glasses: u8,
    pub flipped: bool,
    pub round_top: bool,
}

/// Facade of one building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacadePattern {
    pub window: WindowDesign,
    pub door: DoorDesign,
    /// Window width in scene units; doubled for churches.
    pub window_width: f64,
    /// Window height in scene units.
    pub window_height: f64,
    pub shape: WindowShape,
    pub layout: WindowLayout,
    pub rule: FacadeRule,
}

/// Produces facade patterns; the batch asks once per building.
pub trait FacadeSource {
    fn facade(&mut self, building_type: &str, height_multiplier: f64, rng: &mut BuildRng) -> FacadePattern;
}

/// Draws every parameter from the batch random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFacadeSource;

impl FacadeSource for RandomFacadeSource {
    fn facade(&mut self, building_type: &str, height_multiplier: f64, rng: &mut BuildRng) -> FacadePattern {
        let rule = FacadeRule::for_building_type(building_type);

        // 1.4 m .. 2.4 m wide, 1.0 m .. 1.6 m high
        let width = 1.4 + 0.2 * f64::from(rng.0.gen_range(0..6u8));
        let height = 1.0 + 0.2 * f64::from(rng.0.gen_range(0..4u8));

        let shape = pick_weighted(&WindowShape::WEIGHTED, WindowShape::Normal, rng);
        let layout = if rule.is_church {
            WindowLayout::Single
        } else {
            pick_weighted(&WindowLayout::WEIGHTED, WindowLayout::Single, rng)
        };

        FacadePattern {
            window: random_window(rule, shape, rng),
            door: random_door(rng),
            window_width: width * height_multiplier * if rule.is_church { 2.0 } else { 1.0 },
            window_height: height * height_multiplier,
            shape,
            layout,
            rule,
        }
    }
}

fn pick_weighted<T: Copy>(options: &[(T, u32)], fallback: T, rng: &mut BuildRng) -> T {
    options
        .choose_weighted(&mut rng.0, |(_, weight)| *weight)
        .map_or(fallback, |(value, _)| *value)
}

fn random_window(rule: FacadeRule, shape: WindowShape, rng: &mut BuildRng) -> WindowDesign {
    let masks = if rule.use_prune_rules {
        PRUNED_BEAM_MASKS
    } else {
        BEAM_MASKS
    };
    let mut pick = || masks.choose(&mut rng.0).copied().unwrap_or(0);
    let primary_beams = pick();
    let secondary_beams = pick();
    WindowDesign {
        primary_beams,
        secondary_beams,
        flipped: rng.0.gen_bool(0.5),
        round_top: rule.can_have_round_top && shape != WindowShape::Normal,
        church_top: rule.is_church,
    }
}

fn random_door(rng: &mut BuildRng) -> DoorDesign {
    let vertical_divisions = rng.0.gen_range(0..3u8);
    DoorDesign {
        vertical_divisions,
        horizontal_divisions: rng.0.gen_range(0..3u8),
        glasses: rng.0.gen_range(0..=vertical_divisions),
        flipped: rng.0.gen_bool(0.5),
        round_top: rng.0.gen_bool(0.25),
    }
}
