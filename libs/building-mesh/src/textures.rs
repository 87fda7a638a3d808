//! # Texture Layers
//!
//! Per-batch registry mapping facade designs to texture-array layers. The
//! facade UVs carry the layer numbers in their third and fourth channel:
//!
//! - single-window layouts get positive layers `1, 2, ...`
//! - paired layouts get negative layers `-1, -2, ...` (the sign picks the
//!   texture array, so zero is never used for windows)
//! - doors get `0, 1, ...`
//!
//! Only one church window layer is created per batch; every church facade
//! shares it.

use crate::facade::{DoorDesign, FacadePattern, WindowDesign, WindowLayout};
use config::constants::MAX_TEXTURE_LAYERS;
use serde::{Deserialize, Serialize};

const MAX_DEPTH: i32 = MAX_TEXTURE_LAYERS as i32;

/// Wraps a layer number into the texture array depth, keeping its sign and
/// skipping the church layer.
///
/// # Example
///
/// ```rust
/// use building_mesh::textures::mod_uv_depth;
///
/// assert_eq!(mod_uv_depth(5, None), 5);
/// assert_eq!(mod_uv_depth(-1030, None), -7);
/// assert_eq!(mod_uv_depth(3, Some(3)), 2);
/// ```
pub fn mod_uv_depth(depth: i32, church_layer: Option<i32>) -> i32 {
    let magnitude = depth.abs();
    let wrapped = magnitude % MAX_DEPTH + i32::from(magnitude >= MAX_DEPTH);
    let layer = wrapped * depth.signum();
    if Some(layer) == church_layer {
        layer - 1
    } else {
        layer
    }
}

/// Clamps a layer count into `0..=MAX_TEXTURE_LAYERS`.
pub fn clamp_uv_depth(depth: i32) -> i32 {
    depth.clamp(0, MAX_DEPTH)
}

/// Layers assigned to one building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerAssignment {
    pub window: i32,
    pub door: i32,
    /// Batch church layer at the time of assignment.
    pub church: Option<i32>,
}

impl LayerAssignment {
    /// Window channel value for the facade UVs.
    pub fn window_channel(&self, is_church: bool) -> i32 {
        match (is_church, self.church) {
            (true, Some(church)) => church,
            _ => mod_uv_depth(self.window, self.church),
        }
    }

    /// Door channel value for the facade UVs.
    pub fn door_channel(&self) -> i32 {
        mod_uv_depth(self.door, self.church)
    }
}

/// Window texture registered in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowLayer {
    pub design: WindowDesign,
    pub layout: WindowLayout,
    pub layer: i32,
}

/// Door texture registered in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorLayer {
    pub design: DoorDesign,
    pub layer: i32,
}

/// Registry of every texture a batch needs, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureLayers {
    windows: Vec<WindowLayer>,
    doors: Vec<DoorLayer>,
    church_window: Option<i32>,
}

impl TextureLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the pattern's window and door designs (if new and there is
    /// room) and returns the layers the building should reference.
    ///
    /// Designs seen before keep their layer. When the registry is full the
    /// next layer number is returned anyway and wraps in [`mod_uv_depth`].
    pub fn register(&mut self, pattern: &FacadePattern) -> LayerAssignment {
        let window = match self.window_layer(&pattern.window, pattern.layout) {
            Some(layer) => layer,
            None => {
                let layer = self.next_window_layer(pattern.layout);
                let church_taken = pattern.rule.is_church && self.church_window.is_some();
                if self.windows.len() < MAX_TEXTURE_LAYERS && !church_taken {
                    self.windows.push(WindowLayer {
                        design: pattern.window,
                        layout: pattern.layout,
                        layer,
                    });
                    if pattern.rule.is_church {
                        self.church_window = Some(layer);
                    }
                }
                layer
            }
        };

        let door = match self.door_layer(&pattern.door) {
            Some(layer) => layer,
            None => {
                let layer = self.doors.len() as i32;
                if self.doors.len() < MAX_TEXTURE_LAYERS {
                    self.doors.push(DoorLayer {
                        design: pattern.door,
                        layer,
                    });
                }
                layer
            }
        };

        LayerAssignment {
            window,
            door,
            church: self.church_window,
        }
    }

    fn window_layer(&self, design: &WindowDesign, layout: WindowLayout) -> Option<i32> {
        self.windows
            .iter()
            .find(|w| w.design == *design && w.layout == layout)
            .map(|w| w.layer)
    }

    fn door_layer(&self, design: &DoorDesign) -> Option<i32> {
        self.doors.iter().find(|d| d.design == *design).map(|d| d.layer)
    }

    fn next_window_layer(&self, layout: WindowLayout) -> i32 {
        match layout {
            WindowLayout::Single => self.single_count() as i32 + 1,
            WindowLayout::Paired | WindowLayout::PairedFlipped => -(self.paired_count() as i32 + 1),
        }
    }

    fn single_count(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| w.layout == WindowLayout::Single)
            .count()
    }

    fn paired_count(&self) -> usize {
        self.windows.len() - self.single_count()
    }

    /// Registered window textures.
    pub fn windows(&self) -> &[WindowLayer] {
        &self.windows
    }

    /// Registered door textures.
    pub fn doors(&self) -> &[DoorLayer] {
        &self.doors
    }

    /// Layer of the church window, if any church was registered.
    pub fn church_window(&self) -> Option<i32> {
        self.church_window
    }

    /// Depth of the single-window texture array (layer 0 unused).
    pub fn single_depth(&self) -> i32 {
        clamp_uv_depth(self.single_count() as i32 + 1)
    }

    /// Depth of the paired-window texture array (layer 0 unused).
    pub fn paired_depth(&self) -> i32 {
        clamp_uv_depth(self.paired_count() as i32 + 1)
    }

    /// Depth of the door texture array.
    pub fn door_depth(&self) -> i32 {
        clamp_uv_depth(self.doors.len() as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty() && self.doors.is_empty()
    }
}
