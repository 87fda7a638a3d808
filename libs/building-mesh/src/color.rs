//! Colour strings from feature properties.
//!
//! Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and a small set of
//! colour names. Anything else is rejected so the caller can use its own
//! default.

/// Linear RGBA in `0.0..=1.0`.
pub type Rgba = [f32; 4];

const NAMED: &[(&str, Rgba)] = &[
    ("red", [1.0, 0.0, 0.0, 1.0]),
    ("cyan", [0.0, 1.0, 1.0, 1.0]),
    ("blue", [0.0, 0.0, 1.0, 1.0]),
    ("darkblue", [0.0, 0.0, 0.627, 1.0]),
    ("lightblue", [0.678, 0.847, 0.902, 1.0]),
    ("purple", [0.502, 0.0, 0.502, 1.0]),
    ("yellow", [1.0, 1.0, 0.0, 1.0]),
    ("lime", [0.0, 1.0, 0.0, 1.0]),
    ("fuchsia", [1.0, 0.0, 1.0, 1.0]),
    ("white", [1.0, 1.0, 1.0, 1.0]),
    ("silver", [0.753, 0.753, 0.753, 1.0]),
    ("grey", [0.502, 0.502, 0.502, 1.0]),
    ("gray", [0.502, 0.502, 0.502, 1.0]),
    ("black", [0.0, 0.0, 0.0, 1.0]),
    ("orange", [1.0, 0.647, 0.0, 1.0]),
    ("brown", [0.647, 0.165, 0.165, 1.0]),
    ("maroon", [0.502, 0.0, 0.0, 1.0]),
    ("green", [0.0, 0.502, 0.0, 1.0]),
    ("olive", [0.502, 0.502, 0.0, 1.0]),
    ("navy", [0.0, 0.0, 0.502, 1.0]),
    ("teal", [0.0, 0.502, 0.502, 1.0]),
    ("aqua", [0.0, 1.0, 1.0, 1.0]),
    ("magenta", [1.0, 0.0, 1.0, 1.0]),
];

/// Parses a colour string.
///
/// # Example
///
/// ```rust
/// use building_mesh::color::parse_color;
///
/// assert_eq!(parse_color("#ff0000"), Some([1.0, 0.0, 0.0, 1.0]));
/// assert_eq!(parse_color("White"), Some([1.0, 1.0, 1.0, 1.0]));
/// assert_eq!(parse_color("ff0000"), None);
/// ```
pub fn parse_color(text: &str) -> Option<Rgba> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = text.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgba)| *rgba)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    let (r, g, b, a) = match hex.len() {
        3 => (
            expand_nibble(value >> 8),
            expand_nibble(value >> 4),
            expand_nibble(value),
            0xFF,
        ),
        4 => (
            expand_nibble(value >> 12),
            expand_nibble(value >> 8),
            expand_nibble(value >> 4),
            expand_nibble(value),
        ),
        6 => ((value >> 16) & 0xFF, (value >> 8) & 0xFF, value & 0xFF, 0xFF),
        8 => (
            (value >> 24) & 0xFF,
            (value >> 16) & 0xFF,
            (value >> 8) & 0xFF,
            value & 0xFF,
        ),
        _ => return None,
    };
    Some([channel(r), channel(g), channel(b), channel(a)])
}

fn expand_nibble(value: u32) -> u32 {
    let nibble = value & 0xF;
    (nibble << 4) | nibble
}

fn channel(value: u32) -> f32 {
    value as f32 / 255.0
}
