//! Colour parsing and the built-in colour schemes.
//!
//! Colours travel over the API as `#rrggbb` strings. A palette pairs a
//! primary (pattern) colour with a foreign (background) colour under a
//! lookup key that clients pass as `color_scheme`.

use serde::{Serialize, Serializer};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string. Case-insensitive.
    pub fn parse_hex(value: &str) -> Result<Self, CoreError> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::Validation(format!(
                "Invalid colour '{value}'. Expected #rrggbb"
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CoreError::Validation(format!("Invalid colour '{value}'")))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Lower-case `#rrggbb` representation.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Build a colour from hue (degrees), saturation and lightness (`0.0..=1.0`).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self([to_u8(r), to_u8(g), to_u8(b)])
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// A named pair of colours.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Palette {
    pub key: &'static str,
    pub name: &'static str,
    pub primary: Rgb,
    pub foreign: Rgb,
}

/// Built-in colour schemes, in display order.
pub const PALETTES: &[Palette] = &[
    Palette {
        key: "sunset",
        name: "Sunset",
        primary: Rgb::new(0xff, 0x6b, 0x6b),
        foreign: Rgb::new(0xff, 0xe6, 0x6d),
    },
    Palette {
        key: "ocean",
        name: "Ocean",
        primary: Rgb::new(0x1e, 0x6f, 0xa8),
        foreign: Rgb::new(0xd6, 0xf0, 0xff),
    },
    Palette {
        key: "forest",
        name: "Forest",
        primary: Rgb::new(0x2d, 0x6a, 0x4f),
        foreign: Rgb::new(0xd8, 0xf3, 0xdc),
    },
    Palette {
        key: "candy",
        name: "Candy",
        primary: Rgb::new(0xd6, 0x33, 0x84),
        foreign: Rgb::new(0xff, 0xe3, 0xf1),
    },
    Palette {
        key: "mono",
        name: "Monochrome",
        primary: Rgb::new(0x22, 0x22, 0x22),
        foreign: Rgb::new(0xf0, 0xf0, 0xf0),
    },
    Palette {
        key: "ember",
        name: "Ember",
        primary: Rgb::new(0xe8, 0x5d, 0x04),
        foreign: Rgb::new(0x37, 0x06, 0x17),
    },
];

/// Look up a palette by key (case-insensitive).
pub fn find_palette(key: &str) -> Option<&'static Palette> {
    PALETTES.iter().find(|p| p.key.eq_ignore_ascii_case(key.trim()))
}

/// Like [`find_palette`], but an unknown key is a validation error.
pub fn require_palette(key: &str) -> Result<&'static Palette, CoreError> {
    find_palette(key).ok_or_else(|| {
        let known: Vec<&str> = PALETTES.iter().map(|p| p.key).collect();
        CoreError::Validation(format!(
            "Unknown color scheme '{key}'. Must be one of: {}",
            known.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::parse_hex("#FF8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::parse_hex("00ff7f").unwrap(), Rgb::new(0, 255, 127));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_matches!(Rgb::parse_hex("#fff"), Err(CoreError::Validation(_)));
        assert_matches!(Rgb::parse_hex("#gg0000"), Err(CoreError::Validation(_)));
        assert_matches!(Rgb::parse_hex(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn hex_output_is_lowercase() {
        assert_eq!(Rgb::new(0xAB, 0xCD, 0xEF).to_hex(), "#abcdef");
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::from_hsl(42.0, 0.0, 1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn palette_keys_are_unique() {
        for (i, a) in PALETTES.iter().enumerate() {
            for b in &PALETTES[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn palette_lookup_ignores_case() {
        assert_eq!(find_palette("OCEAN").map(|p| p.key), Some("ocean"));
        assert!(find_palette("lava").is_none());
    }

    #[test]
    fn unknown_palette_is_validation_error() {
        assert_matches!(require_palette("lava"), Err(CoreError::Validation(msg)) if msg.contains("sunset"));
    }
}
