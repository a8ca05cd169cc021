//! Named single-purpose image filters.
//!
//! A request selects at most one filter by name; there is no chaining.

use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, Rgba};

use crate::error::CoreError;

/// Filter name: luma conversion.
pub const FILTER_GRAYSCALE: &str = "grayscale";

/// Filter name: warm brown tone.
pub const FILTER_SEPIA: &str = "sepia";

/// Filter name: colour inversion.
pub const FILTER_NEGATIVE: &str = "negative";

/// All recognized filter names.
pub const ALL_FILTER_NAMES: &[&str] = &[FILTER_GRAYSCALE, FILTER_SEPIA, FILTER_NEGATIVE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Grayscale,
    Sepia,
    Negative,
}

impl FilterType {
    /// Parse a filter name (case-insensitive, surrounding whitespace ignored).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            FILTER_GRAYSCALE => Ok(Self::Grayscale),
            FILTER_SEPIA => Ok(Self::Sepia),
            FILTER_NEGATIVE => Ok(Self::Negative),
            _ => Err(CoreError::Validation(format!(
                "Unsupported filter '{name}'. Must be one of: {}",
                ALL_FILTER_NAMES.join(", ")
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => FILTER_GRAYSCALE,
            Self::Sepia => FILTER_SEPIA,
            Self::Negative => FILTER_NEGATIVE,
        }
    }

    /// Apply this filter, returning a new image with the same dimensions.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Grayscale => img.grayscale(),
            Self::Sepia => sepia(img),
            Self::Negative => {
                let mut img = img;
                img.invert();
                img
            }
        }
    }
}

impl FromStr for FilterType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sepia(img: DynamicImage) -> DynamicImage {
    let mut rgba = img.into_rgba8();
    for Rgba([r, g, b, _]) in rgba.pixels_mut() {
        let (fr, fg, fb) = (*r as f32, *g as f32, *b as f32);
        let tone = |cr: f32, cg: f32, cb: f32| (fr * cr + fg * cg + fb * cb).min(255.0) as u8;
        let (nr, ng, nb) = (
            tone(0.393, 0.769, 0.189),
            tone(0.349, 0.686, 0.168),
            tone(0.272, 0.534, 0.131),
        );
        *r = nr;
        *g = ng;
        *b = nb;
    }
    DynamicImage::ImageRgba8(rgba)
}
