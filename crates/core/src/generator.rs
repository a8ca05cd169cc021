//! Procedural avatar generation.
//!
//! Avatars are identicons: a SHA-256 digest of the seed selects cells of a
//! 5x5 grid whose columns mirror around the centre column. The grid is drawn
//! in the primary colour on a foreign (background) colour. Version 2 rotates
//! the pattern about the canvas centre.
//!
//! Colours resolve in priority order: explicit colour, then the named
//! palette, then a colour derived from the seed digest.

use image::{DynamicImage, RgbImage};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::imaging;
use crate::palette::{require_palette, Rgb};

/// Grid cells per side.
const GRID: usize = 5;

/// Columns that carry independent bits; the rest mirror them.
const HALF: usize = GRID / 2 + 1;

/// Default canvas edge length in pixels.
pub const DEFAULT_SIZE: u32 = 256;

/// Largest valid rotation angle in degrees (inclusive).
pub const MAX_ANGLE: u16 = 360;

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// Generator revision. Stored with every avatar as a semantic version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorVersion {
    V1,
    V2,
}

impl GeneratorVersion {
    pub fn tag(self) -> &'static str {
        match self {
            Self::V1 => "1.0.0",
            Self::V2 => "2.0.0",
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs / outputs
// ---------------------------------------------------------------------------

/// Caller-supplied generation parameters. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct AvatarParams {
    pub name: Option<String>,
    pub primary_color: Option<Rgb>,
    pub foreign_color: Option<Rgb>,
    pub color_scheme: Option<String>,
    pub seed: Option<String>,
}

/// A rendered avatar and the fully resolved parameters that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedAvatar {
    pub png: Vec<u8>,
    pub size: u32,
    pub name: String,
    pub seed: String,
    pub primary_color: Rgb,
    pub foreign_color: Rgb,
    pub color_scheme: Option<String>,
    pub angle: Option<u16>,
    pub version: GeneratorVersion,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Renders avatars at a fixed canvas size.
#[derive(Debug, Clone, Copy)]
pub struct AvatarGenerator {
    size: u32,
}

impl Default for AvatarGenerator {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

impl AvatarGenerator {
    pub fn new(size: u32) -> Result<Self, CoreError> {
        imaging::validate_size(size)?;
        Ok(Self { size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Version 1: upright pattern.
    pub fn generate_v1(&self, params: &AvatarParams) -> Result<GeneratedAvatar, CoreError> {
        self.render(params, None, GeneratorVersion::V1)
    }

    /// Version 2: pattern rotated by `angle` degrees (0..=360).
    pub fn generate_v2(
        &self,
        params: &AvatarParams,
        angle: u16,
    ) -> Result<GeneratedAvatar, CoreError> {
        validate_angle(angle)?;
        self.render(params, Some(angle), GeneratorVersion::V2)
    }

    fn render(
        &self,
        params: &AvatarParams,
        angle: Option<u16>,
        version: GeneratorVersion,
    ) -> Result<GeneratedAvatar, CoreError> {
        let seed = match params.seed.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();

        let palette = params
            .color_scheme
            .as_deref()
            .map(require_palette)
            .transpose()?;
        let (derived_primary, derived_foreign) = derive_colors(&digest);
        let primary_color = params
            .primary_color
            .or(palette.map(|p| p.primary))
            .unwrap_or(derived_primary);
        let foreign_color = params
            .foreign_color
            .or(palette.map(|p| p.foreign))
            .unwrap_or(derived_foreign);

        let grid = cell_pattern(&digest);
        let img = draw(&grid, self.size, angle.unwrap_or(0), primary_color, foreign_color);
        let png = imaging::encode_png(&DynamicImage::ImageRgb8(img))?;

        let name = match params.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => default_name(&digest),
        };

        Ok(GeneratedAvatar {
            png,
            size: self.size,
            name,
            seed,
            primary_color,
            foreign_color,
            color_scheme: palette.map(|p| p.key.to_string()),
            angle,
            version,
        })
    }
}

/// Validate a v2 rotation angle.
pub fn validate_angle(angle: u16) -> Result<(), CoreError> {
    if angle > MAX_ANGLE {
        return Err(CoreError::Validation(format!(
            "Angle must be between 0 and {MAX_ANGLE} (got {angle})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn default_name(digest: &[u8; 32]) -> String {
    let short: String = digest[..4].iter().map(|b| format!("{b:02x}")).collect();
    format!("avatar-{short}")
}

/// Seed-derived colours: a saturated primary and a pale tint of the same hue.
fn derive_colors(digest: &[u8; 32]) -> (Rgb, Rgb) {
    let hue = u16::from_be_bytes([digest[30], digest[31]]) as f32 % 360.0;
    let saturation = 0.45 + (digest[29] as f32 / 255.0) * 0.35;
    (
        Rgb::from_hsl(hue, saturation, 0.5),
        Rgb::from_hsl(hue, saturation * 0.5, 0.93),
    )
}

/// Mirror-symmetric cell grid from the first `GRID * HALF` digest bits.
fn cell_pattern(digest: &[u8; 32]) -> [[bool; GRID]; GRID] {
    let mut grid = [[false; GRID]; GRID];
    for (row, cells) in grid.iter_mut().enumerate() {
        for col in 0..HALF {
            let bit = row * HALF + col;
            let on = (digest[bit / 8] >> (bit % 8)) & 1 == 1;
            cells[col] = on;
            cells[GRID - 1 - col] = on;
        }
    }
    if grid.iter().flatten().all(|c| !c) {
        grid[GRID / 2][GRID / 2] = true;
    }
    grid
}

/// Rasterize the grid, sampling each pixel centre back through the rotation.
fn draw(
    grid: &[[bool; GRID]; GRID],
    size: u32,
    angle: u16,
    primary: Rgb,
    foreign: Rgb,
) -> RgbImage {
    let edge = size as f32;
    let margin = edge / 10.0;
    let cell = (edge - 2.0 * margin) / GRID as f32;
    let centre = edge / 2.0;
    let (sin, cos) = (-(angle as f32).to_radians()).sin_cos();

    RgbImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - centre;
        let dy = y as f32 + 0.5 - centre;
        let sx = dx * cos - dy * sin + centre;
        let sy = dx * sin + dy * cos + centre;

        let gx = ((sx - margin) / cell).floor();
        let gy = ((sy - margin) / cell).floor();
        let inside = (0.0..GRID as f32).contains(&gx) && (0.0..GRID as f32).contains(&gy);
        if inside && grid[gy as usize][gx as usize] {
            image::Rgb(primary.0)
        } else {
            image::Rgb(foreign.0)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn seeded(seed: &str) -> AvatarParams {
        AvatarParams {
            seed: Some(seed.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_params_generate_a_seed_and_name() {
        let out = AvatarGenerator::default().generate_v1(&AvatarParams::default()).unwrap();
        assert!(uuid::Uuid::parse_str(&out.seed).is_ok());
        assert!(out.name.starts_with("avatar-"));
        assert_eq!(out.version, GeneratorVersion::V1);
        assert_eq!(out.size, DEFAULT_SIZE);
        assert_eq!(imaging::dimensions(&out.png).unwrap(), (out.size, out.size));
    }

    #[test]
    fn same_seed_is_deterministic() {
        let generator = AvatarGenerator::new(64).unwrap();
        let a = generator.generate_v1(&seeded("alice")).unwrap();
        let b = generator.generate_v1(&seeded("alice")).unwrap();
        assert_eq!(a.png, b.png);
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn different_seeds_differ() {
        let generator = AvatarGenerator::new(64).unwrap();
        let a = generator.generate_v1(&seeded("alice")).unwrap();
        let b = generator.generate_v1(&seeded("bob")).unwrap();
        assert_ne!(a.png, b.png);
    }

    #[test]
    fn explicit_colours_beat_palette() {
        let params = AvatarParams {
            primary_color: Some(Rgb::new(1, 2, 3)),
            color_scheme: Some("ocean".into()),
            ..seeded("carol")
        };
        let out = AvatarGenerator::new(32).unwrap().generate_v1(&params).unwrap();
        assert_eq!(out.primary_color, Rgb::new(1, 2, 3));
        assert_eq!(out.foreign_color, crate::palette::find_palette("ocean").unwrap().foreign);
        assert_eq!(out.color_scheme.as_deref(), Some("ocean"));
    }

    #[test]
    fn unknown_scheme_rejected() {
        let params = AvatarParams {
            color_scheme: Some("lava".into()),
            ..Default::default()
        };
        assert_matches!(
            AvatarGenerator::default().generate_v1(&params),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn v2_rotation_changes_output() {
        let generator = AvatarGenerator::new(64).unwrap();
        let upright = generator.generate_v2(&seeded("dave"), 0).unwrap();
        let turned = generator.generate_v2(&seeded("dave"), 45).unwrap();
        assert_eq!(turned.angle, Some(45));
        assert_eq!(turned.version.tag(), "2.0.0");
        assert_ne!(upright.png, turned.png);
    }

    #[test]
    fn v2_full_turn_matches_upright() {
        let generator = AvatarGenerator::new(32).unwrap();
        let zero = generator.generate_v2(&seeded("erin"), 0).unwrap();
        let full = generator.generate_v2(&seeded("erin"), 360).unwrap();
        let zero_img = imaging::decode(&zero.png).unwrap().into_rgb8();
        let full_img = imaging::decode(&full.png).unwrap().into_rgb8();
        // Float error can only move cell edges, so the centre pixel must agree.
        assert_eq!(zero_img.get_pixel(16, 16), full_img.get_pixel(16, 16));
    }

    #[test]
    fn v2_angle_out_of_range_rejected() {
        assert_matches!(
            AvatarGenerator::default().generate_v2(&AvatarParams::default(), 361),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn generator_size_is_validated() {
        assert!(AvatarGenerator::new(8).is_err());
        assert_eq!(AvatarGenerator::new(128).unwrap().size(), 128);
    }

    #[test]
    fn pattern_is_mirrored_and_never_empty() {
        for seed in ["a", "b", "c", "d", "e"] {
            let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
            let grid = cell_pattern(&digest);
            for row in grid {
                for col in 0..GRID {
                    assert_eq!(row[col], row[GRID - 1 - col]);
                }
            }
            assert!(grid.iter().flatten().any(|c| *c));
        }
        assert!(cell_pattern(&[0u8; 32])[GRID / 2][GRID / 2]);
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let params = AvatarParams {
            name: Some("   ".into()),
            ..seeded("frank")
        };
        let out = AvatarGenerator::new(16).unwrap().generate_v1(&params).unwrap();
        assert!(out.name.starts_with("avatar-"));
    }
}
