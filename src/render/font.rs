//! TTF font loading and measurement.
//!
//! Tickets are set in Hanken Grotesk, deployed as one file per weight
//! (`adjusted-350.ttf` .. `adjusted-700.ttf`) alongside the image assets.
//! All weights are loaded once at startup; the layout engine measures
//! against them and the canvas rasterizes from them.

use ab_glyph::{Font, FontArc, ScaleFont};
use std::collections::HashMap;
use std::path::Path;

use crate::error::BoletoError;

/// Font weights deployed with the server.
pub const WEIGHTS: [u16; 6] = [350, 400, 500, 550, 600, 700];

pub const LIGHT: u16 = 350;
pub const MEDIUM: u16 = 500;
pub const SEMIBOLD: u16 = 600;

/// All deployed weights of the ticket typeface.
pub struct FontBook {
    fonts: HashMap<u16, FontArc>,
}

impl FontBook {
    /// Load every weight from `dir`, failing on the first missing or
    /// unparseable file.
    pub fn load(dir: &Path) -> Result<Self, BoletoError> {
        let mut fonts = HashMap::new();
        for weight in WEIGHTS {
            let path = dir.join(format!("adjusted-{weight}.ttf"));
            let bytes = std::fs::read(&path).map_err(|e| {
                BoletoError::Font(format!("failed to read {}: {}", path.display(), e))
            })?;
            let font = FontArc::try_from_vec(bytes).map_err(|e| {
                BoletoError::Font(format!("failed to parse {}: {}", path.display(), e))
            })?;
            fonts.insert(weight, font);
        }
        Ok(Self { fonts })
    }

    /// A book with no fonts, for tests and dry runs that never rasterize
    /// text. Every weight lookup fails.
    pub fn empty() -> Self {
        Self { fonts: HashMap::new() }
    }

    pub fn font(&self, weight: u16) -> Result<&FontArc, BoletoError> {
        self.fonts
            .get(&weight)
            .ok_or_else(|| BoletoError::Font(format!("no font loaded for weight {weight}")))
    }
}

/// Advance-sum width of a single line of text at the given pixel size.
pub fn line_width(font: &FontArc, px: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(px);
    text.chars().map(|ch| scaled.h_advance(font.glyph_id(ch))).sum()
}

/// Vertical metrics of one line at a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LineMetrics {
    pub fn of(font: &FontArc, px: f32) -> Self {
        let scaled = font.as_scaled(px);
        Self {
            ascent: scaled.ascent(),
            descent: scaled.descent(),
        }
    }

    /// Baseline-to-baseline advance for stacked lines.
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent
    }
}
