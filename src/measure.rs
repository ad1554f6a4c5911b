//! Text measurement and font resolution.
//!
//! The auto-sizing algorithm and both render modes measure text through
//! the [`TextMeasurer`] port, so geometry never depends on a display
//! surface. Two engines back it:
//!
//! - **Bitmap**: the Spleen 12×24 monospace cell scaled to the requested
//!   size. Always available, fully deterministic.
//! - **TTF**: an `ab_glyph` face registered at runtime via [`FontStore`],
//!   used when the element's font family has a loaded face.

use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{FONT_12X24, PSF2Font};

use crate::error::EtiquetaError;

/// Spleen base cell dimensions.
pub const BITMAP_CELL_WIDTH: usize = 12;
pub const BITMAP_CELL_HEIGHT: usize = 24;

/// Fraction of the em height above the baseline in the bitmap engine.
const BITMAP_ASCENT_RATIO: f32 = 0.8;

/// Font selection for one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }
}

/// Measured dimensions of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

/// Measurement port consumed by auto-sizing and the renderer.
pub trait TextMeasurer {
    fn measure(&self, text: &str, spec: &FontSpec) -> TextMetrics;
}

/// Metrics for the scaled Spleen cell: every glyph advances by half the
/// em height (12/24 aspect).
pub fn bitmap_metrics(text: &str, spec: &FontSpec) -> TextMetrics {
    let advance = spec.size * (BITMAP_CELL_WIDTH as f32 / BITMAP_CELL_HEIGHT as f32);
    TextMetrics {
        width: text.chars().count() as f32 * advance,
        ascent: spec.size * BITMAP_ASCENT_RATIO,
        descent: spec.size * (1.0 - BITMAP_ASCENT_RATIO),
    }
}

/// Generate the Spleen 12×24 bitmap for a character.
/// Returns row-major 0/1 bytes, or `None` when the glyph is missing.
pub fn bitmap_glyph(ch: char) -> Option<Vec<u8>> {
    let mut spleen = PSF2Font::new(FONT_12X24).ok()?;
    let utf8 = ch.to_string();
    let glyph = spleen.glyph_for_utf8(utf8.as_bytes())?;

    let mut cell = vec![0u8; BITMAP_CELL_WIDTH * BITMAP_CELL_HEIGHT];
    for (y, row) in glyph.enumerate() {
        for (x, on) in row.enumerate() {
            let idx = y * BITMAP_CELL_WIDTH + x;
            if idx < cell.len() {
                cell[idx] = if on { 1 } else { 0 };
            }
        }
    }
    Some(cell)
}

/// Registry of TTF faces keyed by (lowercased family, bold).
///
/// No font files ship with the crate; the host registers faces for the
/// families its templates use. Families without a face fall back to the
/// bitmap engine, so rendering always succeeds.
#[derive(Default)]
pub struct FontStore {
    faces: HashMap<(String, bool), FontArc>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TTF/OTF file for a family. `bold` selects the weight slot.
    pub fn register(
        &mut self,
        family: &str,
        bold: bool,
        path: impl AsRef<Path>,
    ) -> Result<(), EtiquetaError> {
        let bytes = std::fs::read(path.as_ref())?;
        let face = FontArc::try_from_vec(bytes)
            .map_err(|e| EtiquetaError::Font(format!("{}: {}", path.as_ref().display(), e)))?;
        self.faces.insert((family.to_lowercase(), bold), face);
        Ok(())
    }

    /// Resolve a spec to a registered face. Falls back to the regular
    /// weight when no bold face is registered for the family.
    pub fn face(&self, spec: &FontSpec) -> Option<&FontArc> {
        let family = spec.family.to_lowercase();
        self.faces
            .get(&(family.clone(), spec.bold))
            .or_else(|| self.faces.get(&(family, false)))
    }
}

impl TextMeasurer for FontStore {
    fn measure(&self, text: &str, spec: &FontSpec) -> TextMetrics {
        match self.face(spec) {
            Some(font) => {
                let scaled = font.as_scaled(spec.size);
                let mut width = 0.0f32;
                for ch in text.chars() {
                    width += scaled.h_advance(font.glyph_id(ch));
                }
                TextMetrics {
                    width,
                    ascent: scaled.ascent(),
                    descent: -scaled.descent(),
                }
            }
            None => bitmap_metrics(text, spec),
        }
    }
}
