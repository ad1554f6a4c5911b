//! Physical unit conversion.
//!
//! Label dimensions are authored in physical units (millimeters,
//! centimeters, inches) or directly in pixels. All rendering happens in
//! device pixels at the fixed 96 DPI reference resolution, so conversion
//! is a constant multiply and never fails.

use serde::{Deserialize, Serialize};

/// Pixels per millimeter at the 96 DPI reference resolution.
pub const PX_PER_MM: f32 = 3.779_527_6;

/// Pixels per centimeter.
pub const PX_PER_CM: f32 = 37.795_276;

/// Pixels per inch.
pub const PX_PER_IN: f32 = 96.0;

/// Measurement unit for label dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
    In,
    Px,
}

impl Unit {
    /// Conversion factor from this unit to device pixels.
    pub fn px_rate(self) -> f32 {
        match self {
            Unit::Mm => PX_PER_MM,
            Unit::Cm => PX_PER_CM,
            Unit::In => PX_PER_IN,
            Unit::Px => 1.0,
        }
    }
}

/// Convert a value in `unit` to device pixels. Total function.
pub fn to_pixels(value: f32, unit: Unit) -> f32 {
    value * unit.px_rate()
}

/// Convert a value in `unit` to millimeters (used by the page calculator
/// and PDF assembly, which work in physical space).
pub fn to_millimeters(value: f32, unit: Unit) -> f32 {
    match unit {
        Unit::Mm => value,
        Unit::Cm => value * 10.0,
        Unit::In => value * 25.4,
        Unit::Px => value / PX_PER_MM,
    }
}

/// Convert device pixels back to millimeters.
pub fn px_to_mm(px: f32) -> f32 {
    px / PX_PER_MM
}

/// Convert millimeters to device pixels.
pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_MM
}
