//! 1D barcode element drawing.
//!
//! Encoding goes through the `barcoders` symbologies; the module pattern
//! is stretched across the element box with an optional human-readable
//! line under the bars. Malformed values for the chosen symbology are
//! reported as render errors (the caller logs and skips the element).

use barcoders::sym::code39::Code39;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::tf::TF;
use image::RgbaImage;

use crate::error::EtiquetaError;
use crate::label::types::{BarcodeElement, BarcodeFormat};
use crate::layout::Rect;
use crate::measure::{FontSpec, bitmap_metrics};

use super::{BLACK, WHITE, blend_pixel, color_or, fill_rect};

/// Height of the human-readable line as a fraction of the element box.
const TEXT_ZONE_RATIO: f32 = 0.22;

/// Encode a value into 0/1 modules for the given symbology.
pub fn encode(format: BarcodeFormat, value: &str) -> Result<Vec<u8>, EtiquetaError> {
    let err = |e: &dyn std::fmt::Display| {
        EtiquetaError::Render(format!("{:?} cannot encode {:?}: {}", format, value, e))
    };
    match format {
        BarcodeFormat::Code128 => {
            // Charset B covers the widest printable range
            Code128::new(format!("\u{0181}{}", value))
                .map(|b| b.encode())
                .map_err(|e| err(&e))
        }
        BarcodeFormat::Ean13 => EAN13::new(value).map(|b| b.encode()).map_err(|e| err(&e)),
        BarcodeFormat::Ean8 => EAN8::new(value).map(|b| b.encode()).map_err(|e| err(&e)),
        // UPC-A is EAN-13 with a leading zero
        BarcodeFormat::Upc => EAN13::new(format!("0{}", value))
            .map(|b| b.encode())
            .map_err(|e| err(&e)),
        BarcodeFormat::Code39 => Code39::new(value).map(|b| b.encode()).map_err(|e| err(&e)),
        BarcodeFormat::Itf14 => TF::interleaved(value)
            .map(|b| b.encode())
            .map_err(|e| err(&e)),
    }
}

pub fn draw(surface: &mut RgbaImage, rect: Rect, el: &BarcodeElement) -> Result<(), EtiquetaError> {
    if el.value.is_empty() || rect.width <= 0.0 || rect.height <= 0.0 {
        return Ok(());
    }

    let modules = encode(el.format, &el.value)?;
    if modules.is_empty() {
        return Ok(());
    }

    let line = color_or(&el.line_color, BLACK);
    let background = color_or(&el.background, WHITE);

    fill_rect(surface, rect, background, 1.0);

    let text_zone = if el.display_value {
        (rect.height * TEXT_ZONE_RATIO).min(16.0)
    } else {
        0.0
    };
    let bars_height = (rect.height - text_zone).max(1.0);
    let module_w = rect.width / modules.len() as f32;

    for (i, &module) in modules.iter().enumerate() {
        if module == 1 {
            fill_rect(
                surface,
                Rect {
                    x: rect.x + i as f32 * module_w,
                    y: rect.y,
                    width: module_w,
                    height: bars_height,
                },
                line,
                1.0,
            );
        }
    }

    if el.display_value {
        draw_value_line(surface, rect, bars_height, text_zone, &el.value, line);
    }

    Ok(())
}

/// Center the raw value under the bars with the bitmap font.
fn draw_value_line(
    surface: &mut RgbaImage,
    rect: Rect,
    bars_height: f32,
    text_zone: f32,
    value: &str,
    color: image::Rgba<u8>,
) {
    let font_size = (text_zone - 2.0).clamp(6.0, 14.0);
    let spec = FontSpec::new("bitmap", font_size);
    let metrics = bitmap_metrics(value, &spec);
    let origin_x = rect.x + ((rect.width - metrics.width) / 2.0).max(0.0);
    let top = rect.y + bars_height + 1.0;

    let cell_w = font_size * 0.5;
    let dst_w = cell_w.ceil().max(1.0) as usize;
    let dst_h = font_size.ceil().max(1.0) as usize;

    let mut caret = origin_x;
    for ch in value.chars() {
        if let Some(cell) = crate::measure::bitmap_glyph(ch) {
            for dy in 0..dst_h {
                let sy = dy * crate::measure::BITMAP_CELL_HEIGHT / dst_h;
                for dx in 0..dst_w {
                    let sx = dx * crate::measure::BITMAP_CELL_WIDTH / dst_w;
                    if cell[sy * crate::measure::BITMAP_CELL_WIDTH + sx] == 0 {
                        continue;
                    }
                    let x = caret + dx as f32;
                    let y = top + dy as f32;
                    if x >= rect.x + rect.width || y >= rect.y + rect.height {
                        continue;
                    }
                    blend_pixel(surface, x as i64, y as i64, color, 1.0);
                }
            }
        }
        caret += cell_w;
    }
}
