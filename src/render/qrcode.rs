//! QR code element drawing.

use image::RgbaImage;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::EtiquetaError;
use crate::label::types::{QrCodeElement, QrErrorLevel};
use crate::layout::Rect;

use super::{BLACK, WHITE, color_or, fill_rect};

fn ec_level(level: QrErrorLevel) -> EcLevel {
    match level {
        QrErrorLevel::L => EcLevel::L,
        QrErrorLevel::M => EcLevel::M,
        QrErrorLevel::Q => EcLevel::Q,
        QrErrorLevel::H => EcLevel::H,
    }
}

/// Draw a QR code into `rect`. The rect is already square
/// (`min(width, height)`, applied by the layout function).
pub fn draw(surface: &mut RgbaImage, rect: Rect, el: &QrCodeElement) -> Result<(), EtiquetaError> {
    if el.value.is_empty() || rect.width <= 0.0 {
        return Ok(());
    }

    let code = QrCode::with_error_correction_level(
        el.value.as_bytes(),
        ec_level(el.error_correction_level),
    )
    .map_err(|e| EtiquetaError::Render(format!("QR encode {:?}: {}", el.value, e)))?;

    let fg = color_or(&el.fg_color, BLACK);
    let bg = color_or(&el.bg_color, WHITE);

    fill_rect(surface, rect, bg, 1.0);

    let modules = code.width();
    let colors = code.to_colors();
    let module_px = rect.width / modules as f32;

    for my in 0..modules {
        for mx in 0..modules {
            if colors[my * modules + mx] == Color::Dark {
                fill_rect(
                    surface,
                    Rect {
                        x: rect.x + mx as f32 * module_px,
                        y: rect.y + my as f32 * module_px,
                        width: module_px,
                        height: module_px,
                    },
                    fg,
                    1.0,
                );
            }
        }
    }

    Ok(())
}
