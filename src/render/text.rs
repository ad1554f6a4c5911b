//! Text element drawing.
//!
//! Wraps content through the same measurement port the auto-sizer uses,
//! then rasterizes each line: anti-aliased `ab_glyph` outlines when the
//! family has a registered face, scaled Spleen bitmap cells otherwise.
//! Italic is a shear applied at blit time; underline is a stroke under
//! the baseline.

use ab_glyph::{Font, ScaleFont};
use image::RgbaImage;

use crate::label::autosize::wrap_lines;
use crate::label::types::{TextAlign, TextElement};
use crate::layout::Rect;
use crate::measure::{
    BITMAP_CELL_HEIGHT, BITMAP_CELL_WIDTH, FontStore, TextMeasurer, bitmap_glyph,
};

use super::{BLACK, blend_pixel, color_or};

/// Horizontal shear per vertical pixel for faux italic (~12 degrees).
const ITALIC_SHEAR: f32 = 0.21;

pub fn draw(surface: &mut RgbaImage, rect: Rect, el: &TextElement, fonts: &FontStore) {
    if el.content.is_empty() || rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }

    let spec = el.font_spec();
    let color = color_or(&el.color, BLACK);
    let lines = wrap_lines(&el.content, rect.width, &spec, fonts, el.no_wrap);
    let line_height_px = el.font_size * el.line_height;

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let metrics = fonts.measure(line, &spec);
        let offset_x = match el.text_align {
            TextAlign::Left => 0.0,
            TextAlign::Center => ((rect.width - metrics.width) / 2.0).max(0.0),
            TextAlign::Right => (rect.width - metrics.width).max(0.0),
        };
        let line_top = rect.y + i as f32 * line_height_px;
        // Center the em box inside the line box
        let baseline = line_top + metrics.ascent + (line_height_px - el.font_size).max(0.0) / 2.0;

        // Clip whole lines that fall below the element
        if line_top >= rect.y + rect.height {
            break;
        }

        let origin_x = rect.x + offset_x;
        match fonts.face(&spec) {
            Some(face) => draw_ttf_line(
                surface, face, line, &spec, origin_x, baseline, rect, color, el.italic,
            ),
            None => draw_bitmap_line(
                surface, line, &spec, origin_x, baseline, rect, color, el.italic,
            ),
        }

        if el.underline {
            let thickness = (el.font_size / 16.0).max(1.0).round() as i64;
            let uy = (baseline + metrics.descent * 0.5).round() as i64;
            let x0 = origin_x.round() as i64;
            let x1 = (origin_x + metrics.width).min(rect.x + rect.width).round() as i64;
            for t in 0..thickness {
                for x in x0..x1 {
                    blend_pixel(surface, x, uy + t, color, 1.0);
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_ttf_line(
    surface: &mut RgbaImage,
    face: &ab_glyph::FontArc,
    line: &str,
    spec: &crate::measure::FontSpec,
    origin_x: f32,
    baseline: f32,
    clip: Rect,
    color: image::Rgba<u8>,
    italic: bool,
) {
    let scaled = face.as_scaled(spec.size);
    let mut caret = origin_x;

    for ch in line.chars() {
        let glyph_id = face.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(spec.size, ab_glyph::point(caret, baseline));

        if let Some(outlined) = face.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let y = py as f32 + bounds.min.y;
                let shear = if italic { (baseline - y) * ITALIC_SHEAR } else { 0.0 };
                let x = px as f32 + bounds.min.x + shear;
                if x < clip.x
                    || x >= clip.x + clip.width
                    || y < clip.y
                    || y >= clip.y + clip.height
                {
                    return;
                }
                blend_pixel(surface, x as i64, y as i64, color, coverage);
            });
        }
        caret += scaled.h_advance(glyph_id);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_bitmap_line(
    surface: &mut RgbaImage,
    line: &str,
    spec: &crate::measure::FontSpec,
    origin_x: f32,
    baseline: f32,
    clip: Rect,
    color: image::Rgba<u8>,
    italic: bool,
) {
    let cell_h = spec.size;
    let cell_w = spec.size * (BITMAP_CELL_WIDTH as f32 / BITMAP_CELL_HEIGHT as f32);
    // Bitmap cells sit on the baseline with 80% above it
    let top = baseline - spec.size * 0.8;

    let dst_w = cell_w.ceil().max(1.0) as usize;
    let dst_h = cell_h.ceil().max(1.0) as usize;

    let mut caret = origin_x;
    for ch in line.chars() {
        if let Some(cell) = bitmap_glyph(ch) {
            // Faux bold: the bitmap family has no bold face, so thicken
            // by double-blitting one pixel to the right.
            let passes = if spec.bold { 2 } else { 1 };
            for pass in 0..passes {
                for dy in 0..dst_h {
                    let sy = dy * BITMAP_CELL_HEIGHT / dst_h;
                    let y = top + dy as f32;
                    let shear = if italic { (baseline - y) * ITALIC_SHEAR } else { 0.0 };
                    for dx in 0..dst_w {
                        let sx = dx * BITMAP_CELL_WIDTH / dst_w;
                        if cell[sy * BITMAP_CELL_WIDTH + sx] == 0 {
                            continue;
                        }
                        let x = caret + dx as f32 + shear + pass as f32;
                        if x < clip.x
                            || x >= clip.x + clip.width
                            || y < clip.y
                            || y >= clip.y + clip.height
                        {
                            continue;
                        }
                        blend_pixel(surface, x as i64, y as i64, color, 1.0);
                    }
                }
            }
        }
        caret += cell_w;
    }
}
