//! Image element drawing.
//!
//! Draws the resolved bitmap with the element's object-fit mode and
//! opacity. Elements whose source never resolved (fetch failure, bad
//! data URI, timeout) degrade to a gray "IMG" placeholder instead of
//! failing the label.

use image::imageops::FilterType;
use image::{GenericImageView, Rgba, RgbaImage};

use crate::label::types::{ImageElement, ObjectFit};
use crate::layout::Rect;
use crate::measure::{BITMAP_CELL_HEIGHT, BITMAP_CELL_WIDTH, bitmap_glyph};

use super::{blend_pixel, fill_rect};

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([224, 224, 224, 255]);
const PLACEHOLDER_INK: Rgba<u8> = Rgba([128, 128, 128, 255]);

pub fn draw(surface: &mut RgbaImage, rect: Rect, el: &ImageElement) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    match &el.resolved {
        Some(source) => draw_fitted(surface, rect, source, el.object_fit, el.opacity),
        None => draw_placeholder(surface, rect),
    }
}

fn draw_fitted(
    surface: &mut RgbaImage,
    rect: Rect,
    source: &image::DynamicImage,
    fit: ObjectFit,
    opacity: f32,
) {
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return;
    }

    let box_w = rect.width;
    let box_h = rect.height;
    let aspect_w = box_w / src_w as f32;
    let aspect_h = box_h / src_h as f32;

    // Target size of the scaled source and its offset within the box
    let (target_w, target_h) = match fit {
        ObjectFit::Fill => (box_w, box_h),
        ObjectFit::Contain => {
            let s = aspect_w.min(aspect_h);
            (src_w as f32 * s, src_h as f32 * s)
        }
        ObjectFit::Cover => {
            let s = aspect_w.max(aspect_h);
            (src_w as f32 * s, src_h as f32 * s)
        }
    };
    let offset_x = (box_w - target_w) / 2.0;
    let offset_y = (box_h - target_h) / 2.0;

    let scaled = source
        .resize_exact(
            target_w.round().max(1.0) as u32,
            target_h.round().max(1.0) as u32,
            FilterType::Lanczos3,
        )
        .to_rgba8();

    let opacity = opacity.clamp(0.0, 1.0);
    for (px, py, pixel) in scaled.enumerate_pixels() {
        let x = rect.x + offset_x + px as f32;
        let y = rect.y + offset_y + py as f32;
        // Cover overflows the box on one axis: clip to the element rect
        if x < rect.x || x >= rect.x + rect.width || y < rect.y || y >= rect.y + rect.height {
            continue;
        }
        blend_pixel(surface, x as i64, y as i64, *pixel, opacity);
    }
}

/// Gray box with an "IMG" tag, the recover-locally path for broken sources.
fn draw_placeholder(surface: &mut RgbaImage, rect: Rect) {
    fill_rect(surface, rect, PLACEHOLDER_FILL, 1.0);

    // 1px frame
    let x0 = rect.x.floor() as i64;
    let y0 = rect.y.floor() as i64;
    let x1 = (rect.x + rect.width).ceil() as i64 - 1;
    let y1 = (rect.y + rect.height).ceil() as i64 - 1;
    for x in x0..=x1 {
        blend_pixel(surface, x, y0, PLACEHOLDER_INK, 1.0);
        blend_pixel(surface, x, y1, PLACEHOLDER_INK, 1.0);
    }
    for y in y0..=y1 {
        blend_pixel(surface, x0, y, PLACEHOLDER_INK, 1.0);
        blend_pixel(surface, x1, y, PLACEHOLDER_INK, 1.0);
    }

    // Centered "IMG" tag sized to the box
    let tag = "IMG";
    let font_size = (rect.height * 0.4).clamp(8.0, 24.0);
    let cell_w = font_size * 0.5;
    let tag_w = cell_w * tag.chars().count() as f32;
    if tag_w > rect.width {
        return;
    }
    let origin_x = rect.x + (rect.width - tag_w) / 2.0;
    let top = rect.y + (rect.height - font_size) / 2.0;
    let dst_w = cell_w.ceil() as usize;
    let dst_h = font_size.ceil() as usize;

    let mut caret = origin_x;
    for ch in tag.chars() {
        if let Some(cell) = bitmap_glyph(ch) {
            for dy in 0..dst_h {
                let sy = dy * BITMAP_CELL_HEIGHT / dst_h;
                for dx in 0..dst_w {
                    let sx = dx * BITMAP_CELL_WIDTH / dst_w;
                    if cell[sy * BITMAP_CELL_WIDTH + sx] != 0 {
                        blend_pixel(
                            surface,
                            (caret + dx as f32) as i64,
                            (top + dy as f32) as i64,
                            PLACEHOLDER_INK,
                            1.0,
                        );
                    }
                }
            }
        }
        caret += cell_w;
    }
}
