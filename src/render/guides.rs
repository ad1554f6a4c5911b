//! Editor guide overlays: grid, margin bands, center crosshair, and the
//! border/cut indicator. Interactive mode only; the print path never
//! calls into this module.

use image::{Rgba, RgbaImage};

use crate::label::LabelConfig;
use crate::layout::Rect;
use crate::units;

use super::{blend_pixel, fill_rect};

const GRID_COLOR: Rgba<u8> = Rgba([203, 213, 225, 255]);
const MARGIN_COLOR: Rgba<u8> = Rgba([147, 197, 253, 90]);
const CENTER_COLOR: Rgba<u8> = Rgba([248, 113, 113, 200]);
const BORDER_COLOR: Rgba<u8> = Rgba([100, 116, 139, 255]);

/// Overlays painted under the elements: grid, margin bands, crosshair.
pub fn draw_underlays(surface: &mut RgbaImage, config: &LabelConfig) {
    if config.show_grid {
        draw_grid(surface, config.grid_size);
    }
    if config.show_margins {
        draw_margins(surface, config);
    }
    if config.show_center_line {
        draw_center_cross(surface);
    }
}

/// The border/cut indicator paints over the elements so the cut line is
/// never hidden.
pub fn draw_border(surface: &mut RgbaImage, config: &LabelConfig) {
    if !config.show_borders {
        return;
    }
    let w = surface.width() as i64;
    let h = surface.height() as i64;
    for x in 0..w {
        blend_pixel(surface, x, 0, BORDER_COLOR, 1.0);
        blend_pixel(surface, x, h - 1, BORDER_COLOR, 1.0);
    }
    for y in 0..h {
        blend_pixel(surface, 0, y, BORDER_COLOR, 1.0);
        blend_pixel(surface, w - 1, y, BORDER_COLOR, 1.0);
    }
}

fn draw_grid(surface: &mut RgbaImage, pitch: f32) {
    if pitch < 2.0 {
        return;
    }
    let w = surface.width();
    let h = surface.height();
    let mut x = pitch;
    while (x as u32) < w {
        for y in 0..h {
            blend_pixel(surface, x as i64, y as i64, GRID_COLOR, 0.6);
        }
        x += pitch;
    }
    let mut y = pitch;
    while (y as u32) < h {
        for x in 0..w {
            blend_pixel(surface, x as i64, y as i64, GRID_COLOR, 0.6);
        }
        y += pitch;
    }
}

fn draw_margins(surface: &mut RgbaImage, config: &LabelConfig) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let px = |v: Option<f32>| v.map(|m| units::to_pixels(m, config.unit)).unwrap_or(0.0);

    let top = px(config.margin_top);
    let bottom = px(config.margin_bottom);
    let left = px(config.margin_left);
    let right = px(config.margin_right);

    if top > 0.0 {
        fill_rect(surface, Rect { x: 0.0, y: 0.0, width: w, height: top }, MARGIN_COLOR, 1.0);
    }
    if bottom > 0.0 {
        fill_rect(
            surface,
            Rect { x: 0.0, y: h - bottom, width: w, height: bottom },
            MARGIN_COLOR,
            1.0,
        );
    }
    if left > 0.0 {
        fill_rect(surface, Rect { x: 0.0, y: 0.0, width: left, height: h }, MARGIN_COLOR, 1.0);
    }
    if right > 0.0 {
        fill_rect(
            surface,
            Rect { x: w - right, y: 0.0, width: right, height: h },
            MARGIN_COLOR,
            1.0,
        );
    }
}

/// Dashed crosshair through the canvas center (8 on, 4 off).
fn draw_center_cross(surface: &mut RgbaImage) {
    let w = surface.width() as i64;
    let h = surface.height() as i64;
    let cx = w / 2;
    let cy = h / 2;
    for x in 0..w {
        if (x / 8) % 3 != 2 {
            blend_pixel(surface, x, cy, CENTER_COLOR, 0.8);
        }
    }
    for y in 0..h {
        if (y / 8) % 3 != 2 {
            blend_pixel(surface, cx, y, CENTER_COLOR, 0.8);
        }
    }
}
