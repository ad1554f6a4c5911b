//! Unified element geometry.
//!
//! Interactive and print rendering historically disagreed because each
//! mode computed placement on its own; the comparison tooling exists to
//! catch exactly that drift. Here placement is a single pure function
//! consumed by both modes, so for a given `(config, elements)` pair the
//! device-pixel geometry is identical by construction.

use serde::Serialize;

use crate::label::LabelConfig;
use crate::label::types::{ElementKind, LabelElement};
use crate::units;

/// Resolved placement in device pixels, label-local, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Compute the placement of one element.
///
/// QR codes render as a square of side `min(width, height)`; every other
/// kind uses its stored box unchanged.
pub fn layout_element(element: &LabelElement) -> Rect {
    match element.kind {
        ElementKind::Qrcode(_) => {
            let side = element.width.min(element.height);
            Rect {
                x: element.x,
                y: element.y,
                width: side,
                height: side,
            }
        }
        _ => Rect {
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
        },
    }
}

/// Canvas dimensions in whole device pixels for a label config.
pub fn canvas_size(config: &LabelConfig) -> (u32, u32) {
    let w = units::to_pixels(config.width, config.unit).round().max(1.0) as u32;
    let h = units::to_pixels(config.height, config.unit).round().max(1.0) as u32;
    (w, h)
}

/// Indices of `elements` in paint order: ascending `z_index`, ties broken
/// by list position (later elements paint over earlier ones).
pub fn paint_order(elements: &[LabelElement]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].z_index);
    order
}
