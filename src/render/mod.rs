//! # Label Canvas Renderer
//!
//! Renders a label configuration plus its element list to an RGBA
//! surface. Two modes share every geometry decision (see
//! [`crate::layout`]):
//!
//! - **Interactive**: guide overlays (grid, margin bands, center
//!   crosshair, border/cut line) for the editor.
//! - **Print**: guides suppressed; element variables pre-resolved
//!   against a bound product.
//!
//! Elements paint in ascending z-order. A failing element is logged and
//! skipped; an unrecognized element kind renders nothing. Neither aborts
//! the label.

mod barcode;
mod guides;
mod image_el;
mod qrcode;
pub mod resolve;
mod text;

pub use resolve::ImageResolver;

use image::{Rgba, RgbaImage};

use crate::error::EtiquetaError;
use crate::label::LabelConfig;
use crate::label::types::{ElementKind, LabelElement};
use crate::label::vars::PrintOptions;
use crate::layout::{self, Rect};
use crate::measure::FontStore;
use crate::product::Product;

/// Rendering mode. See module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Interactive,
    Print,
}

/// Product bound to a print-mode render for variable resolution.
#[derive(Clone, Copy)]
pub struct ProductBinding<'a> {
    pub product: &'a Product,
    pub options: &'a PrintOptions,
}

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa` or
/// `transparent`. Returns `None` for anything else.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return Some(Rgba([0, 0, 0, 0]));
    }
    let hex = value.strip_prefix('#')?;
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba([
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            255,
        ])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// Parse a color, falling back to `fallback` on malformed input
/// (logged, element still renders).
fn color_or(value: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    match parse_color(value) {
        Some(c) => c,
        None => {
            log::warn!("unparseable color {:?}, using fallback", value);
            fallback
        }
    }
}

pub(crate) const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub(crate) const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Source-over blend of `color` (scaled by `alpha` in 0..=1) onto the
/// surface. Out-of-bounds writes are ignored.
pub(crate) fn blend_pixel(surface: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= surface.width() as i64 || y >= surface.height() as i64 {
        return;
    }
    let a = (color.0[3] as f32 / 255.0 * alpha.clamp(0.0, 1.0)).clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let dst = surface.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        dst.0[i] = (color.0[i] as f32 * a + dst.0[i] as f32 * (1.0 - a)).round() as u8;
    }
    dst.0[3] = ((a + dst.0[3] as f32 / 255.0 * (1.0 - a)) * 255.0).round() as u8;
}

/// Fill an axis-aligned region, clipped to the surface.
pub(crate) fn fill_rect(surface: &mut RgbaImage, rect: Rect, color: Rgba<u8>, alpha: f32) {
    let x0 = rect.x.floor().max(0.0) as i64;
    let y0 = rect.y.floor().max(0.0) as i64;
    let x1 = ((rect.x + rect.width).ceil() as i64).min(surface.width() as i64);
    let y1 = ((rect.y + rect.height).ceil() as i64).min(surface.height() as i64);
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(surface, x, y, color, alpha);
        }
    }
}

/// Renders labels to RGBA surfaces.
///
/// Holds the [`FontStore`] so interactive previews, print rasters and
/// auto-sizing all measure and draw text through the same engine.
#[derive(Default)]
pub struct LabelRenderer {
    pub fonts: FontStore,
}

impl LabelRenderer {
    pub fn new() -> Self {
        Self {
            fonts: FontStore::new(),
        }
    }

    pub fn with_fonts(fonts: FontStore) -> Self {
        Self { fonts }
    }

    /// Render a label to an RGBA surface.
    ///
    /// In print mode with a product bound, element variables are resolved
    /// before drawing; geometry is unaffected by resolution.
    pub fn render(
        &self,
        config: &LabelConfig,
        elements: &[LabelElement],
        mode: RenderMode,
        binding: Option<ProductBinding<'_>>,
    ) -> Result<RgbaImage, EtiquetaError> {
        config.validate()?;

        let (width, height) = layout::canvas_size(config);
        let background = color_or(&config.background_color, WHITE);
        let mut surface = RgbaImage::from_pixel(width, height, background);

        if mode == RenderMode::Interactive {
            guides::draw_underlays(&mut surface, config);
        }

        for index in layout::paint_order(elements) {
            let element = &elements[index];
            let element = match (mode, binding) {
                (RenderMode::Print, Some(b)) => element.resolve_variables(b.product, b.options),
                _ => element.clone(),
            };
            let rect = layout::layout_element(&element);

            if let Err(e) = self.draw_element(&mut surface, &element, rect) {
                log::warn!("element {} skipped: {}", element.id, e);
            }
        }

        if mode == RenderMode::Interactive {
            guides::draw_border(&mut surface, config);
        }

        Ok(surface)
    }

    /// Render and encode to PNG bytes.
    pub fn render_png(
        &self,
        config: &LabelConfig,
        elements: &[LabelElement],
        mode: RenderMode,
        binding: Option<ProductBinding<'_>>,
    ) -> Result<Vec<u8>, EtiquetaError> {
        let surface = self.render(config, elements, mode, binding)?;
        let mut bytes = Vec::new();
        surface
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| EtiquetaError::Render(format!("PNG encode: {}", e)))?;
        Ok(bytes)
    }

    fn draw_element(
        &self,
        surface: &mut RgbaImage,
        element: &LabelElement,
        rect: Rect,
    ) -> Result<(), EtiquetaError> {
        match &element.kind {
            ElementKind::Text(el) => {
                text::draw(surface, rect, el, &self.fonts);
                Ok(())
            }
            ElementKind::Qrcode(el) => qrcode::draw(surface, rect, el),
            ElementKind::Barcode(el) => barcode::draw(surface, rect, el),
            ElementKind::Image(el) => {
                image_el::draw(surface, rect, el);
                Ok(())
            }
            ElementKind::Rectangle(el) => {
                draw_rectangle(surface, rect, el);
                Ok(())
            }
            // Unknown kinds render nothing: templates saved by a newer
            // version still produce the rest of the label.
            ElementKind::Unknown => Ok(()),
        }
    }
}

fn draw_rectangle(
    surface: &mut RgbaImage,
    rect: Rect,
    el: &crate::label::types::RectangleElement,
) {
    let fill = color_or(&el.fill_color, Rgba([0, 0, 0, 0]));
    let border = color_or(&el.border_color, BLACK);
    let radius = el
        .border_radius
        .clamp(0.0, rect.width.min(rect.height) / 2.0);

    let x0 = rect.x;
    let y0 = rect.y;
    let x1 = rect.x + rect.width;
    let y1 = rect.y + rect.height;

    let inside_rounded = |x: f32, y: f32| -> bool {
        if radius <= 0.0 {
            return true;
        }
        // Check distance to the nearest corner arc center
        let cx = if x < x0 + radius {
            x0 + radius
        } else if x > x1 - radius {
            x1 - radius
        } else {
            return true;
        };
        let cy = if y < y0 + radius {
            y0 + radius
        } else if y > y1 - radius {
            y1 - radius
        } else {
            return true;
        };
        (x - cx).powi(2) + (y - cy).powi(2) <= radius * radius
    };

    let px0 = x0.floor().max(0.0) as i64;
    let py0 = y0.floor().max(0.0) as i64;
    let px1 = (x1.ceil() as i64).min(surface.width() as i64);
    let py1 = (y1.ceil() as i64).min(surface.height() as i64);
    let bw = el.border_width.max(0.0);

    for py in py0..py1 {
        for px in px0..px1 {
            let cx = px as f32 + 0.5;
            let cy = py as f32 + 0.5;
            if !inside_rounded(cx, cy) {
                continue;
            }
            let on_border = bw > 0.0
                && (cx - x0 < bw
                    || x1 - cx < bw
                    || cy - y0 < bw
                    || y1 - cy < bw
                    || (radius > 0.0 && !inside_rounded_inner(cx, cy, x0, y0, x1, y1, radius, bw)));
            let color = if on_border { border } else { fill };
            blend_pixel(surface, px, py, color, 1.0);
        }
    }
}

/// Whether a point is inside the rounded rect shrunk by the border width.
#[allow(clippy::too_many_arguments)]
fn inside_rounded_inner(
    x: f32,
    y: f32,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    radius: f32,
    bw: f32,
) -> bool {
    let inner = radius - bw;
    if inner <= 0.0 {
        return true;
    }
    let cx = if x < x0 + radius {
        x0 + radius
    } else if x > x1 - radius {
        x1 - radius
    } else {
        return true;
    };
    let cy = if y < y0 + radius {
        y0 + radius
    } else if y > y1 - radius {
        y1 - radius
    } else {
        return true;
    };
    (x - cx).powi(2) + (y - cy).powi(2) <= inner * inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::types::{RectangleElement, TextElement};

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#000000"), Some(Rgba([0, 0, 0, 255])));
        assert_eq!(parse_color("#fff"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_color("#ff000080"), Some(Rgba([255, 0, 0, 128])));
        assert_eq!(parse_color("transparent"), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(parse_color("chartreuse"), None);
        assert_eq!(parse_color("#12"), None);
    }

    #[test]
    fn test_render_fills_background() {
        let mut config = LabelConfig::new(10.0, 10.0);
        config.background_color = "#ff0000".into();
        let renderer = LabelRenderer::new();
        let surface = renderer
            .render(&config, &[], RenderMode::Print, None)
            .unwrap();
        assert_eq!(surface.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LabelConfig::new(0.0, 10.0);
        let renderer = LabelRenderer::new();
        assert!(
            renderer
                .render(&config, &[], RenderMode::Print, None)
                .is_err()
        );
    }

    #[test]
    fn test_rectangle_fill_and_border() {
        let config = {
            let mut c = LabelConfig::new(100.0, 100.0);
            c.unit = crate::units::Unit::Px;
            c
        };
        let mut el = LabelElement::new(
            "r",
            ElementKind::Rectangle(RectangleElement {
                fill_color: "#00ff00".into(),
                border_color: "#0000ff".into(),
                border_width: 2.0,
                border_radius: 0.0,
            }),
        );
        el.x = 10.0;
        el.y = 10.0;
        el.width = 50.0;
        el.height = 40.0;

        let renderer = LabelRenderer::new();
        let surface = renderer
            .render(&config, &[el], RenderMode::Print, None)
            .unwrap();
        // Border pixel
        assert_eq!(surface.get_pixel(10, 10), &Rgba([0, 0, 255, 255]));
        // Interior pixel
        assert_eq!(surface.get_pixel(35, 30), &Rgba([0, 255, 0, 255]));
        // Outside untouched (white background)
        assert_eq!(surface.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_z_order_paints_higher_last() {
        let config = {
            let mut c = LabelConfig::new(20.0, 20.0);
            c.unit = crate::units::Unit::Px;
            c
        };
        let make_rect = |id: &str, color: &str, z: i32| {
            let mut el = LabelElement::new(
                id,
                ElementKind::Rectangle(RectangleElement {
                    fill_color: color.into(),
                    border_width: 0.0,
                    ..Default::default()
                }),
            );
            el.width = 20.0;
            el.height = 20.0;
            el.z_index = z;
            el
        };
        // Red has higher z but comes first in the list
        let elements = vec![make_rect("top", "#ff0000", 5), make_rect("under", "#0000ff", 0)];

        let renderer = LabelRenderer::new();
        let surface = renderer
            .render(&config, &elements, RenderMode::Print, None)
            .unwrap();
        assert_eq!(surface.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_unknown_kind_is_noop() {
        let config = LabelConfig::new(10.0, 10.0);
        let mut el = LabelElement::new("u", ElementKind::Unknown);
        el.width = 10.0;
        el.height = 10.0;
        let renderer = LabelRenderer::new();
        assert!(
            renderer
                .render(&config, &[el], RenderMode::Print, None)
                .is_ok()
        );
    }

    #[test]
    fn test_print_mode_resolves_variables() {
        use crate::label::vars::PrintOptions;
        let config = {
            let mut c = LabelConfig::new(200.0, 40.0);
            c.unit = crate::units::Unit::Px;
            c
        };
        let mut el = LabelElement::new("t", ElementKind::Text(TextElement::new("${nome}")));
        el.width = 200.0;
        el.height = 30.0;

        let product = Product::new("Sabonete", 3.5);
        let options = PrintOptions::default();
        let renderer = LabelRenderer::new();

        // Should not panic and should draw some ink
        let surface = renderer
            .render(
                &config,
                &[el],
                RenderMode::Print,
                Some(ProductBinding {
                    product: &product,
                    options: &options,
                }),
            )
            .unwrap();
        let has_ink = surface.pixels().any(|p| p.0[0] < 250);
        assert!(has_ink);
    }
}
