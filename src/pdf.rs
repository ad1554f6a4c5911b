//! Multi-page PDF assembly.
//!
//! Takes rasterized labels and places each at its grid cell offset using
//! the `printpdf` ops API. Pages use the physical size computed by the
//! page calculator; label rasters are embedded as image XObjects scaled
//! from pixels to the cell's physical size.

use printpdf::{
    Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
    RawImage, Rgb, XObjectTransform,
};

use crate::error::EtiquetaError;
use crate::page::PageGrid;

/// Points per millimeter (72 dpi / 25.4).
const PT_PER_MM: f32 = 72.0 / 25.4;

/// One rasterized label placed on a page.
pub struct PlacedLabel {
    pub col: u32,
    pub row: u32,
    /// PNG-encoded raster of the resolved label.
    pub png: Vec<u8>,
}

/// Assemble the final document: one entry in `pages` per physical page,
/// each holding the labels placed on it (possibly empty for a trailing
/// skipped page).
pub fn assemble(
    title: &str,
    grid: &PageGrid,
    pages: &[Vec<PlacedLabel>],
    show_borders: bool,
) -> Result<Vec<u8>, EtiquetaError> {
    let page_w = Mm(grid.page_width_mm);
    let page_h = Mm(grid.page_height_mm);
    let mut doc = PdfDocument::new(title);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();

    let mut pdf_pages = Vec::new();
    for page_labels in pages {
        let mut ops = Vec::new();

        for label in page_labels {
            // Pixel dimensions via the image crate; printpdf re-decodes
            // for embedding.
            let decoded = image::load_from_memory(&label.png)
                .map_err(|e| EtiquetaError::Pdf(format!("label raster: {}", e)))?;
            let (px_w, px_h) = (decoded.width() as f32, decoded.height() as f32);
            let raw = RawImage::decode_from_bytes(&label.png, &mut warnings)
                .map_err(|e| EtiquetaError::Pdf(format!("label raster: {}", e)))?;
            let xobj_id = doc.add_image(&raw);

            let (cell_x_mm, cell_y_mm) = grid.cell_offset(label.col, label.row);

            // PDF origin is bottom-left; the grid's is top-left.
            let x_pt = cell_x_mm * PT_PER_MM;
            let y_pt =
                (grid.page_height_mm - cell_y_mm - grid.label_height_mm) * PT_PER_MM;

            // At dpi=72 one source pixel renders as one point, so the
            // scale factor is target_pt / source_px.
            let scale_x = if px_w > 0.0 {
                grid.label_width_mm * PT_PER_MM / px_w
            } else {
                1.0
            };
            let scale_y = if px_h > 0.0 {
                grid.label_height_mm * PT_PER_MM / px_h
            } else {
                1.0
            };

            ops.push(Op::UseXobject {
                id: xobj_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_pt)),
                    translate_y: Some(Pt(y_pt)),
                    dpi: Some(72.0),
                    scale_x: Some(scale_x),
                    scale_y: Some(scale_y),
                    rotate: None,
                },
            });

            if show_borders {
                push_cut_border(&mut ops, x_pt, y_pt, grid);
            }
        }

        pdf_pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pdf_pages.is_empty() {
        pdf_pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pdf_pages);
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Thin gray cut-line rectangle around one cell.
fn push_cut_border(ops: &mut Vec<Op>, x_pt: f32, y_pt: f32, grid: &PageGrid) {
    let w_pt = grid.label_width_mm * PT_PER_MM;
    let h_pt = grid.label_height_mm * PT_PER_MM;

    ops.push(Op::SetOutlineColor {
        col: Color::Rgb(Rgb {
            r: 0.6,
            g: 0.6,
            b: 0.6,
            icc_profile: None,
        }),
    });
    ops.push(Op::SetOutlineThickness { pt: Pt(0.4) });

    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                corner(x_pt, y_pt),
                corner(x_pt + w_pt, y_pt),
                corner(x_pt + w_pt, y_pt + h_pt),
                corner(x_pt, y_pt + h_pt),
            ],
            is_closed: true,
        },
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PagePrintConfig, compute_grid};
    use image::{Rgba, RgbaImage};

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn grid() -> PageGrid {
        compute_grid(
            50.0,
            30.0,
            &PagePrintConfig {
                margin_top: 10.0,
                margin_bottom: 10.0,
                margin_left: 10.0,
                margin_right: 10.0,
                spacing_horizontal: 2.0,
                spacing_vertical: 2.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_empty_document_still_valid_pdf() {
        let bytes = assemble("vazio", &grid(), &[], false).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn test_single_label_document() {
        let pages = vec![vec![PlacedLabel {
            col: 0,
            row: 0,
            png: tiny_png(),
        }]];
        let bytes = assemble("uma etiqueta", &grid(), &pages, false).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_borders_add_content() {
        let pages = vec![vec![PlacedLabel {
            col: 1,
            row: 2,
            png: tiny_png(),
        }]];
        let plain = assemble("t", &grid(), &pages, false).unwrap();
        let pages = vec![vec![PlacedLabel {
            col: 1,
            row: 2,
            png: tiny_png(),
        }]];
        let bordered = assemble("t", &grid(), &pages, true).unwrap();
        assert!(bordered.len() > plain.len());
    }

    #[test]
    fn test_multi_page() {
        let page = || {
            vec![PlacedLabel {
                col: 0,
                row: 0,
                png: tiny_png(),
            }]
        };
        let bytes = assemble("duas páginas", &grid(), &[page(), page()], false).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }
}
