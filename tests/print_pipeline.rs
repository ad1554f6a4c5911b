//! # Print Pipeline Tests
//!
//! End-to-end coverage of the label pipeline: wire-format templates in,
//! page grids, drift detection, and batch PDF generation out.

use pretty_assertions::assert_eq;

use etiqueta::batch;
use etiqueta::compare;
use etiqueta::label::vars::PrintOptions;
use etiqueta::label::{LabelTemplate, types::ElementKind};
use etiqueta::page::{self, PageSizeType};
use etiqueta::product::Product;
use etiqueta::render::{ImageResolver, LabelRenderer, ProductBinding, RenderMode};
use etiqueta::{EtiquetaError, layout};

/// A realistic supermarket shelf label: name, price, barcode, QR link,
/// frame. 50x30mm, saved in the persisted wire shape.
const SHELF_TEMPLATE: &str = r##"{
    "id": "shelf-50x30",
    "config": {
        "width": 50, "height": 30, "unit": "mm",
        "backgroundColor": "#ffffff",
        "showGrid": true, "showBorders": true
    },
    "elements": [
        {"id": "frame", "type": "rectangle", "x": 0, "y": 0, "width": 189, "height": 113,
         "fillColor": "transparent", "borderColor": "#000000", "borderWidth": 1, "zIndex": 0},
        {"id": "nome", "type": "text", "content": "${nome}",
         "x": 6, "y": 4, "width": 176, "height": 28, "fontSize": 14, "zIndex": 1},
        {"id": "preco", "type": "text", "content": "${preco}",
         "x": 6, "y": 34, "width": 100, "height": 24, "fontSize": 18,
         "fontWeight": "bold", "zIndex": 1},
        {"id": "codigo", "type": "barcode", "value": "${barcode}", "format": "EAN13",
         "x": 6, "y": 62, "width": 120, "height": 44, "zIndex": 1},
        {"id": "link", "type": "qrcode", "value": "${codigo}",
         "x": 140, "y": 62, "width": 44, "height": 44, "zIndex": 1}
    ],
    "pagePrintConfig": {
        "pageSizeType": "a4",
        "marginTop": 10, "marginBottom": 10, "marginLeft": 10, "marginRight": 10,
        "spacingHorizontal": 2, "spacingVertical": 2
    },
    "compartilhado": false
}"##;

fn shelf_template() -> LabelTemplate {
    serde_json::from_str(SHELF_TEMPLATE).expect("wire template parses")
}

fn sample_products(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| Product {
            name: format!("Produto {}", i),
            code: format!("P-{:04}", i),
            price: 10.0 + i as f64,
            quantity: 1,
            category: "Mercearia".into(),
            barcode: "789123456789".into(),
            description: String::new(),
        })
        .collect()
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[test]
fn wire_template_round_trips() {
    let template = shelf_template();
    assert_eq!(template.elements.len(), 5);
    assert_eq!(template.config.width, 50.0);

    let json = serde_json::to_string(&template).unwrap();
    let back: LabelTemplate = serde_json::from_str(&json).unwrap();
    assert_eq!(back.elements.len(), 5);
    assert!(matches!(back.elements[3].kind, ElementKind::Barcode(_)));
}

// ============================================================================
// PAGE GRID
// ============================================================================

#[test]
fn a4_grid_fixture_3_by_8() {
    let template = shelf_template();
    let config = template.page_print_config.clone().unwrap();
    let grid = page::grid_for_label(50.0, 30.0, template.config.unit, &config);
    assert_eq!((grid.columns, grid.rows), (3, 8));
    assert_eq!(grid.capacity(), 24);
}

#[test]
fn thermal_grid_collapses_through_template() {
    let mut template = shelf_template();
    let mut config = template.page_print_config.take().unwrap();
    config.page_size_type = PageSizeType::AlturaEtiqueta;
    config.rows = 9;
    let grid = page::grid_for_label(50.0, 30.0, template.config.unit, &config);
    assert_eq!(grid.rows, 1);
    assert_eq!(grid.page_height_mm, 30.0);
}

// ============================================================================
// EDIT / PRINT EQUIVALENCE
// ============================================================================

#[test]
fn edit_and_print_geometry_are_identical() {
    let template = shelf_template();
    let report = compare::compare(
        &template,
        &sample_products(1)[0],
        &PrintOptions::default(),
    );
    assert!(!report.has_drift(), "\n{}", report.to_report());
    assert_eq!(report.edit_positions.len(), report.print_positions.len());
    for diff in &report.differences {
        assert!(!diff.has_difference, "element {} drifted", diff.element_id);
    }
}

#[test]
fn both_modes_render_same_canvas_dimensions() {
    let template = shelf_template();
    let renderer = LabelRenderer::new();
    let product = sample_products(1).remove(0);
    let options = PrintOptions::default();

    let interactive = renderer
        .render(
            &template.config,
            &template.elements,
            RenderMode::Interactive,
            None,
        )
        .unwrap();
    let print = renderer
        .render(
            &template.config,
            &template.elements,
            RenderMode::Print,
            Some(ProductBinding {
                product: &product,
                options: &options,
            }),
        )
        .unwrap();

    assert_eq!(interactive.dimensions(), print.dimensions());
    assert_eq!(
        interactive.dimensions(),
        layout::canvas_size(&template.config)
    );
}

// ============================================================================
// BATCH DRIVER
// ============================================================================

#[tokio::test]
async fn batch_produces_expected_pages() {
    let template = shelf_template();
    let config = template.page_print_config.clone().unwrap();
    // 24 per page; 30 products → 2 pages
    let doc = batch::generate_document(
        &LabelRenderer::new(),
        &ImageResolver::new().unwrap(),
        &template,
        &sample_products(30),
        &config,
        &PrintOptions::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(doc.pages, 2);
    assert_eq!(doc.placed, 30);
    assert_eq!(&doc.pdf[0..5], b"%PDF-");
}

#[tokio::test]
async fn skip_labels_leaves_leading_cells_empty() {
    let template = shelf_template();
    let mut config = template.page_print_config.clone().unwrap();
    config.skip_labels = 6;

    let grid = page::grid_for_label(50.0, 30.0, template.config.unit, &config);
    // The first product occupies linear cell 6 = (0, 2)
    assert_eq!(grid.cell_position(6), (0, 2));
    for cell in 0..6 {
        assert!(grid.cell_position(cell) != grid.cell_position(6));
    }

    let doc = batch::generate_document(
        &LabelRenderer::new(),
        &ImageResolver::new().unwrap(),
        &template,
        &sample_products(3),
        &config,
        &PrintOptions::default(),
        None,
    )
    .await
    .unwrap();
    assert_eq!(doc.placed, 3);
    assert_eq!(doc.pages, 1);
}

#[tokio::test]
async fn rerun_is_deterministic() {
    let template = shelf_template();
    let config = template.page_print_config.clone().unwrap();
    let renderer = LabelRenderer::new();
    let resolver = ImageResolver::new().unwrap();
    let products = sample_products(7);

    let first = batch::generate_document(
        &renderer,
        &resolver,
        &template,
        &products,
        &config,
        &PrintOptions::default(),
        None,
    )
    .await
    .unwrap();
    let second = batch::generate_document(
        &renderer,
        &resolver,
        &template,
        &products,
        &config,
        &PrintOptions::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(first.pages, second.pages);
    assert_eq!(first.placed, second.placed);
    assert_eq!(first.file_name, second.file_name);
}

#[tokio::test]
async fn empty_template_is_rejected_before_rendering() {
    let mut template = shelf_template();
    template.elements.clear();
    let config = template.page_print_config.clone().unwrap();

    let result = batch::generate_document(
        &LabelRenderer::new(),
        &ImageResolver::new().unwrap(),
        &template,
        &sample_products(2),
        &config,
        &PrintOptions::default(),
        None,
    )
    .await;

    match result {
        Err(EtiquetaError::Validation(message)) => {
            assert!(message.contains("empty"), "unexpected message: {}", message)
        }
        other => panic!("expected validation error, got {:?}", other.map(|d| d.placed)),
    }
}

#[tokio::test]
async fn unresolved_image_degrades_to_placeholder() {
    // A template whose image source is unreachable still renders and
    // still batches; the image cell shows the placeholder.
    let mut template = shelf_template();
    template = template.with_element({
        let mut el = etiqueta::label::types::LabelElement::new(
            "logo",
            ElementKind::Image(etiqueta::label::types::ImageElement {
                src: "/definitely/not/a/file.png".into(),
                ..Default::default()
            }),
        );
        el.x = 150.0;
        el.y = 4.0;
        el.width = 30.0;
        el.height = 30.0;
        el
    });

    let png = batch::export_label_png(
        &LabelRenderer::new(),
        &ImageResolver::new().unwrap(),
        &template,
        RenderMode::Print,
        Some(&sample_products(1)[0]),
        &PrintOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
