//! Batch print driver.
//!
//! Iterates selected products over one template: resolves variables per
//! product, rasterizes the label in print mode, and composites the
//! rasters into a multi-page PDF at the grid offsets computed by the
//! page calculator.
//!
//! The batch is strictly sequential: each label's rasterization is an
//! awaited step and its surface is dropped right after placement, so
//! peak memory stays bounded at one full-resolution label regardless of
//! batch size. Per-product failures leave the cell blank and never abort
//! the run; only pre-flight validation does.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;

use crate::error::EtiquetaError;
use crate::label::LabelTemplate;
use crate::label::vars::PrintOptions;
use crate::page::{self, PagePrintConfig};
use crate::pdf::{self, PlacedLabel};
use crate::product::Product;
use crate::render::{ImageResolver, LabelRenderer, ProductBinding, RenderMode};

/// Cooperative cancellation signal, checked between products.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Output of a batch run.
pub struct BatchDocument {
    /// Suggested download name: `etiquetas-{count}-{YYYY-MM-DD}.pdf`.
    pub file_name: String,
    pub pdf: Vec<u8>,
    /// Physical pages emitted.
    pub pages: usize,
    /// Labels actually rasterized and placed (excludes blank cells).
    pub placed: usize,
}

/// Generate the multi-page print document for `products` × `template`.
///
/// Cell assignment is a pure function of the linear index (starting at
/// `skip_labels`), so reruns with the same inputs place every product in
/// the same cell.
pub async fn generate_document(
    renderer: &LabelRenderer,
    resolver: &ImageResolver,
    template: &LabelTemplate,
    products: &[Product],
    print_config: &PagePrintConfig,
    options: &PrintOptions,
    cancel: Option<&CancelFlag>,
) -> Result<BatchDocument, EtiquetaError> {
    if template.elements.is_empty() {
        return Err(EtiquetaError::Validation(
            "template is empty, add elements first".into(),
        ));
    }
    template.validate()?;

    let config = &template.config;
    let grid = page::grid_for_label(config.width, config.height, config.unit, print_config);

    // Image sources load once for the whole batch; failures degrade to
    // the placeholder at draw time.
    let mut elements = template.elements.clone();
    resolver.resolve_elements(&mut elements).await;

    let mut pages: Vec<Vec<PlacedLabel>> = Vec::new();
    let mut index = print_config.skip_labels;
    let mut placed = 0usize;

    for (i, product) in products.iter().enumerate() {
        if let Some(flag) = cancel
            && flag.is_cancelled()
        {
            return Err(EtiquetaError::Cancelled(placed));
        }

        let page_index = grid.page_index(index);
        while pages.len() <= page_index {
            pages.push(Vec::new());
        }

        let binding = ProductBinding { product, options };
        match renderer.render_png(config, &elements, RenderMode::Print, Some(binding)) {
            Ok(png) => {
                let (col, row) = grid.cell_position(index);
                pages[page_index].push(PlacedLabel { col, row, png });
                placed += 1;
            }
            Err(e) => {
                log::warn!("product {} ({:?}) left blank: {}", i, product.name, e);
            }
        }

        index += 1;
        log::debug!("placed {}/{} labels", placed, products.len());
    }

    let file_name = format!(
        "etiquetas-{}-{}.pdf",
        products.len(),
        Local::now().format("%Y-%m-%d")
    );
    let pdf = pdf::assemble(&file_name, &grid, &pages, print_config.show_borders)?;

    Ok(BatchDocument {
        file_name,
        pages: pages.len().max(1),
        placed,
        pdf,
    })
}

/// Render one label as a PNG, resolving image sources first. Used for the
/// single-label export path and editor previews.
pub async fn export_label_png(
    renderer: &LabelRenderer,
    resolver: &ImageResolver,
    template: &LabelTemplate,
    mode: RenderMode,
    product: Option<&Product>,
    options: &PrintOptions,
) -> Result<Vec<u8>, EtiquetaError> {
    template.validate()?;
    let mut elements = template.elements.clone();
    resolver.resolve_elements(&mut elements).await;
    let binding = product.map(|p| ProductBinding {
        product: p,
        options,
    });
    renderer.render_png(&template.config, &elements, mode, binding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelConfig;
    use crate::label::types::{ElementKind, LabelElement, TextElement};

    fn template() -> LabelTemplate {
        let mut text = LabelElement::new("t", ElementKind::Text(TextElement::new("${nome}")));
        text.width = 150.0;
        text.height = 40.0;
        LabelTemplate::new(LabelConfig::new(50.0, 30.0)).with_element(text)
    }

    fn print_config() -> PagePrintConfig {
        PagePrintConfig {
            margin_top: 10.0,
            margin_bottom: 10.0,
            margin_left: 10.0,
            margin_right: 10.0,
            spacing_horizontal: 2.0,
            spacing_vertical: 2.0,
            ..Default::default()
        }
    }

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product::new(format!("Produto {}", i), i as f64))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_template_fails_fast() {
        let template = LabelTemplate::new(LabelConfig::new(50.0, 30.0));
        let result = generate_document(
            &LabelRenderer::new(),
            &ImageResolver::new().unwrap(),
            &template,
            &products(1),
            &print_config(),
            &PrintOptions::default(),
            None,
        )
        .await;
        assert!(matches!(result, Err(EtiquetaError::Validation(_))));
    }

    #[tokio::test]
    async fn test_single_page_batch() {
        let doc = generate_document(
            &LabelRenderer::new(),
            &ImageResolver::new().unwrap(),
            &template(),
            &products(5),
            &print_config(),
            &PrintOptions::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(doc.pages, 1);
        assert_eq!(doc.placed, 5);
        assert_eq!(&doc.pdf[0..5], b"%PDF-");
        assert!(doc.file_name.starts_with("etiquetas-5-"));
        assert!(doc.file_name.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_page_break_at_capacity() {
        // 3x8 grid: 24 per page, 25 products → 2 pages
        let doc = generate_document(
            &LabelRenderer::new(),
            &ImageResolver::new().unwrap(),
            &template(),
            &products(25),
            &print_config(),
            &PrintOptions::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(doc.pages, 2);
        assert_eq!(doc.placed, 25);
    }

    #[tokio::test]
    async fn test_skip_labels_shifts_start() {
        // skip 6 on a 3-wide grid: first product lands at col 0, row 2
        let config = PagePrintConfig {
            skip_labels: 6,
            ..print_config()
        };
        let grid = page::grid_for_label(50.0, 30.0, crate::units::Unit::Mm, &config);
        assert_eq!(grid.cell_position(6), (0, 2));

        let doc = generate_document(
            &LabelRenderer::new(),
            &ImageResolver::new().unwrap(),
            &template(),
            &products(20),
            &config,
            &PrintOptions::default(),
            None,
        )
        .await
        .unwrap();
        // 6 skipped + 20 placed = 26 cells > 24: spills to a second page
        assert_eq!(doc.pages, 2);
        assert_eq!(doc.placed, 20);
    }

    #[tokio::test]
    async fn test_cancellation_between_products() {
        let flag = CancelFlag::new();
        flag.cancel();
        let result = generate_document(
            &LabelRenderer::new(),
            &ImageResolver::new().unwrap(),
            &template(),
            &products(3),
            &print_config(),
            &PrintOptions::default(),
            Some(&flag),
        )
        .await;
        assert!(matches!(result, Err(EtiquetaError::Cancelled(0))));
    }

    #[tokio::test]
    async fn test_batch_deterministic() {
        let renderer = LabelRenderer::new();
        let resolver = ImageResolver::new().unwrap();
        let run = || async {
            generate_document(
                &renderer,
                &resolver,
                &template(),
                &products(7),
                &print_config(),
                &PrintOptions::default(),
                None,
            )
            .await
            .unwrap()
        };
        let a = run().await;
        let b = run().await;
        assert_eq!(a.pages, b.pages);
        assert_eq!(a.placed, b.placed);
    }

    #[tokio::test]
    async fn test_export_single_label_png() {
        let png = export_label_png(
            &LabelRenderer::new(),
            &ImageResolver::new().unwrap(),
            &template(),
            RenderMode::Print,
            Some(&Product::new("Arroz", 22.9)),
            &PrintOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
