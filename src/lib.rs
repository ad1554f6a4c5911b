//! # Etiqueta - Label Design & Batch Printing Engine
//!
//! Etiqueta is a Rust library for composing product labels (text,
//! barcode, QR code, image, rectangle elements) and generating
//! print-ready output. It provides:
//!
//! - **Label model**: a serializable template of absolutely-positioned
//!   elements with variable placeholders (`${nome}`, `${preco}`, ...)
//! - **Unified geometry**: one layout function shared by the editor
//!   preview and the print rasterizer, so the two cannot drift
//! - **Page calculation**: how many labels fit on A4, Letter, a custom
//!   sheet or a continuous thermal roll
//! - **Batch export**: products × template composited into a multi-page
//!   PDF, or a single label as PNG
//!
//! ## Quick Start
//!
//! ```no_run
//! use etiqueta::batch;
//! use etiqueta::label::{LabelConfig, LabelTemplate};
//! use etiqueta::label::types::{ElementKind, LabelElement, TextElement};
//! use etiqueta::label::vars::PrintOptions;
//! use etiqueta::page::PagePrintConfig;
//! use etiqueta::product::Product;
//! use etiqueta::render::{ImageResolver, LabelRenderer};
//!
//! # async fn demo() -> Result<(), etiqueta::EtiquetaError> {
//! let mut title = LabelElement::new(
//!     "titulo",
//!     ElementKind::Text(TextElement::new("${nome} - ${preco}")),
//! );
//! title.width = 180.0;
//! title.height = 40.0;
//!
//! let template = LabelTemplate::new(LabelConfig::new(50.0, 30.0)).with_element(title);
//! let products = vec![Product::new("Caneta", 4.5), Product::new("Caderno", 19.9)];
//!
//! let doc = batch::generate_document(
//!     &LabelRenderer::new(),
//!     &ImageResolver::new()?,
//!     &template,
//!     &products,
//!     &PagePrintConfig::default(),
//!     &PrintOptions::default(),
//!     None,
//! )
//! .await?;
//! std::fs::write(&doc.file_name, &doc.pdf)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Template, element model, variables, auto-sizing |
//! | [`layout`] | Shared element geometry |
//! | [`measure`] | Text measurement port and font store |
//! | [`render`] | RGBA rasterizer (interactive and print modes) |
//! | [`page`] | Page grid calculation |
//! | [`compare`] | Edit-vs-print drift detection |
//! | [`batch`] | Batch PDF / PNG export driver |
//! | [`units`] | Physical unit conversion |
//! | [`error`] | Error types |

pub mod batch;
pub mod compare;
pub mod error;
pub mod label;
pub mod layout;
pub mod measure;
pub mod page;
pub mod pdf;
pub mod product;
pub mod render;
pub mod units;

// Re-exports for convenience
pub use error::EtiquetaError;
pub use label::{LabelConfig, LabelTemplate};
pub use render::{LabelRenderer, RenderMode};
