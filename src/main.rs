//! # Etiqueta CLI
//!
//! Command-line interface for label rendering and batch printing.
//!
//! ## Usage
//!
//! ```bash
//! # Render one label to PNG (editor view, with guides)
//! etiqueta render template.json --out label.png --interactive
//!
//! # Render one label resolved against the first product
//! etiqueta render template.json --products products.json --out label.png
//!
//! # Batch: one label per product, composited into a PDF
//! etiqueta pdf template.json products.json
//!
//! # Show the computed page grid
//! etiqueta grid template.json
//!
//! # Edit-vs-print drift report
//! etiqueta compare template.json products.json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use etiqueta::batch;
use etiqueta::label::LabelTemplate;
use etiqueta::label::vars::PrintOptions;
use etiqueta::page;
use etiqueta::product::Product;
use etiqueta::render::{ImageResolver, LabelRenderer, RenderMode};
use etiqueta::{EtiquetaError, compare};

/// Etiqueta - label design and batch printing utility
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a single label to PNG
    Render {
        /// Template JSON file
        template: PathBuf,

        /// Products JSON file (array); the first product is bound
        #[arg(long)]
        products: Option<PathBuf>,

        /// Output file
        #[arg(long, default_value = "label.png")]
        out: PathBuf,

        /// Editor view: draw grid/margin/center/border guides
        #[arg(long)]
        interactive: bool,

        /// TTF font file registered for the given family
        #[arg(long, value_name = "FAMILY=PATH")]
        font: Vec<String>,
    },

    /// Generate the batch print PDF for all products
    Pdf {
        /// Template JSON file
        template: PathBuf,

        /// Products JSON file (array)
        products: PathBuf,

        /// Output file (defaults to the generated document name)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Leave the first N grid cells empty
        #[arg(long)]
        skip: Option<usize>,

        /// TTF font file registered for the given family
        #[arg(long, value_name = "FAMILY=PATH")]
        font: Vec<String>,
    },

    /// Print the computed page grid for a template
    Grid {
        /// Template JSON file
        template: PathBuf,
    },

    /// Report edit-vs-print geometry drift
    Compare {
        /// Template JSON file
        template: PathBuf,

        /// Products JSON file (array); the first product is bound
        products: PathBuf,
    },
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_template(path: &PathBuf) -> Result<LabelTemplate, EtiquetaError> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| EtiquetaError::Validation(format!("{}: {}", path.display(), e)))
}

fn load_products(path: &PathBuf) -> Result<Vec<Product>, EtiquetaError> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| EtiquetaError::Validation(format!("{}: {}", path.display(), e)))
}

/// Build a renderer with `FAMILY=PATH` font registrations applied.
fn renderer_with_fonts(fonts: &[String]) -> Result<LabelRenderer, EtiquetaError> {
    let mut renderer = LabelRenderer::new();
    for entry in fonts {
        let (family, path) = entry.split_once('=').ok_or_else(|| {
            EtiquetaError::Font(format!("expected FAMILY=PATH, got {:?}", entry))
        })?;
        renderer.fonts.register(family, false, path)?;
    }
    Ok(renderer)
}

fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Render {
            template,
            products,
            out,
            interactive,
            font,
        } => {
            let template = load_template(&template)?;
            let product_list = match &products {
                Some(path) => load_products(path)?,
                None => Vec::new(),
            };
            let renderer = renderer_with_fonts(&font)?;
            let resolver = ImageResolver::new()?;
            let mode = if interactive {
                RenderMode::Interactive
            } else {
                RenderMode::Print
            };

            let png = runtime.block_on(batch::export_label_png(
                &renderer,
                &resolver,
                &template,
                mode,
                product_list.first(),
                &PrintOptions::default(),
            ))?;
            std::fs::write(&out, png)?;
            println!("Wrote {}", out.display());
        }

        Commands::Pdf {
            template,
            products,
            out,
            skip,
            font,
        } => {
            let template = load_template(&template)?;
            let product_list = load_products(&products)?;
            let renderer = renderer_with_fonts(&font)?;
            let resolver = ImageResolver::new()?;

            let mut print_config = template.page_print_config.clone().unwrap_or_default();
            if let Some(skip) = skip {
                print_config.skip_labels = skip;
            }

            let doc = runtime.block_on(batch::generate_document(
                &renderer,
                &resolver,
                &template,
                &product_list,
                &print_config,
                &PrintOptions::default(),
                None,
            ))?;

            let out = out.unwrap_or_else(|| PathBuf::from(&doc.file_name));
            std::fs::write(&out, &doc.pdf)?;
            println!(
                "Wrote {} ({} labels on {} pages)",
                out.display(),
                doc.placed,
                doc.pages
            );
        }

        Commands::Grid { template } => {
            let template = load_template(&template)?;
            let print_config = template.page_print_config.clone().unwrap_or_default();
            let grid = page::grid_for_label(
                template.config.width,
                template.config.height,
                template.config.unit,
                &print_config,
            );
            println!(
                "Page: {:.1} x {:.1} mm ({:?})",
                grid.page_width_mm, grid.page_height_mm, print_config.page_size_type
            );
            println!(
                "Grid: {} columns x {} rows = {} labels/page",
                grid.columns,
                grid.rows,
                grid.capacity()
            );
            for row in 0..grid.rows {
                for col in 0..grid.columns {
                    let (x, y) = grid.cell_offset(col, row);
                    println!("  cell ({}, {}): {:.1}, {:.1} mm", col, row, x, y);
                }
            }
        }

        Commands::Compare { template, products } => {
            let template = load_template(&template)?;
            let product_list = load_products(&products)?;
            let product = product_list.first().cloned().unwrap_or_default();
            let report = compare::compare(&template, &product, &PrintOptions::default());
            print!("{}", report.to_report());
            if report.has_drift() {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
