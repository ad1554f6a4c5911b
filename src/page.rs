//! Page/print layout calculation.
//!
//! Given a label's physical size and a page configuration, computes the
//! grid of label cells that fits on one physical page and the offset of
//! each cell. All math here is in millimeters; pixel conversion happens
//! at the rendering boundary.

use serde::{Deserialize, Serialize};

use crate::units;

/// A4 portrait, millimeters.
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Letter ("carta") portrait, millimeters.
pub const CARTA_WIDTH_MM: f32 = 215.9;
pub const CARTA_HEIGHT_MM: f32 = 279.4;

/// Minimum default roll width for thermal-continuous pages.
pub const THERMAL_MIN_WIDTH_MM: f32 = 108.0;

/// Physical page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSizeType {
    #[default]
    A4,
    Carta,
    /// Continuous thermal roll: page height equals the label height.
    AlturaEtiqueta,
    Personalizado,
}

fn default_columns() -> u32 {
    1
}

/// Print-sheet configuration attached to a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePrintConfig {
    #[serde(default)]
    pub page_size_type: PageSizeType,
    /// Requested columns; drives the roll width in thermal mode.
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Requested rows; ignored (forced to 1) in thermal mode.
    #[serde(default = "default_columns")]
    pub rows: u32,
    #[serde(default)]
    pub margin_top: f32,
    #[serde(default)]
    pub margin_bottom: f32,
    #[serde(default)]
    pub margin_left: f32,
    #[serde(default)]
    pub margin_right: f32,
    #[serde(default)]
    pub spacing_horizontal: f32,
    #[serde(default)]
    pub spacing_vertical: f32,
    /// Page dimensions for `personalizado` (and width override for thermal).
    #[serde(default)]
    pub custom_page_width: Option<f32>,
    #[serde(default)]
    pub custom_page_height: Option<f32>,
    /// Draw cut-line rectangles around each placed label.
    #[serde(default)]
    pub show_borders: bool,
    /// Leading grid cells of the first page to leave empty
    /// (partially-used physical sheets).
    #[serde(default)]
    pub skip_labels: usize,
}

impl Default for PagePrintConfig {
    fn default() -> Self {
        Self {
            page_size_type: PageSizeType::A4,
            columns: 1,
            rows: 1,
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
            spacing_horizontal: 0.0,
            spacing_vertical: 0.0,
            custom_page_width: None,
            custom_page_height: None,
            show_borders: false,
            skip_labels: 0,
        }
    }
}

/// Computed grid for one physical page. All dimensions in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageGrid {
    pub columns: u32,
    pub rows: u32,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub label_width_mm: f32,
    pub label_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    pub spacing_horizontal_mm: f32,
    pub spacing_vertical_mm: f32,
}

impl PageGrid {
    /// Labels per physical page.
    pub fn capacity(&self) -> usize {
        (self.columns as usize) * (self.rows as usize)
    }

    /// Top-left offset of a grid cell, in millimeters.
    pub fn cell_offset(&self, col: u32, row: u32) -> (f32, f32) {
        (
            self.margin_left_mm + col as f32 * (self.label_width_mm + self.spacing_horizontal_mm),
            self.margin_top_mm + row as f32 * (self.label_height_mm + self.spacing_vertical_mm),
        )
    }

    /// Map a linear cell index to its (column, row) within a page.
    pub fn cell_position(&self, linear: usize) -> (u32, u32) {
        let within_page = linear % self.capacity();
        (
            (within_page % self.columns as usize) as u32,
            (within_page / self.columns as usize) as u32,
        )
    }

    /// Which physical page a linear cell index lands on.
    pub fn page_index(&self, linear: usize) -> usize {
        linear / self.capacity()
    }
}

/// Count how many label-sized slots fit along one axis.
///
/// Placing N labels consumes `N*label + (N-1)*spacing <= usable`; adding
/// one spacing unit to both sides before dividing avoids the off-by-one
/// at N = 1. Floored to a minimum of 1.
fn fit_count(usable: f32, label: f32, spacing: f32) -> u32 {
    if label <= 0.0 {
        return 1;
    }
    let n = ((usable + spacing) / (label + spacing)).floor();
    (n as i64).max(1) as u32
}

/// Compute the label grid for a page configuration.
///
/// `label_width_mm`/`label_height_mm` are the label's physical size (see
/// [`units::to_millimeters`] for converting from a `LabelConfig`).
pub fn compute_grid(
    label_width_mm: f32,
    label_height_mm: f32,
    config: &PagePrintConfig,
) -> PageGrid {
    if config.page_size_type == PageSizeType::AlturaEtiqueta {
        return thermal_grid(label_width_mm, label_height_mm, config);
    }

    let (page_w, page_h) = match config.page_size_type {
        PageSizeType::A4 => (A4_WIDTH_MM, A4_HEIGHT_MM),
        PageSizeType::Carta => (CARTA_WIDTH_MM, CARTA_HEIGHT_MM),
        PageSizeType::Personalizado => (
            config.custom_page_width.unwrap_or(A4_WIDTH_MM),
            config.custom_page_height.unwrap_or(A4_HEIGHT_MM),
        ),
        PageSizeType::AlturaEtiqueta => unreachable!(),
    };

    let usable_w = page_w - config.margin_left - config.margin_right;
    let usable_h = page_h - config.margin_top - config.margin_bottom;

    PageGrid {
        columns: fit_count(usable_w, label_width_mm, config.spacing_horizontal),
        rows: fit_count(usable_h, label_height_mm, config.spacing_vertical),
        page_width_mm: page_w,
        page_height_mm: page_h,
        label_width_mm,
        label_height_mm,
        margin_left_mm: config.margin_left,
        margin_top_mm: config.margin_top,
        spacing_horizontal_mm: config.spacing_horizontal,
        spacing_vertical_mm: config.spacing_vertical,
    }
}

/// Thermal-continuous layout: one row, page height = label height,
/// vertical spacing and top/bottom margins forced to zero.
fn thermal_grid(label_width_mm: f32, label_height_mm: f32, config: &PagePrintConfig) -> PageGrid {
    let columns = config.columns.max(1);
    let default_width = (columns as f32 * label_width_mm
        + columns.saturating_sub(1) as f32 * config.spacing_horizontal)
        .max(THERMAL_MIN_WIDTH_MM);
    let page_width = config.custom_page_width.unwrap_or(default_width);

    PageGrid {
        columns,
        rows: 1,
        page_width_mm: page_width,
        page_height_mm: label_height_mm,
        label_width_mm,
        label_height_mm,
        margin_left_mm: config.margin_left,
        margin_top_mm: 0.0,
        spacing_horizontal_mm: config.spacing_horizontal,
        spacing_vertical_mm: 0.0,
    }
}

/// Convenience: grid for a label config in its authored unit.
pub fn grid_for_label(
    label_width: f32,
    label_height: f32,
    unit: crate::units::Unit,
    config: &PagePrintConfig,
) -> PageGrid {
    compute_grid(
        units::to_millimeters(label_width, unit),
        units::to_millimeters(label_height, unit),
        config,
    )
}
