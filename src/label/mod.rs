//! # Label Model
//!
//! A single type hierarchy that is both the Rust API and the persisted
//! JSON wire format. [`LabelTemplate`] is the aggregate root: physical
//! config plus the element list, mutated only through the copy-on-write
//! update API (every update produces a new `elements` vec; the print
//! path treats templates as read-only input).
//!
//! ```
//! use etiqueta::label::{LabelConfig, LabelTemplate};
//! use etiqueta::label::types::{ElementKind, LabelElement, TextElement};
//!
//! let template = LabelTemplate::new(LabelConfig::new(50.0, 30.0))
//!     .with_element(LabelElement::new(
//!         "titulo",
//!         ElementKind::Text(TextElement::new("${nome}")),
//!     ));
//! assert_eq!(template.elements.len(), 1);
//! ```

pub mod autosize;
pub mod types;
pub mod vars;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EtiquetaError;
use crate::page::PagePrintConfig;
use crate::units::Unit;
use types::LabelElement;

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_grid_size() -> f32 {
    10.0
}

fn default_true() -> bool {
    true
}

/// Physical description of one label plus its editor guide toggles.
///
/// The `margin_*` fields are display-only guides for the editor; print
/// margins live in [`PagePrintConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelConfig {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub margin_top: Option<f32>,
    #[serde(default)]
    pub margin_bottom: Option<f32>,
    #[serde(default)]
    pub margin_left: Option<f32>,
    #[serde(default)]
    pub margin_right: Option<f32>,
    /// Grid pitch in pixels for the editor overlay.
    #[serde(default = "default_grid_size")]
    pub grid_size: f32,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default)]
    pub show_margins: bool,
    #[serde(default)]
    pub show_center_line: bool,
    #[serde(default = "default_true")]
    pub show_borders: bool,
    /// Legacy single-label repeat counts (superseded by `PagePrintConfig`).
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub rows: Option<u32>,
}

impl LabelConfig {
    /// Label of `width`×`height` millimeters with default guides.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            unit: Unit::Mm,
            background_color: default_background(),
            margin_top: None,
            margin_bottom: None,
            margin_left: None,
            margin_right: None,
            grid_size: default_grid_size(),
            show_grid: true,
            show_margins: false,
            show_center_line: false,
            show_borders: true,
            columns: None,
            rows: None,
        }
    }

    pub fn validate(&self) -> Result<(), EtiquetaError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(EtiquetaError::Validation(format!(
                "label dimensions must be positive, got {}x{} {:?}",
                self.width, self.height, self.unit
            )));
        }
        Ok(())
    }
}

/// The user-authored label design, reused across many products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelTemplate {
    pub id: String,
    pub config: LabelConfig,
    /// Order is the z-index tiebreak.
    #[serde(default)]
    pub elements: Vec<LabelElement>,
    #[serde(default)]
    pub page_print_config: Option<PagePrintConfig>,
    /// Shared-visibility flag; authorization is the host's concern.
    #[serde(default)]
    pub compartilhado: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl LabelTemplate {
    /// Create an empty template with a fresh id.
    pub fn new(config: LabelConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            elements: Vec::new(),
            page_print_config: None,
            compartilhado: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), EtiquetaError> {
        self.config.validate()
    }

    /// New template value with `element` appended.
    pub fn with_element(&self, element: LabelElement) -> Self {
        let mut next = self.clone();
        next.elements.push(element);
        next.updated_at = Utc::now();
        next
    }

    /// New template value with the element of `id` rewritten by `update`.
    ///
    /// Geometry changes (x/y/width/height) on a locked element are
    /// discarded; all other fields go through. QR elements stay
    /// aspect-locked: unequal width/height collapse to the smaller side.
    /// Unknown ids are a no-op.
    pub fn with_element_updated(
        &self,
        id: &str,
        update: impl FnOnce(&mut LabelElement),
    ) -> Self {
        let mut next = self.clone();
        if let Some(element) = next.elements.iter_mut().find(|e| e.id == id) {
            let frozen = (element.x, element.y, element.width, element.height);
            let locked = element.locked;
            update(element);
            if locked {
                (element.x, element.y, element.width, element.height) = frozen;
            }
            if matches!(element.kind, types::ElementKind::Qrcode(_))
                && element.width != element.height
            {
                let side = element.width.min(element.height);
                element.width = side;
                element.height = side;
            }
            next.updated_at = Utc::now();
        }
        next
    }

    /// New template value without the element of `id`.
    pub fn without_element(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.elements.retain(|e| e.id != id);
        next.updated_at = Utc::now();
        next
    }

    pub fn element(&self, id: &str) -> Option<&LabelElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}
