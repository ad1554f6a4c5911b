//! Element struct types for the label model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and the persisted JSON wire format (which
//! is camelCase with a lowercase `type` discriminator).

use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::label::vars::{self, PrintOptions};
use crate::measure::FontSpec;
use crate::product::Product;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

fn default_font_size() -> f32 {
    16.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_black() -> String {
    "#000000".to_string()
}

fn default_white() -> String {
    "#ffffff".to_string()
}

fn default_line_height() -> f32 {
    1.2
}

/// Text element with full styling support.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Raw content; may contain `${...}` variables.
    pub content: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// CSS-style weight: "normal", "bold" or a numeric string ("600").
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default = "default_black")]
    pub color: String,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    /// Disable word wrapping (single line, clipped at the element edge).
    #[serde(default)]
    pub no_wrap: bool,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

impl Default for TextElement {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            color: default_black(),
            text_align: TextAlign::Left,
            italic: false,
            underline: false,
            no_wrap: false,
            line_height: default_line_height(),
        }
    }
}

impl TextElement {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Whether the weight string selects a bold face.
    pub fn is_bold(&self) -> bool {
        match self.font_weight.as_str() {
            "bold" | "bolder" => true,
            other => other.parse::<u32>().map(|w| w >= 600).unwrap_or(false),
        }
    }

    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size: self.font_size,
            bold: self.is_bold(),
            italic: self.italic,
        }
    }
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrErrorLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

/// QR code element. Rendered square: side = `min(width, height)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeElement {
    /// Encoded value; may contain `${...}` variables.
    pub value: String,
    #[serde(default = "default_white")]
    pub bg_color: String,
    #[serde(default = "default_black")]
    pub fg_color: String,
    #[serde(default)]
    pub error_correction_level: QrErrorLevel,
}

impl Default for QrCodeElement {
    fn default() -> Self {
        Self {
            value: String::new(),
            bg_color: default_white(),
            fg_color: default_black(),
            error_correction_level: QrErrorLevel::M,
        }
    }
}

/// 1D barcode symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BarcodeFormat {
    #[default]
    Code128,
    Ean13,
    Ean8,
    Upc,
    Code39,
    Itf14,
}

fn default_true() -> bool {
    true
}

/// 1D barcode element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeElement {
    /// Encoded value; may contain `${...}` variables.
    pub value: String,
    #[serde(default)]
    pub format: BarcodeFormat,
    /// Render the human-readable value under the bars.
    #[serde(default = "default_true")]
    pub display_value: bool,
    #[serde(default = "default_black")]
    pub line_color: String,
    #[serde(default = "default_white")]
    pub background: String,
}

impl Default for BarcodeElement {
    fn default() -> Self {
        Self {
            value: String::new(),
            format: BarcodeFormat::Code128,
            display_value: true,
            line_color: default_black(),
            background: default_white(),
        }
    }
}

/// Image scaling mode within the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

fn default_opacity() -> f32 {
    1.0
}

/// Image element. `src` is a URL, `data:` URI, or local path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub src: String,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub object_fit: ObjectFit,
    /// Decoded pixels (populated by `ImageResolver`, never persisted).
    #[serde(skip)]
    pub resolved: Option<Arc<DynamicImage>>,
}

impl Default for ImageElement {
    fn default() -> Self {
        Self {
            src: String::new(),
            opacity: 1.0,
            object_fit: ObjectFit::Contain,
            resolved: None,
        }
    }
}

fn default_transparent() -> String {
    "transparent".to_string()
}

fn default_border_width() -> f32 {
    1.0
}

/// Rectangle element: fill plus optional border stroke.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleElement {
    #[serde(default = "default_transparent")]
    pub fill_color: String,
    #[serde(default = "default_black")]
    pub border_color: String,
    #[serde(default = "default_border_width")]
    pub border_width: f32,
    #[serde(default)]
    pub border_radius: f32,
}

impl Default for RectangleElement {
    fn default() -> Self {
        Self {
            fill_color: default_transparent(),
            border_color: default_black(),
            border_width: default_border_width(),
            border_radius: 0.0,
        }
    }
}

/// The element tagged union. `{"type": "text", ...}` on the wire.
///
/// Tags saved by a newer version deserialize to [`ElementKind::Unknown`],
/// which renders nothing, so templates stay loadable across versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextElement),
    Qrcode(QrCodeElement),
    Barcode(BarcodeElement),
    Image(ImageElement),
    Rectangle(RectangleElement),
    #[serde(other)]
    Unknown,
}

impl ElementKind {
    /// The wire tag for this kind (used in diagnostic reports).
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Qrcode(_) => "qrcode",
            ElementKind::Barcode(_) => "barcode",
            ElementKind::Image(_) => "image",
            ElementKind::Rectangle(_) => "rectangle",
            ElementKind::Unknown => "unknown",
        }
    }
}

/// One visual primitive placed on a label.
///
/// Position and size are device pixels in label-local space, origin at
/// the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelElement {
    /// Unique within the template.
    pub id: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Paint order; ties broken by position in the element list.
    #[serde(default)]
    pub z_index: i32,
    /// Suppresses geometry changes through the template update API.
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl LabelElement {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            z_index: 0,
            locked: false,
            kind,
        }
    }

    /// Copy of this element with `${...}` variables substituted in its
    /// text/value fields. An all-whitespace resolution keeps the original
    /// content so the element never silently disappears.
    pub fn resolve_variables(&self, product: &Product, opts: &PrintOptions) -> LabelElement {
        let mut resolved = self.clone();
        match &mut resolved.kind {
            ElementKind::Text(text) => {
                text.content = vars::resolve_or_keep(&text.content, product, opts);
            }
            ElementKind::Qrcode(qr) => {
                qr.value = vars::resolve_or_keep(&qr.value, product, opts);
            }
            ElementKind::Barcode(barcode) => {
                barcode.value = vars::resolve_or_keep(&barcode.value, product, opts);
            }
            ElementKind::Image(_) | ElementKind::Rectangle(_) | ElementKind::Unknown => {}
        }
        resolved
    }
}
