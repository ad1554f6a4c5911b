//! Edit-vs-print geometry comparison.
//!
//! The renderer computes placement through one shared layout function,
//! so the two modes cannot diverge silently; this engine exists to prove
//! that for any given template. It snapshots element geometry as
//! authored (edit) and after variable resolution (print), diffs per
//! element, and renders a structured report. Purely diagnostic, never
//! mutates the template.

use serde::Serialize;

use crate::label::LabelTemplate;
use crate::label::vars::PrintOptions;
use crate::layout;
use crate::product::Product;

/// Deltas under this many device pixels are treated as equal. The
/// arithmetic path is shared between modes, so anything above this is a
/// real regression, not rounding.
pub const DRIFT_EPSILON: f32 = 0.01;

/// Geometry snapshot of one element in one mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPositionInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Per-element diff between the edit and print snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDifference {
    pub element_id: String,
    pub delta_x: f32,
    pub delta_y: f32,
    pub delta_width: f32,
    pub delta_height: f32,
    pub has_difference: bool,
}

/// Full comparison output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub differences: Vec<PositionDifference>,
    pub edit_positions: Vec<ElementPositionInfo>,
    pub print_positions: Vec<ElementPositionInfo>,
}

impl ComparisonReport {
    /// Whether any element drifted beyond [`DRIFT_EPSILON`].
    pub fn has_drift(&self) -> bool {
        self.differences.iter().any(|d| d.has_difference)
    }

    /// Human-readable element-by-element dump, suitable for pasting into
    /// a bug report.
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str("=== edit vs print geometry ===\n");
        out.push_str(&format!(
            "elements: {}  drifted: {}\n\n",
            self.edit_positions.len(),
            self.differences.iter().filter(|d| d.has_difference).count()
        ));

        for diff in &self.differences {
            let edit = self.edit_positions.iter().find(|p| p.id == diff.element_id);
            let print = self
                .print_positions
                .iter()
                .find(|p| p.id == diff.element_id);
            let (Some(edit), Some(print)) = (edit, print) else {
                continue;
            };
            let marker = if diff.has_difference { "DRIFT" } else { "ok" };
            out.push_str(&format!("[{}] {} ({})\n", marker, edit.id, edit.kind));
            out.push_str(&format!(
                "  edit:  x={:.2} y={:.2} w={:.2} h={:.2}\n",
                edit.x, edit.y, edit.width, edit.height
            ));
            out.push_str(&format!(
                "  print: x={:.2} y={:.2} w={:.2} h={:.2}\n",
                print.x, print.y, print.width, print.height
            ));
            if diff.has_difference {
                out.push_str(&format!(
                    "  delta: dx={:.3} dy={:.3} dw={:.3} dh={:.3}\n",
                    diff.delta_x, diff.delta_y, diff.delta_width, diff.delta_height
                ));
            }
        }
        out
    }
}

fn snapshot(elements: &[crate::label::types::LabelElement]) -> Vec<ElementPositionInfo> {
    elements
        .iter()
        .map(|el| {
            let rect = layout::layout_element(el);
            ElementPositionInfo {
                id: el.id.clone(),
                kind: el.kind.kind_name().to_string(),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            }
        })
        .collect()
}

/// Capture geometry under both modes and diff per element.
pub fn compare(
    template: &LabelTemplate,
    product: &Product,
    options: &PrintOptions,
) -> ComparisonReport {
    let edit_positions = snapshot(&template.elements);

    let resolved: Vec<_> = template
        .elements
        .iter()
        .map(|el| el.resolve_variables(product, options))
        .collect();
    let print_positions = snapshot(&resolved);

    let differences = edit_positions
        .iter()
        .filter_map(|edit| {
            let print = print_positions.iter().find(|p| p.id == edit.id)?;
            let delta_x = print.x - edit.x;
            let delta_y = print.y - edit.y;
            let delta_width = print.width - edit.width;
            let delta_height = print.height - edit.height;
            let has_difference = delta_x.abs() > DRIFT_EPSILON
                || delta_y.abs() > DRIFT_EPSILON
                || delta_width.abs() > DRIFT_EPSILON
                || delta_height.abs() > DRIFT_EPSILON;
            Some(PositionDifference {
                element_id: edit.id.clone(),
                delta_x,
                delta_y,
                delta_width,
                delta_height,
                has_difference,
            })
        })
        .collect();

    ComparisonReport {
        differences,
        edit_positions,
        print_positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelConfig;
    use crate::label::types::{
        BarcodeElement, ElementKind, LabelElement, QrCodeElement, TextElement,
    };

    fn template() -> LabelTemplate {
        let mut text = LabelElement::new("t", ElementKind::Text(TextElement::new("${nome}")));
        text.x = 5.0;
        text.y = 5.0;
        text.width = 120.0;
        text.height = 30.0;

        let mut qr = LabelElement::new("q", ElementKind::Qrcode(QrCodeElement::default()));
        qr.x = 130.0;
        qr.width = 40.0;
        qr.height = 40.0;

        let mut barcode = LabelElement::new(
            "b",
            ElementKind::Barcode(BarcodeElement {
                value: "${barcode}".into(),
                ..Default::default()
            }),
        );
        barcode.y = 50.0;
        barcode.width = 150.0;
        barcode.height = 40.0;

        LabelTemplate::new(LabelConfig::new(50.0, 30.0))
            .with_element(text)
            .with_element(qr)
            .with_element(barcode)
    }

    #[test]
    fn test_no_drift_for_shared_layout() {
        let report = compare(
            &template(),
            &Product::new("Sabão em Pó", 8.9),
            &PrintOptions::default(),
        );
        assert!(!report.has_drift());
        assert!(report.differences.iter().all(|d| !d.has_difference));
        assert_eq!(report.differences.len(), 3);
    }

    #[test]
    fn test_deltas_are_zero() {
        let report = compare(&template(), &Product::default(), &PrintOptions::default());
        for d in &report.differences {
            assert_eq!(d.delta_x, 0.0);
            assert_eq!(d.delta_y, 0.0);
            assert_eq!(d.delta_width, 0.0);
            assert_eq!(d.delta_height, 0.0);
        }
    }

    #[test]
    fn test_snapshot_applies_qr_square() {
        let mut template = template();
        // Stretch the QR box; both snapshots must report the min-side square
        template = template.with_element_updated("q", |e| {
            e.width = 80.0;
            e.height = 40.0;
        });
        let report = compare(&template, &Product::default(), &PrintOptions::default());
        let edit_qr = report.edit_positions.iter().find(|p| p.id == "q").unwrap();
        assert_eq!(edit_qr.width, 40.0);
        assert_eq!(edit_qr.height, 40.0);
        assert!(!report.has_drift());
    }

    #[test]
    fn test_report_text_format() {
        let report = compare(
            &template(),
            &Product::new("Café", 21.0),
            &PrintOptions::default(),
        );
        let text = report.to_report();
        assert!(text.contains("elements: 3  drifted: 0"));
        assert!(text.contains("[ok] t (text)"));
        assert!(text.contains("[ok] q (qrcode)"));
    }

    #[test]
    fn test_template_untouched() {
        let before = template();
        let json_before = serde_json::to_string(&before.elements).unwrap();
        let _ = compare(&before, &Product::new("X", 1.0), &PrintOptions::default());
        assert_eq!(serde_json::to_string(&before.elements).unwrap(), json_before);
    }
}
