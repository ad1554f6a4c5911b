//! Text auto-sizing.
//!
//! Whenever a text element's content, width, font or line height changes,
//! the editor derives a minimum bounding height from the wrapped line
//! count and the glyph metrics. The policy is grow-dominant: the box
//! grows to fit new content but never auto-shrinks below what the user
//! sized by hand, so re-rendering with unchanged inputs is stable.

use crate::label::types::TextElement;
use crate::measure::{FontSpec, TextMeasurer};

/// Extra pixels added below the last line.
const HEIGHT_PADDING: f32 = 2.0;

/// Growth threshold: candidate heights within this of the current height
/// leave the element untouched (guards against resize oscillation).
const GROW_THRESHOLD: f32 = 1.0;

/// Greedily wrap `content` into lines no wider than `width`.
///
/// Explicit newlines always break; a line is closed when appending the
/// next word would exceed the width. A word wider than the element gets
/// a line of its own rather than being split.
pub fn wrap_lines(
    content: &str,
    width: f32,
    spec: &FontSpec,
    measurer: &dyn TextMeasurer,
    no_wrap: bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in content.split('\n') {
        if no_wrap || paragraph.is_empty() {
            lines.push(paragraph.to_string());
            continue;
        }

        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if line.is_empty() || measurer.measure(&candidate, spec).width <= width {
                line = candidate;
            } else {
                lines.push(line);
                line = word.to_string();
            }
        }
        lines.push(line);
    }

    lines
}

/// Compute the auto-sized height for a text element, or `None` when the
/// current height should be left alone.
///
/// The height mutates only when the current height is below the safety
/// floor, the candidate grows past the current height by more than 1px,
/// or the width is still uninitialized.
pub fn auto_height(
    element: &TextElement,
    width: f32,
    current_height: f32,
    measurer: &dyn TextMeasurer,
) -> Option<f32> {
    let spec = element.font_spec();

    let wrapped = wrap_lines(&element.content, width, &spec, measurer, element.no_wrap);
    let paragraphs = element.content.split('\n').count();
    let line_count = wrapped.len().max(paragraphs).max(1);

    let metrics = measurer.measure(&element.content, &spec);
    let text_height = line_count as f32 * element.font_size * element.line_height;
    let candidate = text_height.max(metrics.ascent + metrics.descent) + HEIGHT_PADDING;
    let floor = (element.font_size * element.line_height).ceil();

    let should_apply = current_height < floor
        || candidate > current_height + GROW_THRESHOLD
        || width == 0.0;

    if should_apply {
        Some(candidate.max(floor))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::TextMetrics;

    /// Fixed-advance measurer: every char is 0.5em wide, 0.8em ascent.
    struct FakeMono;

    impl TextMeasurer for FakeMono {
        fn measure(&self, text: &str, spec: &FontSpec) -> TextMetrics {
            TextMetrics {
                width: text.chars().count() as f32 * spec.size * 0.5,
                ascent: spec.size * 0.8,
                descent: spec.size * 0.2,
            }
        }
    }

    fn text(content: &str) -> TextElement {
        TextElement {
            content: content.into(),
            font_size: 10.0,
            line_height: 1.2,
            ..Default::default()
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        // 10px font, 0.5em advance → 5px per char; 40px fits 8 chars
        let el = text("aaa bbb ccc");
        let lines = wrap_lines(&el.content, 40.0, &el.font_spec(), &FakeMono, false);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_wrap_oversized_word_gets_own_line() {
        let el = text("hipopótamo ox");
        let lines = wrap_lines(&el.content, 20.0, &el.font_spec(), &FakeMono, false);
        assert_eq!(lines[0], "hipopótamo");
        assert_eq!(lines[1], "ox");
    }

    #[test]
    fn test_no_wrap_keeps_single_line() {
        let el = text("um dois tres quatro cinco");
        let lines = wrap_lines(&el.content, 20.0, &el.font_spec(), &FakeMono, true);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_explicit_newlines_always_break() {
        let el = text("a\n\nb");
        let lines = wrap_lines(&el.content, 100.0, &el.font_spec(), &FakeMono, false);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_single_line_height() {
        // 1 line: 10 * 1.2 = 12, + 2 padding = 14
        let h = auto_height(&text("oi"), 100.0, 0.0, &FakeMono).unwrap();
        assert_eq!(h, 14.0);
    }

    #[test]
    fn test_height_monotonic_in_content() {
        let short = auto_height(&text("aaa bbb"), 40.0, 0.0, &FakeMono).unwrap();
        let long = auto_height(&text("aaa bbb ccc ddd eee"), 40.0, 0.0, &FakeMono).unwrap();
        assert!(long >= short, "{} < {}", long, short);
    }

    #[test]
    fn test_no_auto_shrink_below_manual_size() {
        // User stretched the box to 80px; content only needs 14px
        assert_eq!(auto_height(&text("oi"), 100.0, 80.0, &FakeMono), None);
    }

    #[test]
    fn test_grows_when_content_needs_more() {
        // 3 lines needed: 3 * 12 + 2 = 38 > 14 current
        let el = text("aaa bbb ccc ddd eee fff");
        let h = auto_height(&el, 40.0, 14.0, &FakeMono);
        assert!(h.is_some());
        assert!(h.unwrap() > 14.0);
    }

    #[test]
    fn test_idempotent_once_applied() {
        let el = text("aaa bbb ccc ddd");
        let first = auto_height(&el, 40.0, 0.0, &FakeMono).unwrap();
        // Re-running with the height it just produced changes nothing
        assert_eq!(auto_height(&el, 40.0, first, &FakeMono), None);
    }

    #[test]
    fn test_below_floor_forces_resize() {
        // Current height squashed under one line: must grow back
        let h = auto_height(&text("oi"), 100.0, 3.0, &FakeMono);
        assert!(h.unwrap() >= 12.0);
    }

    #[test]
    fn test_uninitialized_width_applies() {
        assert!(auto_height(&text("oi"), 0.0, 500.0, &FakeMono).is_some());
    }
}
