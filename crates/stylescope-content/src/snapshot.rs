//! Element snapshot capture.

use stylescope_protocols::{ComputedStyleSummary, ElementSnapshot};

use crate::dom::{Document, NodeId};

/// Default number of text characters carried by a snapshot.
pub const TEXT_PREVIEW_CHARS: usize = 100;

/// Capture the identity, leading text and computed styles of `node`.
///
/// Returns `None` when the handle does not name a page element.
pub fn capture<D: Document + ?Sized>(
    document: &D,
    node: NodeId,
    text_preview_chars: usize,
) -> Option<ElementSnapshot> {
    let info = document.element(node)?;
    let style = document.computed_style(node);
    let prop = |name: &str| style.property(name).to_string();

    Some(ElementSnapshot {
        tag_name: info.tag_name.to_lowercase(),
        class_name: info.class_name,
        id: info.id,
        text_content: info.text_content.chars().take(text_preview_chars).collect(),
        computed_styles: ComputedStyleSummary {
            width: prop("width"),
            height: prop("height"),
            margin: prop("margin"),
            padding: prop("padding"),
            background_color: prop("background-color"),
            color: prop("color"),
            font_family: style.font_family().replace('"', ""),
            font_size: prop("font-size"),
            font_weight: prop("font-weight"),
            line_height: prop("line-height"),
            border: prop("border"),
            border_radius: prop("border-radius"),
            display: prop("display"),
            position: prop("position"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeSnapshot, PageSnapshot, Rect};

    fn doc() -> MemoryDocument {
        let button = NodeSnapshot::new("BUTTON")
            .with_id("save")
            .with_class("btn primary")
            .with_text("é".repeat(150))
            .with_rect(Rect::new(5.0, 5.0, 120.0, 40.0))
            .with_style("width", "120px")
            .with_style("height", "40px")
            .with_style("padding", "8px 16px")
            .with_style("background-color", "rgb(59, 130, 246)")
            .with_style("font-size", "14px")
            .with_style("border-radius", "6px")
            .with_style("display", "inline-block");
        let root = NodeSnapshot::new("html")
            .with_style("color", "rgb(255, 255, 255)")
            .with_style("font-family", "\"Helvetica Neue\", Arial")
            .with_child(button);
        MemoryDocument::from_snapshot(PageSnapshot {
            url: "https://example.com/".to_string(),
            title: None,
            root,
        })
        .unwrap()
    }

    #[test]
    fn test_capture_fields() {
        let doc = doc();
        let node = doc.find_by_id("save").unwrap();
        let snapshot = capture(&doc, node, TEXT_PREVIEW_CHARS).unwrap();

        assert_eq!(snapshot.tag_name, "button");
        assert_eq!(snapshot.class_name, "btn primary");
        assert_eq!(snapshot.id, "save");
        assert_eq!(snapshot.text_content.chars().count(), 100);

        let styles = &snapshot.computed_styles;
        assert_eq!(styles.width, "120px");
        assert_eq!(styles.background_color, "rgb(59, 130, 246)");
        assert_eq!(styles.color, "rgb(255, 255, 255)");
        assert_eq!(styles.font_family, "Helvetica Neue, Arial");
        assert_eq!(styles.border, "");
        assert_eq!(styles.display, "inline-block");
    }

    #[test]
    fn test_capture_custom_preview_length() {
        let doc = doc();
        let node = doc.find_by_id("save").unwrap();
        let snapshot = capture(&doc, node, 10).unwrap();
        assert_eq!(snapshot.text_content, "é".repeat(10));
    }

    #[test]
    fn test_capture_unknown_node() {
        let doc = doc();
        assert!(capture(&doc, 999, TEXT_PREVIEW_CHARS).is_none());
    }
}
