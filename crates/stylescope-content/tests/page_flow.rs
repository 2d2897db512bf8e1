//! Analysis and picking against a page loaded from JSON.

use stylescope_content::{
    AgentOptions, ContentAgent, Document, MemoryDocument, PickerEvent, StyleAggregator,
};
use stylescope_protocols::Message;
use tokio::sync::mpsc;

const PAGE: &str = r##"{
    "url": "https://shop.example.com/product/42",
    "title": "Product 42",
    "root": {
        "tag": "html",
        "style": {"color": "rgb(17, 24, 39)", "font-family": "\"Inter\", sans-serif"},
        "children": [{
            "tag": "body",
            "style": {"background-color": "rgb(249, 250, 251)"},
            "children": [
                {"tag": "header", "style": {"background-color": "rgb(17, 24, 39)", "color": "rgb(255, 255, 255)"},
                 "children": [{"tag": "h1", "text": "Shop", "rect": {"left": 16, "top": 8, "width": 120, "height": 40}}]},
                {"tag": "button", "id": "buy", "class": "btn btn-primary", "text": "Buy now",
                 "rect": {"left": 32, "top": 400, "width": 160, "height": 48},
                 "style": {"background-color": "rgb(37, 99, 235)", "color": "rgb(255, 255, 255)",
                           "font-family": "\"Roboto Mono\", monospace", "padding": "12px 24px",
                           "border-radius": "8px", "font-weight": "600"}}
            ]
        }]
    }
}"##;

#[test]
fn analyze_loaded_page() {
    let doc = MemoryDocument::from_json(PAGE).unwrap();
    assert_eq!(doc.title(), Some("Product 42"));

    let result = StyleAggregator::default().aggregate(&doc);
    let hexes: Vec<&str> = result.colors.iter().map(|c| c.hex.as_str()).collect();
    // text color rgb(17, 24, 39) on html and body plus the header background
    assert_eq!(hexes[0], "#111827");
    assert_eq!(result.colors[0].frequency, 3);
    assert!(hexes.contains(&"#ffffff"));
    assert!(hexes.contains(&"#2563eb"));
    assert!(hexes.contains(&"#f9fafb"));

    assert_eq!(result.fonts[0].family, "Inter, sans-serif");
    assert_eq!(result.fonts[0].frequency, 4);
    assert_eq!(result.fonts[1].family, "Roboto Mono, monospace");
}

#[tokio::test]
async fn pick_through_agent() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let doc = MemoryDocument::from_json(PAGE).unwrap();
    let mut agent = ContentAgent::new(doc, AgentOptions::default(), tx);
    agent.install();

    let response = agent.handle_request(&Message::ActivatePicker);
    assert!(response.is_success());
    assert_eq!(agent.document().cursor(), "crosshair");

    let buy = agent.document().find_by_id("buy").unwrap();
    let h1 = agent.document().find_by_tag("h1").unwrap();
    agent.dispatch_event(&PickerEvent::PointerOver { target: h1 });
    agent.dispatch_event(&PickerEvent::PointerOut {
        target: h1,
        related: Some(buy),
    });
    agent.dispatch_event(&PickerEvent::PointerOver { target: buy });
    agent.dispatch_event(&PickerEvent::Click { target: buy });

    let Some(Message::ElementSelected { data }) = rx.recv().await else {
        panic!("expected ELEMENT_SELECTED");
    };
    assert_eq!(data.selector_label(), "button#buy.btn.btn-primary");
    assert_eq!(data.computed_styles.font_family, "Roboto Mono, monospace");
    assert_eq!(data.computed_styles.font_weight, "600");
    assert_eq!(data.box_model().padding, "12px 24px");
    assert_eq!(data.box_model().margin, "0");
    assert_eq!(data.colors().background, "rgb(37, 99, 235)");

    assert_eq!(rx.recv().await, Some(Message::PickerDeactivated));
    assert_eq!(agent.document().cursor(), "");
    assert!(agent.document().overlays().is_empty());
}
