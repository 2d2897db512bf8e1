use super::*;
use crate::dom::{MemoryDocument, NodeSnapshot, PageSnapshot};

fn page(url: &str) -> MemoryDocument {
    let root = NodeSnapshot::new("html")
        .with_style("color", "rgb(31, 41, 55)")
        .with_style("font-family", "system-ui")
        .with_child(
            NodeSnapshot::new("a")
                .with_id("cta")
                .with_class("button")
                .with_text("Sign up")
                .with_style("background-color", "rgb(37, 99, 235)"),
        );
    MemoryDocument::from_snapshot(PageSnapshot {
        url: url.to_string(),
        title: None,
        root,
    })
    .unwrap()
}

fn agent(url: &str) -> (ContentAgent<MemoryDocument>, mpsc::UnboundedReceiver<Message>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ContentAgent::new(page(url), AgentOptions::default(), tx), rx)
}

#[test]
fn test_install_marker() {
    let (mut agent, _rx) = agent("https://example.com/");
    assert_eq!(agent.install(), InstallOutcome::Installed);
    assert_eq!(agent.install(), InstallOutcome::AlreadyInstalled);
    assert!(agent.document().agent_installed());
}

#[test]
fn test_analyze_styles() {
    let (mut agent, _rx) = agent("https://example.com/");
    let response = agent.handle_request(&Message::AnalyzeStyles);
    assert_eq!(response.success, Some(true));
    let data = response.data.unwrap();
    assert_eq!(data.colors[0].hex, "#1f2937");
    assert_eq!(data.colors[0].frequency, 2);
    assert_eq!(data.fonts[0].family, "system-ui");
}

#[test]
fn test_restricted_page_refused() {
    let (mut agent, _rx) = agent("chrome://settings");
    let response = agent.handle_request(&Message::ActivatePicker);
    assert_eq!(response.success, Some(false));
    assert!(response.is_restricted());
    assert_eq!(response.url.as_deref(), Some("chrome://settings"));
    assert!(response.error.is_some());
    assert!(!agent.picker_active());
}

#[test]
fn test_activate_picker_replies() {
    let (mut agent, _rx) = agent("https://example.com/");
    let response = agent.handle_request(&Message::ActivatePicker);
    assert_eq!(response.success, Some(true));
    assert_eq!(response.message.as_deref(), Some(PICKER_ACTIVATED));
    assert!(agent.picker_active());
}

#[test]
fn test_reactivation_reports_previous_deactivation() {
    let (mut agent, mut rx) = agent("https://example.com/");
    agent.handle_request(&Message::ActivatePicker);
    agent.handle_request(&Message::ActivatePicker);
    assert_eq!(rx.try_recv().unwrap(), Message::PickerDeactivated);
    assert!(rx.try_recv().is_err());
    assert_eq!(agent.document().overlays().len(), 2);
}

#[test]
fn test_pick_forwards_selection_then_deactivation() {
    let (mut agent, mut rx) = agent("https://example.com/");
    agent.handle_request(&Message::ActivatePicker);
    let cta = agent.document().find_by_id("cta").unwrap();

    let outcome = agent.dispatch_event(&PickerEvent::Click { target: cta });
    assert!(outcome.prevent_default);

    match rx.try_recv().unwrap() {
        Message::ElementSelected { data } => {
            assert_eq!(data.tag_name, "a");
            assert_eq!(data.text_content, "Sign up");
            assert_eq!(data.computed_styles.background_color, "rgb(37, 99, 235)");
        }
        other => panic!("unexpected message: {:?}", other),
    }
    assert_eq!(rx.try_recv().unwrap(), Message::PickerDeactivated);
    assert!(!agent.picker_active());
}

#[test]
fn test_closed_upstream_does_not_break_picker() {
    let (mut agent, rx) = agent("https://example.com/");
    drop(rx);
    agent.handle_request(&Message::ActivatePicker);
    let cta = agent.document().find_by_id("cta").unwrap();
    agent.dispatch_event(&PickerEvent::Click { target: cta });
    assert!(!agent.picker_active());
    assert_eq!(agent.document().listener_count(), 0);
}

#[test]
fn test_unknown_messages() {
    let (mut agent, _rx) = agent("https://example.com/");
    let response = agent.handle_request(&Message::PickerDeactivated);
    assert_eq!(response.error.as_deref(), Some(UNKNOWN_MESSAGE));

    let response = agent.handle_json(r#"{"type": "GET_PAGE_INFO"}"#);
    assert_eq!(response.error.as_deref(), Some(UNKNOWN_MESSAGE));

    let response = agent.handle_json(r#"{"type": "ANALYZE_STYLES"}"#);
    assert!(response.is_success());

    let response = agent.handle_json("not json");
    assert!(response.error.is_some());
}

#[test]
fn test_shutdown_tears_down_picker() {
    let (mut agent, mut rx) = agent("https://example.com/");
    agent.handle_request(&Message::ActivatePicker);
    agent.shutdown();
    assert!(!agent.picker_active());
    assert_eq!(rx.try_recv().unwrap(), Message::PickerDeactivated);
    assert_eq!(agent.document().cursor(), "");
}
