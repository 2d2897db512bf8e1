use stylescope_content::{NodeSnapshot, PageSnapshot};

use super::*;

fn page(url: &str) -> MemoryDocument {
    let root = NodeSnapshot::new("html")
        .with_style("color", "rgb(0, 0, 0)")
        .with_child(
            NodeSnapshot::new("button")
                .with_id("go")
                .with_text("Go")
                .with_style("background-color", "rgb(255, 0, 0)"),
        );
    MemoryDocument::from_snapshot(PageSnapshot {
        url: url.to_string(),
        title: Some("Test page".to_string()),
        root,
    })
    .unwrap()
}

fn host(boot_delay: Duration) -> (LocalHost, mpsc::UnboundedReceiver<HostEvent>) {
    LocalHost::new(LocalHostOptions {
        boot_delay,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_open_tab_becomes_active() {
    let (host, _events) = host(Duration::ZERO);
    assert!(host.active_tab().await.unwrap().is_none());

    let first = host.open_tab(page("https://a.test/"));
    let second = host.open_tab(page("https://b.test/"));
    let active = host.active_tab().await.unwrap().unwrap();
    assert_eq!(active.id, second);
    assert_eq!(active.title.as_deref(), Some("Test page"));

    host.focus(first).unwrap();
    assert_eq!(host.active_tab().await.unwrap().unwrap().id, first);
    assert_eq!(host.focus(99), Err(HostError::TabNotFound(99)));
}

#[tokio::test]
async fn test_send_without_agent_has_no_receiver() {
    let (host, _events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    let err = host.send_to_tab(tab, &Message::AnalyzeStyles).await.unwrap_err();
    assert!(err.is_no_receiver());

    let err = host.send_to_tab(42, &Message::AnalyzeStyles).await.unwrap_err();
    assert!(!err.is_no_receiver());
}

#[tokio::test]
async fn test_injected_agent_answers() {
    let (host, _events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    host.inject_agent(tab).await.unwrap();
    assert!(host.has_agent(tab));

    let response = host.send_to_tab(tab, &Message::AnalyzeStyles).await.unwrap();
    let data = response.data.unwrap();
    assert_eq!(data.colors.len(), 2);
    assert_eq!(data.colors[0].hex, "#000000");
}

#[tokio::test(start_paused = true)]
async fn test_agent_boot_delay() {
    let (host, _events) = host(Duration::from_millis(150));
    let tab = host.open_tab(page("https://a.test/"));
    host.inject_agent(tab).await.unwrap();

    let err = host.send_to_tab(tab, &Message::ActivatePicker).await.unwrap_err();
    assert!(err.is_no_receiver());

    tokio::time::sleep(Duration::from_millis(150)).await;
    let response = host.send_to_tab(tab, &Message::ActivatePicker).await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_injection_into_restricted_page_refused() {
    let (host, _events) = host(Duration::ZERO);
    let tab = host.open_tab(page("chrome://settings"));
    let err = host.inject_agent(tab).await.unwrap_err();
    assert!(matches!(err, HostError::Injection(_)));
    assert!(!host.has_agent(tab));
}

#[tokio::test]
async fn test_refused_injections_are_counted() {
    let (host, _events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    host.refuse_injections(tab, 2).unwrap();
    assert!(host.inject_agent(tab).await.is_err());
    assert!(host.inject_agent(tab).await.is_err());
    assert!(host.inject_agent(tab).await.is_ok());
}

#[tokio::test]
async fn test_reinjection_keeps_running_agent() {
    let (host, mut events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    host.inject_agent(tab).await.unwrap();
    host.send_to_tab(tab, &Message::ActivatePicker).await.unwrap();

    host.inject_agent(tab).await.unwrap();

    let go = host.find_element(tab, "go").await.unwrap().unwrap();
    let outcome = host
        .dispatch_dom_event(tab, PickerEvent::Click { target: go })
        .await
        .unwrap();
    assert!(outcome.prevent_default);

    match events.recv().await.unwrap() {
        HostEvent::Content {
            tab: from,
            message: Message::ElementSelected { data },
        } => {
            assert_eq!(from, tab);
            assert_eq!(data.id, "go");
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(
        events.recv().await.unwrap(),
        HostEvent::Content {
            tab,
            message: Message::PickerDeactivated
        }
    );
}

#[tokio::test]
async fn test_events_without_agent_are_not_captured() {
    let (host, _events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    let go = host.find_element(tab, "go").await.unwrap().unwrap();
    let outcome = host
        .dispatch_dom_event(tab, PickerEvent::Click { target: go })
        .await
        .unwrap();
    assert_eq!(outcome, EventOutcome::default());
}

#[tokio::test]
async fn test_navigation_discards_agent() {
    let (host, mut events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    host.inject_agent(tab).await.unwrap();

    host.navigate(tab, page("https://a.test/next")).unwrap();
    assert_eq!(events.recv().await.unwrap(), HostEvent::TabUpdated { tab });
    assert!(!host.has_agent(tab));
    assert_eq!(host.tab(tab).unwrap().url.as_deref(), Some("https://a.test/next"));

    let err = host.send_to_tab(tab, &Message::AnalyzeStyles).await.unwrap_err();
    assert!(err.is_no_receiver());
}

#[tokio::test]
async fn test_close_tab() {
    let (host, mut events) = host(Duration::ZERO);
    let tab = host.open_tab(page("https://a.test/"));
    host.close_tab(tab).unwrap();
    assert_eq!(events.recv().await.unwrap(), HostEvent::TabRemoved { tab });
    assert!(host.active_tab().await.unwrap().is_none());
    assert!(host.close_tab(tab).is_err());
}
