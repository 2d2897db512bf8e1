//! Popup requests through the background loop into in-process tabs.

use std::sync::Arc;
use std::time::Duration;

use stylescope_background::{spawn, LocalHost, LocalHostOptions, Messenger};
use stylescope_config::Config;
use stylescope_content::{MemoryDocument, NodeSnapshot, PageSnapshot, PickerEvent};
use stylescope_protocols::{CommandError, Message};
use tokio::sync::mpsc;

fn page(url: &str) -> MemoryDocument {
    let root = NodeSnapshot::new("html")
        .with_style("color", "rgb(15, 23, 42)")
        .with_style("font-family", "Georgia, serif")
        .with_child(
            NodeSnapshot::new("nav")
                .with_id("top")
                .with_class("navbar")
                .with_style("background-color", "rgb(30, 64, 175)"),
        );
    MemoryDocument::from_snapshot(PageSnapshot {
        url: url.to_string(),
        title: None,
        root,
    })
    .unwrap()
}

struct Setup {
    host: Arc<LocalHost>,
    messenger: Arc<Messenger<LocalHost>>,
    handle: stylescope_background::BackgroundHandle,
}

fn setup(boot_delay: Duration) -> Setup {
    let (host, events) = LocalHost::new(LocalHostOptions {
        boot_delay,
        ..Default::default()
    });
    let host = Arc::new(host);
    let messenger = Arc::new(Messenger::new(host.clone(), &Config::default()));
    let (handle, _task) = spawn(messenger.clone(), events);
    Setup {
        host,
        messenger,
        handle,
    }
}

#[tokio::test(start_paused = true)]
async fn activation_injects_and_picks() {
    let setup = setup(Duration::from_millis(250));
    let (popup_tx, mut popup_rx) = mpsc::unbounded_channel();
    setup.messenger.attach_popup(Arc::new(popup_tx));
    let tab = setup.host.open_tab(page("https://news.example.org/"));

    let response = setup.handle.request(Message::ActivatePicker).await.unwrap();
    assert!(response.is_success(), "{response:?}");
    assert_eq!(response.message.as_deref(), Some("Picker activated successfully"));
    assert!(setup.messenger.registry().is_injected(tab));

    let nav = setup.host.find_element(tab, "top").await.unwrap().unwrap();
    setup
        .host
        .dispatch_dom_event(tab, PickerEvent::Click { target: nav })
        .await
        .unwrap();

    let Some(Message::ElementSelected { data }) = popup_rx.recv().await else {
        panic!("expected ELEMENT_SELECTED");
    };
    assert_eq!(data.selector_label(), "nav#top.navbar");
    assert_eq!(data.computed_styles.background_color, "rgb(30, 64, 175)");
    assert_eq!(popup_rx.recv().await, Some(Message::PickerDeactivated));
}

#[tokio::test(start_paused = true)]
async fn analysis_before_injection_fails_and_after_succeeds() {
    let setup = setup(Duration::ZERO);
    setup.host.open_tab(page("https://news.example.org/"));

    let response = setup.handle.request(Message::AnalyzeStyles).await.unwrap();
    assert!(!response.is_success());

    setup.handle.request(Message::ActivatePicker).await.unwrap();
    let response = setup.handle.request(Message::AnalyzeStyles).await.unwrap();
    let data = response.data.unwrap();
    assert_eq!(data.colors[0].hex, "#0f172a");
    assert_eq!(data.fonts[0].family, "Georgia, serif");
}

#[tokio::test(start_paused = true)]
async fn injection_failure_reported_after_three_attempts() {
    let setup = setup(Duration::ZERO);
    let tab = setup.host.open_tab(page("https://news.example.org/"));
    setup.host.refuse_injections(tab, 3).unwrap();

    let response = setup.handle.request(Message::ActivatePicker).await.unwrap();
    let err = response.into_result().unwrap_err();
    assert!(matches!(err, CommandError::Agent(ref msg) if msg.contains("after 3 attempts")));
    assert!(!setup.messenger.registry().is_injected(tab));
}

#[tokio::test(start_paused = true)]
async fn slow_agent_exhausts_handshake() {
    let setup = setup(Duration::from_secs(5));
    setup.host.open_tab(page("https://news.example.org/"));

    let response = setup.handle.request(Message::ActivatePicker).await.unwrap();
    let error = response.error.unwrap();
    assert!(error.starts_with("Could not establish connection after 3 attempts."));
}

#[tokio::test(start_paused = true)]
async fn navigation_clears_registry() {
    let setup = setup(Duration::ZERO);
    let tab = setup.host.open_tab(page("https://news.example.org/"));
    setup.handle.request(Message::ActivatePicker).await.unwrap();
    assert!(setup.messenger.registry().is_injected(tab));

    setup
        .host
        .navigate(tab, page("https://news.example.org/world"))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!setup.messenger.registry().is_injected(tab));
}

#[tokio::test(start_paused = true)]
async fn restricted_tab_reported() {
    let setup = setup(Duration::ZERO);
    setup.host.open_tab(page("https://addons.mozilla.org/en-US/firefox/"));
    let response = setup.handle.request(Message::AnalyzeStyles).await.unwrap();
    assert!(response.is_restricted());
    assert!(response.error.unwrap().contains("extension store"));
}
