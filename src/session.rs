//! One popup opening against one in-process tab.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use stylescope_background::{spawn, BackgroundHandle, LocalHost, LocalHostOptions, Messenger, TabHost};
use stylescope_config::Config;
use stylescope_content::{AgentOptions, Document, MemoryDocument, PickerOptions, StyleAggregator};
use stylescope_popup::PopupController;
use stylescope_protocols::{policy, Message, TabId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Wiring of the three contexts for a single page.
pub(crate) struct Session {
    pub host: Arc<LocalHost>,
    pub tab: TabId,
    pub popup: PopupController<BackgroundHandle>,
    events: mpsc::UnboundedReceiver<Message>,
    background: JoinHandle<()>,
}

impl Session {
    /// Open `snapshot` in a tab and the popup on top of it.
    ///
    /// With `preload`, the agent is started with the page the way declared
    /// content scripts are; otherwise it is injected on first use.
    pub async fn open(config: &Config, snapshot: &Path, preload: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let page = MemoryDocument::from_path(snapshot)?;
        info!(snapshot = %snapshot.display(), url = page.url(), "Snapshot loaded");

        let (host, host_events) = LocalHost::new(LocalHostOptions {
            agent: agent_options(config),
            boot_delay: Duration::ZERO,
        });
        let host = Arc::new(host);
        let tab = host.open_tab(page);

        let messenger = Arc::new(Messenger::new(host.clone(), config));
        let (popup_tx, events) = mpsc::unbounded_channel();
        messenger.attach_popup(Arc::new(popup_tx));
        let (handle, background) = spawn(messenger, host_events);

        let url = host.tab(tab).and_then(|info| info.url).unwrap_or_default();
        if preload && policy::can_execute(&url) {
            host.inject_agent(tab).await?;
            debug!(tab, "Agent preloaded");
        }

        let mut popup = PopupController::new(handle, config.export.clone());
        popup.load_page(host.active_tab().await?).await;

        Ok(Self {
            host,
            tab,
            popup,
            events,
            background,
        })
    }

    /// Feed forwarded messages to the popup until the pick ends.
    pub async fn wait_for_pick(&mut self, timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
        let pump = async {
            while let Some(message) = self.events.recv().await {
                self.popup.handle_event(&message);
                if !self.popup.is_picking() {
                    break;
                }
            }
        };
        tokio::time::timeout(timeout, pump)
            .await
            .map_err(|_| "Timed out waiting for the picked element")?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.background.abort();
    }
}

fn agent_options(config: &Config) -> AgentOptions {
    AgentOptions {
        aggregator: StyleAggregator::new(config.analysis.max_colors, config.analysis.max_fonts),
        picker: PickerOptions {
            cursor: config.picker.cursor.clone(),
            text_preview_chars: config.picker.text_preview_chars,
        },
    }
}
