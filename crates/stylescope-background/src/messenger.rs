//! Cross-context message routing.
//!
//! Requests from the popup are resolved against the active tab, checked
//! against the URL policy and delivered to the content agent. Picker events
//! from the content agent are forwarded to the popup, which may be closed at
//! any time; a missing popup never fails the agent's send.

use std::sync::Arc;

use parking_lot::RwLock;
use stylescope_config::Config;
use stylescope_protocols::{policy, CommandError, DeliveryError, Message, Response, TabId, TabInfo};
use tracing::{debug, error, info, warn};

use crate::host::{HostEvent, PopupLink, TabHost};
use crate::injection::InjectionCoordinator;
use crate::registry::InjectionRegistry;
use crate::retry::RetryPolicy;

pub struct Messenger<H: TabHost + ?Sized> {
    host: Arc<H>,
    coordinator: InjectionCoordinator<H>,
    registry: Arc<InjectionRegistry>,
    popup: RwLock<Option<Arc<dyn PopupLink>>>,
}

impl<H: TabHost + ?Sized> Messenger<H> {
    pub fn new(host: Arc<H>, config: &Config) -> Self {
        Self::with_policies(
            host,
            RetryPolicy::from(&config.injection),
            RetryPolicy::from(&config.handshake),
        )
    }

    pub fn with_policies(host: Arc<H>, injection: RetryPolicy, handshake: RetryPolicy) -> Self {
        let registry = Arc::new(InjectionRegistry::new());
        Self {
            coordinator: InjectionCoordinator::new(host.clone(), injection, handshake, registry.clone()),
            host,
            registry,
            popup: RwLock::new(None),
        }
    }

    pub fn registry(&self) -> &InjectionRegistry {
        &self.registry
    }

    /// Route popup-bound events to `link` until it is detached or replaced.
    pub fn attach_popup(&self, link: Arc<dyn PopupLink>) {
        *self.popup.write() = Some(link);
        debug!("Popup attached");
    }

    pub fn detach_popup(&self) {
        *self.popup.write() = None;
        debug!("Popup detached");
    }

    /// Answer a popup request. Errors become error responses here.
    pub async fn handle_popup(&self, message: &Message) -> Response {
        match self.execute(message).await {
            Ok(response) => response,
            Err(CommandError::UnknownMessage(kind)) => {
                debug!(kind = %kind, "Unknown message type");
                Response::error(CommandError::UnknownMessage(kind).to_string())
            }
            Err(err) => {
                if err.is_restricted() {
                    info!(error = %err, "Command refused by URL policy");
                } else {
                    error!(kind = message.kind(), error = %err, "Command failed");
                }
                Response::from_error(&err)
            }
        }
    }

    /// Run a popup command against the active tab.
    pub async fn execute(&self, message: &Message) -> Result<Response, CommandError> {
        match message {
            Message::AnalyzeStyles => {
                let tab = self.target_tab().await?;
                debug!(tab = tab.id, "Requesting style analysis");
                Ok(self.host.send_to_tab(tab.id, message).await?)
            }
            Message::ActivatePicker => {
                let tab = self.target_tab().await?;
                debug!(tab = tab.id, "Requesting picker activation");
                self.coordinator.deliver_with_injection(tab.id, message).await
            }
            other => Err(CommandError::UnknownMessage(other.kind().to_string())),
        }
    }

    async fn target_tab(&self) -> Result<TabInfo, CommandError> {
        let tab = self
            .host
            .active_tab()
            .await
            .map_err(|err| CommandError::Host(err.to_string()))?
            .ok_or(CommandError::NoActiveTab)?;
        let url = tab.url_or_empty();
        if !policy::can_execute(url) {
            return Err(CommandError::restricted(url));
        }
        Ok(tab)
    }

    /// Answer a message sent upward by the content agent of `tab`.
    pub fn handle_content(&self, tab: TabId, message: &Message) -> Response {
        match message {
            Message::ElementSelected { .. } | Message::PickerDeactivated => {
                self.forward_to_popup(tab, message);
                Response::ok()
            }
            other => {
                debug!(tab, kind = other.kind(), "Unknown message type from content agent");
                Response::error(CommandError::UnknownMessage(other.kind().to_string()).to_string())
            }
        }
    }

    fn forward_to_popup(&self, tab: TabId, message: &Message) {
        let link = self.popup.read().clone();
        let delivered = match link {
            Some(link) => link.deliver(message),
            None => Err(DeliveryError::NoReceiver),
        };
        match delivered {
            Ok(()) => debug!(tab, kind = message.kind(), "Forwarded to popup"),
            Err(err) => warn!(
                tab,
                kind = message.kind(),
                error = %err,
                "Popup may be closed, message not delivered"
            ),
        }
    }

    pub fn on_tab_updated(&self, tab: TabId) {
        self.registry.on_tab_updated(tab);
    }

    pub fn on_tab_removed(&self, tab: TabId) {
        self.registry.on_tab_removed(tab);
    }

    pub fn handle_host_event(&self, event: HostEvent) {
        match event {
            HostEvent::Content { tab, message } => {
                self.handle_content(tab, &message);
            }
            HostEvent::TabUpdated { tab } => self.on_tab_updated(tab),
            HostEvent::TabRemoved { tab } => self.on_tab_removed(tab),
        }
    }
}

#[cfg(test)]
#[path = "messenger_tests.rs"]
mod tests;
