//! Browser host seams.

use async_trait::async_trait;
use stylescope_protocols::{DeliveryError, Message, Response, TabId, TabInfo};
use tokio::sync::mpsc;

use crate::error::HostError;

/// The browser APIs the background context depends on.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The focused tab of the current window, if any.
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError>;

    /// Deliver a message to the content agent of `tab` and await its reply.
    ///
    /// Fails with [`DeliveryError::NoReceiver`] when no agent listens in the tab.
    async fn send_to_tab(&self, tab: TabId, message: &Message) -> Result<Response, DeliveryError>;

    /// Run the content agent script in `tab`.
    async fn inject_agent(&self, tab: TabId) -> Result<(), HostError>;
}

/// Notifications the host raises towards the background context.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A message sent upward by the content agent of `tab`.
    Content { tab: TabId, message: Message },
    /// The tab navigated; its content context is gone.
    TabUpdated { tab: TabId },
    TabRemoved { tab: TabId },
}

/// Delivery path to the popup.
pub trait PopupLink: Send + Sync {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError>;
}

impl PopupLink for mpsc::UnboundedSender<Message> {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        self.send(message.clone())
            .map_err(|_| DeliveryError::NoReceiver)
    }
}
