//! Content agent: the request handler living inside a page.

use stylescope_protocols::{policy, ElementSnapshot, Message, ProtocolError, Response};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::aggregator::StyleAggregator;
use crate::dom::Document;
use crate::picker::{EventOutcome, PickerEvent, PickerObserver, PickerOptions, PickerSlot};

/// Reply sent after a successful picker activation.
pub const PICKER_ACTIVATED: &str = "Picker activated successfully";

/// Reply for message kinds the receiver does not handle.
pub const UNKNOWN_MESSAGE: &str = "Unknown message type";

/// Result of installing the agent into a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// The page marker was already set; nothing was changed.
    AlreadyInstalled,
}

/// Agent settings.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub aggregator: StyleAggregator,
    pub picker: PickerOptions,
}

/// Forwards picker outcomes to the background context.
///
/// Sending never fails the picker: a closed channel is only logged.
#[derive(Debug, Clone)]
pub struct UpstreamObserver {
    tx: mpsc::UnboundedSender<Message>,
}

impl UpstreamObserver {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    fn send(&self, message: Message) {
        let kind = message.kind();
        match self.tx.send(message) {
            Ok(()) => debug!(kind, "Forwarded picker event"),
            Err(_) => warn!(kind, "Picker event dropped, background unavailable"),
        }
    }
}

impl PickerObserver for UpstreamObserver {
    fn on_element_selected(&mut self, snapshot: ElementSnapshot) {
        self.send(Message::ElementSelected { data: snapshot });
    }

    fn on_deactivated(&mut self) {
        self.send(Message::PickerDeactivated);
    }
}

/// Per-page agent owning the document, the style aggregator and the picker slot.
pub struct ContentAgent<D: Document> {
    document: D,
    options: AgentOptions,
    slot: PickerSlot,
    upstream: mpsc::UnboundedSender<Message>,
}

impl<D: Document> ContentAgent<D> {
    pub fn new(document: D, options: AgentOptions, upstream: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            document,
            options,
            slot: PickerSlot::new(),
            upstream,
        }
    }

    /// Set the page marker. Repeated installation is a no-op.
    pub fn install(&mut self) -> InstallOutcome {
        if self.document.agent_installed() {
            debug!(url = self.document.url(), "Content agent already installed");
            return InstallOutcome::AlreadyInstalled;
        }
        self.document.mark_agent_installed();
        info!(url = self.document.url(), "Content agent installed");
        InstallOutcome::Installed
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn picker_active(&self) -> bool {
        self.slot.is_active()
    }

    /// Answer one request from the background context.
    pub fn handle_request(&mut self, message: &Message) -> Response {
        let url = self.document.url().to_string();
        if policy::is_restricted(&url) {
            warn!(url = %url, kind = message.kind(), "Request refused on restricted page");
            return Response::restricted(&url, policy::restriction_message(&url));
        }

        debug!(kind = message.kind(), "Content agent handling request");
        match message {
            Message::ActivatePicker => {
                let observer = Box::new(UpstreamObserver::new(self.upstream.clone()));
                self.slot
                    .activate(&mut self.document, self.options.picker.clone(), observer);
                Response::ok_with_message(PICKER_ACTIVATED)
            }
            Message::AnalyzeStyles => {
                let result = self.options.aggregator.aggregate(&self.document);
                Response::with_data(result)
            }
            Message::ElementSelected { .. } | Message::PickerDeactivated => {
                Response::error(UNKNOWN_MESSAGE)
            }
        }
    }

    /// Answer a raw JSON request, mapping undecodable input to an error reply.
    pub fn handle_json(&mut self, raw: &str) -> Response {
        match Message::from_json(raw) {
            Ok(message) => self.handle_request(&message),
            Err(ProtocolError::UnknownMessage(kind)) => {
                debug!(kind = %kind, "Unknown message type");
                Response::error(UNKNOWN_MESSAGE)
            }
            Err(err) => {
                warn!(error = %err, "Malformed request");
                Response::error(err.to_string())
            }
        }
    }

    /// Deliver a captured input event to the picker.
    pub fn dispatch_event(&mut self, event: &PickerEvent) -> EventOutcome {
        self.slot.dispatch(&mut self.document, event)
    }

    /// Tear down any active picker, e.g. when the page unloads.
    pub fn shutdown(&mut self) {
        self.slot.deactivate(&mut self.document);
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
