//! In-process browser host.
//!
//! Tabs hold [`MemoryDocument`] pages. Injecting the agent moves the page into
//! a [`ContentAgent`] running on its own task, which then answers messages
//! and picker input through channels, the same way a real content context is
//! reached only by message passing. Picker events the agent sends upward are
//! tagged with the tab and raised as [`HostEvent::Content`].

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use stylescope_content::agent::InstallOutcome;
use stylescope_content::{AgentOptions, ContentAgent, Document, EventOutcome, MemoryDocument, NodeId, PickerEvent};
use stylescope_protocols::{policy, DeliveryError, Message, Response, TabId, TabInfo};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::host::{HostEvent, TabHost};

/// Settings of the in-process host.
#[derive(Debug, Clone, Default)]
pub struct LocalHostOptions {
    pub agent: AgentOptions,
    /// Time an injected agent needs before it answers messages.
    pub boot_delay: Duration,
}

enum AgentCommand {
    Request {
        message: Message,
        reply: oneshot::Sender<Response>,
    },
    Event {
        event: PickerEvent,
        reply: oneshot::Sender<EventOutcome>,
    },
    Install {
        reply: oneshot::Sender<InstallOutcome>,
    },
    FindById {
        id: String,
        reply: oneshot::Sender<Option<NodeId>>,
    },
}

struct AgentHandle {
    tx: mpsc::UnboundedSender<AgentCommand>,
    ready_at: Instant,
    tasks: [JoinHandle<()>; 2],
}

impl AgentHandle {
    fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

struct TabState {
    info: TabInfo,
    /// The page while no agent owns it.
    page: Option<MemoryDocument>,
    agent: Option<AgentHandle>,
    refuse_injections: u32,
}

/// Browser host backed by in-memory pages.
pub struct LocalHost {
    options: LocalHostOptions,
    tabs: DashMap<TabId, TabState>,
    active: RwLock<Option<TabId>>,
    next_id: AtomicU32,
    events: mpsc::UnboundedSender<HostEvent>,
}

impl LocalHost {
    /// Create a host and the receiver for the events it raises.
    pub fn new(options: LocalHostOptions) -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let host = Self {
            options,
            tabs: DashMap::new(),
            active: RwLock::new(None),
            next_id: AtomicU32::new(1),
            events,
        };
        (host, rx)
    }

    /// Open `page` in a new tab and focus it.
    pub fn open_tab(&self, page: MemoryDocument) -> TabId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let info = TabInfo {
            id,
            url: Some(page.url().to_string()),
            title: page.title().map(str::to_string),
        };
        info!(tab = id, url = page.url(), "Tab opened");
        self.tabs.insert(
            id,
            TabState {
                info,
                page: Some(page),
                agent: None,
                refuse_injections: 0,
            },
        );
        *self.active.write() = Some(id);
        id
    }

    pub fn focus(&self, tab: TabId) -> Result<(), HostError> {
        if !self.tabs.contains_key(&tab) {
            return Err(HostError::TabNotFound(tab));
        }
        *self.active.write() = Some(tab);
        Ok(())
    }

    pub fn tab(&self, tab: TabId) -> Option<TabInfo> {
        self.tabs.get(&tab).map(|state| state.info.clone())
    }

    /// Replace the page of `tab`. Any agent in the old page is discarded.
    pub fn navigate(&self, tab: TabId, page: MemoryDocument) -> Result<(), HostError> {
        {
            let mut state = self.tabs.get_mut(&tab).ok_or(HostError::TabNotFound(tab))?;
            if let Some(agent) = state.agent.take() {
                agent.abort();
            }
            state.info.url = Some(page.url().to_string());
            state.info.title = page.title().map(str::to_string);
            state.page = Some(page);
        }
        info!(tab, "Tab navigated");
        self.raise(HostEvent::TabUpdated { tab });
        Ok(())
    }

    pub fn close_tab(&self, tab: TabId) -> Result<(), HostError> {
        let (_, state) = self.tabs.remove(&tab).ok_or(HostError::TabNotFound(tab))?;
        if let Some(agent) = state.agent {
            agent.abort();
        }
        {
            let mut active = self.active.write();
            if *active == Some(tab) {
                *active = None;
            }
        }
        info!(tab, "Tab closed");
        self.raise(HostEvent::TabRemoved { tab });
        Ok(())
    }

    /// Make the next `count` injections into `tab` fail.
    pub fn refuse_injections(&self, tab: TabId, count: u32) -> Result<(), HostError> {
        let mut state = self.tabs.get_mut(&tab).ok_or(HostError::TabNotFound(tab))?;
        state.refuse_injections = count;
        Ok(())
    }

    pub fn has_agent(&self, tab: TabId) -> bool {
        self.tabs.get(&tab).is_some_and(|state| state.agent.is_some())
    }

    /// Element with the given `id` attribute in the page of `tab`.
    pub async fn find_element(&self, tab: TabId, id: &str) -> Result<Option<NodeId>, DeliveryError> {
        let tx = {
            let state = self.tabs.get(&tab).ok_or_else(|| no_tab(tab))?;
            match (&state.agent, &state.page) {
                (Some(agent), _) => agent.tx.clone(),
                (None, Some(page)) => return Ok(page.find_by_id(id)),
                (None, None) => return Ok(None),
            }
        };
        let (reply, rx) = oneshot::channel();
        tx.send(AgentCommand::FindById {
            id: id.to_string(),
            reply,
        })
        .map_err(|_| DeliveryError::NoReceiver)?;
        rx.await.map_err(|_| DeliveryError::PortClosed)
    }

    /// Feed a user input event to the page of `tab`.
    pub async fn dispatch_dom_event(&self, tab: TabId, event: PickerEvent) -> Result<EventOutcome, DeliveryError> {
        let Some(tx) = self.agent_sender(tab, false)? else {
            // No agent, so no capturing listeners.
            return Ok(EventOutcome::default());
        };
        let (reply, rx) = oneshot::channel();
        tx.send(AgentCommand::Event { event, reply })
            .map_err(|_| DeliveryError::NoReceiver)?;
        rx.await.map_err(|_| DeliveryError::PortClosed)
    }

    fn agent_sender(
        &self,
        tab: TabId,
        require_ready: bool,
    ) -> Result<Option<mpsc::UnboundedSender<AgentCommand>>, DeliveryError> {
        let state = self.tabs.get(&tab).ok_or_else(|| no_tab(tab))?;
        Ok(state.agent.as_ref().and_then(|agent| {
            (!require_ready || Instant::now() >= agent.ready_at).then(|| agent.tx.clone())
        }))
    }

    fn raise(&self, event: HostEvent) {
        if self.events.send(event).is_err() {
            debug!("Host event dropped, background not listening");
        }
    }

    fn start_agent(&self, tab: TabId, page: MemoryDocument) -> AgentHandle {
        let (upstream_tx, mut upstream_rx) = mpsc::unbounded_channel::<Message>();
        let (tx, mut commands) = mpsc::unbounded_channel::<AgentCommand>();

        let mut agent = ContentAgent::new(page, self.options.agent.clone(), upstream_tx);
        agent.install();

        let runner = tokio::spawn(async move {
            while let Some(command) = commands.recv().await {
                match command {
                    AgentCommand::Request { message, reply } => {
                        let _ = reply.send(agent.handle_request(&message));
                    }
                    AgentCommand::Event { event, reply } => {
                        let _ = reply.send(agent.dispatch_event(&event));
                    }
                    AgentCommand::Install { reply } => {
                        let _ = reply.send(agent.install());
                    }
                    AgentCommand::FindById { id, reply } => {
                        let _ = reply.send(agent.document().find_by_id(&id));
                    }
                }
            }
            agent.shutdown();
        });

        let events = self.events.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(message) = upstream_rx.recv().await {
                if events.send(HostEvent::Content { tab, message }).is_err() {
                    warn!(tab, "Content event dropped, background not listening");
                }
            }
        });

        AgentHandle {
            tx,
            ready_at: Instant::now() + self.options.boot_delay,
            tasks: [runner, forwarder],
        }
    }
}

fn no_tab(tab: TabId) -> DeliveryError {
    DeliveryError::Failed(HostError::TabNotFound(tab).to_string())
}

#[async_trait]
impl TabHost for LocalHost {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        let active = *self.active.read();
        Ok(active.and_then(|id| self.tab(id)))
    }

    async fn send_to_tab(&self, tab: TabId, message: &Message) -> Result<Response, DeliveryError> {
        let tx = self.agent_sender(tab, true)?.ok_or(DeliveryError::NoReceiver)?;
        let (reply, rx) = oneshot::channel();
        tx.send(AgentCommand::Request {
            message: message.clone(),
            reply,
        })
        .map_err(|_| DeliveryError::NoReceiver)?;
        rx.await.map_err(|_| DeliveryError::PortClosed)
    }

    async fn inject_agent(&self, tab: TabId) -> Result<(), HostError> {
        let existing = {
            let mut state = self.tabs.get_mut(&tab).ok_or(HostError::TabNotFound(tab))?;
            let url = state.info.url.clone().unwrap_or_default();
            if policy::is_restricted(&url) {
                return Err(HostError::Injection(format!("Cannot access contents of url \"{}\"", url)));
            }
            if state.refuse_injections > 0 {
                state.refuse_injections -= 1;
                return Err(HostError::Injection("Cannot access contents of the page".to_string()));
            }
            let existing = state.agent.as_ref().map(|agent| agent.tx.clone());
            if existing.is_none() {
                let page = state
                    .page
                    .take()
                    .ok_or_else(|| HostError::Injection("Page is not loaded".to_string()))?;
                let agent = self.start_agent(tab, page);
                state.agent = Some(agent);
            }
            existing
        };

        // The script runs again in a page that already has the agent.
        if let Some(tx) = existing {
            let (reply, rx) = oneshot::channel();
            if tx.send(AgentCommand::Install { reply }).is_ok() {
                if let Ok(outcome) = rx.await {
                    debug!(tab, ?outcome, "Agent script re-run");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
