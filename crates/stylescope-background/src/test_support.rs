//! Scripted host for unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use stylescope_protocols::{DeliveryError, Message, Response, TabId, TabInfo};
use tokio::time::Instant;

use crate::error::HostError;
use crate::host::TabHost;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send { tab: TabId, kind: &'static str, at: Instant },
    Inject { tab: TabId, at: Instant },
}

/// Host whose answers are queued up front. An empty queue answers
/// `Response::ok()` for sends and success for injections.
#[derive(Default)]
pub struct ScriptedHost {
    pub tab: Mutex<Option<TabInfo>>,
    pub sends: Mutex<VecDeque<Result<Response, DeliveryError>>>,
    pub injections: Mutex<VecDeque<Result<(), HostError>>>,
    pub calls: Mutex<Vec<Call>>,
}

impl ScriptedHost {
    pub fn with_tab(url: &str) -> Self {
        let host = Self::default();
        *host.tab.lock() = Some(TabInfo {
            id: 1,
            url: Some(url.to_string()),
            title: None,
        });
        host
    }

    pub fn push_send(&self, outcome: Result<Response, DeliveryError>) {
        self.sends.lock().push_back(outcome);
    }

    pub fn push_injection(&self, outcome: Result<(), HostError>) {
        self.injections.lock().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn inject_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Inject { .. }))
            .count()
    }

    pub fn send_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Send { .. }))
            .count()
    }
}

#[async_trait]
impl TabHost for ScriptedHost {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        Ok(self.tab.lock().clone())
    }

    async fn send_to_tab(&self, tab: TabId, message: &Message) -> Result<Response, DeliveryError> {
        self.calls.lock().push(Call::Send {
            tab,
            kind: message.kind(),
            at: Instant::now(),
        });
        self.sends.lock().pop_front().unwrap_or_else(|| Ok(Response::ok()))
    }

    async fn inject_agent(&self, tab: TabId) -> Result<(), HostError> {
        self.calls.lock().push(Call::Inject {
            tab,
            at: Instant::now(),
        });
        self.injections.lock().pop_front().unwrap_or(Ok(()))
    }
}
