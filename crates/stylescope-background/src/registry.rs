//! Per-tab record of agent injections.

use dashmap::DashMap;
use stylescope_protocols::TabId;
use tokio::time::Instant;
use tracing::debug;

/// One successful injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionRecord {
    /// Attempt number that succeeded.
    pub attempts: u32,
    pub injected_at: Instant,
}

/// Tabs into which the agent has been injected since their last navigation.
#[derive(Debug, Default)]
pub struct InjectionRegistry {
    tabs: DashMap<TabId, InjectionRecord>,
}

impl InjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, tab: TabId, attempts: u32) {
        self.tabs.insert(
            tab,
            InjectionRecord {
                attempts,
                injected_at: Instant::now(),
            },
        );
    }

    pub fn is_injected(&self, tab: TabId) -> bool {
        self.tabs.contains_key(&tab)
    }

    pub fn get(&self, tab: TabId) -> Option<InjectionRecord> {
        self.tabs.get(&tab).map(|record| *record)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// The agent stopped answering; the next request injects again.
    pub fn forget(&self, tab: TabId) {
        if self.tabs.remove(&tab).is_some() {
            debug!(tab, "Injection record dropped, agent unresponsive");
        }
    }

    /// The tab navigated; its content context was replaced.
    pub fn on_tab_updated(&self, tab: TabId) {
        if self.tabs.remove(&tab).is_some() {
            debug!(tab, "Injection record cleared after navigation");
        }
    }

    pub fn on_tab_removed(&self, tab: TabId) {
        if self.tabs.remove(&tab).is_some() {
            debug!(tab, "Injection record cleared after tab close");
        }
    }
}
