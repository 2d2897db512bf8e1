//! On-demand agent injection with bounded retries.
//!
//! Activation first tries the agent that may already live in the tab. Only a
//! missing receiver triggers injection; every other delivery failure is
//! returned as is. After a successful injection the agent needs a moment to
//! register its listener, so activation is retried on a capped schedule.
//! A tab with a live injection record is not injected again; its agent only
//! gets the handshake. A failed handshake drops the record so the next
//! request injects afresh.

use std::sync::Arc;

use stylescope_protocols::{CommandError, DeliveryError, Message, Response, TabId};
use tracing::{debug, error, info, warn};

use crate::host::TabHost;
use crate::registry::InjectionRegistry;
use crate::retry::RetryPolicy;

pub struct InjectionCoordinator<H: TabHost + ?Sized> {
    host: Arc<H>,
    injection: RetryPolicy,
    handshake: RetryPolicy,
    registry: Arc<InjectionRegistry>,
}

impl<H: TabHost + ?Sized> InjectionCoordinator<H> {
    pub fn new(
        host: Arc<H>,
        injection: RetryPolicy,
        handshake: RetryPolicy,
        registry: Arc<InjectionRegistry>,
    ) -> Self {
        Self {
            host,
            injection,
            handshake,
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<InjectionRegistry> {
        &self.registry
    }

    /// Deliver `message`, injecting the agent first when nobody is listening.
    pub async fn deliver_with_injection(
        &self,
        tab: TabId,
        message: &Message,
    ) -> Result<Response, CommandError> {
        match self.host.send_to_tab(tab, message).await {
            Ok(response) => {
                debug!(tab, kind = message.kind(), "Delivered to existing agent");
                return Ok(response);
            }
            Err(DeliveryError::NoReceiver) if self.registry.is_injected(tab) => {
                info!(tab, "Injected agent not answering yet, skipping re-injection");
            }
            Err(DeliveryError::NoReceiver) => {
                info!(tab, "No content agent listening, injecting");
                self.inject(tab).await?;
            }
            Err(err) => return Err(err.into()),
        }

        let result = self.handshake(tab, message).await;
        if result.is_err() {
            self.registry.forget(tab);
        }
        result
    }

    /// Run the agent script, retrying with a linear backoff.
    pub async fn inject(&self, tab: TabId) -> Result<(), CommandError> {
        let mut attempt = 1;
        loop {
            match self.host.inject_agent(tab).await {
                Ok(()) => {
                    info!(tab, attempt, "Content agent injected");
                    self.registry.record(tab, attempt);
                    return Ok(());
                }
                Err(err) => {
                    if !self.injection.has_next(attempt) {
                        error!(tab, attempt, error = %err, "Content agent injection failed");
                        return Err(CommandError::Injection {
                            attempts: self.injection.max_attempts,
                            reason: err.to_string(),
                        });
                    }
                    let delay = self.injection.delay(attempt);
                    warn!(tab, attempt, error = %err, ?delay, "Injection failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Re-send `message` to a freshly injected agent on the capped schedule.
    async fn handshake(&self, tab: TabId, message: &Message) -> Result<Response, CommandError> {
        let mut last_error = DeliveryError::NoReceiver;
        for attempt in 1..=self.handshake.max_attempts {
            tokio::time::sleep(self.handshake.delay(attempt)).await;
            debug!(tab, attempt, kind = message.kind(), "Sending to injected agent");
            match self.host.send_to_tab(tab, message).await {
                Ok(response) => {
                    info!(tab, attempt, "Injected agent answered");
                    return Ok(response);
                }
                Err(err) => {
                    warn!(tab, attempt, error = %err, "Injected agent not answering yet");
                    last_error = err;
                }
            }
        }
        error!(tab, attempts = self.handshake.max_attempts, "Handshake with injected agent failed");
        Err(CommandError::Handshake {
            attempts: self.handshake.max_attempts,
            reason: last_error.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "injection_tests.rs"]
mod tests;
