//! # StyleScope Background
//!
//! The coordinating context between the popup and the content agents.
//!
//! - [`host`] - browser host seams ([`TabHost`], [`PopupLink`], [`HostEvent`])
//! - [`messenger`] - request routing and popup forwarding
//! - [`injection`] - on-demand agent injection with retries
//! - [`registry`] - per-tab injection records
//! - [`service`] - the background loop and the popup's handle to it
//! - [`local`] - an in-process host backed by in-memory pages

pub mod error;
pub mod host;
pub mod injection;
pub mod local;
pub mod messenger;
pub mod registry;
pub mod retry;
pub mod service;

#[cfg(test)]
mod test_support;

pub use error::HostError;
pub use host::{HostEvent, PopupLink, TabHost};
pub use injection::InjectionCoordinator;
pub use local::{LocalHost, LocalHostOptions};
pub use messenger::Messenger;
pub use registry::{InjectionRecord, InjectionRegistry};
pub use retry::{Backoff, RetryPolicy};
pub use service::{spawn, BackgroundHandle, Envelope};
