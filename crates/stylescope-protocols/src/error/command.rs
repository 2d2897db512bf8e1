//! Errors surfaced to the presentation layer for a command.

use thiserror::Error;

use super::DeliveryError;
use crate::policy::RestrictionCategory;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The target page fails the URL policy.
    #[error("{message}")]
    Restricted {
        category: RestrictionCategory,
        message: String,
        url: Option<String>,
    },

    #[error("No active tab found")]
    NoActiveTab,

    #[error("Failed to inject content script after {attempts} attempts: {reason}")]
    Injection { attempts: u32, reason: String },

    #[error("Could not establish connection after {attempts} attempts. {reason}")]
    Handshake { attempts: u32, reason: String },

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Unknown message type")]
    UnknownMessage(String),

    /// The content agent answered with an error.
    #[error("{0}")]
    Agent(String),
}

impl CommandError {
    pub fn restricted(url: &str) -> Self {
        Self::Restricted {
            category: crate::policy::restriction_category(url),
            message: crate::policy::restriction_message(url),
            url: Some(url.to_string()),
        }
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted { .. })
    }
}
