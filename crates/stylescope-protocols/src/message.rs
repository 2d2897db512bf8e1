//! Messages exchanged between the popup, background and content contexts.
//!
//! Every message is a JSON object with a `type` discriminator. Replies are
//! [`Response`] objects; errors never cross a context boundary as anything
//! other than a response carrying an `error` field.

use serde::{Deserialize, Serialize};

use crate::error::{CommandError, ProtocolError};
use crate::model::{AnalysisResult, ElementSnapshot};

/// Browser tab identifier.
pub type TabId = u32;

/// What the host knows about a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl TabInfo {
    /// The tab address, empty when the host did not report one.
    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

/// A cross-context message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// popup -> background -> content
    AnalyzeStyles,
    /// popup -> background -> content
    ActivatePicker,
    /// content -> background -> popup
    ElementSelected { data: ElementSnapshot },
    /// content -> background -> popup
    PickerDeactivated,
}

impl Message {
    const KINDS: [&'static str; 4] = [
        "ANALYZE_STYLES",
        "ACTIVATE_PICKER",
        "ELEMENT_SELECTED",
        "PICKER_DEACTIVATED",
    ];

    /// Wire name of the message type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AnalyzeStyles => Self::KINDS[0],
            Self::ActivatePicker => Self::KINDS[1],
            Self::ElementSelected { .. } => Self::KINDS[2],
            Self::PickerDeactivated => Self::KINDS[3],
        }
    }

    /// Decode a raw JSON message, distinguishing unknown types from malformed payloads.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(ProtocolError::MissingType)?;
        if !Self::KINDS.contains(&kind) {
            return Err(ProtocolError::UnknownMessage(kind.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reply to a [`Message`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// `{success: true}`
    pub fn ok() -> Self {
        Self {
            success: Some(true),
            ..Default::default()
        }
    }

    /// `{success: true, message}`
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// `{success: true, data}`
    pub fn with_data(data: AnalysisResult) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            ..Default::default()
        }
    }

    /// `{error}`
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// `{success: false, error}`
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// `{success: false, error, restricted: true, url}`
    pub fn restricted(url: &str, message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(message.into()),
            restricted: Some(true),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    /// Translate a command error at the sending edge.
    pub fn from_error(err: &CommandError) -> Self {
        match err {
            CommandError::Restricted { message, url, .. } => {
                Self::restricted(url.as_deref().unwrap_or(""), message.clone())
            }
            other => Self::failure(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.success != Some(false)
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted == Some(true)
    }

    /// Lift an error-carrying response back into a typed error.
    pub fn into_result(self) -> Result<Self, CommandError> {
        if self.is_restricted() {
            let url = self.url.clone().unwrap_or_default();
            return Err(CommandError::Restricted {
                category: crate::policy::restriction_category(&url),
                message: self
                    .error
                    .unwrap_or_else(|| crate::policy::restriction_message(&url)),
                url: Some(url),
            });
        }
        match self.error {
            Some(error) => Err(CommandError::Agent(error)),
            None if self.success == Some(false) => {
                Err(CommandError::Agent("Request failed".to_string()))
            }
            None => Ok(self),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
