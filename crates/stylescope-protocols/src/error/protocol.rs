//! Wire format errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown message type: {0}")]
    UnknownMessage(String),

    #[error("Missing message type")]
    MissingType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_message_display() {
        let err = ProtocolError::UnknownMessage("PING".to_string());
        assert!(err.to_string().contains("PING"));
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ProtocolError = serde_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }
}
